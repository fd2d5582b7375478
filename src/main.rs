use std::process::exit;

use colored::Colorize;

fn main() {
    if let Err(e) = userbook::app::run_cli() {
        eprintln!("{}", e.red());
        exit(1);
    }
}
