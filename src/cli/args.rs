use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "userbook",
    version,
    about = "fetch, alphabetize and filter randomuser.me records",
    long_about = "Userbook collects a fixed number of synthetic users from the randomuser.me API, splitting the work over several requests when the API caps results per request, then lists them alphabetically by first name.\n\nExamples:\n  userbook\n  userbook -n 12000 -m 5000 --filter ann\n  userbook --filter lee --detail 0\n  userbook -o users.html\n  userbook --interactive\n\nTip: Use --init-config to write ~/.userbook/config.yml and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the (filtered) list to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: text, json or html (inferred from --output when omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'w',
        long = "wd",
        visible_alias = "width",
        value_name = "COLUMNS",
        help_heading = "Output",
        help = "Width of the text listing."
    )]
    pub width: Option<usize>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Config",
        help = "Path to config file (defaults to ~/.userbook/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Config",
        help = "Write a default config file (if missing) and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'n',
        long = "dt",
        visible_alias = "desired-total",
        value_name = "N",
        help_heading = "Fetch",
        help = "How many users to collect."
    )]
    pub desired_total: Option<usize>,

    #[arg(
        short = 'm',
        long = "mpr",
        visible_alias = "max-per-request",
        value_name = "N",
        help_heading = "Fetch",
        help = "Most users the API returns for a single request."
    )]
    pub max_per_request: Option<usize>,

    #[arg(
        short = 's',
        long = "sd",
        visible_alias = "seed",
        value_name = "SEED",
        help_heading = "Fetch",
        help = "Seed for reproducible user generation."
    )]
    pub seed: Option<String>,

    #[arg(
        long = "fl",
        visible_alias = "fields",
        value_name = "CSV",
        help_heading = "Fetch",
        help = "Comma-separated fields to request (inc=)."
    )]
    pub fields: Option<String>,

    #[arg(
        short = 'u',
        long = "bu",
        visible_alias = "base-url",
        value_name = "URL",
        help_heading = "Fetch",
        help = "API endpoint."
    )]
    pub base_url: Option<String>,

    #[arg(
        long = "pl",
        visible_alias = "plan",
        help_heading = "Fetch",
        help = "Print the fetch plan and exit without fetching."
    )]
    pub plan_only: bool,

    #[arg(
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "Performance",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        long = "wk",
        visible_alias = "workers",
        value_name = "N",
        help_heading = "Performance",
        help = "Number of runtime worker threads."
    )]
    pub workers: Option<usize>,

    #[arg(
        short = 'x',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "Performance",
        help = "HTTP proxy for API requests."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'f',
        long = "ft",
        visible_alias = "filter",
        value_name = "TERM",
        help_heading = "Listing",
        help = "Only list users whose first or last name contains TERM (case-insensitive)."
    )]
    pub filter: Option<String>,

    #[arg(
        short = 'd',
        long = "dl",
        visible_alias = "detail",
        value_name = "INDEX",
        help_heading = "Listing",
        help = "Show the detail view for the user at INDEX in the listing."
    )]
    pub detail: Option<usize>,

    #[arg(
        long = "dd",
        visible_alias = "detail-dir",
        value_name = "DIR",
        help_heading = "Listing",
        help = "Write detail views as HTML pages into DIR instead of printing them."
    )]
    pub detail_dir: Option<String>,

    #[arg(
        short = 'i',
        long = "it",
        visible_alias = "interactive",
        help_heading = "Listing",
        help = "Read filter terms from stdin; ':show N' opens a detail view, ':quit' exits."
    )]
    pub interactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_and_short_flags_parse() {
        let args = CliArgs::parse_from([
            "userbook",
            "-n",
            "12",
            "--max-per-request",
            "5",
            "--filter",
            "ann",
            "-vv",
            "--detail",
            "2",
        ]);
        assert_eq!(args.desired_total, Some(12));
        assert_eq!(args.max_per_request, Some(5));
        assert_eq!(args.filter.as_deref(), Some("ann"));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.detail, Some(2));
        assert!(!args.interactive);
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }
}
