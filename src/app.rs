use std::io::Write as _;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::detail::{DetailView, HtmlDetail, TerminalDetail};
use crate::output::{self, OutputFormat};
use crate::runner::{Options, Runner};
use crate::state::{self, Action, AppState};

const DEFAULT_WIDTH: usize = 100;
const DEFAULT_WORKERS: usize = 4;
const DEFAULT_TIMEOUT: usize = 30;

fn print_banner() {
    const BANNER: &str = r#"
                          __                __
   __  __________  _____/ /_  ____  ____  / /__
  / / / / ___/ _ \/ ___/ __ \/ __ \/ __ \/ //_/
 / /_/ (__  )  __/ /  / /_/ / /_/ / /_/ / ,<
 \__,_/____/\___/_/  /_.___/\____/\____/_/|_|

       v0.1.0 - randomuser.me directory
    "#;
    eprint!("{}", BANNER);
    eprintln!();
}

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Where the fetched listing goes.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Destination {
    File { path: String, format: OutputFormat },
    Stdout(OutputFormat),
    Interactive,
    Listing,
}

#[derive(Clone, Debug)]
struct RunConfig {
    options: Options,
    workers: usize,
    filter: String,
    destination: Destination,
    detail: Option<usize>,
    detail_dir: Option<String>,
    width: usize,
    plan_only: bool,
    no_color: bool,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let desired_total = args
        .desired_total
        .or(cfg.desired_total)
        .unwrap_or(config::DEFAULT_DESIRED_TOTAL);
    let max_per_request = args
        .max_per_request
        .or(cfg.max_per_request)
        .unwrap_or(config::DEFAULT_MAX_PER_REQUEST);
    if desired_total == 0 || max_per_request == 0 {
        return Err("desired-total and max-per-request must be positive integers".to_string());
    }

    let seed = args
        .seed
        .or(cfg.seed)
        .unwrap_or_else(|| crate::api::DEFAULT_SEED.to_string());
    let fields = args
        .fields
        .or(cfg.fields)
        .unwrap_or_else(|| crate::api::DEFAULT_FIELDS.to_string());
    let base_url = args
        .base_url
        .or(cfg.base_url)
        .unwrap_or_else(|| crate::api::DEFAULT_BASE_URL.to_string());
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(DEFAULT_TIMEOUT);
    let workers = args.workers.or(cfg.workers).unwrap_or(DEFAULT_WORKERS).max(1);
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());

    let filter = args.filter.or(cfg.filter).unwrap_or_default();
    let width = args.width.or(cfg.width).unwrap_or(DEFAULT_WIDTH);

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => Some(
            OutputFormat::parse(&raw)
                .ok_or_else(|| format!("invalid output format '{raw}'"))?,
        ),
        None => output.as_deref().and_then(output::infer_format_from_path),
    };
    let destination = match (output, output_format) {
        (Some(_), _) if args.interactive => {
            return Err("--interactive cannot be combined with an output file".to_string());
        }
        (None, Some(_)) if args.interactive => {
            return Err("--interactive cannot be combined with an output format".to_string());
        }
        (Some(path), format) => Destination::File {
            path,
            format: format.unwrap_or(OutputFormat::Text),
        },
        (None, Some(format)) => Destination::Stdout(format),
        (None, None) if args.interactive => Destination::Interactive,
        (None, None) => Destination::Listing,
    };
    let detail_dir = args
        .detail_dir
        .or(cfg.detail_dir)
        .map(|p| config::expand_tilde_string(&p));

    Ok(RunConfig {
        options: Options {
            desired_total,
            max_per_request,
            base_url,
            fields,
            seed,
            timeout_seconds: timeout,
            proxy,
        },
        workers,
        filter,
        destination,
        detail: args.detail,
        detail_dir,
        width,
        plan_only: args.plan_only,
        no_color,
        verbose: args.verbose,
    })
}

fn detail_view(run: &RunConfig) -> Box<dyn DetailView> {
    match run.detail_dir.as_deref() {
        Some(dir) => Box::new(HtmlDetail::new(dir)),
        None => Box::new(TerminalDetail),
    }
}

fn print_listing(state: &AppState, width: usize) {
    let (name_w, email_w, loc_w) = output::column_widths(width);
    let header = format!(
        "{:>5}  {:<name_w$} {:<email_w$} {:<loc_w$}",
        "#", "Name", "Email", "Location"
    );
    println!("{}", header.trim_end().bold());
    for (i, record) in output::build_records(&state.displayed).iter().enumerate() {
        println!("{}", output::render_table_row(record, i, width));
    }
    format_kv_line(
        "Showing",
        &format!("{} of {} users", state.displayed.len(), state.users.len()),
    );
}

fn show_detail_at(state: &AppState, index: usize, view: &dyn DetailView) -> Result<(), String> {
    let user = state.displayed.get(index).ok_or_else(|| {
        format!(
            "no user at index {index} (listing has {} entries)",
            state.displayed.len()
        )
    })?;
    view.show_detail(user).map_err(|e| e.to_string())
}

fn apply_filter(state: AppState, term: &str) -> AppState {
    let state = state::reduce(state, Action::SearchInput(term.to_string()));
    state::reduce(state, Action::SubmitFilter)
}

enum Command {
    Filter(String),
    Show(usize),
    Quit,
    Invalid(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        ":q" | ":quit" | ":exit" => Command::Quit,
        _ => {
            if let Some(rest) = line.strip_prefix(":show") {
                match rest.trim().parse::<usize>() {
                    Ok(i) => Command::Show(i),
                    Err(_) => Command::Invalid(format!("expected ':show <index>', got '{line}'")),
                }
            } else if line.starts_with(':') {
                Command::Invalid(format!("unknown command '{line}'"))
            } else {
                Command::Filter(line.to_string())
            }
        }
    }
}

async fn run_interactive(
    mut state: AppState,
    run: &RunConfig,
    view: &dyn DetailView,
) -> Result<(), String> {
    print_listing(&state, run.width);
    eprintln!(
        "{}",
        "Filter results by either first or last name (':show N', ':quit'):".bold()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let prompt = if state.search.placeholder.is_empty() {
            "> ".to_string()
        } else {
            format!("[{}] > ", state.search.placeholder)
        };
        eprint!("{prompt}");

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(format!("failed to read stdin: {e}")),
        };

        match parse_command(&line) {
            Command::Quit => break,
            Command::Show(i) => {
                if let Err(e) = show_detail_at(&state, i, view) {
                    eprintln!("{}", e.red());
                }
            }
            Command::Invalid(msg) => eprintln!("{}", msg.red()),
            Command::Filter(term) => {
                state = apply_filter(state, &term);
                print_listing(&state, run.width);
            }
        }
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    let runner = Runner::new(run.options.clone()).map_err(|e| e.to_string())?;
    let plan = *runner.plan();

    print_banner();
    format_kv_line("Users", &run.options.desired_total.to_string());
    format_kv_line(
        "Requests",
        &format!(
            "{} x {} (first -{})",
            plan.request_count, plan.records_per_request, plan.first_request_deficit
        ),
    );
    format_kv_line("Seed", &run.options.seed);
    format_kv_line("Endpoint", &run.options.base_url);
    if !run.filter.is_empty() {
        format_kv_line("Filter", &run.filter);
    }
    format_kv_line(
        "Interactive",
        format_bool(run.destination == Destination::Interactive),
    );
    eprintln!();

    if run.plan_only {
        let sizes = plan
            .request_sizes()
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(",");
        println!("{sizes}");
        return Ok(());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("fetching {} users", run.options.desired_total));
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut state = AppState::default();
    if !run.filter.is_empty() {
        state = apply_filter(state, &run.filter);
    }

    let fetched = runner.run().await;
    pb.finish_and_clear();

    let state = match fetched {
        Ok(result) => {
            info!(
                users = result.users.len(),
                elapsed_ms = result.elapsed.as_millis() as u64,
                "fetch complete"
            );
            state::reduce(state, Action::UsersLoaded(result.users))
        }
        Err(e) => {
            error!(error = %e, "fetch failed");
            state::reduce(state, Action::LoadFailed(e.to_string()))
        }
    };
    if let Some(message) = state.status_message() {
        return Err(message.to_string());
    }

    let view = detail_view(&run);

    match &run.destination {
        Destination::Interactive => return run_interactive(state, &run, view.as_ref()).await,
        Destination::File { path, format } => {
            let rendered = output::render(*format, &state.displayed, run.width);
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(&rendered)
                .await
                .map_err(|_| "failed to write output file".to_string())?;
            format_kv_line("Output", path);
        }
        Destination::Stdout(format) => {
            let mut rendered = output::render(*format, &state.displayed, run.width);
            if !rendered.ends_with(b"\n") {
                rendered.push(b'\n');
            }
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&rendered)
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
        }
        Destination::Listing => print_listing(&state, run.width),
    }

    if let Some(index) = run.detail {
        show_detail_at(&state, index, view.as_ref())?;
    }

    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    if args.init_config {
        let path = match args.config.as_deref() {
            Some(p) => config::expand_tilde(p),
            None => config::default_config_path()
                .ok_or_else(|| "could not determine home directory".to_string())?,
        };
        if config::ensure_default_config_file(&path).map_err(|e| e.to_string())? {
            println!("wrote {}", path.display());
        } else {
            println!("{} already exists", path.display());
        }
        return Ok(());
    }

    let cfg = match args.config.as_deref() {
        Some(p) => config::load_config(&config::expand_tilde(p), false),
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true),
            None => Ok(ConfigFile::default()),
        },
    }
    .map_err(|e| e.to_string())?;

    let run = build_run_config(args, cfg)?;

    if run.no_color {
        colored::control::set_override(false);
    }
    crate::logging::init(run.verbose, !run.no_color)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(run.workers)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
