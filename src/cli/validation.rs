use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if args.desired_total == Some(0) {
        return Err("invalid desired-total, expected positive integer".to_string());
    }
    if args.max_per_request == Some(0) {
        return Err("invalid max-per-request, expected positive integer".to_string());
    }
    if args.workers == Some(0) {
        return Err("invalid workers, expected positive integer".to_string());
    }
    if let Some(seed) = args.seed.as_deref() {
        if seed.trim().is_empty() {
            return Err("invalid seed, expected a non-empty string".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json or html"
            ));
        }
    }
    if let Some(raw) = args.base_url.as_deref() {
        reqwest::Url::parse(raw).map_err(|e| format!("invalid --base-url '{raw}': {e}"))?;
    }
    if args.interactive && args.output.is_some() {
        return Err("use either --interactive or --output, not both".to_string());
    }
    if args.interactive && args.output_format.is_some() {
        return Err("use either --interactive or --output-format, not both".to_string());
    }
    if args.interactive && args.detail.is_some() {
        return Err("use ':show N' inside --interactive instead of --detail".to_string());
    }
    Ok(())
}
