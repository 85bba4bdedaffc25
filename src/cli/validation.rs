use crate::cli::args::CliArgs;
use crate::model::{ContentType, Status};
use crate::output::OutputFormat;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected html, csv or json"
            ));
        }
    }
    if let Some(raw) = args.status.as_deref() {
        if !raw.trim().is_empty() && Status::parse(raw).is_none() {
            return Err(format!(
                "invalid --status '{raw}', expected live, review, draft, retired or archived"
            ));
        }
    }
    if let Some(raw) = args.content_type.as_deref() {
        if !raw.trim().is_empty() && ContentType::parse(raw).is_none() {
            return Err(format!("invalid --type '{raw}', expected static or dynamic"));
        }
    }
    if let Some(out) = args.output.as_deref() {
        if out.trim().is_empty() {
            return Err("invalid --output, expected a file path".to_string());
        }
    }
    Ok(())
}
