use crate::models::device::Target;
use crate::validator::Outcome;
use serde::Serialize;

/// Machine-readable summary of one run, printed with `--json`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub tool:      &'static str,
    pub version:   &'static str,
    pub timestamp: String,
    pub device:    &'a str,
    pub outcome:   &'static str,
    pub cause:     Option<&'static str>,
    pub message:   String,
    pub exit_code: i32,
}

/// The single line shown to the user for this outcome.
pub fn message(outcome: &Outcome, target: &Target) -> String {
    match outcome {
        Outcome::Pass        => format!("PASS: Finished testing stats for {}", target.name),
        Outcome::Skipped     => format!("Disk {} appears to be an NVDIMM, skipping", target.name),
        Outcome::Failed(err) => err.to_string(),
    }
}

/// PASS goes to stdout; skip and failure diagnostics go to stderr.
/// In JSON mode stdout carries only the report, so every line goes to stderr.
pub fn line_on_stdout(outcome: &Outcome, json: bool) -> bool {
    matches!(outcome, Outcome::Pass) && !json
}

pub fn print(outcome: &Outcome, target: &Target, json: bool) {
    let line = message(outcome, target);
    if line_on_stdout(outcome, json) {
        println!("{}", line);
    } else {
        eprintln!("{}", line);
    }
}

pub fn build<'a>(outcome: &Outcome, target: &'a Target, exit_code: i32) -> Report<'a> {
    Report {
        tool:      env!("CARGO_PKG_NAME"),
        version:   env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Local::now().to_rfc3339(),
        device:    target.name.as_str(),
        outcome:   outcome.label(),
        cause:     match outcome {
            Outcome::Failed(err) => Some(err.kind()),
            _                    => None,
        },
        message:   message(outcome, target),
        exit_code,
    }
}
