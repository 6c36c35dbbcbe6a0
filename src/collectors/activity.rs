use crate::config::ActivityConfig;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// Run the configured read benchmark against `device` and wait for it.
/// Output is discarded; callers only look at the exit status.
///
/// A missing program surfaces as `io::ErrorKind::NotFound`.
pub fn generate(cfg: &ActivityConfig, device: &Path) -> io::Result<ExitStatus> {
    debug!("running {} {:?} {}", cfg.program, cfg.args, device.display());
    Command::new(&cfg.program)
        .args(&cfg.args)
        .arg(device)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
}
