mod collectors;
mod config;
mod models;
mod util;
mod validator;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use config::Config;
use models::device::{DiskName, Target};
use std::io::{self, Write};
use tracing::{debug, warn, Level};
use validator::Outcome;

#[derive(Parser, Debug)]
#[command(
    name = "diskcheck",
    about = "Check a block device is visible to Linux and its I/O statistics move under load",
    version
)]
struct Cli {
    /// Disk to analyze statistics for; a /dev/ prefix is accepted
    #[arg(long, default_value = "sda")]
    disk_name: String,

    /// Exit code used when the disk is an NVDIMM and the test is skipped
    #[arg(long)]
    skip_status: Option<u8>,

    /// Seconds to wait after generating I/O before re-reading statistics
    #[arg(long)]
    settle_secs: Option<u64>,

    /// Print a JSON summary of the result on stdout; other lines move to stderr
    #[arg(long)]
    json: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Verbose diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "diskcheck", &mut io::stdout());
        return Ok(());
    }

    let mut cfg = Config::load();
    if let Some(code) = cli.skip_status {
        cfg.general.skip_status = code;
    }
    if let Some(secs) = cli.settle_secs {
        cfg.general.settle_secs = secs;
    }

    if cli.config {
        return run_print_config(&cfg);
    }

    let target = Target::new(DiskName::normalize(&cli.disk_name), cfg.general.skip_status);
    let code = run_check(&target, &cfg, cli.json)?;
    std::process::exit(code);
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Run the validation and return the process exit code:
/// 0 = PASS, skip status = NVDIMM skipped, 1 = any failure.
fn run_check(target: &Target, cfg: &Config, json: bool) -> Result<i32> {
    debug!("checking {} with {:?}", target.name, cfg);
    if !target.name.is_nvdimm() && !nix::unistd::Uid::effective().is_root() {
        warn!("not running as root; {} may be unable to read the device", cfg.activity.program);
    }

    let outcome = validator::run(target, cfg);
    let code = match &outcome {
        Outcome::Pass      => 0,
        Outcome::Skipped   => i32::from(target.skip_status),
        Outcome::Failed(_) => 1,
    };

    util::report::print(&outcome, target, json);
    if json {
        let report = util::report::build(&outcome, target, code);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    io::stdout().flush()?;
    Ok(code)
}

fn run_print_config(cfg: &Config) -> Result<()> {
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    println!("Config: {}", path);
    println!();
    println!("[general]");
    println!("  skip_status = {}", cfg.general.skip_status);
    println!("  settle_secs = {}s", cfg.general.settle_secs);
    println!();
    println!("[paths]");
    println!("  proc_root = {}", cfg.paths.proc_root.display());
    println!("  sys_root  = {}", cfg.paths.sys_root.display());
    println!("  dev_root  = {}", cfg.paths.dev_root.display());
    println!();
    println!("[activity]");
    println!("  program = {}", cfg.activity.program);
    println!("  args    = {:?}", cfg.activity.args);
    Ok(())
}
