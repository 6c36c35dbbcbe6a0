use crate::collectors::{activity, proc_tables, sysfs};
use crate::config::{ActivityConfig, Config, PathsConfig};
use crate::models::device::Target;
use crate::models::snapshot::{Change, StatSnapshot};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Why a run did not pass. `Display` is the line shown to the user.
#[derive(Debug, Error)]
pub enum CheckFailure {
    #[error("Error: {} not found", .0.display())]
    MissingSource(PathBuf),

    #[error("Disk {disk} not found in {}", .location.display())]
    DeviceAbsent { disk: String, location: PathBuf },

    #[error("Error: could not read {}: {err}", .path.display())]
    UnreadableSource { path: PathBuf, err: io::Error },

    #[error("stat is either empty or nonexistent in {}", .0.display())]
    StatEmpty(PathBuf),

    #[error("ERROR: {0} not found, please install before retrying")]
    ToolMissing(String),

    #[error("ERROR: {program} execution failed")]
    ToolFailed { program: String, detail: String },

    #[error("Stats in {} did not change", .0.display())]
    DiskstatsUnchanged(PathBuf),

    #[error("Stats in {} did not change", .0.display())]
    SysfsUnchanged(PathBuf),
}

impl CheckFailure {
    /// Stable tag for machine-readable reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckFailure::MissingSource(_)         => "missing_source",
            CheckFailure::DeviceAbsent { .. }      => "device_absent",
            CheckFailure::UnreadableSource { .. }  => "unreadable_source",
            CheckFailure::StatEmpty(_)             => "stat_empty",
            CheckFailure::ToolMissing(_)           => "tool_missing",
            CheckFailure::ToolFailed { .. }        => "tool_failed",
            CheckFailure::DiskstatsUnchanged(_)    => "diskstats_unchanged",
            CheckFailure::SysfsUnchanged(_)        => "sysfs_unchanged",
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Pass,
    /// Device is an NVDIMM; deliberately not tested.
    Skipped,
    Failed(CheckFailure),
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Pass      => "pass",
            Outcome::Skipped   => "skipped",
            Outcome::Failed(_) => "failed",
        }
    }
}

/// Full run: exclusion check, presence checks, then the load test.
pub fn run(target: &Target, cfg: &Config) -> Outcome {
    if target.name.is_nvdimm() {
        info!("{} is an NVDIMM namespace, not checking it", target.name);
        return Outcome::Skipped;
    }
    let settle = Duration::from_secs(cfg.general.settle_secs);
    let result = validate(target, &cfg.paths)
        .and_then(|()| collect_statistics(target, &cfg.paths, &cfg.activity, settle));
    match result {
        Ok(())   => Outcome::Pass,
        Err(err) => Outcome::Failed(err),
    }
}

/// Confirm the device shows up in every kernel surface we sample.
pub fn validate(target: &Target, paths: &PathsConfig) -> Result<(), CheckFailure> {
    let name = target.name.as_str();

    for table in [paths.partitions(), paths.diskstats()] {
        if table_line(&table, name)?.is_none() {
            return Err(CheckFailure::DeviceAbsent { disk: name.to_string(), location: table });
        }
        debug!("{name} listed in {}", table.display());
    }

    let sys_block = paths.sys_block();
    if !sysfs::block_exists(&sys_block, name) {
        return Err(CheckFailure::DeviceAbsent { disk: name.to_string(), location: sys_block });
    }

    let stat = sysfs::stat_path(&sys_block, name);
    match sysfs::stat_len(&stat) {
        Ok(0)  => Err(CheckFailure::StatEmpty(stat)),
        Ok(_)  => Ok(()),
        Err(e) => Err(io_failure(stat, e)),
    }
}

/// Capture both statistics sources for the device.
pub fn snapshot(target: &Target, paths: &PathsConfig) -> Result<StatSnapshot, CheckFailure> {
    let name = target.name.as_str();
    let diskstats_line = table_line(&paths.diskstats(), name)?;
    let stat = sysfs::stat_path(&paths.sys_block(), name);
    let sysfs_stat = sysfs::read_stat(&stat).map_err(|e| io_failure(stat, e))?;
    Ok(StatSnapshot { diskstats_line, sysfs_stat })
}

/// Read from the device with the external benchmark so its counters move.
pub fn induce_activity(
    target:   &Target,
    paths:    &PathsConfig,
    activity: &ActivityConfig,
) -> Result<(), CheckFailure> {
    let device = paths.dev_root.join(target.name.as_str());
    let program = activity.program.clone();
    let result = match activity::generate(activity, &device) {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(CheckFailure::ToolFailed { program, detail: status.to_string() }),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(CheckFailure::ToolMissing(program)),
        Err(e) => Err(CheckFailure::ToolFailed { program, detail: e.to_string() }),
    };
    if let Err(CheckFailure::ToolFailed { program, detail }) = &result {
        debug!("{program} against {}: {detail}", device.display());
    }
    result
}

/// Snapshot, generate I/O, wait `settle`, snapshot again and compare.
pub fn collect_statistics(
    target:   &Target,
    paths:    &PathsConfig,
    activity: &ActivityConfig,
    settle:   Duration,
) -> Result<(), CheckFailure> {
    let before = snapshot(target, paths)?;
    debug!("baseline: {:?}", before);

    induce_activity(target, paths, activity)?;

    info!("waiting {}s for counters to update", settle.as_secs());
    std::thread::sleep(settle);

    let after = snapshot(target, paths)?;
    debug!("after load: {:?}", after);

    match before.compare(&after) {
        Change::Both => Ok(()),
        Change::DiskstatsUnchanged => Err(CheckFailure::DiskstatsUnchanged(paths.diskstats())),
        Change::SysfsUnchanged => Err(CheckFailure::SysfsUnchanged(
            sysfs::stat_path(&paths.sys_block(), target.name.as_str()),
        )),
    }
}

fn table_line(path: &Path, name: &str) -> Result<Option<String>, CheckFailure> {
    proc_tables::find_line(path, name).map_err(|e| io_failure(path.to_path_buf(), e))
}

fn io_failure(path: PathBuf, err: io::Error) -> CheckFailure {
    if err.kind() == ErrorKind::NotFound {
        CheckFailure::MissingSource(path)
    } else {
        CheckFailure::UnreadableSource { path, err }
    }
}
