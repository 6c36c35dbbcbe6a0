/// Textual capture of a device's counters at one point in time.
///
/// Neither source is parsed; two snapshots are compared verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatSnapshot {
    /// First line of /proc/diskstats mentioning the device, if any
    pub diskstats_line: Option<String>,
    /// Whole contents of /sys/block/<dev>/stat
    pub sysfs_stat:     String,
}

/// Which source, if any, failed to move between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Both,
    DiskstatsUnchanged,
    SysfsUnchanged,
}

impl StatSnapshot {
    /// The diskstats table is checked first: if it did not move, that is
    /// reported even when the sysfs file did.
    pub fn compare(&self, after: &StatSnapshot) -> Change {
        if self.diskstats_line == after.diskstats_line {
            Change::DiskstatsUnchanged
        } else if self.sysfs_stat == after.sysfs_stat {
            Change::SysfsUnchanged
        } else {
            Change::Both
        }
    }
}
