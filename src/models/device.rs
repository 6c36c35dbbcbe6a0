use std::fmt;

const DEFAULT_DISK: &str = "sda";
const DEV_PREFIX:   &str = "/dev/";
const NVDIMM_MARK:  &str = "pmem";

/// Kernel name of a block device, e.g. `sda` or `nvme0n1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskName(String);

impl DiskName {
    /// Strip a leading `/dev/` and fall back to `sda` when nothing is left.
    pub fn normalize(raw: &str) -> Self {
        let name = raw.trim();
        let name = name.strip_prefix(DEV_PREFIX).unwrap_or(name);
        if name.is_empty() {
            DiskName(DEFAULT_DISK.to_string())
        } else {
            DiskName(name.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// NVDIMM namespaces show up as pmem* and publish no useful counters.
    pub fn is_nvdimm(&self) -> bool {
        self.0.contains(NVDIMM_MARK)
    }
}

impl Default for DiskName {
    fn default() -> Self {
        DiskName(DEFAULT_DISK.to_string())
    }
}

impl fmt::Display for DiskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The device under test plus the exit code to use when it is skipped.
#[derive(Debug, Clone)]
pub struct Target {
    pub name:        DiskName,
    pub skip_status: u8,
}

impl Target {
    pub fn new(name: DiskName, skip_status: u8) -> Self {
        Self { name, skip_status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_dev_prefix() {
        assert_eq!(DiskName::normalize("/dev/sdb").as_str(), "sdb");
        assert_eq!(DiskName::normalize("/dev/nvme0n1").as_str(), "nvme0n1");
    }

    #[test]
    fn leaves_plain_names_alone() {
        assert_eq!(DiskName::normalize("sdc").as_str(), "sdc");
        // only the exact prefix is removed, not its characters
        assert_eq!(DiskName::normalize("vda").as_str(), "vda");
        assert_eq!(DiskName::normalize("dev").as_str(), "dev");
    }

    #[test]
    fn empty_name_defaults_to_sda() {
        assert_eq!(DiskName::normalize("").as_str(), "sda");
        assert_eq!(DiskName::normalize("/dev/").as_str(), "sda");
        assert_eq!(DiskName::default().as_str(), "sda");
    }

    #[test]
    fn nvdimm_detection() {
        assert!(DiskName::normalize("pmem0").is_nvdimm());
        assert!(DiskName::normalize("/dev/pmem1s").is_nvdimm());
        assert!(!DiskName::normalize("sda").is_nvdimm());
    }
}
