use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub activity: ActivityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Exit code used when the device is an NVDIMM and the run is skipped
    pub skip_status: u8,
    /// Seconds to wait after inducing activity before the second snapshot
    pub settle_secs: u64,
}

/// Roots of the kernel surfaces that are inspected. Only tests and
/// containerised runs need anything other than the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub proc_root: PathBuf,
    pub sys_root:  PathBuf,
    pub dev_root:  PathBuf,
}

/// External read benchmark used to generate I/O.
///
/// ```toml
/// [activity]
/// program = "hdparm"
/// args    = ["-t"]   # the device path is appended
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    pub program: String,
    pub args:    Vec<String>,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            general:  GeneralConfig::default(),
            paths:    PathsConfig::default(),
            activity: ActivityConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { skip_status: 0, settle_secs: 5 }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            sys_root:  PathBuf::from("/sys"),
            dev_root:  PathBuf::from("/dev"),
        }
    }
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self { program: "hdparm".into(), args: vec!["-t".into()] }
    }
}

impl PathsConfig {
    pub fn partitions(&self) -> PathBuf {
        self.proc_root.join("partitions")
    }

    pub fn diskstats(&self) -> PathBuf {
        self.proc_root.join("diskstats")
    }

    pub fn sys_block(&self) -> PathBuf {
        self.sys_root.join("block")
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    pub fn load() -> Self {
        let path = match Config::config_path() {
            Some(p) => p,
            None    => return Config::default(),
        };
        if !path.exists() {
            // Write defaults on first run (best-effort)
            if let Err(e) = try_write_defaults() {
                debug!("could not write default config to {}: {e}", path.display());
            }
            return Config::default();
        }
        match try_load() {
            Ok(c)  => c,
            Err(e) => {
                warn!("ignoring unreadable config {}: {e:#}", path.display());
                Config::default()
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("diskcheck").join("diskcheck.toml"))
    }
}

fn try_load() -> Result<Config> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    let text = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&text)?;
    Ok(cfg)
}

fn try_write_defaults() -> Result<()> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# diskcheck configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg: Config = toml::from_str("[general]\nskip_status = 4\n").unwrap();
        assert_eq!(cfg.general.skip_status, 4);
        assert_eq!(cfg.general.settle_secs, 5);
        assert_eq!(cfg.paths.proc_root, PathBuf::from("/proc"));
        assert_eq!(cfg.activity.program, "hdparm");
        assert_eq!(cfg.activity.args, vec!["-t".to_string()]);
    }

    #[test]
    fn skip_status_must_fit_an_exit_code() {
        assert!(toml::from_str::<Config>("[general]\nskip_status = 256\n").is_err());
        assert!(toml::from_str::<Config>("[general]\nskip_status = -1\n").is_err());
        let cfg: Config = toml::from_str("[general]\nskip_status = 255\n").unwrap();
        assert_eq!(cfg.general.skip_status, 255);
    }

    #[test]
    fn default_config_serializes_and_reloads() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let cfg: Config = toml::from_str(&text).unwrap();
        assert_eq!(cfg.paths.dev_root, PathBuf::from("/dev"));
        assert_eq!(cfg.general.skip_status, 0);
    }

    #[test]
    fn derived_source_paths() {
        let paths = PathsConfig {
            proc_root: PathBuf::from("/tmp/p"),
            sys_root:  PathBuf::from("/tmp/s"),
            dev_root:  PathBuf::from("/tmp/d"),
        };
        assert_eq!(paths.partitions(), PathBuf::from("/tmp/p/partitions"));
        assert_eq!(paths.diskstats(),  PathBuf::from("/tmp/p/diskstats"));
        assert_eq!(paths.sys_block(),  PathBuf::from("/tmp/s/block"));
    }
}
