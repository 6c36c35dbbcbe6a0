use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `/sys/block/<name>`
pub fn block_dir(sys_block: &Path, name: &str) -> PathBuf {
    sys_block.join(name)
}

/// `/sys/block/<name>/stat`
pub fn stat_path(sys_block: &Path, name: &str) -> PathBuf {
    block_dir(sys_block, name).join("stat")
}

pub fn block_exists(sys_block: &Path, name: &str) -> bool {
    block_dir(sys_block, name).exists()
}

/// Size of the stat file as reported by the filesystem. sysfs attributes
/// report their page size rather than content length, which is still
/// non-zero for a populated attribute.
pub fn stat_len(path: &Path) -> io::Result<u64> {
    Ok(fs::metadata(path)?.len())
}

pub fn read_stat(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}
