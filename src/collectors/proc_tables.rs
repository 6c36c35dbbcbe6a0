use std::fs;
use std::io;
use std::path::Path;

/// Return the first line of a /proc table that mentions `name` anywhere.
///
/// Matching is a plain substring test, so `sda` also matches `sda1`; the
/// table order puts the whole-disk line first in practice.
pub fn find_line(path: &Path, name: &str) -> io::Result<Option<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .find(|line| line.contains(name))
        .map(str::to_string))
}
