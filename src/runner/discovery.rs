//! Finds check programs under the checks directory.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// An executable script found under the checks directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredCheck {
    /// Path relative to the checks directory, used as the check's name.
    pub name: String,
    pub path: PathBuf,
}

/// Recursively collects files starting with a `#!` line, skipping names that
/// start with `_` and files without a newline-terminated first line. With
/// `chmod` set, every other regular file visited also gets its executable
/// bits added. Problems with single entries are logged and skipped.
pub fn discover_checks(dir: &Path, chmod: bool) -> Vec<DiscoveredCheck> {
    let mut checks = Vec::new();
    walk(dir, dir, chmod, &mut checks);
    checks.sort_by(|a, b| a.name.cmp(&b.name));
    checks
}

fn walk(root: &Path, dir: &Path, chmod: bool, checks: &mut Vec<DiscoveredCheck>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dir.display(), "Failed to walk dir: {}", e);
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %dir.display(), "Failed to read dir entry: {}", e);
                continue;
            }
        };
        let path = entry.path();

        // file_type does not follow symlinks
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!(path = %path.display(), "Failed to get file info: {}", e);
                continue;
            }
        };

        if file_type.is_dir() {
            debug!(path = %path.display(), "Descending into directory");
            walk(root, &path, chmod, checks);
            continue;
        }

        if entry.file_name().to_string_lossy().starts_with('_') {
            debug!(path = %path.display(), "Skipping underscored file");
            continue;
        }

        if !file_type.is_file() {
            debug!(path = %path.display(), "Skipping non-regular file");
            continue;
        }

        let first_line = match read_first_line(&path) {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!(path = %path.display(), "Skipping file without a complete first line");
                continue;
            }
            Err(e) => {
                warn!(path = %path.display(), "Failed to open file: {}", e);
                continue;
            }
        };

        if first_line.starts_with("#!") {
            match path.strip_prefix(root) {
                Ok(rel) => checks.push(DiscoveredCheck {
                    name: rel.to_string_lossy().into_owned(),
                    path: path.clone(),
                }),
                Err(_) => warn!(path = %path.display(), "Failed to get relative path"),
            }
        }

        if chmod {
            if let Err(e) = make_executable(&path) {
                warn!(path = %path.display(), "Failed to add executable permission: {}", e);
            }
        }
    }
}

/// `None` unless the file holds at least one newline-terminated line.
fn read_first_line(path: &Path) -> std::io::Result<Option<String>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.ends_with('\n').then_some(line))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
