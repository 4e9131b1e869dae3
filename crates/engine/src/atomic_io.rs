use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes `text` to a sibling `.tmp` file, syncs it and renames it over
/// `path`. Readers see either the old map or the new one, never a partial
/// write. On Windows the old file is removed first, so a reader racing the
/// save can briefly find no file.
pub(crate) fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = sibling_tmp_path(path);
    let result = write_synced(&tmp_path, text).and_then(|()| rename_over(&tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_synced(path: &Path, text: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()
}

#[cfg(not(windows))]
fn rename_over(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}

#[cfg(windows)]
fn rename_over(from: &Path, to: &Path) -> io::Result<()> {
    if let Err(error) = fs::remove_file(to) {
        if error.kind() != io::ErrorKind::NotFound {
            return Err(error);
        }
    }
    fs::rename(from, to)
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "map.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
