//! Atomic replacement of files inside a capability directory.
//!
//! Values are written to a hidden temporary sibling, synced, then renamed over
//! the target so readers observe either the old or the new contents.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use super::key_value::KeyValueError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `file` in `dir` with `contents`.
///
/// `key` names the logical entry in any error. `file` must be a single
/// normal path component.
pub(crate) fn write_atomic(
    dir: &Dir,
    key: &str,
    file: &Utf8Path,
    contents: &str,
) -> Result<(), KeyValueError> {
    let failure = |message: String| KeyValueError::Write {
        key: key.to_owned(),
        message,
    };

    let mut components = file.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(failure(format!("'{file}' is not a plain file name")));
    };

    let tmp_name = temp_name(file_name);
    write_temp_file(dir, &tmp_name, contents).map_err(|err| failure(err.to_string()))?;
    if let Err(err) = replace_target(dir, &tmp_name, file_name) {
        discard(dir, &tmp_name);
        return Err(failure(err.to_string()));
    }
    sync_directory(dir);
    Ok(())
}

fn temp_name(file_name: &str) -> String {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    format!(".{file_name}.tmp.{}.{nanos}.{counter}", std::process::id())
}

fn write_temp_file(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;

    let written = file
        .write_all(contents.as_bytes())
        .and_then(|()| file.sync_all());
    if written.is_err() {
        drop(file);
        discard(dir, tmp_name);
    }
    written
}

#[cfg(windows)]
fn replace_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Rename refuses to overwrite on Windows.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn discard(dir: &Dir, tmp_name: &str) {
    if let Err(err) = dir.remove_file(tmp_name) {
        debug!(tmp_name, error = %err, "could not remove temporary file");
    }
}

fn sync_directory(dir: &Dir) {
    if let Err(err) = dir.open(".").and_then(|handle| handle.sync_all()) {
        debug!(error = %err, "directory sync failed");
    }
}
