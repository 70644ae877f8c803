//! Position, image and access-code sources feeding the shared state.
//!
//! Every source follows the same recovery rule: a file or record that
//! cannot be read or parsed is logged and skipped, and the pipeline
//! continues with the remaining units.

use std::fs;
use std::path::Path;

use log::warn;

pub mod archive;
pub mod codes;
pub mod feed;
pub mod images;
pub mod recorder;

/// Walk `dir` recursively, calling `visit` for every regular file.
///
/// An unreadable directory is logged and contributes nothing; entries are
/// visited in directory order with no ordering guarantee.
pub(crate) fn visit_files(dir: &Path, visit: &mut dyn FnMut(&Path)) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Error walking directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error walking directory {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            visit_files(&path, visit);
        } else {
            visit(&path);
        }
    }
}

/// Case-insensitive extension match.
pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|candidate| *candidate == ext)
        })
        .unwrap_or(false)
}
