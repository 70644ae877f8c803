//! Access-code allow-list refresh.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::warn;

/// Merge the newline-delimited codes file into `codes`.
///
/// Purely additive: entries are inserted, never removed, so a reader can
/// never observe the set shrinking. Blank lines and surrounding
/// whitespace are ignored. An unreadable file is logged and leaves the
/// set untouched.
pub fn refresh_codes(path: &Path, codes: &mut HashSet<String>) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Error reading codes file {}: {}", path.display(), e);
            return;
        }
    };

    for line in contents.lines() {
        let code = line.trim();
        if !code.is_empty() {
            codes.insert(code.to_string());
        }
    }
}
