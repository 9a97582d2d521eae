//! Resource naming shared by the storage backends.
//!
//! A logbook's file name is derived deterministically from its logical name,
//! so multiple logbooks live as siblings in one directory or one remote
//! collection: `PREFIX.json` for the default (empty) name, `PREFIX_name.json`
//! otherwise.

pub(crate) const FILE_SUFFIX: &str = ".json";

pub(crate) fn encode_filename(prefix: &str, name: &str) -> String {
    if name.is_empty() {
        format!("{prefix}{FILE_SUFFIX}")
    } else {
        format!("{prefix}_{name}{FILE_SUFFIX}")
    }
}

/// Reverses [`encode_filename`]. Returns `None` for files that do not follow
/// the scheme.
pub(crate) fn decode_filename(prefix: &str, filename: &str) -> Option<String> {
    let stem = filename.strip_suffix(FILE_SUFFIX)?;
    let rest = stem.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some(String::new())
    } else {
        rest.strip_prefix('_').map(str::to_string)
    }
}
