use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing an archive entry name.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    pub original: String,
    /// Path below the extraction root, empty for the root itself.
    pub relative: PathBuf,
    pub resolved: PathBuf,
}

/// Resolve an archive entry name below `base`.
///
/// Both `/` and `\` are treated as separators so that archives built on any
/// host resolve the same way. Absolute names, drive prefixes, NUL bytes and
/// `..` segments that climb above `base` are rejected. `base` is expected to
/// be canonical already; no link is followed while resolving.
pub fn sanitize_entry_name<B: AsRef<Path>>(name: &str, base: B) -> Result<SanitizedPath> {
    let base = base.as_ref();

    if name.contains('\0') {
        return Err(Error::InvalidPath {
            entry: name.to_string(),
        });
    }

    let normalized = name.replace('\\', "/");
    if normalized.starts_with('/') || has_drive_prefix(&normalized) {
        return Err(Error::ZipSlip {
            entry: name.to_string(),
            resolved: PathBuf::from(normalized),
        });
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(Error::ZipSlip {
                        entry: name.to_string(),
                        resolved: base.join(&normalized),
                    });
                }
            }
            part => segments.push(part),
        }
    }

    let relative: PathBuf = segments.iter().collect();
    let resolved = base.join(&relative);

    if !resolved.starts_with(base) {
        return Err(Error::ZipSlip {
            entry: name.to_string(),
            resolved,
        });
    }

    Ok(SanitizedPath {
        original: name.to_string(),
        relative,
        resolved,
    })
}

fn has_drive_prefix(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
