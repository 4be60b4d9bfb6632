//! Entry page lookup inside an extracted build.

use std::path::{Path, PathBuf};

pub const ENTRY_PAGE: &str = "index.html";

/// Find the build's `index.html`, relative to `root`.
///
/// Only regular files named exactly `index.html` count. With several
/// candidates the one with the fewest path segments wins, then the shortest
/// full path; the lexical order only makes the pick deterministic.
pub fn find_entry_page(root: &Path) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    collect_candidates(root, Path::new(""), &mut candidates);
    select_entry_page(root, candidates)
}

/// Pick among `index.html` paths relative to `root`.
pub fn select_entry_page(
    root: &Path,
    candidates: impl IntoIterator<Item = PathBuf>,
) -> Option<PathBuf> {
    candidates.into_iter().min_by(|a, b| {
        let key = |p: &PathBuf| (p.components().count(), root.join(p).as_os_str().len());
        key(a).cmp(&key(b)).then_with(|| a.cmp(b))
    })
}

fn collect_candidates(dir: &Path, relative: &Path, out: &mut Vec<PathBuf>) {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in read_dir.flatten() {
        // file_type does not follow links
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let name = entry.file_name();
        let child = relative.join(&name);

        if file_type.is_dir() {
            collect_candidates(&entry.path(), &child, out);
        } else if file_type.is_file() && name == ENTRY_PAGE {
            out.push(child);
        }
    }
}
