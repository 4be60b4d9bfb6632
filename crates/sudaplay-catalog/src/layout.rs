//! Directory layout below the media root.
//!
//! ```text
//! <root>/games/files/     uploaded archives
//! <root>/games/builds/    extracted builds, one directory per record
//! <root>/games/covers/    cover images
//! ```

use std::path::{Component, Path, PathBuf};

use crate::model::RecordId;

#[derive(Debug, Clone)]
pub struct MediaLayout {
    root: PathBuf,
    files: PathBuf,
    builds: PathBuf,
    covers: PathBuf,
}

impl MediaLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let games = root.join("games");
        Self {
            files: games.join("files"),
            builds: games.join("builds"),
            covers: games.join("covers"),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &Path {
        &self.files
    }

    pub fn builds(&self) -> &Path {
        &self.builds
    }

    pub fn covers(&self) -> &Path {
        &self.covers
    }

    pub fn build_dir(&self, id: RecordId) -> PathBuf {
        self.builds.join(id.to_string())
    }

    /// Media-relative, `/`-separated path of a file inside a record's build.
    pub fn playable_path(&self, id: RecordId, relative: &Path) -> String {
        let mut parts = vec!["games".to_string(), "builds".to_string(), id.to_string()];
        parts.extend(to_segments(relative));
        parts.join("/")
    }

    /// Media-relative, `/`-separated name of a path below the root.
    pub fn relative_name(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        Some(to_segments(relative).collect::<Vec<_>>().join("/"))
    }

    pub fn ensure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.files)?;
        std::fs::create_dir_all(&self.builds)?;
        std::fs::create_dir_all(&self.covers)?;
        Ok(())
    }
}

fn to_segments(path: &Path) -> impl Iterator<Item = String> + '_ {
    path.components().filter_map(|c| match c {
        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths() {
        let layout = MediaLayout::new("/media");
        assert_eq!(layout.files(), Path::new("/media/games/files"));
        assert_eq!(layout.builds(), Path::new("/media/games/builds"));
        assert_eq!(layout.covers(), Path::new("/media/games/covers"));
        assert_eq!(
            layout.build_dir(RecordId(42)),
            Path::new("/media/games/builds/42")
        );
    }

    #[test]
    fn playable_path_uses_forward_slashes() {
        let layout = MediaLayout::new("/media");
        let relative: PathBuf = ["web", "index.html"].iter().collect();
        assert_eq!(
            layout.playable_path(RecordId(42), &relative),
            "games/builds/42/web/index.html"
        );
        assert_eq!(
            layout.playable_path(RecordId(1), Path::new("index.html")),
            "games/builds/1/index.html"
        );
    }

    #[test]
    fn relative_name_below_root() {
        let layout = MediaLayout::new("/media");
        assert_eq!(
            layout.relative_name(Path::new("/media/games/files/a.zip")),
            Some("games/files/a.zip".to_string())
        );
        assert_eq!(layout.relative_name(Path::new("/elsewhere/a.zip")), None);
    }
}
