/// Track reference type
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque, immutable handle to a playable audio source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackRef {
    path: PathBuf,
}

impl TrackRef {
    /// Create a new track reference
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the audio file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name (file name, or the full path if it has none)
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl From<PathBuf> for TrackRef {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for TrackRef {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&str> for TrackRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_file_name() {
        let track = TrackRef::new("/music/album/01 - intro.flac");
        assert_eq!(track.name(), "01 - intro.flac");
        assert_eq!(track.path(), Path::new("/music/album/01 - intro.flac"));
    }

    #[test]
    fn name_falls_back_to_path() {
        let track = TrackRef::new("/");
        assert_eq!(track.name(), "/");
    }

    #[test]
    fn equal_paths_are_equal_refs() {
        assert_eq!(TrackRef::from("a.wav"), TrackRef::new(PathBuf::from("a.wav")));
    }
}
