//! Library manifest: the playlist tree and gallery images described in TOML.

use std::path::{Path, PathBuf};

use generational_arena::Index;
use serde::Deserialize;
use tracing::instrument;

use crate::domain::arena::MediaTree;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::image::Image;
use crate::domain::media::{AudioFile, Playlist, VideoFile};

/// One playlist member as written in the manifest, e.g. `{ audio = "Song A" }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaEntry {
    Audio(String),
    Video(String),
    Playlist(PlaylistEntry),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaylistEntry {
    pub name: String,
    #[serde(default)]
    pub items: Vec<MediaEntry>,
}

/// Parsed library file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Library {
    /// Source file, used in error messages
    #[serde(skip)]
    pub path: PathBuf,
    pub playlist: Option<PlaylistEntry>,
    pub images: Vec<Image>,
}

impl Library {
    /// Parse manifest content.
    ///
    /// # Arguments
    /// * `content` - TOML text
    /// * `path` - Where the content came from (for error context)
    pub fn parse(content: &str, path: &Path) -> DomainResult<Self> {
        let mut library: Library =
            toml::from_str(content).map_err(|e| DomainError::InvalidLibrary {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        library.path = path.to_path_buf();
        Ok(library)
    }

    /// Build the media tree described by the `[playlist]` section.
    ///
    /// Returns the tree together with the index of its root playlist.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn build_tree(&self) -> DomainResult<(MediaTree, Index)> {
        let playlist = self
            .playlist
            .as_ref()
            .ok_or_else(|| DomainError::InvalidLibrary {
                path: self.path.clone(),
                message: "missing [playlist] section".to_string(),
            })?;

        let mut tree = MediaTree::new();
        let root = tree.insert(Box::new(Playlist::new(&playlist.name)));
        let mut stack = vec![(playlist, root)];

        while let Some((entry, parent_idx)) = stack.pop() {
            for item in &entry.items {
                let child_idx = match item {
                    MediaEntry::Audio(name) => tree.insert(Box::new(AudioFile::new(name))),
                    MediaEntry::Video(name) => tree.insert(Box::new(VideoFile::new(name))),
                    MediaEntry::Playlist(nested) => {
                        let idx = tree.insert(Box::new(Playlist::new(&nested.name)));
                        stack.push((nested, idx));
                        idx
                    }
                };
                tree.add(parent_idx, child_idx)?;
            }
        }

        Ok((tree, root))
    }
}
