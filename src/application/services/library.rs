//! Library service
//!
//! Loads library manifests and runs playback, tree rendering and gallery
//! sorting against them.

use std::path::Path;
use std::sync::Arc;

use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Gallery, Image, Library, PlaybackSink};
use crate::infrastructure::traits::FileSystem;

/// Rendered playlist tree with a few figures about it.
pub struct TreeSummary {
    pub rendered: Tree<String>,
    /// Total number of nodes, playlists included
    pub items: usize,
    pub depth: usize,
}

/// Service for working with library manifests.
pub struct LibraryService {
    fs: Arc<dyn FileSystem>,
}

impl LibraryService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Library> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::LibraryNotFound(path.to_path_buf()));
        }
        let content =
            self.fs
                .read_to_string(path)
                .map_err(|e| ApplicationError::OperationFailed {
                    context: format!("read library: {}", path.display()),
                    source: Box::new(e),
                })?;
        let library = Library::parse(&content, path)?;
        debug!(
            "load: playlist={} images={}",
            library.playlist.is_some(),
            library.images.len()
        );
        Ok(library)
    }

    /// Perform the library's playlist into `sink`.
    pub fn play(&self, path: &Path, sink: &mut dyn PlaybackSink) -> ApplicationResult<()> {
        let (tree, root) = self.load(path)?.build_tree()?;
        tree.perform(root, sink)?;
        Ok(())
    }

    pub fn tree(&self, path: &Path) -> ApplicationResult<TreeSummary> {
        let (tree, root) = self.load(path)?.build_tree()?;
        Ok(TreeSummary {
            rendered: tree.to_termtree(root)?,
            items: tree.len(),
            depth: tree.depth(root),
        })
    }

    /// Images of the library, ordered by whatever strategy `gallery` holds.
    pub fn sorted_images(&self, path: &Path, gallery: &Gallery) -> ApplicationResult<Vec<Image>> {
        let library = self.load(path)?;
        Ok(gallery.apply(&library.images))
    }
}
