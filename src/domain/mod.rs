//! Domain layer: media tree, gallery sorting and library manifest
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod image;
pub mod library;
pub mod media;
pub mod sorting;

pub use arena::{MediaTree, PreOrderIterator, TreeNode};
pub use error::{DomainError, DomainResult};
pub use image::Image;
pub use library::{Library, MediaEntry, PlaylistEntry};
pub use media::{
    AudioFile, MediaComponent, MediaKind, PlaybackEvent, PlaybackSink, Playlist, VideoFile,
};
pub use sorting::{
    DateSortingStrategy, Gallery, NameSortingStrategy, SizeSortingStrategy, SortBy,
    SortingStrategy,
};
