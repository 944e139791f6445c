//! Composable playlists, retrying image loaders and swappable gallery sorting.
//!
//! - [`domain::MediaTree`]: playlists and media files performed as one tree
//! - [`application::RetryingLoader`]: retries any [`application::ImageDataLoader`]
//! - [`domain::Gallery`]: sorts images with a replaceable [`domain::SortingStrategy`]

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
