//! Asynchronous image loading contract.
//!
//! A load resolves exactly once with either the image bytes or a [`LoadError`].

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Raw bytes of a loaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData(Vec<u8>);

impl ImageData {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for ImageData {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Failure of a single load.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("URL does not name a local file: {0}")]
    InvalidPath(Url),

    #[error("failed to read {url}")]
    Io {
        url: Url,
        #[source]
        source: std::io::Error,
    },

    #[error("no image data at {0}")]
    Empty(Url),

    #[error("load failed: {0}")]
    Failed(String),

    #[error("load of {0} was dropped before it finished")]
    Cancelled(Url),
}

/// Unit of work that fetches image data for a URL.
#[async_trait]
pub trait ImageDataLoader: Send + Sync {
    async fn load_image_data(&self, url: &Url) -> Result<ImageData, LoadError>;
}

#[async_trait]
impl<L: ImageDataLoader + ?Sized> ImageDataLoader for Arc<L> {
    async fn load_image_data(&self, url: &Url) -> Result<ImageData, LoadError> {
        (**self).load_image_data(url).await
    }
}
