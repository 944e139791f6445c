//! Image loader for `file://` URLs.

use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use crate::application::loader::{ImageData, ImageDataLoader, LoadError};

/// Reads image bytes from the local filesystem.
///
/// Makes exactly one read per call; wrap it in a
/// [`RetryingLoader`](crate::application::RetryingLoader) to retry.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageLoader;

#[async_trait]
impl ImageDataLoader for FileImageLoader {
    #[instrument(level = "trace", skip(self), fields(url = %url))]
    async fn load_image_data(&self, url: &Url) -> Result<ImageData, LoadError> {
        if url.scheme() != "file" {
            return Err(LoadError::UnsupportedScheme(url.scheme().to_string()));
        }
        let path = url
            .to_file_path()
            .map_err(|_| LoadError::InvalidPath(url.clone()))?;

        let bytes = tokio::fs::read(&path).await.map_err(|source| LoadError::Io {
            url: url.clone(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(LoadError::Empty(url.clone()));
        }
        debug!("read {} bytes from {}", bytes.len(), path.display());
        Ok(ImageData::new(bytes))
    }
}
