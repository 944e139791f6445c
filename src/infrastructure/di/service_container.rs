//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::application::services::LibraryService;
use crate::application::{ApplicationError, RetryingLoader};
use crate::config::Settings;
use crate::domain::{Gallery, SortBy};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::file_loader::FileImageLoader;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    pub fn library_service(&self) -> LibraryService {
        LibraryService::new(Arc::clone(&self.fs))
    }

    /// Gallery starting with `sort_by`, or the configured default.
    pub fn gallery(&self, sort_by: Option<SortBy>) -> Gallery {
        let sort_by = sort_by.unwrap_or(self.settings.gallery.sort_by);
        Gallery::new(sort_by.strategy())
    }

    /// File loader wrapped in retries; `max_attempts` overrides the configured bound.
    pub fn image_loader(
        &self,
        max_attempts: Option<u32>,
    ) -> InfraResult<Arc<RetryingLoader<FileImageLoader>>> {
        let max_attempts = max_attempts.unwrap_or(self.settings.retry.max_attempts);
        let delay = Duration::from_millis(self.settings.retry.delay_ms);
        debug!("image_loader: max_attempts={} delay={:?}", max_attempts, delay);

        let loader = RetryingLoader::new(FileImageLoader, max_attempts)?.with_delay(delay);
        Ok(Arc::new(loader))
    }

    /// Write the config template to `path`, creating parent directories.
    ///
    /// Refuses to overwrite an existing file.
    pub fn init_config(&self, path: &Path) -> InfraResult<()> {
        if self.fs.exists(path) {
            return Err(ApplicationError::Config {
                message: format!("config already exists: {}", path.display()),
            }
            .into());
        }
        if let Some(parent) = path.parent() {
            self.fs
                .create_dir_all(parent)
                .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
        }
        self.fs
            .write(path, &Settings::template())
            .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
        debug!("init_config: wrote {}", path.display());
        Ok(())
    }
}
