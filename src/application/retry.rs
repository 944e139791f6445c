//! Retry decorator for image loaders.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::application::loader::{ImageData, ImageDataLoader, LoadError};
use crate::domain::{DomainError, DomainResult};

/// Position in one call's attempt sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Attempting(u32),
    Succeeded,
    ExhaustedFailure,
}

impl AttemptState {
    pub fn first() -> Self {
        AttemptState::Attempting(1)
    }

    /// Transition after the current attempt completed.
    ///
    /// Terminal states are absorbing.
    pub fn advance(self, succeeded: bool, max_attempts: NonZeroU32) -> Self {
        match self {
            AttemptState::Attempting(_) if succeeded => AttemptState::Succeeded,
            AttemptState::Attempting(n) if n < max_attempts.get() => AttemptState::Attempting(n + 1),
            AttemptState::Attempting(_) => AttemptState::ExhaustedFailure,
            terminal => terminal,
        }
    }
}

/// Wraps a loader and re-invokes it on failure, up to `max_attempts` times.
///
/// Any failure is retried; the caller only sees the final outcome. Each call
/// keeps its own attempt counter, so concurrent loads through one shared
/// instance never interfere.
#[derive(Debug)]
pub struct RetryingLoader<L> {
    inner: L,
    max_attempts: NonZeroU32,
    delay: Duration,
}

impl<L: ImageDataLoader> RetryingLoader<L> {
    pub fn new(inner: L, max_attempts: u32) -> DomainResult<Self> {
        let max_attempts =
            NonZeroU32::new(max_attempts).ok_or(DomainError::InvalidAttemptBound(max_attempts))?;
        Ok(Self {
            inner,
            max_attempts,
            delay: Duration::ZERO,
        })
    }

    /// Pause between a failed attempt and the next one.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }
}

impl<L: ImageDataLoader + 'static> RetryingLoader<L> {
    /// Run a load on the tokio runtime and hand the outcome to `on_complete`.
    ///
    /// No handle is returned, so a started load cannot be aborted. If the
    /// task is dropped anyway (runtime shutdown), `on_complete` still runs
    /// once with [`LoadError::Cancelled`].
    pub fn spawn_load<F>(self: Arc<Self>, url: Url, on_complete: F)
    where
        F: FnOnce(Result<ImageData, LoadError>) + Send + 'static,
    {
        let completion = Completion::new(url.clone(), on_complete);
        tokio::spawn(async move {
            let result = self.load_image_data(&url).await;
            completion.deliver(result);
        });
    }
}

/// Owns a completion callback and guarantees it runs exactly once.
struct Completion<F>
where
    F: FnOnce(Result<ImageData, LoadError>),
{
    url: Url,
    on_complete: Option<F>,
}

impl<F> Completion<F>
where
    F: FnOnce(Result<ImageData, LoadError>),
{
    fn new(url: Url, on_complete: F) -> Self {
        Self {
            url,
            on_complete: Some(on_complete),
        }
    }

    fn deliver(mut self, result: Result<ImageData, LoadError>) {
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(result);
        }
    }
}

impl<F> Drop for Completion<F>
where
    F: FnOnce(Result<ImageData, LoadError>),
{
    fn drop(&mut self) {
        if let Some(on_complete) = self.on_complete.take() {
            warn!(url = %self.url, "load dropped before completion");
            on_complete(Err(LoadError::Cancelled(self.url.clone())));
        }
    }
}

#[async_trait]
impl<L: ImageDataLoader> ImageDataLoader for RetryingLoader<L> {
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    async fn load_image_data(&self, url: &Url) -> Result<ImageData, LoadError> {
        let mut state = AttemptState::first();
        loop {
            debug!(?state, max_attempts = self.max_attempts.get(), "loading");
            let result = self.inner.load_image_data(url).await;

            state = state.advance(result.is_ok(), self.max_attempts);
            match state {
                AttemptState::Attempting(_) => {
                    if let Err(e) = &result {
                        debug!(error = %e, "attempt failed, retrying");
                    }
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                }
                AttemptState::ExhaustedFailure => {
                    warn!(attempts = self.max_attempts.get(), "all attempts failed");
                    return result;
                }
                AttemptState::Succeeded => return result,
            }
        }
    }
}
