//! Application layer: services, the image loading contract and its retry decorator
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod loader;
pub mod retry;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use loader::{ImageData, ImageDataLoader, LoadError};
pub use retry::{AttemptState, RetryingLoader};
