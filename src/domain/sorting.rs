//! Swappable gallery ordering.
//!
//! Every strategy is a stable ascending sort on one key, so equal keys keep
//! their input order and re-applying a strategy never changes its output.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::DomainError;
use crate::domain::image::Image;

/// Ordering algorithm applied by a [`Gallery`].
pub trait SortingStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns a permutation of `images` ordered by this strategy's key.
    fn sort(&self, images: &[Image]) -> Vec<Image>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DateSortingStrategy;

impl SortingStrategy for DateSortingStrategy {
    fn name(&self) -> &'static str {
        "date"
    }

    fn sort(&self, images: &[Image]) -> Vec<Image> {
        let mut sorted = images.to_vec();
        sorted.sort_by(|a, b| a.date.cmp(&b.date));
        sorted
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NameSortingStrategy;

impl SortingStrategy for NameSortingStrategy {
    fn name(&self) -> &'static str {
        "name"
    }

    fn sort(&self, images: &[Image]) -> Vec<Image> {
        let mut sorted = images.to_vec();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SizeSortingStrategy;

impl SortingStrategy for SizeSortingStrategy {
    fn name(&self) -> &'static str {
        "size"
    }

    fn sort(&self, images: &[Image]) -> Vec<Image> {
        let mut sorted = images.to_vec();
        sorted.sort_by_key(|image| image.size);
        sorted
    }
}

/// Names the built-in strategies for settings and command-line selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Date,
    Name,
    Size,
}

impl SortBy {
    pub fn strategy(self) -> Arc<dyn SortingStrategy> {
        match self {
            SortBy::Date => Arc::new(DateSortingStrategy),
            SortBy::Name => Arc::new(NameSortingStrategy),
            SortBy::Size => Arc::new(SizeSortingStrategy),
        }
    }
}

impl FromStr for SortBy {
    type Err = DomainError;

    /// Case-insensitive, matching the serialized names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Ok(SortBy::Date),
            "name" => Ok(SortBy::Name),
            "size" => Ok(SortBy::Size),
            _ => Err(DomainError::UnknownSortKey(s.to_string())),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strategy().name())
    }
}

/// Holds exactly one active strategy; callers never see which.
///
/// `apply` takes a snapshot of the active strategy before sorting, so a
/// concurrent `set_strategy` only affects calls that start after it returns.
pub struct Gallery {
    strategy: RwLock<Arc<dyn SortingStrategy>>,
}

impl Gallery {
    pub fn new(strategy: Arc<dyn SortingStrategy>) -> Self {
        Self {
            strategy: RwLock::new(strategy),
        }
    }

    #[instrument(level = "debug", skip_all, fields(strategy = strategy.name()))]
    pub fn set_strategy(&self, strategy: Arc<dyn SortingStrategy>) {
        let mut active = self.strategy.write().unwrap_or_else(PoisonError::into_inner);
        *active = strategy;
    }

    pub fn strategy_name(&self) -> &'static str {
        self.current().name()
    }

    pub fn apply(&self, images: &[Image]) -> Vec<Image> {
        let strategy = self.current();
        debug!("sorting {} images by {}", images.len(), strategy.name());
        strategy.sort(images)
    }

    fn current(&self) -> Arc<dyn SortingStrategy> {
        let active = self.strategy.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*active)
    }
}

impl fmt::Debug for Gallery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gallery")
            .field("strategy", &self.strategy_name())
            .finish()
    }
}
