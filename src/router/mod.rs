mod config;
mod direct;
pub mod itinerary;
pub mod locator;
pub mod transfer;

pub use config::*;
pub use itinerary::*;
pub use locator::*;
pub use transfer::{CombinationKey, Quota, SearchStats, TransferSearch};

use crate::repository::Repository;

/// Route search over a borrowed [`Repository`].
///
/// A router never mutates the repository, so any number of them can run
/// in parallel over the same data.
#[derive(Debug, Clone)]
pub struct Router<'a> {
    repository: &'a Repository,
    config: SearchConfig,
}

impl<'a> Router<'a> {
    pub fn new(repository: &'a Repository) -> Self {
        Self {
            repository,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn locator(&self) -> Locator<'a> {
        Locator::new(self.repository.routes(), self.config.max_walking_distance)
    }
}
