//! Consumer policy values.

use std::time::Duration;

use linkbot_core::{LinkbotError, Result};

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_IDLE_WAIT: Duration = Duration::from_secs(1);
pub const DEFAULT_FAILURE_THRESHOLD: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerConfig {
    /// Max events per fetch; also the peak number of concurrent handlers.
    pub batch_size: usize,
    /// Pause after an empty fetch.
    pub idle_wait: Duration,
    /// Failed handlers within one batch that stop the loop.
    pub failure_threshold: usize,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            idle_wait: DEFAULT_IDLE_WAIT,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }
}

impl ConsumerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(LinkbotError::Config("batch_size must be positive".to_string()));
        }
        if self.failure_threshold == 0 {
            return Err(LinkbotError::Config(
                "failure_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
