//! Tag group resolution with bounded retry
//!
//! Tag groups are published by a discovery process that runs independently
//! of thing class discovery, so a thing may reference a tag group the
//! registry has not seen yet. Lookups that fail with "not found" are retried
//! with a fixed delay; any other failure is returned immediately.

use std::time::Duration;

use crate::config::defaults;
use crate::iot::TagGroup;
use crate::registry::{RegistryError, TagGroupSource};

/// Fixed-delay retry policy for tag group lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total lookup attempts, including the first one
    pub max_attempts: u32,
    /// Sleep between consecutive attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::RETRY_ATTEMPTS,
            delay: Duration::from_millis(defaults::RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// `max_attempts` lookups spaced by `delay`; at least one lookup is made.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// `attempts` lookups with no delay in between.
    pub fn immediate(attempts: u32) -> Self {
        Self::new(attempts, Duration::ZERO)
    }

    /// Total time spent sleeping when every attempt fails.
    pub fn worst_case_delay(&self) -> Duration {
        self.delay * self.max_attempts.saturating_sub(1)
    }
}

/// Resolves tag group identifiers against a registry.
pub struct TagGroupResolver<'a, S: TagGroupSource + ?Sized> {
    source: &'a S,
    policy: RetryPolicy,
}

impl<'a, S: TagGroupSource + ?Sized> TagGroupResolver<'a, S> {
    pub fn new(source: &'a S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Resolve a tag group.
    ///
    /// Returns `Ok(None)` when the tag group is still unknown after the
    /// last attempt; the caller skips it. Errors other than
    /// [`RegistryError::InvalidReference`] are returned without retrying.
    pub fn resolve(&self, tag_group_id: &str) -> Result<Option<TagGroup>, RegistryError> {
        let attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=attempts {
            match self.source.find_tag_group(tag_group_id) {
                Ok(tag_group) => {
                    if attempt > 1 {
                        tracing::debug!(
                            tag_group = tag_group_id,
                            attempt,
                            "Tag group resolved after retry"
                        );
                    }
                    return Ok(Some(tag_group));
                }
                Err(e) if e.is_not_found() => {
                    tracing::debug!(
                        tag_group = tag_group_id,
                        attempt,
                        max_attempts = attempts,
                        "Tag group not discovered yet"
                    );
                }
                Err(e) => return Err(e),
            }
            if attempt < attempts && !self.policy.delay.is_zero() {
                std::thread::sleep(self.policy.delay);
            }
        }

        tracing::warn!(
            tag_group = tag_group_id,
            attempts,
            "Tag group not found, skipping"
        );
        Ok(None)
    }
}

/// Resolve a tag group with the default policy (50 attempts, 100 ms apart).
pub fn resolve<S: TagGroupSource + ?Sized>(
    source: &S,
    tag_group_id: &str,
) -> Result<Option<TagGroup>, RegistryError> {
    TagGroupResolver::new(source, RetryPolicy::default()).resolve(tag_group_id)
}
