//! Reference instant for elapsed-time prefixes.
//!
//! A [`Clock`] is created once by the process entry point and handed to every
//! sink that needs it. Clones share the same reference instant, so moving the
//! startup time through any clone shifts the elapsed time of every event
//! formatted afterwards. Lines already written are not affected.
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Shared handle to the process startup instant.
#[derive(Debug, Clone)]
pub struct Clock {
    /// Microseconds since the Unix epoch.
    reference: Arc<AtomicI64>,
}

impl Clock {
    /// Creates a clock whose reference instant is now.
    pub fn starting_now() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Creates a new clock with a fixed reference instant.
    ///
    /// # Arguments
    ///
    /// * `startup` - The instant elapsed times are measured from.
    pub fn starting_at(startup: DateTime<Utc>) -> Self {
        Self {
            reference: Arc::new(AtomicI64::new(startup.timestamp_micros())),
        }
    }

    /// Overwrites the reference instant. Expected once, early, before logging begins.
    pub fn set_startup_time(&self, startup: DateTime<Utc>) {
        self.reference
            .store(startup.timestamp_micros(), Ordering::Relaxed);
    }

    /// Returns the current reference instant.
    pub fn startup_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_micros(self.reference.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Time elapsed between the reference instant and `timestamp`.
    ///
    /// Negative when the event predates the reference instant.
    pub fn elapsed_since(&self, timestamp: DateTime<Utc>) -> TimeDelta {
        let reference = self.reference.load(Ordering::Relaxed);
        TimeDelta::microseconds(timestamp.timestamp_micros() - reference)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::starting_now()
    }
}
