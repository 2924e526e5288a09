//! Dispatch parameters - fan-out concurrency control.
//!
//! [`DispatchConfig`] holds the per-batch knobs that shape a fresh
//! [`Limiter`](crate::fanout::limiter::Limiter). Every use case builds its own
//! limiter from it, so concurrent invocations never share batch state.

use serde::{Deserialize, Serialize};

/// Fan-out concurrency parameters.
///
/// `max_in_flight` is a process-wide budget across all hosts of one batch.
/// `None` or `Some(0)` means unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum number of host calls executing at once.
    pub max_in_flight: Option<usize>,
}

impl DispatchConfig {
    pub fn unbounded() -> Self {
        Self::default()
    }

    // ==================== Builder Methods ====================

    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        self.max_in_flight = Some(max);
        self
    }

    /// Effective budget, with zero normalised to unbounded
    pub fn budget(&self) -> Option<usize> {
        self.max_in_flight.filter(|n| *n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        assert_eq!(DispatchConfig::default().budget(), None);
    }

    #[test]
    fn test_zero_means_unbounded() {
        assert_eq!(DispatchConfig::default().with_max_in_flight(0).budget(), None);
        assert_eq!(DispatchConfig::default().with_max_in_flight(4).budget(), Some(4));
    }
}
