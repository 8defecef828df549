//! Repetition inspector: a loop guard against a generator stuck on one call.

use super::Inspector;
use crate::tool::entities::ToolCall;
use std::collections::VecDeque;
use std::sync::Mutex;

pub const DEFAULT_THRESHOLD: usize = 3;
pub const HISTORY_CAPACITY: usize = 100;

/// Remembers the last [`HISTORY_CAPACITY`] call signatures and refuses a call
/// once `threshold` identical calls are already in the history.
///
/// Refused calls are not recorded.
#[derive(Debug)]
pub struct RepetitionInspector {
    threshold: usize,
    capacity: usize,
    history: Mutex<VecDeque<String>>,
}

impl RepetitionInspector {
    /// A zero threshold falls back to [`DEFAULT_THRESHOLD`].
    pub fn new(threshold: usize) -> Self {
        Self::with_capacity(threshold, HISTORY_CAPACITY)
    }

    pub fn with_capacity(threshold: usize, capacity: usize) -> Self {
        let threshold = if threshold == 0 {
            DEFAULT_THRESHOLD
        } else {
            threshold
        };
        let capacity = capacity.max(1);
        Self {
            threshold,
            capacity,
            history: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn history_len(&self) -> usize {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl Default for RepetitionInspector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl Inspector for RepetitionInspector {
    fn name(&self) -> &str {
        "repetition"
    }

    fn inspect(&self, call: &ToolCall) -> Result<(), String> {
        let signature = call.signature();
        let mut history = self
            .history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let count = history.iter().filter(|s| **s == signature).count();
        if count >= self.threshold {
            return Err(format!(
                "detected repetitive pattern (same call made {} times)",
                count
            ));
        }

        if history.len() == self.capacity {
            history.pop_front();
        }
        history.push_back(signature);
        Ok(())
    }
}
