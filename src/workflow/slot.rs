//! One-shot data slots.

use crate::errors::ClientError;

/// Load state of a single slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

/// A data slot whose fetch fires at most once per key.
///
/// The latch is armed when the fetch fires, not when it succeeds, so a
/// failed slot stays failed until the key changes or the view is remounted.
#[derive(Debug)]
pub struct Slot<T> {
    state: SlotState<T>,
    fired_for: Option<String>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            state: SlotState::Idle,
            fired_for: None,
        }
    }
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the latch for `key`. Returns `false` if a fetch for this key has
    /// already fired.
    pub fn begin(&mut self, key: &str) -> bool {
        if self.fired_for.as_deref() == Some(key) {
            return false;
        }
        self.fired_for = Some(key.to_string());
        self.state = SlotState::Loading;
        true
    }

    /// Record the fetch outcome. Returns the error, if any, for reporting.
    pub fn finish(&mut self, result: Result<T, ClientError>) -> Option<ClientError> {
        match result {
            Ok(value) => {
                self.state = SlotState::Ready(value);
                None
            }
            Err(e) => {
                self.state = SlotState::Failed(e.message());
                Some(e)
            }
        }
    }

    /// Mark the slot failed without a fetch (missing precondition).
    pub fn fail_closed(&mut self, message: impl Into<String>) {
        self.state = SlotState::Failed(message.into());
    }

    pub fn state(&self) -> &SlotState<T> {
        &self.state
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            SlotState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            SlotState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SlotState::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_fires_once_per_key() {
        let mut slot: Slot<u32> = Slot::new();
        assert!(slot.begin("p1"));
        assert!(slot.is_loading());
        assert!(!slot.begin("p1"));
        assert!(!slot.begin("p1"));

        assert!(slot.begin("p2"));
        assert!(!slot.begin("p2"));
    }

    #[test]
    fn test_failure_keeps_latch() {
        let mut slot: Slot<u32> = Slot::new();
        slot.begin("p1");
        let err = slot.finish(Err(ClientError::Transport("down".into())));
        assert!(err.is_some());
        assert_eq!(slot.state(), &SlotState::Failed("down".to_string()));
        assert!(!slot.begin("p1"));
    }

    #[test]
    fn test_value_only_when_ready() {
        let mut slot: Slot<u32> = Slot::new();
        assert!(slot.value().is_none());
        slot.begin("p1");
        assert!(slot.value().is_none());
        slot.finish(Ok(5));
        assert_eq!(slot.value(), Some(&5));
    }
}
