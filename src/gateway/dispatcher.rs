//! Routes events to the per-user conversation state.

use super::conversation::{advance, ConversationState, Effect, Event};
use nudge_core::user::UserId;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// In-memory conversation states keyed by user. Users in `Idle` have no entry.
#[derive(Default)]
pub struct Dispatcher {
    states: Mutex<HashMap<UserId, ConversationState>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed `event` to `user`'s conversation and return the effects to perform.
    pub fn route(&self, user: UserId, event: Event) -> Vec<Effect> {
        let mut states = self.states.lock().unwrap_or_else(|p| p.into_inner());
        let current = states.remove(&user).unwrap_or_default();
        let (next, effects) = advance(current, event);
        debug!("dispatcher: {user} -> {next:?}");
        if next != ConversationState::Idle {
            states.insert(user, next);
        }
        effects
    }

    /// Current state of `user` (`Idle` when unknown).
    #[cfg(test)]
    pub fn state_of(&self, user: UserId) -> ConversationState {
        self.states
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&user)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of users in the middle of a flow.
    pub fn active_count(&self) -> usize {
        self.states.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}
