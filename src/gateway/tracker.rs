//! Pending-request tracker: one reply timeout per user.
//!
//! The map is the single source of truth: a timer only sends its reminder
//! if it can still remove its own entry (matched by generation) when it
//! wakes up. `disarm` and a re-`arm` remove the entry first, so a timer
//! racing with them finds nothing and stays silent.

use nudge_core::{message::OutgoingMessage, traits::Channel, user::UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

struct Pending {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Timers {
    next_generation: u64,
    pending: HashMap<UserId, Pending>,
}

/// Tracks users who owe the bot a reply and reminds them on timeout.
pub struct PendingTracker {
    timers: Arc<Mutex<Timers>>,
    channel: Arc<dyn Channel>,
    reminder_text: String,
}

impl PendingTracker {
    pub fn new(channel: Arc<dyn Channel>, reminder_text: impl Into<String>) -> Self {
        Self {
            timers: Arc::new(Mutex::new(Timers::default())),
            channel,
            reminder_text: reminder_text.into(),
        }
    }

    /// Start (or restart) the reply timeout for `user`. Never blocks.
    pub fn arm(&self, user: UserId, timeout: Duration) {
        let mut timers = lock(&self.timers);
        timers.next_generation += 1;
        let generation = timers.next_generation;

        if let Some(prev) = timers.pending.remove(&user) {
            prev.handle.abort();
            debug!("tracker: replaced pending timeout for {user}");
        }

        let deadline = tokio::time::Instant::now() + timeout;
        let shared = Arc::clone(&self.timers);
        let channel = Arc::clone(&self.channel);
        let text = self.reminder_text.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if !take_if_current(&shared, user, generation) {
                return;
            }
            info!("tracker: {user} did not reply within {}s, reminding", timeout.as_secs());
            let msg = OutgoingMessage::text(Some(user.direct_target()), text);
            if let Err(e) = channel.send(msg).await {
                error!("failed to send reply reminder to {user}: {e}");
            }
        });

        timers.pending.insert(user, Pending { generation, handle });
    }

    /// Cancel the reply timeout for `user`. No-op when none is pending.
    pub fn disarm(&self, user: UserId) {
        if let Some(prev) = lock(&self.timers).pending.remove(&user) {
            prev.handle.abort();
            debug!("tracker: disarmed timeout for {user}");
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self, user: UserId) -> bool {
        lock(&self.timers).pending.contains_key(&user)
    }

    /// Number of users with a live timer.
    pub fn pending_count(&self) -> usize {
        lock(&self.timers).pending.len()
    }

    /// Cancel every pending timer.
    pub fn shutdown(&self) {
        let mut timers = lock(&self.timers);
        let count = timers.pending.len();
        for (_, p) in timers.pending.drain() {
            p.handle.abort();
        }
        if count > 0 {
            info!("tracker: cancelled {count} pending timeout(s)");
        }
    }
}

impl Drop for PendingTracker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Remove `user`'s entry if it still belongs to `generation`.
fn take_if_current(timers: &Mutex<Timers>, user: UserId, generation: u64) -> bool {
    let mut timers = lock(timers);
    match timers.pending.get(&user) {
        Some(p) if p.generation == generation => {
            timers.pending.remove(&user);
            true
        }
        _ => false,
    }
}

/// The guarded map stays consistent even if a holder panicked.
fn lock(timers: &Mutex<Timers>) -> MutexGuard<'_, Timers> {
    timers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
