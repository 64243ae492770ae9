//! Gateway: the main event loop connecting the channel, the conversation
//! flows, the store and the weather lookup.
//!
//! Includes: per-user serialization of events, reply timeouts, the daily
//! reminder job, and graceful shutdown.

pub mod conversation;
mod dispatcher;
mod reminder;
mod routing;
mod tracker;

#[cfg(test)]
pub(crate) mod testing;

pub(crate) use reminder::secs_until;

use crate::i18n;
use chrono::NaiveTime;
use dispatcher::Dispatcher;
use nudge_core::{
    message::IncomingMessage,
    traits::{Channel, UserStore, WeatherLookup},
    user::UserId,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracker::PendingTracker;

/// Runtime knobs of the gateway.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Language of all replies.
    pub language: String,
    /// Reply window for registration questions.
    pub reply_timeout: Duration,
    /// Local time of the daily notification; `None` disables it.
    pub daily_reminder_at: Option<NaiveTime>,
}

/// The central gateway that routes events between the channel and the flows.
pub struct Gateway {
    pub(super) channel: Arc<dyn Channel>,
    pub(super) store: Arc<dyn UserStore>,
    pub(super) weather: Arc<dyn WeatherLookup>,
    pub(super) dispatcher: Dispatcher,
    pub(super) tracker: PendingTracker,
    pub(super) settings: Settings,
    /// Users with an event in progress, and their queued events in arrival order.
    pub(super) active_senders: Mutex<HashMap<UserId, VecDeque<IncomingMessage>>>,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(
        channel: Arc<dyn Channel>,
        store: Arc<dyn UserStore>,
        weather: Arc<dyn WeatherLookup>,
        settings: Settings,
    ) -> Self {
        let tracker = PendingTracker::new(
            Arc::clone(&channel),
            i18n::t("forgot_to_reply", &settings.language),
        );
        Self {
            channel,
            store,
            weather,
            dispatcher: Dispatcher::new(),
            tracker,
            settings,
            active_senders: Mutex::new(HashMap::new()),
        }
    }

    /// Run the main event loop.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "Nudge gateway running | channel: {} | language: {} | reply timeout: {}s | daily reminder: {}",
            self.channel.name(),
            self.settings.language,
            self.settings.reply_timeout.as_secs(),
            self.settings
                .daily_reminder_at
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| "disabled".to_string()),
        );

        let mut rx = self.channel.start().await.map_err(|e| {
            anyhow::anyhow!("failed to start channel {}: {e}", self.channel.name())
        })?;
        info!("Channel started: {}", self.channel.name());

        // Spawn the daily reminder job.
        let reminder_handle = self.settings.daily_reminder_at.map(|at| {
            let store = Arc::clone(&self.store);
            let channel = Arc::clone(&self.channel);
            let text = i18n::t("daily_notification", &self.settings.language).to_string();
            tokio::spawn(async move {
                Self::daily_reminder_loop(store, channel, at, text).await;
            })
        });

        // Main event loop with graceful shutdown.
        loop {
            tokio::select! {
                incoming = rx.recv() => match incoming {
                    Some(incoming) => self.dispatch_message(incoming).await,
                    None => {
                        warn!("channel {} closed its stream", self.channel.name());
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown(reminder_handle.as_ref()).await;
        Ok(())
    }

    /// Dispatch an event: queue it if the sender is busy, otherwise start a
    /// worker for that sender.
    ///
    /// Must be called in arrival order; each sender's events are then
    /// handled one at a time in that order, while different senders run
    /// in parallel.
    pub(super) async fn dispatch_message(self: &Arc<Self>, incoming: IncomingMessage) {
        let user = incoming.sender_id;

        {
            let mut active = self.active_senders.lock().await;
            if let Some(queue) = active.get_mut(&user) {
                queue.push_back(incoming);
                debug!("queued event from {user} ({} waiting)", queue.len());
                return;
            }
            active.insert(user, VecDeque::new());
        }

        let gw = Arc::clone(self);
        tokio::spawn(async move {
            gw.drain_sender(user, incoming).await;
        });
    }

    /// Handle `first`, then every event queued for `user` meanwhile.
    async fn drain_sender(&self, user: UserId, first: IncomingMessage) {
        let mut next = Some(first);
        while let Some(incoming) = next {
            self.handle_message(incoming).await;

            next = {
                let mut active = self.active_senders.lock().await;
                match active.get_mut(&user).and_then(VecDeque::pop_front) {
                    Some(queued) => Some(queued),
                    None => {
                        active.remove(&user);
                        None
                    }
                }
            };
        }
    }

    /// Graceful shutdown: stop background work, cancel timers, stop the channel.
    async fn shutdown(&self, reminder_handle: Option<&JoinHandle<()>>) {
        info!(
            "Shutting down... ({} conversation(s) in progress, {} awaiting a reply)",
            self.dispatcher.active_count(),
            self.tracker.pending_count()
        );

        if let Some(h) = reminder_handle {
            h.abort();
        }
        self.tracker.shutdown();

        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel {}: {e}", self.channel.name());
        }

        info!("Shutdown complete.");
    }
}
