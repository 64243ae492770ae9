//! Daily notification to every registered user.
//!
//! Independent of the per-user reply timeouts: its own trigger, its own text.

use super::Gateway;
use chrono::{NaiveTime, Timelike};
use nudge_core::{
    message::OutgoingMessage,
    traits::{Channel, UserStore},
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const SECS_PER_DAY: u64 = 24 * 3600;

/// Seconds from `now` until the next `at`.
///
/// If `at` is already past (or exactly now), returns the duration until
/// tomorrow's `at`.
pub(crate) fn secs_until(now: NaiveTime, at: NaiveTime) -> u64 {
    let now_secs = u64::from(now.num_seconds_from_midnight());
    let at_secs = u64::from(at.num_seconds_from_midnight());
    if at_secs > now_secs {
        at_secs - now_secs
    } else {
        (SECS_PER_DAY - now_secs) + at_secs
    }
}

/// Send `text` once to every stored user.
///
/// A failed send is logged and skipped; a failed listing sends nothing.
/// Returns the number of successful deliveries.
pub(crate) async fn send_daily_notification(
    store: &dyn UserStore,
    channel: &dyn Channel,
    text: &str,
) -> usize {
    let users = match store.list_users().await {
        Ok(users) => users,
        Err(e) => {
            error!("daily reminder: failed to list users: {e}");
            Vec::new()
        }
    };
    let ids: BTreeSet<_> = users.into_iter().map(|u| u.id).collect();

    let mut delivered = 0;
    for id in &ids {
        let msg = OutgoingMessage::text(Some(id.direct_target()), text);
        match channel.send(msg).await {
            Ok(()) => delivered += 1,
            Err(e) => warn!("daily reminder: failed to notify {id}: {e}"),
        }
    }
    info!("daily reminder: delivered {delivered}/{}", ids.len());
    delivered
}

impl Gateway {
    /// Background task: notify every registered user once a day at `at` (local time).
    pub(super) async fn daily_reminder_loop(
        store: Arc<dyn UserStore>,
        channel: Arc<dyn Channel>,
        at: NaiveTime,
        text: String,
    ) {
        loop {
            let now = chrono::Local::now().time();
            let wait = secs_until(now, at);
            info!(
                "daily reminder: next run at {} (~{}m)",
                at.format("%H:%M"),
                wait / 60
            );
            tokio::time::sleep(Duration::from_secs(wait)).await;
            send_daily_notification(store.as_ref(), channel.as_ref(), &text).await;
        }
    }
}
