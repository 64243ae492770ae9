//! Event routing: commands, conversation effects, callbacks and photos.

use super::conversation::{Effect, Prompt};
use super::Gateway;
use crate::commands::{self, CommandContext, Input, MenuChoice, Reply};
use crate::i18n;
use nudge_core::{
    message::{IncomingMessage, OutgoingMessage, Payload},
    user::UserId,
    weather::WeatherError,
};
use tracing::{debug, error, info, warn};

impl Gateway {
    /// Handle a single event from start to finish.
    pub(super) async fn handle_message(&self, incoming: IncomingMessage) {
        let user = incoming.sender_id;
        let target = incoming.reply_target.clone();

        match incoming.payload {
            Payload::Text(text) => self.handle_text(user, target, &text).await,
            Payload::Callback { query_id, data } => {
                self.handle_callback(user, target, &query_id, &data).await
            }
            Payload::Photo { file_id, .. } => self.handle_photo(user, target, &file_id).await,
        }
    }

    async fn handle_text(&self, user: UserId, target: Option<String>, text: &str) {
        let lang = self.settings.language.as_str();

        match Input::parse(text) {
            Input::Command(cmd) => {
                info!("[{user}] command {cmd:?}");
                let ctx = CommandContext {
                    store: self.store.as_ref(),
                    text,
                    lang,
                };
                let reply = commands::handle(cmd, &ctx).await;
                self.send_reply(target, reply).await;
            }
            Input::Flow(event) => {
                debug!("[{user}] flow event {event:?}");
                let effects = self.dispatcher.route(user, event);
                self.apply_effects(user, target, effects).await;
            }
        }
    }

    /// Perform the effects of one transition, in order.
    async fn apply_effects(&self, user: UserId, target: Option<String>, effects: Vec<Effect>) {
        let lang = self.settings.language.as_str();
        let mut save_failed = false;

        for effect in effects {
            match effect {
                Effect::Reply(Prompt::Greeting { .. }) if save_failed => {
                    self.send_text(target.clone(), i18n::t("generic_error", lang))
                        .await;
                }
                Effect::Reply(prompt) => {
                    let text = render_prompt(lang, &prompt);
                    self.send_text(target.clone(), text).await;
                }
                Effect::ArmTimeout => self.tracker.arm(user, self.settings.reply_timeout),
                Effect::DisarmTimeout => self.tracker.disarm(user),
                Effect::UpsertUser { name, age } => {
                    match self.store.upsert_user(user, &name, age).await {
                        Ok(()) => info!("[{user}] registered as {name}, {age}"),
                        Err(e) => {
                            error!("[{user}] failed to save registration: {e}");
                            save_failed = true;
                        }
                    }
                }
                Effect::LookupWeather { city } => {
                    let text = match self.weather.lookup(&city).await {
                        Ok(summary) => i18n::weather_report(lang, &city, &summary),
                        Err(WeatherError::NotFound) => {
                            info!("[{user}] city not found: {city}");
                            i18n::t("city_not_found", lang).to_string()
                        }
                        Err(WeatherError::Incomplete) => {
                            warn!("[{user}] incomplete forecast for {city}");
                            i18n::t("weather_unavailable", lang).to_string()
                        }
                        Err(e @ WeatherError::Request(_)) => {
                            error!("[{user}] weather lookup for {city}: {e}");
                            i18n::t("lookup_failed", lang).to_string()
                        }
                        Err(e @ WeatherError::Malformed(_)) => {
                            error!("[{user}] weather lookup for {city}: {e}");
                            i18n::t("lookup_malformed", lang).to_string()
                        }
                    };
                    self.send_text(target.clone(), text).await;
                }
            }
        }
    }

    async fn handle_callback(
        &self,
        user: UserId,
        target: Option<String>,
        query_id: &str,
        data: &str,
    ) {
        let lang = self.settings.language.as_str();

        match commands::parse_choice(data) {
            Some(MenuChoice::Option(n)) => {
                let text = i18n::choice_made(lang, n);
                if let Err(e) = self.channel.answer_callback(query_id, &text).await {
                    warn!("[{user}] failed to answer callback {query_id}: {e}");
                    self.send_text(target, i18n::t("generic_error", lang)).await;
                    return;
                }
                self.send_text(target, text).await;
            }
            Some(MenuChoice::Unknown) => {
                debug!("[{user}] unknown menu choice {data}");
                if let Err(e) = self.channel.answer_callback(query_id, "").await {
                    warn!("[{user}] failed to answer callback {query_id}: {e}");
                }
            }
            None => debug!("[{user}] ignoring callback data {data}"),
        }
    }

    async fn handle_photo(&self, user: UserId, target: Option<String>, file_id: &str) {
        let lang = self.settings.language.as_str();

        let bytes = match self.channel.fetch_file(file_id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("[{user}] failed to fetch photo {file_id}: {e}");
                self.send_text(target, i18n::t("image_fetch_failed", lang))
                    .await;
                return;
            }
        };

        let text = match commands::image_dimensions(&bytes) {
            Ok((width, height)) => i18n::image_size(lang, width, height),
            Err(e) => {
                error!("[{user}] failed to read photo {file_id}: {e}");
                i18n::t("image_probe_failed", lang).to_string()
            }
        };
        self.send_text(target, text).await;
    }

    async fn send_reply(&self, target: Option<String>, reply: Reply) {
        let mut msg = OutgoingMessage::text(target, reply.text);
        if let Some(markup) = reply.markup {
            msg = msg.with_markup(markup);
        }
        self.send(msg).await;
    }

    async fn send_text(&self, target: Option<String>, text: impl Into<String>) {
        self.send(OutgoingMessage::text(target, text)).await;
    }

    /// Send through the channel, logging failures.
    async fn send(&self, msg: OutgoingMessage) {
        if let Err(e) = self.channel.send(msg).await {
            error!("failed to send via {}: {e}", self.channel.name());
        }
    }
}

/// Localized text of a conversation prompt.
fn render_prompt(lang: &str, prompt: &Prompt) -> String {
    match prompt {
        Prompt::AskName => i18n::t("ask_name", lang).to_string(),
        Prompt::AskAge => i18n::t("ask_age", lang).to_string(),
        Prompt::Greeting { name, age } => i18n::greeting(lang, name, *age),
        Prompt::AgeNotNumeric => i18n::t("age_not_numeric", lang).to_string(),
        Prompt::AskCity => i18n::t("ask_city", lang).to_string(),
    }
}
