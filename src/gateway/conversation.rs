//! Per-user conversation state machine.
//!
//! `advance` is pure: it maps the current state and an event to the next
//! state plus the effects the gateway must perform. Nothing here talks to
//! the transport, the store or the clock.

/// Where a user is within a flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConversationState {
    /// No flow in progress.
    #[default]
    Idle,
    /// Registration: waiting for the user's name.
    AwaitingName,
    /// Registration: waiting for the age of `name`.
    AwaitingAge { name: String },
    /// Weather: waiting for a city name.
    AwaitingCity,
}

impl ConversationState {
    /// Whether this is a registration step (the only steps with a reply timeout).
    pub fn is_registration(&self) -> bool {
        matches!(self, Self::AwaitingName | Self::AwaitingAge { .. })
    }
}

/// An input that drives the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `/start`: begin (or restart) registration.
    Start,
    /// `/weather`: begin a city lookup.
    Weather,
    /// Any other text.
    Text(String),
}

/// A canned reply produced by a transition; rendered through i18n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    AskName,
    AskAge,
    Greeting { name: String, age: i64 },
    AgeNotNumeric,
    AskCity,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Reply(Prompt),
    /// (Re)start the reply timeout for this user.
    ArmTimeout,
    /// Cancel the reply timeout for this user, if any.
    DisarmTimeout,
    UpsertUser { name: String, age: i64 },
    /// Look up the weather and reply with the result.
    LookupWeather { city: String },
}

/// Apply `event` to `state`.
///
/// Timer effects always lead the returned list, so the old timer is settled
/// before any reply or store write is awaited.
pub fn advance(state: ConversationState, event: Event) -> (ConversationState, Vec<Effect>) {
    use ConversationState::*;

    match (state, event) {
        // Last command wins: a new flow discards whatever was in progress.
        (_, Event::Start) => (
            AwaitingName,
            vec![Effect::ArmTimeout, Effect::Reply(Prompt::AskName)],
        ),
        (prev, Event::Weather) => {
            let mut effects = Vec::with_capacity(2);
            if prev.is_registration() {
                effects.push(Effect::DisarmTimeout);
            }
            effects.push(Effect::Reply(Prompt::AskCity));
            (AwaitingCity, effects)
        }

        (AwaitingName, Event::Text(name)) => (
            AwaitingAge { name },
            vec![Effect::ArmTimeout, Effect::Reply(Prompt::AskAge)],
        ),

        (AwaitingAge { name }, Event::Text(text)) => match parse_age(&text) {
            Some(age) => (
                Idle,
                vec![
                    Effect::DisarmTimeout,
                    Effect::UpsertUser {
                        name: name.clone(),
                        age,
                    },
                    Effect::Reply(Prompt::Greeting { name, age }),
                ],
            ),
            // The running timer is left as it is.
            None => (
                AwaitingAge { name },
                vec![Effect::Reply(Prompt::AgeNotNumeric)],
            ),
        },

        (AwaitingCity, Event::Text(city)) => (Idle, vec![Effect::LookupWeather { city }]),

        (Idle, Event::Text(_)) => (Idle, Vec::new()),
    }
}

/// Parse an age reply: an optionally signed integer, surrounding
/// whitespace ignored.
pub fn parse_age(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}
