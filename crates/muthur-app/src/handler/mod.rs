//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers
//! - `cards`: Card interaction, timers and service-call outcomes
//! - `host`: Connection and entity-state messages

pub(crate) mod cards;
pub(crate) mod host;
pub(crate) mod keys;
pub(crate) mod update;


use std::path::PathBuf;
use std::time::Duration;

use muthur_core::ServiceCall;

use crate::message::Message;
use crate::state::{CardId, TimerSpec};

// Re-export main entry point
pub use update::update;

#[cfg(test)]
pub(crate) use keys::handle_key;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Send a service call to the host on behalf of a card. The outcome comes
    /// back as [`Message::ServiceCallFinished`].
    CallService { origin: CardId, call: ServiceCall },

    /// Open an external URL in the system browser
    OpenUrl { url: String },

    /// Cancel every running card timer and start these instead
    ReplaceTimers(Vec<TimerSpec>),

    /// Deliver `message` after `delay`
    ScheduleMessage { delay: Duration, message: Box<Message> },

    /// Load the dashboard file again
    ReloadDashboard { path: PathBuf },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
