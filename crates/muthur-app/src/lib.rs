//! muthur-app - Dashboard state and orchestration for MU/TH/UR 6000
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! dashboard: card configurations and their view models, the card registry,
//! dashboard file loading and watching, the Home Assistant connection task
//! and action execution.

pub mod actions;
pub mod cards;
pub mod config;
pub mod connection;
pub mod handler;
pub mod host;
pub mod input_key;
pub mod message;
pub mod process;
pub mod registry;
pub mod signals;
pub mod state;
pub mod watcher;

// Re-export primary types
pub use actions::CardTimers;
pub use cards::{Card, CardKind};
pub use config::Dashboard;
pub use handler::{UpdateAction, UpdateResult};
pub use host::{HostRequest, ServiceCaller};
pub use input_key::InputKey;
pub use message::{CardInput, Message};
pub use registry::CardRegistry;
pub use state::{AppPhase, AppState, CardId, CardRuntime, ConnectionStatus};

// Re-export connection types for the TUI
pub use muthur_hass::Endpoint;
