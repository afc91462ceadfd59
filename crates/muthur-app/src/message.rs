//! Message types for the dashboard (TEA pattern)

use muthur_core::{EntityState, HostConfig};
use muthur_hass::HassHandle;

use crate::config::Dashboard;
use crate::input_key::InputKey;
use crate::state::{CardId, ConnectionStatus};

/// Interaction with a single card, already decoded from the key that caused
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardInput {
    /// `Enter`: press the selected button, open a detail view, ...
    Activate,
    /// Light on/off
    Toggle,
    BrightnessUp,
    BrightnessDown,
    /// Picture manual refresh
    RefreshFeed,
    SelectNext,
    SelectPrev,

    // Alarm keypad
    Digit(char),
    ClearCode,
    ConfirmCode,
    ArmAway,
    ArmHome,
    Disarm,
}

/// All possible messages in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates
    Tick,

    /// Request to quit (may ask for confirmation)
    RequestQuit,

    /// Force quit without confirmation (Ctrl+C, signal handler)
    Quit,

    ConfirmQuit,
    CancelQuit,

    // ─────────────────────────────────────────────────────────
    // Host Connection
    // ─────────────────────────────────────────────────────────
    /// Authenticated connection is up
    HostConnected {
        handle: HassHandle,
        version: Option<String>,
    },

    HostConfigLoaded(HostConfig),

    /// Full entity list (initial fetch and after every reconnect)
    StatesLoaded(Vec<EntityState>),

    /// One entity changed; `None` means it was removed
    EntityChanged {
        entity_id: String,
        new_state: Option<EntityState>,
    },

    ConnectionStatus(ConnectionStatus),

    // ─────────────────────────────────────────────────────────
    // Cards
    // ─────────────────────────────────────────────────────────
    CardInput { card: CardId, input: CardInput },

    /// A card's periodic timer fired (clock tick, camera refresh, typing)
    CardTimerFired { card: CardId },

    /// The loading delay of a manual picture refresh has passed
    PictureRefreshDone { card: CardId },

    /// A service call issued by `origin` completed
    ServiceCallFinished {
        origin: CardId,
        service: String,
        /// Target of the call, used to check `origin` still shows it.
        entity_id: Option<String>,
        result: Result<(), String>,
    },

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    NextView,
    PrevView,
    FocusNext,
    FocusPrev,
    /// Switch to the view whose path matches
    Navigate { path: String },
    ShowDetail { entity_id: String },
    CloseDetail,

    // ─────────────────────────────────────────────────────────
    // Dashboard Config
    // ─────────────────────────────────────────────────────────
    /// The dashboard file changed on disk
    ConfigFileChanged,

    /// Reload the dashboard file now
    ReloadDashboard,

    DashboardReloaded(Result<Dashboard, String>),

    /// Opening an external URL failed
    OpenUrlFailed { url: String, error: String },
}
