//! Application state (Model in TEA pattern)

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use url::Url;

use muthur_core::{EntitySnapshot, HostConfig};
use muthur_hass::HassHandle;

use crate::cards::alarm::AlarmKeypad;
use crate::cards::picture::PictureFeed;
use crate::cards::{clock, text, Card};
use crate::config::{Dashboard, View};

/// Reveal period of the text card typing effect.
pub const TYPING_INTERVAL: Duration = Duration::from_millis(50);

/// Position of a card in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardId {
    pub view: usize,
    pub index: usize,
}

impl CardId {
    pub fn new(view: usize, index: usize) -> Self {
        Self { view, index }
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.view, self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    /// Waiting for the user to confirm `q`
    ConfirmQuit,
    Quitting,
}

/// Connection as shown in the header.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected {
        version: Option<String>,
    },
    Reconnecting {
        attempt: u32,
        max_attempts: u32,
    },
    Disconnected,
    /// Could not connect at all (bad URL, token, host down)
    Failed(String),
    /// `--check` or no connection configured
    Offline,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// One-line notice in the status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub level: StatusLevel,
}

/// Typing effect progress for a text card.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypingState {
    content: String,
    revealed: usize,
}

impl TypingState {
    /// Reveal one more character. Content that changed starts over.
    pub fn advance(&mut self, content: &str) {
        if content != self.content {
            self.content = content.to_string();
            self.revealed = 0;
        } else if self.revealed < self.content.chars().count() {
            self.revealed += 1;
        }
    }

    /// The revealed prefix of `content`, or all of it once typing is done
    /// for different content.
    pub fn visible<'a>(&self, content: &'a str) -> &'a str {
        if content != self.content {
            return "";
        }
        match content.char_indices().nth(self.revealed) {
            Some((end, _)) => &content[..end],
            None => content,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.content.chars().count()
    }
}

/// Per-card state that lives only while the card's view is attached.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CardRuntime {
    #[default]
    None,
    Clock {
        now: DateTime<Local>,
    },
    Picture(PictureFeed),
    Text(TypingState),
    /// Cursor inside button, glance and status cards
    Selection(usize),
    Alarm(AlarmKeypad),
}

impl CardRuntime {
    pub fn for_card(card: &Card, snapshot: &EntitySnapshot, media_base: &Url) -> Self {
        match card {
            Card::Clock(_) => CardRuntime::Clock { now: Local::now() },
            Card::Picture(config) => {
                CardRuntime::Picture(PictureFeed::new(config, snapshot, media_base, Utc::now()))
            }
            Card::Text(config) if config.typing_effect => CardRuntime::Text(TypingState::default()),
            Card::Button(_) | Card::Glance(_) | Card::Status(_) => CardRuntime::Selection(0),
            Card::Alarm(_) => CardRuntime::Alarm(AlarmKeypad::new()),
            _ => CardRuntime::None,
        }
    }

    pub fn selection(&self) -> Option<usize> {
        match self {
            CardRuntime::Selection(index) => Some(*index),
            _ => None,
        }
    }
}

/// A periodic timer owned by one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSpec {
    pub card: CardId,
    pub period: Duration,
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub dashboard: Dashboard,

    /// File the dashboard was loaded from, for reloads
    pub config_path: Option<PathBuf>,

    pub current_view: usize,

    /// Index of the focused card in the current view
    pub focused: usize,

    /// Runtime state of the attached view's cards
    pub runtime: HashMap<CardId, CardRuntime>,

    pub entities: EntitySnapshot,
    pub host_config: HostConfig,

    /// Base URL relative media paths resolve against
    pub media_base: Url,

    pub connection: ConnectionStatus,

    /// Command handle of the live connection
    pub host: Option<HassHandle>,

    /// Entity shown in the detail overlay
    pub detail: Option<String>,

    pub status: Option<StatusLine>,

    pub phase: AppPhase,

    /// Ticks since start, for blinking cursors and spinners
    pub tick: u64,
}

impl AppState {
    pub fn new(dashboard: Dashboard, config_path: Option<PathBuf>, media_base: Url) -> Self {
        Self {
            dashboard,
            config_path,
            current_view: 0,
            focused: 0,
            runtime: HashMap::new(),
            entities: EntitySnapshot::new(),
            host_config: HostConfig::default(),
            media_base,
            connection: ConnectionStatus::default(),
            host: None,
            detail: None,
            status: None,
            phase: AppPhase::Running,
            tick: 0,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Views and Cards
    // ─────────────────────────────────────────────────────────

    pub fn view(&self) -> Option<&View> {
        self.dashboard.view(self.current_view)
    }

    pub fn view_count(&self) -> usize {
        self.dashboard.views.len()
    }

    pub fn cards(&self) -> &[Card] {
        self.view().map(|v| v.cards.as_slice()).unwrap_or(&[])
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.dashboard.view(id.view)?.cards.get(id.index)
    }

    pub fn focused_id(&self) -> Option<CardId> {
        (self.focused < self.cards().len()).then(|| CardId::new(self.current_view, self.focused))
    }

    pub fn focused_card(&self) -> Option<&Card> {
        self.card(self.focused_id()?)
    }

    pub fn runtime(&self, id: CardId) -> &CardRuntime {
        static NONE: CardRuntime = CardRuntime::None;
        self.runtime.get(&id).unwrap_or(&NONE)
    }

    /// Build runtime state for the current view's cards and list the timers
    /// they need. Runtime of any previously attached view is dropped.
    pub fn attach_view(&mut self) -> Vec<TimerSpec> {
        self.runtime.clear();
        let view_index = self.current_view;
        let Some(view) = self.dashboard.view(view_index) else {
            return Vec::new();
        };

        let mut timers = Vec::new();
        for (index, card) in view.cards.iter().enumerate() {
            let id = CardId::new(view_index, index);
            self.runtime.insert(
                id,
                CardRuntime::for_card(card, &self.entities, &self.media_base),
            );

            let period = match card {
                Card::Clock(_) => Some(clock::TICK),
                Card::Picture(config) => config.refresh_interval(),
                Card::Text(text::TextConfig {
                    typing_effect: true,
                    ..
                }) => Some(TYPING_INTERVAL),
                _ => None,
            };
            if let Some(period) = period {
                timers.push(TimerSpec { card: id, period });
            }
        }
        timers
    }

    /// Switch views, returning the new view's timers.
    pub fn select_view(&mut self, index: usize) -> Vec<TimerSpec> {
        self.current_view = index.min(self.view_count().saturating_sub(1));
        self.focused = 0;
        self.detail = None;
        self.attach_view()
    }

    /// Replace the dashboard, keeping the current view and focus where they
    /// still exist.
    pub fn replace_dashboard(&mut self, dashboard: Dashboard) -> Vec<TimerSpec> {
        self.dashboard = dashboard;
        self.current_view = self.current_view.min(self.view_count().saturating_sub(1));
        self.focused = self.focused.min(self.cards().len().saturating_sub(1));
        self.detail = None;
        self.attach_view()
    }

    pub fn focus_next(&mut self) {
        let count = self.cards().len();
        if count > 0 {
            self.focused = (self.focused + 1) % count;
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.cards().len();
        if count > 0 {
            self.focused = (self.focused + count - 1) % count;
        }
    }

    // ─────────────────────────────────────────────────────────
    // Status Line
    // ─────────────────────────────────────────────────────────

    pub fn notice(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            level: StatusLevel::Info,
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            level: StatusLevel::Error,
        });
    }

    // ─────────────────────────────────────────────────────────
    // Quit Handling
    // ─────────────────────────────────────────────────────────

    /// Quit, or ask first when `ui.confirm_quit` is set
    pub fn request_quit(&mut self) {
        if self.dashboard.ui.confirm_quit {
            self.phase = AppPhase::ConfirmQuit;
        } else {
            self.phase = AppPhase::Quitting;
        }
    }

    pub fn force_quit(&mut self) {
        self.phase = AppPhase::Quitting;
    }

    pub fn confirm_quit(&mut self) {
        self.phase = AppPhase::Quitting;
    }

    pub fn cancel_quit(&mut self) {
        self.phase = AppPhase::Running;
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }
}
