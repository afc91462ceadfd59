//! Bottom status bar: latest notice or error, otherwise key hints for the
//! focused card

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use muthur_app::cards::Card;
use muthur_app::state::{AppState, StatusLevel};

use crate::theme::styles;

pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

/// Key hints as `(key, label)` pairs for whatever currently has input.
pub(crate) fn key_hints(state: &AppState) -> Vec<(&'static str, &'static str)> {
    if state.detail.is_some() {
        return vec![("Esc", "close"), ("q", "quit")];
    }

    let mut hints = match state.focused_card() {
        Some(Card::Alarm(_)) => vec![
            ("0-9", "code"),
            ("⌫", "clear"),
            ("a/h", "arm"),
            ("d", "disarm"),
        ],
        Some(Card::Light(_)) => vec![("Enter", "toggle"), ("+/-", "brightness")],
        Some(Card::Picture(_)) => vec![("f", "refresh"), ("Enter", "open")],
        Some(Card::Button(_)) | Some(Card::Glance(_)) | Some(Card::Status(_)) => {
            vec![("←→", "select"), ("Enter", "activate")]
        }
        _ => Vec::new(),
    };
    hints.push(("Tab", "focus"));
    if state.view_count() > 1 {
        hints.push(("[ ]", "view"));
    }
    if state.config_path.is_some() && !matches!(state.focused_card(), Some(Card::Alarm(_))) {
        hints.push(("r", "reload"));
    }
    hints.push(("q", "quit"));
    hints
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(styles::border_inactive());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.is_empty() {
            return;
        }

        let line = match &self.state.status {
            Some(status) => {
                let prefix = match status.level {
                    StatusLevel::Info => " ",
                    StatusLevel::Error => " ! ",
                };
                Line::from(Span::styled(
                    format!("{prefix}{}", status.text),
                    styles::status_level(status.level),
                ))
            }
            None => {
                let mut spans = vec![Span::raw(" ")];
                for (key, label) in key_hints(self.state) {
                    spans.push(Span::styled(format!("[{key}]"), styles::keybinding()));
                    spans.push(Span::styled(format!(" {label}  "), styles::text_muted()));
                }
                Line::from(spans)
            }
        };

        Paragraph::new(line).render(inner, buf);
    }
}
