//! Semantic style builders.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders};

use muthur_app::cards::status::{Health, StatusTheme};
use muthur_app::state::StatusLevel;

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

pub fn text_bold() -> Style {
    text_primary().add_modifier(Modifier::BOLD)
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default()
        .fg(palette::BORDER_ACTIVE)
        .add_modifier(Modifier::BOLD)
}

// --- Status styles ---
pub fn caution() -> Style {
    Style::default().fg(palette::CAUTION)
}

pub fn alert() -> Style {
    Style::default().fg(palette::ALERT)
}

pub fn alert_bold() -> Style {
    alert().add_modifier(Modifier::BOLD)
}

pub fn health(health: Health) -> Style {
    match health {
        Health::Ok => text_primary(),
        Health::Warning => caution(),
        Health::Error => alert(),
    }
}

pub fn status_theme(theme: StatusTheme) -> Style {
    match theme {
        StatusTheme::Green => text_primary(),
        StatusTheme::Yellow => caution(),
        StatusTheme::Red => alert(),
    }
}

pub fn status_level(level: StatusLevel) -> Style {
    match level {
        StatusLevel::Info => text_primary(),
        StatusLevel::Error => alert_bold(),
    }
}

pub fn keybinding() -> Style {
    text_bold()
}

/// Black on phosphor, for the selected item of the focused card.
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::PHOSPHOR)
        .add_modifier(Modifier::BOLD)
}

/// Outline only, for the selected item of an unfocused card.
pub fn unfocused_selected() -> Style {
    text_primary().add_modifier(Modifier::UNDERLINED)
}

// --- Block builders ---

/// Double-lined card frame with an `═ TITLE ═` header.
pub fn glass_block(title: &str, focused: bool) -> Block<'static> {
    let border = if focused {
        border_active()
    } else {
        border_inactive()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(border)
        .title(Line::from(vec![
            Span::styled(" ", border),
            Span::styled(title.to_string(), text_bold()),
            Span::styled(" ", border),
        ]))
        .style(Style::default().bg(palette::CARD_BG))
}

pub fn modal_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(border_active())
        .title(Line::from(Span::styled(format!(" {title} "), text_bold())))
        .style(Style::default().bg(palette::POPUP_BG))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_styles() {
        assert_eq!(health(Health::Ok).fg, Some(palette::PHOSPHOR));
        assert_eq!(health(Health::Warning).fg, Some(palette::CAUTION));
        assert_eq!(health(Health::Error).fg, Some(palette::ALERT));
    }

    #[test]
    fn test_focused_border_is_bright() {
        assert_eq!(border_active().fg, Some(palette::BORDER_ACTIVE));
        assert_eq!(border_inactive().fg, Some(palette::BORDER_DIM));
    }
}
