//! Color palette: green phosphor on black, amber for caution, red for alarms.

use ratatui::style::Color;

// --- Background layers ---
pub const DEEPEST_BG: Color = Color::Rgb(0, 0, 0);
pub const CARD_BG: Color = Color::Rgb(0, 10, 2);
pub const POPUP_BG: Color = Color::Rgb(0, 20, 5);

// --- Phosphor ---
pub const PHOSPHOR: Color = Color::Rgb(0, 255, 65);
pub const PHOSPHOR_DIM: Color = Color::Rgb(0, 143, 17);
pub const PHOSPHOR_FAINT: Color = Color::Rgb(0, 59, 0);

// --- Borders ---
pub const BORDER_DIM: Color = PHOSPHOR_DIM;
pub const BORDER_ACTIVE: Color = PHOSPHOR;

// --- Text ---
pub const TEXT_PRIMARY: Color = PHOSPHOR;
pub const TEXT_SECONDARY: Color = PHOSPHOR_DIM;
pub const TEXT_MUTED: Color = PHOSPHOR_FAINT;
pub const CONTRAST_FG: Color = Color::Rgb(0, 0, 0);

// --- Status ---
pub const CAUTION: Color = Color::Rgb(255, 176, 0);
pub const ALERT: Color = Color::Rgb(255, 51, 51);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phosphor_is_terminal_green() {
        assert_eq!(PHOSPHOR, Color::Rgb(0x00, 0xFF, 0x41));
    }

    #[test]
    fn test_status_colors_distinct() {
        assert_ne!(CAUTION, ALERT);
        assert_ne!(PHOSPHOR, CAUTION);
    }
}
