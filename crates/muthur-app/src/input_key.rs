//! Keyboard input, independent of the terminal library.
//!
//! The TUI converts crossterm key events into [`InputKey`] at its boundary so
//! the update logic can be driven (and tested) without a terminal.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Printable character (digits, letters, `+`, `-`, `[`, `]`, space)
    Char(char),
    /// Character with Ctrl held
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,

    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
}

impl InputKey {
    /// The digit this key types, if any.
    pub fn digit(self) -> Option<char> {
        match self {
            InputKey::Char(c) if c.is_ascii_digit() => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit() {
        assert_eq!(InputKey::Char('7').digit(), Some('7'));
        assert_eq!(InputKey::Char('a').digit(), None);
        assert_eq!(InputKey::CharCtrl('1').digit(), None);
        assert_eq!(InputKey::Enter.digit(), None);
    }

    #[test]
    fn test_ctrl_is_distinct() {
        assert_ne!(InputKey::CharCtrl('c'), InputKey::Char('c'));
    }
}
