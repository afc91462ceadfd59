//! Glyphs for the TUI.
//!
//! `IconStyle::Unicode` uses box and block characters; `IconStyle::Ascii`
//! falls back to plain ASCII for limited terminals and fonts.

use muthur_app::config::IconStyle;

/// Runtime icon resolver.
#[derive(Debug, Clone, Copy)]
pub struct IconSet {
    style: IconStyle,
}

impl IconSet {
    pub fn new(style: IconStyle) -> Self {
        Self { style }
    }

    fn pick(&self, unicode: &'static str, ascii: &'static str) -> &'static str {
        match self.style {
            IconStyle::Unicode => unicode,
            IconStyle::Ascii => ascii,
        }
    }

    pub fn dot(&self) -> &'static str {
        self.pick("●", "*")
    }

    pub fn dot_empty(&self) -> &'static str {
        self.pick("○", "o")
    }

    pub fn bar_full(&self) -> &'static str {
        self.pick("█", "#")
    }

    pub fn bar_empty(&self) -> &'static str {
        self.pick("░", "-")
    }

    pub fn prompt(&self) -> &'static str {
        self.pick("▶", ">")
    }

    pub fn cursor(&self) -> &'static str {
        self.pick("▮", "_")
    }

    pub fn code_digit(&self) -> &'static str {
        self.pick("•", "*")
    }

    pub fn warning(&self) -> &'static str {
        self.pick("⚠", "!")
    }

    /// An icon taken from configuration or entity data. Non-ASCII icons
    /// become `*` in ASCII mode.
    pub fn custom<'a>(&self, icon: &'a str) -> &'a str {
        match self.style {
            IconStyle::Unicode => icon,
            IconStyle::Ascii if icon.is_ascii() => icon,
            IconStyle::Ascii => "*",
        }
    }

    /// An alarm code display with its digit dots made ASCII-safe.
    pub fn code(&self, display: &str) -> String {
        match self.style {
            IconStyle::Unicode => display.to_string(),
            IconStyle::Ascii => display.replace('•', "*"),
        }
    }
}
