//! Widget components for the TUI

pub mod cards;
mod confirm_quit;
mod detail;
mod header;
mod status_bar;

pub use cards::CardWidget;
pub use confirm_quit::ConfirmQuit;
pub use detail::DetailOverlay;
pub use header::MainHeader;
pub use status_bar::StatusBar;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::icons::IconSet;

/// Cut `text` to at most `max` terminal cells, ending in `…` when cut.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// `left` and `right` on one line of `width` cells, padded apart. `left` is
/// cut first when both don't fit.
pub(crate) fn spread(left: &str, right: &str, width: usize) -> String {
    let right_w = right.width();
    if right_w >= width {
        return truncate(right, width);
    }
    let left = truncate(left, width.saturating_sub(right_w + 1));
    let gap = width.saturating_sub(left.width() + right_w);
    format!("{left}{}{right}", " ".repeat(gap))
}

/// Horizontal bar filled to `percent` (0-100) across `width` cells.
pub(crate) fn bar(percent: f64, width: usize, icons: IconSet) -> String {
    let percent = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    format!(
        "{}{}",
        icons.bar_full().repeat(filled.min(width)),
        icons.bar_empty().repeat(width.saturating_sub(filled))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use muthur_app::config::IconStyle;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("NOSTROMO", 10), "NOSTROMO");
        assert_eq!(truncate("NOSTROMO", 5), "NOST…");
        assert_eq!(truncate("NOSTROMO", 0), "");
    }

    #[test]
    fn test_spread_pads_between() {
        assert_eq!(spread("TEMP", "21 °C", 12), "TEMP   21 °C");
        assert_eq!(spread("HULL TEMPERATURE", "21", 8), "HULL… 21");
        assert_eq!(spread("X", "TOO WIDE", 4), "TOO…");
    }

    #[test]
    fn test_bar_fill() {
        let icons = IconSet::new(IconStyle::Ascii);
        assert_eq!(bar(50.0, 10, icons), "#####-----");
        assert_eq!(bar(150.0, 4, icons), "####");
        assert_eq!(bar(-5.0, 4, icons), "----");
        assert_eq!(bar(f64::NAN, 2, icons), "--");
    }
}
