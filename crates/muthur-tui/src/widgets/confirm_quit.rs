//! Quit confirmation dialog

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Widget};

use crate::theme::styles;

pub struct ConfirmQuit;

/// Rect of `width` x `height` centred in `area`, clipped to it.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

impl Widget for ConfirmQuit {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal_area = centered_rect(44, 7, area);
        Clear.render(modal_area, buf);

        let block = styles::modal_block("TERMINATE SESSION");
        let inner = block.inner(modal_area);
        block.render(modal_area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        Paragraph::new("DISCONNECT FROM MOTHER?")
            .alignment(Alignment::Center)
            .style(styles::caution())
            .render(chunks[1], buf);

        let buttons = Line::from(vec![
            Span::styled("[", styles::text_muted()),
            Span::styled("y", styles::keybinding()),
            Span::styled("] CONFIRM  ", styles::text_muted()),
            Span::styled("[", styles::text_muted()),
            Span::styled("n", styles::keybinding()),
            Span::styled("] ABORT", styles::text_muted()),
        ]);
        Paragraph::new(buttons)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
    }
}
