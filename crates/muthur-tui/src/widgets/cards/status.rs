use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use muthur_app::cards::status::{StatusView, MESSAGE_HEADER};

use super::CardContext;
use crate::theme::styles;
use crate::widgets::{spread, truncate};

pub struct StatusCard {
    view: StatusView,
    selection: usize,
    ctx: CardContext,
}

impl StatusCard {
    pub fn new(view: StatusView, selection: usize, ctx: CardContext) -> Self {
        Self {
            view,
            selection,
            ctx,
        }
    }
}

impl Widget for StatusCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.ctx.frame(&self.view.title, area, buf);
        if inner.is_empty() {
            return;
        }
        let width = inner.width as usize;

        let mut lines: Vec<Line> = self
            .view
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let text = spread(&row.label, &row.value, width.saturating_sub(2));
                Line::from(vec![
                    Span::styled(self.ctx.icons.dot(), styles::health(row.health)),
                    Span::raw(" "),
                    Span::styled(text, self.ctx.item_style(i, self.selection)),
                ])
            })
            .collect();

        if let Some(message) = &self.view.message {
            let theme = styles::status_theme(self.view.theme);
            lines.push(Line::from(Span::styled("─".repeat(width), styles::text_muted())));
            lines.push(Line::from(Span::styled(truncate(MESSAGE_HEADER, width), theme)));
            lines.push(Line::from(Span::styled(
                format!("{} {}", self.ctx.icons.prompt(), message),
                theme,
            )));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
