use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use muthur_app::cards::clock::ClockView;

use super::CardContext;
use crate::theme::styles;

pub struct ClockCard {
    view: ClockView,
    ctx: CardContext,
}

impl ClockCard {
    pub fn new(view: ClockView, ctx: CardContext) -> Self {
        Self { view, ctx }
    }
}

impl Widget for ClockCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.ctx.frame(&self.view.title, area, buf);
        if inner.is_empty() {
            return;
        }

        let mut lines = vec![
            Line::from(Span::styled(self.view.time, styles::text_bold())),
            Line::from(Span::styled(self.view.date, styles::text_secondary())),
        ];
        if let Some(zone) = self.view.timezone {
            lines.push(Line::from(Span::styled(zone, styles::text_muted())));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
