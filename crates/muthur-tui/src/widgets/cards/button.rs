use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use muthur_app::cards::button::ButtonView;

use super::{grid, CardContext};
use crate::theme::styles;

/// Rows taken by one tile, border included.
pub(crate) const TILE_HEIGHT: u16 = 4;

pub struct ButtonCard {
    view: ButtonView,
    selection: usize,
    ctx: CardContext,
}

impl ButtonCard {
    pub fn new(view: ButtonView, selection: usize, ctx: CardContext) -> Self {
        Self {
            view,
            selection,
            ctx,
        }
    }
}

impl Widget for ButtonCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.ctx.frame(&self.view.title, area, buf);
        if inner.is_empty() {
            return;
        }

        let cells = grid(inner, self.view.columns, self.view.buttons.len(), TILE_HEIGHT);
        for (i, (tile, cell)) in self.view.buttons.iter().zip(cells).enumerate() {
            let selected = i == self.selection;
            let style = self.ctx.item_style(i, self.selection);
            let border = if selected && self.ctx.focused {
                styles::border_active()
            } else {
                styles::border_inactive()
            };

            let block = Block::bordered()
                .border_type(BorderType::Plain)
                .border_style(border);
            let label = match &tile.icon {
                Some(icon) => format!("{} {}", self.ctx.icons.custom(icon), tile.name),
                None => tile.name.clone(),
            };
            let mut lines = vec![Line::from(Span::styled(label, style))];
            if let Some(state) = &tile.state {
                lines.push(Line::from(Span::styled(state.clone(), styles::text_secondary())));
            }

            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block)
                .render(cell, buf);
        }
    }
}
