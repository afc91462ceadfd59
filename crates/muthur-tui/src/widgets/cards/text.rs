use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use muthur_app::cards::text::{TextAlign, TextSize, TextView};

use super::CardContext;
use crate::theme::styles;

pub struct TextCard {
    view: TextView,
    /// Content revealed so far; all of it without the typing effect.
    visible: String,
    ctx: CardContext,
}

impl TextCard {
    pub fn new(view: TextView, visible: String, ctx: CardContext) -> Self {
        Self { view, visible, ctx }
    }
}

impl Widget for TextCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.ctx.frame(&self.view.title, area, buf);
        if inner.is_empty() {
            return;
        }

        let style = match self.view.size {
            TextSize::Small => styles::text_secondary(),
            TextSize::Medium => styles::text_primary(),
            TextSize::Large => styles::text_bold().add_modifier(Modifier::UNDERLINED),
        };
        let alignment = match self.view.align {
            TextAlign::Left => Alignment::Left,
            TextAlign::Center => Alignment::Center,
            TextAlign::Right => Alignment::Right,
        };
        let typing = self.visible.len() < self.view.content.len();

        let mut lines: Vec<Line> = self
            .visible
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), style)))
            .collect();
        if lines.is_empty() {
            lines.push(Line::default());
        }

        if self.view.show_prompt {
            if let Some(first) = lines.first_mut() {
                first.spans.insert(0, Span::raw(" "));
                first
                    .spans
                    .insert(0, Span::styled(self.ctx.icons.prompt(), styles::text_secondary()));
            }
        }
        if typing || self.view.show_prompt {
            if let Some(last) = lines.last_mut() {
                last.spans.push(Span::styled(self.ctx.blink(), style));
            }
        }

        Paragraph::new(lines)
            .alignment(alignment)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
