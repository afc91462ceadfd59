use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use muthur_app::cards::weather::WeatherView;

use super::{not_found, CardContext};
use crate::theme::styles;
use crate::widgets::{spread, truncate};

pub struct WeatherCard {
    view: WeatherView,
    ctx: CardContext,
}

impl WeatherCard {
    pub fn new(view: WeatherView, ctx: CardContext) -> Self {
        Self { view, ctx }
    }
}

impl Widget for WeatherCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let report = match self.view {
            WeatherView::Missing { entity_id } => {
                let inner = self.ctx.frame("WEATHER", area, buf);
                Paragraph::new(not_found(&entity_id)).render(inner, buf);
                return;
            }
            WeatherView::Report(report) => report,
        };

        let inner = self.ctx.frame(&report.header, area, buf);
        if inner.is_empty() {
            return;
        }
        let width = inner.width as usize;
        let icons = self.ctx.icons;

        let mut lines = vec![
            Line::from(vec![
                Span::styled(icons.custom(report.icon).to_string(), styles::text_secondary()),
                Span::raw(" "),
                Span::styled(report.temperature.clone(), styles::text_bold()),
                Span::styled(report.temperature_unit.clone(), styles::text_secondary()),
            ]),
            Line::from(Span::styled(report.condition.clone(), styles::text_primary())),
        ];
        lines.extend(report.details.iter().map(|detail| {
            Line::from(Span::styled(
                spread(detail.label, &detail.value, width),
                styles::text_secondary(),
            ))
        }));

        if !report.forecast.is_empty() {
            lines.push(Line::from(Span::styled("─".repeat(width), styles::text_muted())));
            let column = (width / report.forecast.len()).max(1);
            let mut days = Vec::new();
            let mut temps = Vec::new();
            for day in &report.forecast {
                let temp = match &day.low {
                    Some(low) => format!("{}/{}", day.high, low),
                    None => day.high.clone(),
                };
                days.push(Span::styled(
                    pad(&format!("{} {}", day.day, icons.custom(day.icon)), column),
                    styles::text_secondary(),
                ));
                temps.push(Span::styled(pad(&temp, column), styles::text_primary()));
            }
            lines.push(Line::from(days));
            lines.push(Line::from(temps));
        }

        if let Some(attribution) = &report.attribution {
            lines.push(Line::from(Span::styled(
                truncate(attribution, width),
                styles::text_muted(),
            )));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

fn pad(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(unicode_width::UnicodeWidthStr::width(text.as_str()));
    format!("{text}{}", " ".repeat(fill))
}
