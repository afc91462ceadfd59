//! Main render/view function (View in TEA pattern)

#[cfg(test)]
mod tests;

use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use muthur_app::state::{AppPhase, AppState, CardId};

use crate::layout::{self, card_height, place_cards};
use crate::theme::{icons::IconSet, palette, styles};
use crate::widgets;

/// Render the complete UI
///
/// Pure with respect to `state`; scroll position is derived from the
/// focused card on every frame.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let bg_block = Block::default().style(Style::default().bg(palette::DEEPEST_BG));
    frame.render_widget(bg_block, area);

    let areas = layout::create(area);
    let icons = IconSet::new(state.dashboard.ui.icons);

    frame.render_widget(widgets::MainHeader::new(state, icons), areas.header);
    render_cards(frame, state, areas.body, icons);
    frame.render_widget(widgets::StatusBar::new(state), areas.status);

    if let Some(entity_id) = &state.detail {
        frame.render_widget(
            widgets::DetailOverlay::new(entity_id, state.entities.get(entity_id)),
            area,
        );
    }

    if state.phase == AppPhase::ConfirmQuit {
        frame.render_widget(widgets::ConfirmQuit, area);
    }
}

fn render_cards(frame: &mut Frame, state: &AppState, body: ratatui::layout::Rect, icons: IconSet) {
    let Some(view) = state.view() else {
        frame.render_widget(
            Paragraph::new("NO VIEWS CONFIGURED")
                .alignment(Alignment::Center)
                .style(styles::caution()),
            body,
        );
        return;
    };
    if view.cards.is_empty() {
        frame.render_widget(
            Paragraph::new(format!("{} :: NO CARDS", view.title))
                .alignment(Alignment::Center)
                .style(styles::text_muted()),
            body,
        );
        return;
    }

    let heights: Vec<u16> = view.cards.iter().map(card_height).collect();
    for placement in place_cards(body, view.columns, &heights, state.focused) {
        let id = CardId::new(state.current_view, placement.index);
        frame.render_widget(widgets::CardWidget::new(state, id, icons), placement.area);
    }
}
