//! Screen layout definitions

use ratatui::layout::{Constraint, Layout, Rect};

use muthur_app::cards::Card;

use crate::widgets::cards::{CELL_HEIGHT, TILE_HEIGHT};

/// Narrowest a grid column may get before the grid drops a column.
pub const MIN_CARD_WIDTH: u16 = 28;

/// Frame rows around every card.
const FRAME: u16 = 2;

/// Screen areas for the main layout
pub struct ScreenAreas {
    pub header: Rect,
    pub body: Rect,
    pub status: Rect,
}

/// Create the main screen layout
pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(2), // Header (1 + bottom border)
        Constraint::Min(3),    // Card grid
        Constraint::Length(2), // Status bar (top border + 1)
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        body: chunks[1],
        status: chunks[2],
    }
}

/// Rows a card needs, frame included.
pub fn card_height(card: &Card) -> u16 {
    let content = match card {
        Card::Status(c) => {
            let rows = c.entities.len().max(1) as u16;
            if c.show_message {
                rows + 3
            } else {
                rows
            }
        }
        Card::Sensor(c) => {
            if c.show_graph {
                3
            } else {
                2
            }
        }
        Card::Button(c) => grid_rows(c.buttons.len(), c.columns()) * TILE_HEIGHT,
        Card::Text(c) => {
            let lines = c
                .content
                .as_deref()
                .map(|text| text.lines().count())
                .unwrap_or(1);
            (lines as u16).clamp(1, 10)
        }
        Card::Gauge(_) => 4,
        Card::Clock(c) => {
            if c.show_timezone {
                3
            } else {
                2
            }
        }
        Card::Glance(c) => grid_rows(c.entities.len(), c.columns()) * CELL_HEIGHT,
        Card::Light(_) => 4,
        Card::Picture(_) => 5,
        Card::Weather(c) => {
            // Reading, condition, up to five details, attribution
            let base = 8;
            if c.show_forecast {
                base + 3
            } else {
                base
            }
        }
        Card::Alarm(c) => {
            if c.show_keypad {
                8
            } else {
                3
            }
        }
    };
    content + FRAME
}

fn grid_rows(items: usize, columns: usize) -> u16 {
    items.max(1).div_ceil(columns.max(1)) as u16
}

/// Where one card of the current view lands on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPlacement {
    /// Index of the card within its view
    pub index: usize,
    pub area: Rect,
}

/// Lay cards out row by row in `columns` columns, scrolled so the card at
/// `focused` is fully visible when it fits. Cards cut by the bottom edge
/// are clipped; cards above the scroll offset are dropped.
pub fn place_cards(body: Rect, columns: u16, heights: &[u16], focused: usize) -> Vec<CardPlacement> {
    if body.is_empty() || heights.is_empty() {
        return Vec::new();
    }
    let columns = effective_columns(body.width, columns) as usize;

    // Row tops and heights in unscrolled coordinates
    let mut rows: Vec<(u16, u16)> = Vec::new();
    let mut top = 0u16;
    for chunk in heights.chunks(columns) {
        let height = chunk.iter().copied().max().unwrap_or(0);
        rows.push((top, height));
        top = top.saturating_add(height);
    }

    let focus_row = (focused / columns).min(rows.len() - 1);
    let (focus_top, focus_height) = rows[focus_row];
    let scroll = (focus_top + focus_height.min(body.height)).saturating_sub(body.height);

    let column_width = body.width / columns as u16;
    let mut placements = Vec::new();
    for (index, height) in heights.iter().enumerate() {
        let (row_top, _) = rows[index / columns];
        if row_top < scroll {
            continue;
        }
        let y = row_top - scroll;
        if y >= body.height {
            break;
        }

        let col = (index % columns) as u16;
        let width = if col as usize == columns - 1 {
            body.width - col * column_width
        } else {
            column_width
        };
        let height = (*height).min(body.height - y);
        placements.push(CardPlacement {
            index,
            area: Rect::new(body.x + col * column_width, body.y + y, width, height),
        });
    }
    placements
}

/// Columns that fit in `width`, never fewer than one.
pub fn effective_columns(width: u16, requested: u16) -> u16 {
    let fit = (width / MIN_CARD_WIDTH).max(1);
    requested.clamp(1, fit)
}
