//! muthur-tui - Terminal UI for the MU/TH/UR 6000 dashboard
//!
//! Draws `muthur-app` state with ratatui and feeds terminal input back into
//! the app's message loop.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

pub use runner::{run, RunOptions};
