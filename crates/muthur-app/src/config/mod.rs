//! Dashboard configuration
//!
//! One TOML file describes the connection, UI options and the views with
//! their cards. Card tables are validated through the
//! [`CardRegistry`](crate::registry::CardRegistry) when the file is loaded.

pub mod dashboard;
pub mod types;

pub use dashboard::{
    default_dashboard_path, load_dashboard, parse_dashboard, resolve_token, stub_to_toml,
    toml_to_json,
};
pub use types::*;
