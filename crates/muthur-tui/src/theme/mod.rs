//! Phosphor terminal theme.
//!
//! - `palette` - Raw color constants
//! - `styles` - Semantic style and block builders
//! - `icons` - Glyphs with ASCII fallbacks

pub mod icons;
pub mod palette;
pub mod styles;
