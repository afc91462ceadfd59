//! # muthur-core - Core Domain Types
//!
//! Foundation crate for the MU/TH/UR 6000 dashboard. Provides the entity model
//! shared by every card, service call descriptions, error handling and
//! logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, toml, tracing).
//!
//! ## Public API
//!
//! ### Entities (`entity`)
//! - [`EntityState`] - One entity as reported by Home Assistant
//! - [`EntitySnapshot`] - Every known entity, keyed by id
//! - [`HostConfig`] - Host-wide settings such as the temperature unit
//!
//! ### Service Calls (`service`)
//! - [`ServiceCall`] - `domain.service` plus service data
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ## Prelude
//!
//! ```rust
//! use muthur_core::prelude::*;
//! ```

pub mod entity;
pub mod error;
pub mod logging;
pub mod numeric;
pub mod prelude;
pub mod service;

pub use entity::{
    entity_domain, value_to_display, EntitySnapshot, EntityState, HostConfig, UnitSystem,
    STATE_OFF, STATE_ON, STATE_UNAVAILABLE, STATE_UNKNOWN,
};
pub use error::{Error, Result};
pub use numeric::{format_number, parse_leading_float};
pub use service::ServiceCall;
