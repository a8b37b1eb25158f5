//! Supporting types shared by the components.
//!
//! - [`host`]: The host environment's array values.
//! - [`backend`]: The whole-body model capability the components adapt.

pub mod backend;
pub mod host;
