//! # airskill-core
//!
//! Shared vocabulary for the AirSkill workspace: the error taxonomy every
//! stage propagates, and the table/link types that the manifest builder, the
//! ingester and the discovery checker all agree on.

pub mod error;
pub mod types;

pub use error::{AirskillError, Result};
pub use types::*;
