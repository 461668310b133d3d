//! # airskill-config
//!
//! Configuration for every AirSkill command. Reads `airskill.toml`, the
//! project's `.env`, and environment variables, in that order of precedence
//! (environment fills in what the file leaves unset, except for the explicit
//! `AIRSKILL_*` overrides which always win).
//!
//! The loaded [`AirskillConfig`] is passed by value into each stage; nothing
//! downstream reads the environment on its own.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{
    AirskillConfig, ConfigWarning, LlmConfig, LoggingConfig, PathsConfig, SiteConfig,
    WarningSeverity,
};
