//! # airskill-cli
//!
//! Command-line interface for AirSkill.
//!
//! ## Commands
//!
//! - `airskill build`: Write group indexes and the published manifest
//! - `airskill ingest <path>`: Distill a local repository into a skill group, then rebuild
//! - `airskill discover`: Check that every skill is reachable from the manifest
//! - `airskill config`: Show the resolved configuration

pub mod commands;

pub use commands::Cli;
