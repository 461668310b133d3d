//! # airskill-discovery
//!
//! Verifies that an agent reading only the published artifacts can reach
//! every skill document.
//!
//! - Hard failure: an expected Direct Link is absent from the manifest and
//!   every group index.
//! - Soft failure: a group row carries the generic placeholder summary.
//! - Advisory: the generation service is asked to enumerate the links
//!   itself, and its answer is diffed against the expected set.
//!
//! Results go to `discovery_result.md` and `discovery_result.csv`.

pub mod assess;
pub mod links;
pub mod probe;
pub mod report;
pub mod runner;
pub mod table;

pub use assess::{Assessment, GENERIC_GROUP_SUMMARY};
pub use links::ExpectedLinks;
pub use probe::ProbeOutcome;
pub use report::{DiscoveryReport, GroupCheck};
pub use runner::{DiscoveryOutcome, ProbeMode, run_discovery};
