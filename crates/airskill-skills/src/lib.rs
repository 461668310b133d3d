//! # airskill-skills
//!
//! Turns a directory of skill documents into the published manifest.
//!
//! ## Layout
//!
//! ```text
//! skills/
//!   api-docs.md              root-level skill  -> one manifest row
//!   memory-system/
//!     overview.md            group description (reused verbatim)
//!     retain.md              grouped skill     -> row in memory-system/index.md
//!     index.md               generated, never read as a skill
//! ```
//!
//! Every skill document starts with a `System Prompt:` line; the first
//! non-blank line after it is the skill's one-line summary.
//!
//! ## Build order
//!
//! 1. [`walker::walk_skills`] lists and classifies every document.
//! 2. [`resolver::SummaryResolver`] produces one summary per group, from the
//!    overview or from the generation service. Any failure aborts here,
//!    before anything is written.
//! 3. [`index::write_group_index`] writes each `<group>/index.md`.
//! 4. [`manifest::ManifestBuilder`] renders the root table into the template
//!    and replaces the published page atomically.

pub mod index;
pub mod manifest;
pub mod resolver;
pub mod summary;
pub mod walker;

pub use manifest::{BuildReport, GroupOutcome, ManifestBuilder};
pub use resolver::{SummaryResolver, SummarySource};
pub use summary::extract_summary;
pub use walker::{SkillEntry, SkillTree, walk_skills};
