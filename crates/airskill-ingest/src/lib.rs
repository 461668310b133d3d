//! # airskill-ingest
//!
//! Reverse-engineers a local repository into 3 to 5 domain-level skill
//! documents:
//!
//! 1. [`context::gather_repo_context`] samples docs, layout and source.
//! 2. [`prompt::ingest_system_prompt`] states the output contract and
//!    [`prompt::ingest_prompt`] carries the digest.
//! 3. [`parser::parse_response`] recovers the group and skill blocks.
//! 4. [`pipeline::IngestPipeline`] writes `<skills>/<group>/<slug>.md`.

pub mod context;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod slug;

pub use context::gather_repo_context;
pub use parser::{ParsedResponse, ParsedSkill, parse_response};
pub use pipeline::{IngestOutcome, IngestPipeline, resolve_group};
pub use slug::{sanitize_slug, slugify};
