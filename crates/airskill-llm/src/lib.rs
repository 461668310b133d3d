//! # airskill-llm
//!
//! The external text-generation service behind group summaries, repository
//! ingestion, and the discovery probe. Every call is a single prompt (with an
//! optional system instruction) in and free text out; no streaming, no
//! retries.
//!
//! Each HTTP provider sits behind a cargo feature of the same name. Asking for
//! a provider that was not compiled in is a dependency error, not a panic.

pub mod factory;
pub mod generator;
pub mod mock;
pub mod provider;

#[cfg(feature = "anthropic")]
pub mod anthropic;
#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(feature = "openai")]
pub mod openai;

pub use factory::{from_config, provider_from_config};
pub use generator::Generator;
pub use mock::MockProvider;
pub use provider::{LlmProvider, LlmRequest, LlmResponse, Usage};
