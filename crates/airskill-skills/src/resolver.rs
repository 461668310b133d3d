use tracing::{debug, info};

use airskill_config::LlmConfig;
use airskill_core::{AirskillError, Result, table_cell};
use airskill_llm::Generator;

use crate::walker::SkillEntry;

/// Longest group summary kept in the manifest, in characters.
pub const MAX_SUMMARY_CHARS: usize = 200;

/// Appended when a generated summary is cut.
pub const ELLIPSIS: char = '…';

/// Where a group's manifest summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    Overview,
    Generated,
}

/// Produces one summary per group: the overview's summary verbatim when the
/// group has one, otherwise a sentence from the generation service.
///
/// There is no placeholder fallback. A group without an overview and
/// without a working generation service fails the build.
pub struct SummaryResolver {
    config: LlmConfig,
    /// Built on first use, so a tree where every group has an overview never
    /// needs credentials.
    generator: Option<Generator>,
}

impl SummaryResolver {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            config,
            generator: None,
        }
    }

    pub fn with_generator(generator: Generator) -> Self {
        Self {
            config: LlmConfig::default(),
            generator: Some(generator),
        }
    }

    /// Resolve the summary of `group` from its skills.
    pub async fn resolve(
        &mut self,
        group: &str,
        skills: &[SkillEntry],
    ) -> Result<(String, SummarySource)> {
        if let Some(overview) = skills.iter().find(|s| s.is_overview()) {
            debug!(group, "using overview summary");
            return Ok((overview.summary.clone(), SummarySource::Overview));
        }

        let generator = self.generator().map_err(|e| with_overview_hint(e, group))?;
        let prompt = group_summary_prompt(group, skills);
        let raw = generator.generate(&prompt).await?;
        let summary = clean_summary(&raw);
        if summary.is_empty() {
            return Err(AirskillError::Generation(format!(
                "summary for group '{group}' was empty after cleanup"
            )));
        }
        info!(group, chars = summary.chars().count(), "generated group summary");
        Ok((summary, SummarySource::Generated))
    }

    fn generator(&mut self) -> Result<&Generator> {
        let generator = match self.generator.take() {
            Some(g) => g,
            None => airskill_llm::from_config(&self.config)?,
        };
        Ok(self.generator.insert(generator))
    }
}

fn with_overview_hint(err: AirskillError, group: &str) -> AirskillError {
    match err {
        AirskillError::Config(msg) => AirskillError::Config(format!(
            "group '{group}' has no overview.md and needs a generated summary: {msg}; or add {group}/overview.md"
        )),
        AirskillError::Dependency(msg) => AirskillError::Dependency(format!(
            "group '{group}' has no overview.md and needs a generated summary: {msg}"
        )),
        other => other,
    }
}

/// Prompt asking for one sentence describing `group`.
pub fn group_summary_prompt(group: &str, skills: &[SkillEntry]) -> String {
    let listing = skills
        .iter()
        .map(|s| format!("- {}: {}", s.id, s.summary))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are writing the manifest entry for a group of AI-agent skills named \"{group}\".\n\
         An agent reads this one line to decide whether to open the group, so it must say \
         concretely what domain the skills cover and when to use them.\n\
         Reply with exactly one English sentence of at most {MAX_SUMMARY_CHARS} characters. \
         No quotes, no markdown, no preamble.\n\n\
         Skills in the group:\n{listing}\n"
    )
}

/// Collapse to one line, strip wrapping quotes, make table-safe, and cut to
/// [`MAX_SUMMARY_CHARS`] with a trailing [`ELLIPSIS`].
pub fn clean_summary(raw: &str) -> String {
    let one_line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let unquoted = one_line
        .trim_matches(|c| matches!(c, '"' | '\'' | '`' | '“' | '”' | '‘' | '’'))
        .trim();
    let safe = table_cell(unquoted);
    if safe.chars().count() <= MAX_SUMMARY_CHARS {
        return safe;
    }
    let mut cut: String = safe.chars().take(MAX_SUMMARY_CHARS).collect();
    cut.truncate(cut.trim_end().len());
    cut.push(ELLIPSIS);
    cut
}
