use regex::Regex;
use std::collections::BTreeSet;
use tracing::{info, warn};

use airskill_llm::Generator;

use crate::links::parse_urls;
use crate::table::GroupIndex;

/// Result of asking the generation service to enumerate the links itself.
/// Never affects the exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Not attempted, with the reason.
    Skipped(String),
    /// Attempted and failed.
    Failed(String),
    Completed {
        found: BTreeSet<String>,
        missing: BTreeSet<String>,
        extra: BTreeSet<String>,
    },
}

impl ProbeOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, ProbeOutcome::Completed { missing, extra, .. } if missing.is_empty() && extra.is_empty())
    }
}

/// Prompt giving the manifest and every group index to an agent and asking
/// for every Direct Link, one per line.
pub fn probe_prompt(manifest: &str, groups: &[GroupIndex], base_url: &str) -> String {
    let mut parts = vec![
        "You are an AI agent using the AirSkill manifest. Your task: list every Direct Link (URL) \
         that points to an .md file so that you could fetch all skills."
            .to_string(),
        String::new(),
        "Rules:".to_string(),
        "- From the ROOT MANIFEST below, list every Direct Link from the table (Skill ID, Direct Link, Summary)."
            .to_string(),
        "- For any row whose Direct Link points to an index (e.g. .../memory-system/index.md), use the \
         GROUP INDEX content provided below to list every Direct Link in that group's index."
            .to_string(),
        "- Output only URLs, one per line. No other text.".to_string(),
        String::new(),
        "--- ROOT MANIFEST ---".to_string(),
        manifest.to_string(),
    ];
    for g in groups {
        parts.push(String::new());
        parts.push(format!(
            "--- GROUP INDEX: {} (content of {}/{}/index.md) ---",
            g.group, base_url, g.group
        ));
        parts.push(g.text.clone());
    }
    parts.push(String::new());
    parts.push("--- END ---".to_string());
    parts.push("Output every skill Direct Link (one per line):".to_string());
    parts.join("\n")
}

/// Ask `generator` for the links and diff them against `expected`.
pub async fn run_probe(
    generator: &Generator,
    url_re: &Regex,
    prompt: &str,
    expected: &BTreeSet<String>,
) -> ProbeOutcome {
    let response = match generator.generate(prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "discovery probe failed");
            return ProbeOutcome::Failed(e.to_string());
        }
    };
    let found = parse_urls(url_re, &response);
    let missing: BTreeSet<String> = expected.difference(&found).cloned().collect();
    let extra: BTreeSet<String> = found.difference(expected).cloned().collect();
    info!(
        reported = found.len(),
        missing = missing.len(),
        extra = extra.len(),
        "discovery probe complete"
    );
    ProbeOutcome::Completed {
        found,
        missing,
        extra,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airskill_core::LinkBase;
    use airskill_llm::MockProvider;
    use std::sync::Arc;

    fn expected() -> BTreeSet<String> {
        ["https://s.test/skills/a.md", "https://s.test/skills/g/index.md"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn re() -> Regex {
        crate::links::url_regex(&LinkBase::new("https://s.test/skills")).unwrap()
    }

    #[test]
    fn prompt_includes_group_sections() {
        let groups = vec![GroupIndex {
            group: "g".into(),
            text: "| g/b | x | y |".into(),
        }];
        let prompt = probe_prompt("ROOT TABLE", &groups, "https://s.test/skills");
        assert!(prompt.contains("--- ROOT MANIFEST ---\nROOT TABLE"));
        assert!(prompt.contains("--- GROUP INDEX: g (content of https://s.test/skills/g/index.md) ---"));
        assert!(prompt.ends_with("(one per line):"));
    }

    #[tokio::test]
    async fn complete_enumeration_passes() {
        let mock = Arc::new(MockProvider::new("mock").with_response(
            "https://s.test/skills/a.md\n- https://s.test/skills/g/index.md.",
        ));
        let outcome = run_probe(&Generator::new(mock, "m"), &re(), "p", &expected()).await;
        assert!(outcome.passed());
    }

    #[tokio::test]
    async fn missing_and_extra_are_reported() {
        let mock = Arc::new(MockProvider::new("mock").with_response(
            "https://s.test/skills/a.md\nhttps://s.test/skills/made-up.md",
        ));
        let outcome = run_probe(&Generator::new(mock, "m"), &re(), "p", &expected()).await;
        match outcome {
            ProbeOutcome::Completed { missing, extra, .. } => {
                assert!(missing.contains("https://s.test/skills/g/index.md"));
                assert!(extra.contains("https://s.test/skills/made-up.md"));
            }
            other => panic!("expected completed probe, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn service_error_is_reported_not_raised() {
        let mock = Arc::new(MockProvider::new("mock").with_error("HTTP 500: boom"));
        let outcome = run_probe(&Generator::new(mock, "m"), &re(), "p", &expected()).await;
        assert!(matches!(outcome, ProbeOutcome::Failed(msg) if msg.contains("boom")));
    }
}
