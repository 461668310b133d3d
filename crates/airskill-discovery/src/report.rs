use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

use airskill_core::{AirskillError, Result};

use crate::assess::Assessment;
use crate::probe::ProbeOutcome;

pub const MARKDOWN_REPORT: &str = "discovery_result.md";
pub const CSV_REPORT: &str = "discovery_result.csv";

const COLUMNS: [&str; 5] = ["skill", "description", "discoverable", "reason", "score"];

/// Per-group check: every sub-skill link appears in the group's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCheck {
    pub group: String,
    pub expected: usize,
    pub listed: usize,
    pub missing: BTreeSet<String>,
}

impl GroupCheck {
    pub fn passed(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Everything one discovery run found.
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    pub expected: BTreeSet<String>,
    pub found: BTreeSet<String>,
    /// Expected links absent from the published text. Hard failure.
    pub missing: BTreeSet<String>,
    /// Group rows with the generic summary. Soft failure.
    pub generic_groups: Vec<String>,
    pub group_checks: Vec<GroupCheck>,
    pub assessment: Vec<Assessment>,
    pub probe: ProbeOutcome,
}

impl DiscoveryReport {
    pub fn passed(&self) -> bool {
        self.missing.is_empty() && self.generic_groups.is_empty()
    }

    /// Process exit status; the probe never changes it.
    pub fn exit_code(&self) -> i32 {
        if self.passed() { 0 } else { 1 }
    }
}

pub fn render_markdown(report: &DiscoveryReport) -> String {
    let mut lines = vec![
        "# AirSkill discovery and summary assessment".to_string(),
        String::new(),
        "One row per skill: id, description, whether an agent can discover and choose it, \
         why, and a 1–5 description score."
            .to_string(),
        String::new(),
        format!("| {} |", COLUMNS.join(" | ")),
        format!("| {} |", ["---"; 5].join(" | ")),
    ];
    for a in &report.assessment {
        lines.push(format!(
            "| {} | {} | {} | {} | {} |",
            a.skill,
            md_cell(&a.description),
            yes_no(a.discoverable),
            md_cell(&a.reason),
            a.score
        ));
    }
    lines.extend([String::new(), "---".to_string(), String::new(), "## Summary".to_string(), String::new()]);

    lines.push("### 1. Root manifest".into());
    lines.push(String::new());
    lines.push(format!("- **Expected links** (from the skills tree): {}", report.expected.len()));
    lines.push(format!("- **Parsed from published text** (manifest and group indexes): {}", report.found.len()));
    if report.missing.is_empty() {
        lines.push("- **Status**: PASS: every expected link appears in the manifest or a group index.".into());
    } else {
        lines.push("- **Status**: FAIL: the published text does not list every expected link.".into());
        lines.push("- **Missing**:".into());
        lines.extend(report.missing.iter().map(|u| format!("  - `{u}`")));
    }

    lines.extend([String::new(), "### 2. Group row summaries".to_string(), String::new()]);
    if report.generic_groups.is_empty() {
        lines.push("- **Status**: PASS: every group row has a specific summary.".into());
    } else {
        lines.push("- **Status**: FAIL: these group rows use the generic summary:".into());
        lines.extend(report.generic_groups.iter().map(|g| format!("  - `{g}`")));
    }

    lines.extend([String::new(), "### 3. Group indexes".to_string(), String::new()]);
    if report.group_checks.is_empty() {
        lines.push("- (no groups)".into());
    }
    for check in &report.group_checks {
        lines.push(format!(
            "- **{}**: {} (expected {} sub-skills, listed {})",
            check.group,
            if check.passed() { "PASS" } else { "FAIL" },
            check.expected,
            check.listed
        ));
        lines.extend(check.missing.iter().map(|u| format!("  - missing `{u}`")));
    }

    lines.extend([String::new(), "### 4. Generation service probe (advisory)".to_string(), String::new()]);
    match &report.probe {
        ProbeOutcome::Skipped(reason) => lines.push(format!("- **Status**: Skipped ({reason}).")),
        ProbeOutcome::Failed(err) => lines.push(format!("- **Status**: ERROR: {err}")),
        ProbeOutcome::Completed { found, missing, extra } => {
            if missing.is_empty() && extra.is_empty() {
                lines.push("- **Status**: PASS: the agent reported every expected link and nothing else.".into());
            } else {
                lines.push("- **Status**: FAIL".into());
            }
            lines.push(format!("- **Reported**: {}", found.len()));
            if !missing.is_empty() {
                lines.push(format!("- **Missing**: {}", missing.len()));
                lines.extend(missing.iter().map(|u| format!("  - `{u}`")));
            }
            if !extra.is_empty() {
                lines.push(format!("- **Extra**: {}", extra.len()));
                lines.extend(extra.iter().map(|u| format!("  - `{u}`")));
            }
        }
    }
    lines.push(String::new());
    lines.join("\n")
}

/// RFC 4180 CSV of the assessment, CRLF line endings.
pub fn render_csv(assessment: &[Assessment]) -> String {
    let mut out = String::new();
    push_csv_record(&mut out, COLUMNS.iter().map(|c| c.to_string()));
    for a in assessment {
        push_csv_record(
            &mut out,
            [
                a.skill.clone(),
                a.description.clone(),
                yes_no(a.discoverable).to_string(),
                a.reason.clone(),
                a.score.to_string(),
            ]
            .into_iter(),
        );
    }
    out
}

/// Write both reports into `dir`, creating it.
pub fn write_reports(dir: &Path, report: &DiscoveryReport) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir).map_err(|e| AirskillError::io_at(dir, e))?;
    let md = dir.join(MARKDOWN_REPORT);
    let csv = dir.join(CSV_REPORT);
    std::fs::write(&md, render_markdown(report)).map_err(|e| AirskillError::io_at(&md, e))?;
    std::fs::write(&csv, render_csv(&report.assessment)).map_err(|e| AirskillError::io_at(&csv, e))?;
    info!(markdown = ?md, csv = ?csv, "wrote discovery reports");
    Ok((md, csv))
}

fn push_csv_record(out: &mut String, fields: impl Iterator<Item = String>) {
    let record: Vec<String> = fields.map(|f| csv_field(&f)).collect();
    out.push_str(&record.join(","));
    out.push_str("\r\n");
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn md_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(skill: &str, description: &str, score: u8) -> Assessment {
        Assessment {
            skill: skill.into(),
            description: description.into(),
            discoverable: score > 2,
            reason: "Because.".into(),
            score,
        }
    }

    fn report() -> DiscoveryReport {
        DiscoveryReport {
            expected: BTreeSet::from(["https://s.test/a.md".to_string()]),
            found: BTreeSet::from(["https://s.test/a.md".to_string()]),
            missing: BTreeSet::new(),
            generic_groups: vec![],
            group_checks: vec![],
            assessment: vec![assessment("a", "Does a | b.", 4)],
            probe: ProbeOutcome::Skipped("no API key".into()),
        }
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        let csv = render_csv(&[
            assessment("a", "plain", 4),
            assessment("b", "comma, \"quoted\"", 5),
            assessment("c", "two\nlines", 4),
        ]);
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines[0], "skill,description,discoverable,reason,score");
        assert_eq!(lines[1], "a,plain,yes,Because.,4");
        assert_eq!(lines[2], "b,\"comma, \"\"quoted\"\"\",yes,Because.,5");
        assert!(csv.contains("c,\"two\nlines\",yes"));
    }

    #[test]
    fn markdown_escapes_pipes_and_reports_status() {
        let md = render_markdown(&report());
        assert!(md.contains("| a | Does a \\| b. | yes | Because. | 4 |"));
        assert!(md.contains("every expected link appears"));
        assert!(md.contains("Skipped (no API key)"));
    }

    #[test]
    fn exit_code_follows_hard_and_soft_failures() {
        let mut r = report();
        assert_eq!(r.exit_code(), 0);
        r.generic_groups.push("g".into());
        assert_eq!(r.exit_code(), 1);
        r.generic_groups.clear();
        r.missing.insert("https://s.test/b.md".into());
        assert_eq!(r.exit_code(), 1);
        r.missing.clear();
        r.probe = ProbeOutcome::Failed("boom".into());
        assert_eq!(r.exit_code(), 0);
    }

    #[test]
    fn reports_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/output");
        let (md, csv) = write_reports(&out, &report()).unwrap();
        assert!(md.ends_with(MARKDOWN_REPORT));
        assert!(std::fs::read_to_string(csv).unwrap().starts_with("skill,"));
    }
}
