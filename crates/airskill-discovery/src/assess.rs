use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use airskill_core::{LinkBase, OVERVIEW_NAME, TableRow, overview_id};

/// Group summary that tells an agent nothing about the group. Its presence
/// in a manifest row is a failure.
pub const GENERIC_GROUP_SUMMARY: &str = "Layered skill group. Fetch Direct Link for sub-skill index.";

/// Summaries longer than this score as specific.
pub const SPECIFIC_SUMMARY_CHARS: usize = 80;

/// Longest description kept in the report.
pub const DESCRIPTION_CHARS: usize = 200;

/// How well one expected link can be found and chosen by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub skill: String,
    pub description: String,
    pub discoverable: bool,
    pub reason: String,
    /// 1 (unlisted) to 5 (specific summary).
    pub score: u8,
}

/// Ids of group rows whose summary is [`GENERIC_GROUP_SUMMARY`].
pub fn generic_groups(group_rows: &[&TableRow]) -> Vec<String> {
    group_rows
        .iter()
        .filter(|r| r.summary.trim() == GENERIC_GROUP_SUMMARY)
        .map(|r| r.id.clone())
        .collect()
}

/// Assess every expected link, in link order.
///
/// `found` is what was parsed from the published text; `manifest_rows` and
/// `index_rows` supply ids and summaries. A group overview, which is linked
/// from its index preamble rather than a table row, takes the group row's
/// summary.
pub fn assess(
    expected: &BTreeSet<String>,
    found: &BTreeSet<String>,
    manifest_rows: &[TableRow],
    index_rows: &[TableRow],
    links: &LinkBase,
) -> Vec<Assessment> {
    let mut info: HashMap<String, (String, String)> = HashMap::new();
    for row in manifest_rows.iter().chain(index_rows) {
        info.insert(row_link(row), (row.id.clone(), row.summary.clone()));
    }

    let group_index_suffix = format!("/{}", airskill_core::INDEX_FILE_NAME);
    let mut generic = Vec::new();
    for row in manifest_rows {
        if !row.link.ends_with(&group_index_suffix) {
            continue;
        }
        if row.summary.trim() == GENERIC_GROUP_SUMMARY {
            generic.push(row.id.clone());
        }
        let overview = links.link(&format!("{}/{OVERVIEW_NAME}.md", row.id));
        info.entry(overview)
            .or_insert_with(|| (overview_id(&row.id), row.summary.clone()));
    }

    expected
        .iter()
        .map(|url| {
            let Some((id, summary)) = info.get(url) else {
                return Assessment {
                    skill: links.skill_id(url).unwrap_or_else(|| url.clone()),
                    description: "(not in any index)".into(),
                    discoverable: false,
                    reason: "Absent from the manifest and every group index; an agent cannot find it.".into(),
                    score: 1,
                };
            };
            let description = shorten(summary);
            let is_group_row = url.ends_with(&group_index_suffix);
            if !found.contains(url) {
                Assessment {
                    skill: id.clone(),
                    description,
                    discoverable: false,
                    reason: "Not present in the published index text; an agent cannot find it.".into(),
                    score: 1,
                }
            } else if is_group_row && generic.contains(id) {
                Assessment {
                    skill: id.clone(),
                    description,
                    discoverable: false,
                    reason: "Group row uses the generic summary; an agent cannot tell what the group is for.".into(),
                    score: 2,
                }
            } else {
                let reason = if is_group_row {
                    "Listed as a group row with a specific summary; an agent can decide to open the group index."
                } else {
                    "Listed with a Direct Link and a distinguishing summary; an agent can choose and fetch it."
                };
                Assessment {
                    skill: id.clone(),
                    description,
                    discoverable: true,
                    reason: reason.into(),
                    score: if summary.chars().count() > SPECIFIC_SUMMARY_CHARS { 5 } else { 4 },
                }
            }
        })
        .collect()
}

fn row_link(row: &TableRow) -> String {
    row.link.trim_end_matches(['.', ',', ';', ')']).to_string()
}

fn shorten(summary: &str) -> String {
    if summary.chars().count() <= DESCRIPTION_CHARS {
        return summary.to_string();
    }
    let mut cut: String = summary.chars().take(DESCRIPTION_CHARS).collect();
    cut.push('…');
    cut
}
