use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use airskill_core::{AirskillError, INDEX_FILE_NAME, Result, TableRow};

static PRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<pre>\s*([\s\S]*?)\s*</pre>").unwrap());

/// Text inside the page's `<pre>` block, or the whole page when it has none.
pub fn manifest_text(page: &str) -> String {
    match PRE_RE.captures(page) {
        Some(caps) => caps[1].trim().to_string(),
        None => page.to_string(),
    }
}

/// Read the published page and return its manifest text.
pub fn read_manifest(path: &Path) -> Result<String> {
    let page = std::fs::read_to_string(path).map_err(|e| {
        AirskillError::Validation(format!(
            "cannot read manifest {} ({e}); run `airskill build` first",
            path.display()
        ))
    })?;
    Ok(manifest_text(&page))
}

/// A generated group index and its text.
#[derive(Debug, Clone)]
pub struct GroupIndex {
    pub group: String,
    pub text: String,
}

/// Every `<skills>/<group>/index.md`, in group name order.
pub fn read_group_indexes(skills_dir: &Path) -> Result<Vec<GroupIndex>> {
    let entries = std::fs::read_dir(skills_dir).map_err(|e| AirskillError::io_at(skills_dir, e))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AirskillError::io_at(skills_dir, e))?;
        let path = entry.path();
        let index = path.join(INDEX_FILE_NAME);
        if !path.is_dir() || !index.is_file() {
            continue;
        }
        let Some(group) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let text = std::fs::read_to_string(&index).map_err(|e| AirskillError::io_at(&index, e))?;
        out.push(GroupIndex {
            group: group.to_string(),
            text,
        });
    }
    out.sort_by(|a, b| a.group.cmp(&b.group));
    Ok(out)
}

/// Data rows of every table in `text`.
pub fn parse_rows(text: &str) -> Vec<TableRow> {
    text.lines().filter_map(TableRow::parse).collect()
}

/// Manifest rows that link to a group index.
pub fn group_rows(rows: &[TableRow]) -> Vec<&TableRow> {
    rows.iter()
        .filter(|r| r.link.ends_with(&format!("/{INDEX_FILE_NAME}")))
        .collect()
}
