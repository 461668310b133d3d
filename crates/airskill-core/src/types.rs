use serde::{Deserialize, Serialize};

/// Header row shared by the root manifest and every group index.
pub const TABLE_HEADER: &str = "| Skill ID | Direct Link | Summary |";

/// Alignment row that follows [`TABLE_HEADER`].
pub const TABLE_SEPARATOR: &str = "| :--- | :--- | :--- |";

/// File name of the generated per-group index. Never treated as a skill.
pub const INDEX_FILE_NAME: &str = "index.md";

/// Last path segment of the document whose summary describes its group.
pub const OVERVIEW_NAME: &str = "overview";

/// Character substituted for `|` so summaries cannot break a table row.
pub const PIPE_SUBSTITUTE: char = '/';

/// Skill id: relative path under the skills root, `/`-joined, extension stripped.
pub type SkillId = String;

/// One row of a manifest or group-index table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub id: SkillId,
    pub link: String,
    pub summary: String,
}

impl TableRow {
    pub fn new(id: impl Into<String>, link: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            link: link.into(),
            summary: summary.into(),
        }
    }

    /// Render as `| id | link | summary |`.
    pub fn render(&self) -> String {
        format!("| {} | {} | {} |", self.id, self.link, self.summary)
    }

    /// Parse a rendered table line. Returns `None` for the header, the
    /// separator, and lines with fewer than three non-empty cells.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with('|') || line == TABLE_SEPARATOR || line == TABLE_HEADER {
            return None;
        }
        let cells: Vec<&str> = line
            .split('|')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        if cells.len() < 3 {
            return None;
        }
        Some(Self::new(cells[0], cells[1], cells[2]))
    }
}

/// Render a complete table (header, separator, rows).
pub fn render_table(rows: &[TableRow]) -> String {
    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(TABLE_HEADER.to_string());
    out.push(TABLE_SEPARATOR.to_string());
    out.extend(rows.iter().map(TableRow::render));
    out.join("\n")
}

/// Builds canonical published URLs from relative skill paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBase {
    base: String,
}

impl LinkBase {
    pub fn new(base: impl AsRef<str>) -> Self {
        Self {
            base: base.as_ref().trim_end_matches('/').to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// `<base>/<relative>`; `relative` must already use `/` separators.
    pub fn link(&self, relative: &str) -> String {
        format!("{}/{}", self.base, relative.trim_start_matches('/'))
    }

    /// Link to a group's generated index.
    pub fn group_index(&self, group: &str) -> String {
        self.link(&format!("{group}/{INDEX_FILE_NAME}"))
    }

    /// Inverse of [`LinkBase::link`] followed by stripping `.md`.
    pub fn skill_id(&self, url: &str) -> Option<SkillId> {
        let rest = url.strip_prefix(&self.base)?.strip_prefix('/')?;
        Some(rest.strip_suffix(".md").unwrap_or(rest).to_string())
    }
}

/// The id of the overview document of `group`.
pub fn overview_id(group: &str) -> SkillId {
    format!("{group}/{OVERVIEW_NAME}")
}

/// Make text safe for a single table cell.
pub fn table_cell(text: &str) -> String {
    text.replace('|', &PIPE_SUBSTITUTE.to_string())
}
