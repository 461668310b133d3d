use std::path::{Path, PathBuf};
use tracing::debug;

use airskill_core::{AirskillError, INDEX_FILE_NAME, Result, TableRow, render_table};

/// Render `<group>/index.md`.
///
/// `rows` must not contain the overview; it is linked from the preamble
/// instead so the table only lists the sub-skills.
pub fn render_group_index(group: &str, rows: &[TableRow], overview: Option<&TableRow>) -> String {
    let mut rows = rows.to_vec();
    rows.sort_by(|a, b| a.id.cmp(&b.id));

    let mut out = vec![
        format!("# Skill group: {group}"),
        String::new(),
        format!("This is the sub-skill index of the `{group}` group."),
        "Each row below is one skill. Read its Summary to decide whether it applies,".to_string(),
        "then fetch its Direct Link to load the full instructions.".to_string(),
        String::new(),
    ];
    if let Some(ov) = overview {
        out.push(format!("Group overview: {}", ov.link));
        out.push(String::new());
    }
    out.push("## Sub-skills".to_string());
    out.push(String::new());
    out.push(render_table(&rows));
    out.push(String::new());
    out.join("\n")
}

/// Write `<skills_root>/<group>/index.md`, replacing any existing file.
pub fn write_group_index(
    skills_root: &Path,
    group: &str,
    rows: &[TableRow],
    overview: Option<&TableRow>,
) -> Result<PathBuf> {
    let dir = skills_root.join(group);
    std::fs::create_dir_all(&dir).map_err(|e| AirskillError::io_at(&dir, e))?;
    let path = dir.join(INDEX_FILE_NAME);
    std::fs::write(&path, render_group_index(group, rows, overview))
        .map_err(|e| AirskillError::io_at(&path, e))?;
    debug!(group, rows = rows.len(), path = ?path, "wrote group index");
    Ok(path)
}
