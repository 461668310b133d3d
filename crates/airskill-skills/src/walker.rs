use std::collections::BTreeMap;
use std::path::{Component, Path};
use tracing::{debug, info};
use walkdir::WalkDir;

use airskill_core::{AirskillError, INDEX_FILE_NAME, LinkBase, Result, SkillId, TableRow, overview_id};

use crate::summary::extract_summary;

/// One skill document found under the skills root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillEntry {
    /// Relative path without extension, e.g. `memory-system/retain`.
    pub id: SkillId,
    /// Relative path with extension, `/`-separated.
    pub relative_path: String,
    /// Canonical Direct Link.
    pub link: String,
    pub summary: String,
    /// First path segment, `None` for root-level documents.
    pub group: Option<String>,
}

impl SkillEntry {
    pub fn row(&self) -> TableRow {
        TableRow::new(self.id.clone(), self.link.clone(), self.summary.clone())
    }

    /// True when this is its group's `overview` document.
    pub fn is_overview(&self) -> bool {
        self.group
            .as_deref()
            .is_some_and(|g| self.id == overview_id(g))
    }
}

/// All skill documents, classified. Both levels are sorted by relative path.
#[derive(Debug, Clone, Default)]
pub struct SkillTree {
    pub root_skills: Vec<SkillEntry>,
    pub groups: BTreeMap<String, Vec<SkillEntry>>,
}

impl SkillTree {
    /// Every entry, root-level first, then groups in name order.
    pub fn entries(&self) -> impl Iterator<Item = &SkillEntry> {
        self.root_skills
            .iter()
            .chain(self.groups.values().flatten())
    }

    pub fn len(&self) -> usize {
        self.root_skills.len() + self.groups.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The overview entry of `group`, if it has one.
    pub fn overview(&self, group: &str) -> Option<&SkillEntry> {
        self.groups
            .get(group)?
            .iter()
            .find(|e| e.id == overview_id(group))
    }
}

/// List every `*.md` under `root` except generated `index.md` files, read
/// each summary, and classify root-level vs grouped.
pub fn walk_skills(root: &Path, links: &LinkBase) -> Result<SkillTree> {
    if !root.is_dir() {
        return Err(AirskillError::Validation(format!(
            "skills directory not found: {}",
            root.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| AirskillError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }
        if path.file_name().is_some_and(|n| n == INDEX_FILE_NAME) {
            continue;
        }
        let Some(segments) = relative_segments(root, path) else {
            debug!(?path, "skipping path with non-UTF-8 components");
            continue;
        };
        files.push((segments.join("/"), segments, path.to_path_buf()));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut tree = SkillTree::default();
    for (relative_path, segments, path) in files {
        let content =
            std::fs::read_to_string(&path).map_err(|e| AirskillError::io_at(&path, e))?;
        let id = relative_path
            .strip_suffix(".md")
            .unwrap_or(&relative_path)
            .to_string();
        let group = (segments.len() > 1).then(|| segments[0].clone());
        let skill = SkillEntry {
            link: links.link(&relative_path),
            summary: extract_summary(&content),
            id,
            relative_path,
            group: group.clone(),
        };
        debug!(id = %skill.id, group = ?skill.group, "found skill");
        match group {
            Some(g) => tree.groups.entry(g).or_default().push(skill),
            None => tree.root_skills.push(skill),
        }
    }

    info!(
        root_skills = tree.root_skills.len(),
        groups = tree.groups.len(),
        total = tree.len(),
        "walked skills tree"
    );
    Ok(tree)
}

fn relative_segments(root: &Path, path: &Path) -> Option<Vec<String>> {
    let rel = path.strip_prefix(root).ok()?;
    rel.components()
        .map(|c| match c {
            Component::Normal(s) => s.to_str().map(str::to_string),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn links() -> LinkBase {
        LinkBase::new("https://skill.test/skills")
    }

    fn write(root: &Path, rel: &str, summary: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("System Prompt:\n{summary}\n\nBody.")).unwrap();
    }

    #[test]
    fn classifies_root_and_group_documents() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "Root skill.");
        write(dir.path(), "g/b.md", "B skill.");
        write(dir.path(), "g/c.md", "C skill.");

        let tree = walk_skills(dir.path(), &links()).unwrap();
        assert_eq!(tree.root_skills.len(), 1);
        assert_eq!(tree.root_skills[0].id, "a");
        assert_eq!(tree.root_skills[0].link, "https://skill.test/skills/a.md");
        assert_eq!(tree.root_skills[0].summary, "Root skill.");

        let g = &tree.groups["g"];
        let ids: Vec<&str> = g.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["g/b", "g/c"]);
        assert_eq!(g[0].group.as_deref(), Some("g"));
    }

    #[test]
    fn excludes_index_files_and_non_markdown() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "g/b.md", "B.");
        write(dir.path(), "g/index.md", "generated");
        write(dir.path(), "index.md", "generated");
        fs::write(dir.path().join("notes.txt"), "ignore").unwrap();

        let tree = walk_skills(dir.path(), &links()).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(tree.entries().all(|e| !e.relative_path.ends_with("index.md")));
    }

    #[test]
    fn nested_documents_belong_to_first_segment() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "g/deep/x.md", "Deep.");

        let tree = walk_skills(dir.path(), &links()).unwrap();
        let entry = &tree.groups["g"][0];
        assert_eq!(entry.id, "g/deep/x");
        assert_eq!(entry.link, "https://skill.test/skills/g/deep/x.md");
    }

    #[test]
    fn order_is_lexicographic_by_path() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta.md", "alpha.md", "mid.md"] {
            write(dir.path(), name, "s");
        }
        let tree = walk_skills(dir.path(), &links()).unwrap();
        let ids: Vec<&str> = tree.root_skills.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn overview_lookup() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "g/overview.md", "About g.");
        write(dir.path(), "g/b.md", "B.");

        let tree = walk_skills(dir.path(), &links()).unwrap();
        let overview = tree.overview("g").unwrap();
        assert!(overview.is_overview());
        assert_eq!(overview.summary, "About g.");
        assert!(tree.overview("missing").is_none());
    }

    #[test]
    fn missing_root_is_validation_error() {
        let err = walk_skills(Path::new("/nonexistent/skills"), &links()).unwrap_err();
        assert!(matches!(err, AirskillError::Validation(_)));
    }
}
