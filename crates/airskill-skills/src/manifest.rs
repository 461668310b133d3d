use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use airskill_config::AirskillConfig;
use airskill_core::{AirskillError, LinkBase, Result, TableRow, render_table};
use airskill_llm::Generator;

use crate::index::write_group_index;
use crate::resolver::{SummaryResolver, SummarySource};
use crate::walker::{SkillTree, walk_skills};

/// Token in the template replaced by the rendered table.
pub const SKILL_LIST_TOKEN: &str = "{{SKILL_LIST}}";

/// Outcome of one group during a build.
#[derive(Debug, Clone)]
pub struct GroupOutcome {
    pub name: String,
    pub skills: usize,
    pub summary: String,
    pub source: SummarySource,
}

/// What a build produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub root_skills: usize,
    pub groups: Vec<GroupOutcome>,
    pub output: PathBuf,
    pub group_indexes: Vec<PathBuf>,
    pub cname: Option<PathBuf>,
}

impl BuildReport {
    pub fn generated_summaries(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| g.source == SummarySource::Generated)
            .count()
    }
}

/// Builds the group indexes and the published root manifest.
pub struct ManifestBuilder {
    config: AirskillConfig,
    resolver: SummaryResolver,
}

impl ManifestBuilder {
    /// The generation service is created from `config.llm` only if some
    /// group needs it.
    pub fn new(config: AirskillConfig) -> Self {
        let resolver = SummaryResolver::new(config.llm.clone());
        Self { config, resolver }
    }

    pub fn with_generator(config: AirskillConfig, generator: Generator) -> Self {
        Self {
            config,
            resolver: SummaryResolver::with_generator(generator),
        }
    }

    /// Walk, resolve every group summary, then write. Nothing is written
    /// unless every summary resolved.
    pub async fn build(&mut self) -> Result<BuildReport> {
        let links = LinkBase::new(&self.config.site.base_url);
        let skills_dir = self.config.skills_dir();
        let tree = walk_skills(&skills_dir, &links)?;
        let template = load_template(&self.config.template_path())?;

        let mut groups = Vec::with_capacity(tree.groups.len());
        for (name, skills) in &tree.groups {
            let (summary, source) = self.resolver.resolve(name, skills).await?;
            groups.push(GroupOutcome {
                name: name.clone(),
                skills: skills.len(),
                summary,
                source,
            });
        }

        let mut group_indexes = Vec::with_capacity(groups.len());
        for (name, skills) in &tree.groups {
            let rows: Vec<TableRow> = skills
                .iter()
                .filter(|s| !s.is_overview())
                .map(|s| s.row())
                .collect();
            let overview = tree.overview(name).map(|s| s.row());
            group_indexes.push(write_group_index(&skills_dir, name, &rows, overview.as_ref())?);
        }

        let table = render_table(&manifest_rows(&tree, &groups, &links));
        let page = render_page(&template, &table);
        let output = self.config.output_path();
        write_atomic(&output, &page)?;

        let cname = match self.config.site.cname.as_deref().map(str::trim) {
            Some(domain) if !domain.is_empty() => {
                let path = self.config.cname_path();
                std::fs::write(&path, format!("{domain}\n"))
                    .map_err(|e| AirskillError::io_at(&path, e))?;
                Some(path)
            }
            _ => None,
        };

        info!(
            root_skills = tree.root_skills.len(),
            groups = groups.len(),
            output = ?output,
            "manifest built"
        );
        Ok(BuildReport {
            root_skills: tree.root_skills.len(),
            groups,
            output,
            group_indexes,
            cname,
        })
    }
}

/// Root rows in path order, then one row per group in name order.
pub fn manifest_rows(tree: &SkillTree, groups: &[GroupOutcome], links: &LinkBase) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = tree.root_skills.iter().map(|s| s.row()).collect();
    let mut groups: Vec<&GroupOutcome> = groups.iter().collect();
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    rows.extend(
        groups
            .into_iter()
            .map(|g| TableRow::new(g.name.clone(), links.group_index(&g.name), g.summary.clone())),
    );
    rows
}

/// Substitute the table into the template and wrap it in the `<pre>` page.
pub fn render_page(template: &str, table: &str) -> String {
    let manifest = template.replace(SKILL_LIST_TOKEN, table);
    format!("<pre>\n{manifest}\n</pre>\n")
}

fn load_template(path: &Path) -> Result<String> {
    let template = std::fs::read_to_string(path).map_err(|e| {
        AirskillError::Template(format!("cannot read template {}: {}", path.display(), e))
    })?;
    if !template.contains(SKILL_LIST_TOKEN) {
        return Err(AirskillError::Template(format!(
            "template {} has no {} token",
            path.display(),
            SKILL_LIST_TOKEN
        )));
    }
    Ok(template)
}

/// Write through a temp file in the same directory, then rename over `path`.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| AirskillError::io_at(&dir, e))?;
    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| AirskillError::io_at(&dir, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| AirskillError::io_at(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| {
        warn!(path = ?path, error = %e.error, "failed to replace output");
        AirskillError::io_at(path, e.error)
    })?;
    Ok(())
}
