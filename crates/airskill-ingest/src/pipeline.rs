use std::path::{Path, PathBuf};
use tracing::info;

use airskill_config::AirskillConfig;
use airskill_core::{AirskillError, LinkBase, Result};
use airskill_llm::Generator;

use crate::context::{gather_repo_context, repo_name};
use crate::parser::{ParsedResponse, parse_response};
use crate::prompt::{ingest_prompt, ingest_system_prompt};
use crate::slug::slugify;

/// Group used when no other name can be derived.
pub const FALLBACK_GROUP: &str = "ingested";

/// Characters of the raw response kept in a structural error.
pub const EXCERPT_CHARS: usize = 2000;

/// Result of one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub group: String,
    pub written: Vec<PathBuf>,
    /// Direct Link of the group's index once the manifest is rebuilt.
    pub index_link: String,
}

/// Distills a local repository into skill documents under one group.
///
/// Rebuilding the manifest afterwards is left to the caller.
pub struct IngestPipeline {
    config: AirskillConfig,
    generator: Option<Generator>,
}

impl IngestPipeline {
    pub fn new(config: AirskillConfig) -> Self {
        Self {
            config,
            generator: None,
        }
    }

    pub fn with_generator(config: AirskillConfig, generator: Generator) -> Self {
        Self {
            config,
            generator: Some(generator),
        }
    }

    pub async fn run(&mut self, repo: &Path, group: Option<&str>) -> Result<IngestOutcome> {
        if !repo.is_dir() {
            return Err(AirskillError::Validation(format!(
                "repository directory not found: {}",
                repo.display()
            )));
        }
        let explicit = match group {
            Some(raw) => {
                let slug = slugify(raw);
                if slug.is_empty() {
                    return Err(AirskillError::Validation(format!(
                        "group name '{raw}' has no usable characters"
                    )));
                }
                Some(slug)
            }
            None => None,
        };
        let name = repo_name(repo);
        let generator = self.generator()?;

        info!(repo = %name, "gathering repository context");
        let context = gather_repo_context(repo)?;

        info!(repo = %name, chars = context.chars().count(), "requesting skills");
        let raw = generator
            .generate_with_system(&ingest_system_prompt(&name), &ingest_prompt(&context))
            .await?;
        let ParsedResponse {
            group: llm_group,
            skills,
        } = parse_response(&raw);

        if skills.is_empty() {
            return Err(AirskillError::Structural {
                message: "no skill blocks could be parsed from the response".into(),
                excerpt: raw.chars().take(EXCERPT_CHARS).collect(),
            });
        }

        let group = resolve_group(explicit.as_deref(), llm_group.as_deref(), &name);
        let out_dir = self.config.skills_dir().join(&group);
        std::fs::create_dir_all(&out_dir).map_err(|e| AirskillError::io_at(&out_dir, e))?;

        let mut written = Vec::with_capacity(skills.len());
        for skill in &skills {
            let path = out_dir.join(format!("{}.md", skill.slug));
            std::fs::write(&path, &skill.content).map_err(|e| AirskillError::io_at(&path, e))?;
            info!(group = %group, slug = %skill.slug, "wrote skill");
            written.push(path);
        }

        let index_link = LinkBase::new(&self.config.site.base_url).group_index(&group);
        Ok(IngestOutcome {
            group,
            written,
            index_link,
        })
    }

    fn generator(&mut self) -> Result<&Generator> {
        let generator = match self.generator.take() {
            Some(g) => g,
            None => airskill_llm::from_config(&self.config.llm)?,
        };
        Ok(self.generator.insert(generator))
    }
}

/// Destination group: explicit name, then the declared one, then the
/// repository directory name, then [`FALLBACK_GROUP`]. Each candidate is
/// sanitized and skipped when nothing is left; [`IngestPipeline::run`]
/// rejects an explicit name that sanitizes to nothing before this point.
pub fn resolve_group(explicit: Option<&str>, declared: Option<&str>, repo_name: &str) -> String {
    explicit
        .into_iter()
        .chain(declared)
        .chain(std::iter::once(repo_name))
        .map(slugify)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_GROUP.to_string())
}
