use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{info, warn};

use airskill_config::AirskillConfig;
use airskill_core::{AirskillError, LinkBase, Result, TableRow};
use airskill_llm::Generator;
use airskill_skills::walk_skills;

use crate::assess::{assess, generic_groups};
use crate::links::{ExpectedLinks, parse_urls, url_regex};
use crate::probe::{ProbeOutcome, probe_prompt, run_probe};
use crate::report::{DiscoveryReport, GroupCheck, write_reports};
use crate::table::{group_rows, parse_rows, read_group_indexes, read_manifest};

/// Whether and how to run the generation-service probe.
pub enum ProbeMode {
    Off,
    /// Build a generator from `config.llm`; a missing key skips the probe.
    FromConfig,
    Using(Generator),
}

/// A finished run and where its reports were written.
#[derive(Debug, Clone)]
pub struct DiscoveryOutcome {
    pub report: DiscoveryReport,
    pub markdown: PathBuf,
    pub csv: PathBuf,
}

impl DiscoveryOutcome {
    pub fn exit_code(&self) -> i32 {
        self.report.exit_code()
    }
}

/// Check the published manifest and group indexes against the skills tree
/// and write both reports.
pub async fn run_discovery(config: &AirskillConfig, probe: ProbeMode) -> Result<DiscoveryOutcome> {
    let links = LinkBase::new(&config.site.base_url);
    let skills_dir = config.skills_dir();
    let tree = walk_skills(&skills_dir, &links)?;
    let expected = ExpectedLinks::from_tree(&tree, &links);

    let manifest = read_manifest(&config.output_path())?;
    let indexes = read_group_indexes(&skills_dir)?;
    let url_re = url_regex(&links)?;

    let mut found = parse_urls(&url_re, &manifest);
    for index in &indexes {
        found.extend(parse_urls(&url_re, &index.text));
    }
    let missing: BTreeSet<String> = expected.all.difference(&found).cloned().collect();

    let manifest_rows = parse_rows(&manifest);
    let index_rows: Vec<TableRow> = indexes.iter().flat_map(|g| parse_rows(&g.text)).collect();
    let generic = generic_groups(&group_rows(&manifest_rows));

    let group_checks: Vec<GroupCheck> = indexes
        .iter()
        .map(|index| {
            let wanted = expected.listed_in_group(&index.group, &links);
            let listed = parse_urls(&url_re, &index.text);
            GroupCheck {
                group: index.group.clone(),
                expected: wanted.len(),
                listed: wanted.intersection(&listed).count(),
                missing: wanted.difference(&listed).cloned().collect(),
            }
        })
        .collect();

    let assessment = assess(&expected.all, &found, &manifest_rows, &index_rows, &links);

    if missing.is_empty() {
        info!(expected = expected.all.len(), "every expected link is published");
    } else {
        warn!(missing = missing.len(), "published text is missing links");
    }
    if !generic.is_empty() {
        warn!(groups = ?generic, "group rows use the generic summary");
    }

    let probe = match probe {
        ProbeMode::Off => ProbeOutcome::Skipped("disabled with --no-probe".into()),
        ProbeMode::FromConfig => match airskill_llm::from_config(&config.llm) {
            Ok(generator) => {
                let prompt = probe_prompt(&manifest, &indexes, links.as_str());
                run_probe(&generator, &url_re, &prompt, &expected.all).await
            }
            Err(AirskillError::Config(msg)) => ProbeOutcome::Skipped(msg),
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        },
        ProbeMode::Using(generator) => {
            let prompt = probe_prompt(&manifest, &indexes, links.as_str());
            run_probe(&generator, &url_re, &prompt, &expected.all).await
        }
    };

    let report = DiscoveryReport {
        expected: expected.all,
        found,
        missing,
        generic_groups: generic,
        group_checks,
        assessment,
        probe,
    };
    let (markdown, csv) = write_reports(&config.report_dir(), &report)?;
    Ok(DiscoveryOutcome {
        report,
        markdown,
        csv,
    })
}
