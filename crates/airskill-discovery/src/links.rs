use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

use airskill_core::{AirskillError, LinkBase, Result};
use airskill_skills::SkillTree;

/// Key of root-level skills in [`ExpectedLinks::by_group`].
pub const ROOT_GROUP: &str = "";

/// Every Direct Link the published artifacts must contain.
#[derive(Debug, Clone, Default)]
pub struct ExpectedLinks {
    pub all: BTreeSet<String>,
    /// Group name to its links, including the group's own index.
    pub by_group: BTreeMap<String, BTreeSet<String>>,
}

impl ExpectedLinks {
    /// Each document's link plus each group's `index.md` link.
    pub fn from_tree(tree: &SkillTree, links: &LinkBase) -> Self {
        let mut expected = Self::default();
        for entry in &tree.root_skills {
            expected.insert(ROOT_GROUP, entry.link.clone());
        }
        for (group, entries) in &tree.groups {
            for entry in entries {
                expected.insert(group, entry.link.clone());
            }
            expected.insert(group, links.group_index(group));
        }
        expected
    }

    fn insert(&mut self, group: &str, link: String) {
        self.all.insert(link.clone());
        self.by_group.entry(group.to_string()).or_default().insert(link);
    }

    /// Links of `group` that its index table must list (everything but the
    /// index itself).
    pub fn listed_in_group(&self, group: &str, links: &LinkBase) -> BTreeSet<String> {
        let index = links.group_index(group);
        self.by_group
            .get(group)
            .map(|set| set.iter().filter(|l| **l != index).cloned().collect())
            .unwrap_or_default()
    }
}

/// Matches Direct Links under `links`: the base followed by anything up to
/// whitespace, `|` or `)`.
pub fn url_regex(links: &LinkBase) -> Result<Regex> {
    let pattern = format!(r"{}/[^\s|)]+", regex::escape(links.as_str()));
    Regex::new(&pattern).map_err(|e| AirskillError::Validation(format!("bad base URL pattern: {e}")))
}

/// Every Direct Link in `text`, with trailing punctuation removed.
pub fn parse_urls(re: &Regex, text: &str) -> BTreeSet<String> {
    re.find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ')']).to_string())
        .collect()
}
