//! Parser for the skill-block response format.
//!
//! ```text
//! response  := [group-line] block*
//! group-line:= "Group:" slug NEWLINE
//! block     := marker NEWLINE introducer NEWLINE body
//! marker    := "##" "Skill" [number] ":" slug      (own line)
//! introducer:= "System Prompt:"                    (first non-blank line)
//! body      := text up to the next marker or end, trailing ``` removed
//! ```
//!
//! Keywords are case-insensitive. Text before the first marker is ignored.
//! Blocks without an introducer or with an empty body are dropped. A slug
//! equal to the group index stem is renamed to [`RENAMED_INDEX_SLUG`].

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::slug::{sanitize_slug, slugify};

/// Stem of the generated `<group>/index.md`; the build overwrites that file.
const INDEX_SLUG: &str = "index";
pub const RENAMED_INDEX_SLUG: &str = "index-skill";

static GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^group[ \t]*:[ \t]*(.*)$").unwrap());
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*##[ \t]*skill[ \t]*\d*[ \t]*:[ \t]*(\S.*?)[ \t]*$").unwrap()
});
static INTRODUCER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^system[ \t]*prompt[ \t]*:$").unwrap());
static OPEN_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^```[\w-]*[ \t]*\n").unwrap());
static TRAILING_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n*```\s*$").unwrap());

/// One skill document recovered from a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSkill {
    pub slug: String,
    /// Full document text, `System Prompt:\n<body>\n`.
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResponse {
    /// Sanitized `Group:` value, when present and non-empty.
    pub group: Option<String>,
    /// In response order. Slugs are unique: a repeated slug replaces the
    /// earlier block in place.
    pub skills: Vec<ParsedSkill>,
}

/// Parse a generation response into a group name and skill documents.
pub fn parse_response(raw: &str) -> ParsedResponse {
    let trimmed = raw.trim();
    let text = OPEN_FENCE_RE
        .find(trimmed)
        .map_or(trimmed, |m| &trimmed[m.end()..]);

    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
    let (group, body) = match GROUP_RE.captures(first.trim()) {
        Some(caps) => {
            let slug = slugify(&caps[1]);
            ((!slug.is_empty()).then_some(slug), rest)
        }
        None => (None, text),
    };

    let markers: Vec<(usize, usize, String)> = MARKER_RE
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((whole.start(), whole.end(), caps[1].to_string()))
        })
        .collect();

    let mut skills: Vec<ParsedSkill> = Vec::with_capacity(markers.len());
    for (i, (_, end, raw_slug)) in markers.iter().enumerate() {
        let block_end = markers.get(i + 1).map_or(body.len(), |next| next.0);
        let mut slug = sanitize_slug(raw_slug);
        if slug == INDEX_SLUG {
            warn!(
                raw = %raw_slug,
                renamed = RENAMED_INDEX_SLUG,
                "skill slug collides with the group index"
            );
            slug = RENAMED_INDEX_SLUG.to_string();
        }
        let Some(text) = block_body(&body[*end..block_end]) else {
            debug!(slug = %slug, "dropping skill block without introducer or body");
            continue;
        };
        let skill = ParsedSkill {
            content: format!("System Prompt:\n{text}\n"),
            slug,
        };
        match skills.iter_mut().find(|s| s.slug == skill.slug) {
            Some(existing) => {
                warn!(slug = %skill.slug, "duplicate skill slug, keeping the later block");
                *existing = skill;
            }
            None => skills.push(skill),
        }
    }

    ParsedResponse { group, skills }
}

/// The body after the introducer line, or `None` when the block is not
/// well-formed.
fn block_body(block: &str) -> Option<String> {
    let mut lines = block.lines();
    let introducer = lines.by_ref().map(str::trim).find(|l| !l.is_empty())?;
    if !INTRODUCER_RE.is_match(introducer) {
        return None;
    }
    let rest = lines.collect::<Vec<_>>().join("\n");
    let body = TRAILING_FENCE_RE.replace(rest.trim(), "");
    let body = body.trim();
    (!body.is_empty()).then(|| body.to_string())
}
