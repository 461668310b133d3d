use regex::Regex;
use std::sync::LazyLock;

/// Used when sanitizing leaves nothing.
pub const DEFAULT_SLUG: &str = "skill";

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\-]").unwrap());
static DASH_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

/// Lowercase, turn every char that is not a word char or `-` into `-`,
/// collapse dash runs and trim dashes. May return an empty string.
pub fn slugify(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let dashed = NON_SLUG_RE.replace_all(&lower, "-");
    DASH_RUN_RE
        .replace_all(&dashed, "-")
        .trim_matches('-')
        .to_string()
}

/// [`slugify`], falling back to [`DEFAULT_SLUG`].
pub fn sanitize_slug(raw: &str) -> String {
    let slug = slugify(raw);
    if slug.is_empty() {
        DEFAULT_SLUG.to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_dashes() {
        assert_eq!(sanitize_slug("  Message Envelope Normalization "), "message-envelope-normalization");
        assert_eq!(sanitize_slug("a.b/c"), "a-b-c");
        assert_eq!(sanitize_slug("--x---y--"), "x-y");
    }

    #[test]
    fn keeps_underscores_and_unicode_word_chars() {
        assert_eq!(sanitize_slug("snake_case"), "snake_case");
        assert_eq!(sanitize_slug("Café Größe"), "café-größe");
        assert_eq!(sanitize_slug("技能 设计"), "技能-设计");
    }

    #[test]
    fn empty_falls_back() {
        assert_eq!(sanitize_slug(""), DEFAULT_SLUG);
        assert_eq!(sanitize_slug("!!!"), DEFAULT_SLUG);
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn sanitizing_is_idempotent() {
        for raw in ["Hello World!", "--a--b--", "Ünïcödé slug", "", "x", "`streaming-llm-debugging`"] {
            let once = sanitize_slug(raw);
            assert_eq!(sanitize_slug(&once), once, "not idempotent for {raw:?}");
        }
    }
}
