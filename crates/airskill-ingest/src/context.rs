//! Samples a repository into a bounded text digest for the generation prompt.

use std::path::{Component, Path};
use tracing::debug;
use walkdir::WalkDir;

use airskill_core::{AirskillError, Result};

/// Directories never listed or sampled.
pub const SKIP_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    ".git",
    "__pycache__",
    "dist",
    "build",
    "coverage",
    ".next",
    ".nuxt",
    "target",
];

const README_NAMES: &[&str] = &["README.md", "README.MD", "readme.md", "README.rst"];
const DESIGN_DOCS: &[&str] = &[
    "ARCHITECTURE.md",
    "DESIGN.md",
    "CONTRIBUTING.md",
    "docs/README.md",
    "doc/README.md",
];
const DOC_DIRS: &[&str] = &["docs", "doc"];
const MANIFEST_FILES: &[&str] = &["package.json", "pyproject.toml", "Cargo.toml", "tsconfig.json"];
const SOURCE_DIRS: &[&str] = &["src", "lib", "packages", "core", "server", "app"];
const SOURCE_EXTENSIONS: &[&str] = &["ts", "js", "py", "go", "rs", "md"];

const MAX_README_CHARS: usize = 14_000;
const MAX_README_LINES: usize = 500;
const MAX_DOC_CHARS: usize = 8_000;
const MAX_DOC_LINES: usize = 300;
const MAX_DOCS_PER_DIR: usize = 5;
const MAX_DOC_DIR_LINES: usize = 200;
const MAX_TOP_FILES: usize = 25;
const MAX_TOP_DIRS: usize = 15;
const MAX_MANIFEST_LINES: usize = 80;
const MAX_SOURCE_FILES: usize = 12;
const MAX_SOURCE_LINES: usize = 120;
const SOURCE_CANDIDATES_PER_DIR: usize = 20;
const MIN_SOURCE_CHARS: usize = 30;

const TRUNCATED_MARKER: &str = "\n...(truncated)";

/// Build the digest of `repo`: README, design docs, top-level layout,
/// manifest files and a capped source sample, each under its own heading.
pub fn gather_repo_context(repo: &Path) -> Result<String> {
    if !repo.is_dir() {
        return Err(AirskillError::Validation(format!(
            "not a directory: {}",
            repo.display()
        )));
    }
    let name = repo_name(repo);
    let mut out = vec![format!("# Repository: {name}"), String::new()];

    if let Some((file, head)) = README_NAMES.iter().find_map(|n| {
        let path = repo.join(n);
        path.is_file()
            .then(|| read_head(&path, MAX_README_CHARS, MAX_README_LINES))
            .flatten()
            .map(|h| (*n, h))
    }) {
        debug!(file, "sampled readme");
        push_section(&mut out, "README", head);
    }

    for name in DESIGN_DOCS {
        let path = repo.join(name);
        if let Some(head) = path.is_file().then(|| read_head(&path, MAX_DOC_CHARS, MAX_DOC_LINES)).flatten() {
            push_section(&mut out, name, head);
        }
    }

    for dir in DOC_DIRS {
        for path in sorted_markdown(&repo.join(dir)).into_iter().take(MAX_DOCS_PER_DIR) {
            let Some(file) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(head) = read_head(&path, MAX_DOC_CHARS, MAX_DOC_DIR_LINES) {
                push_section(&mut out, &format!("{dir}/{file}"), head);
            }
        }
    }

    out.extend(top_level_listing(repo));

    for name in MANIFEST_FILES {
        let path = repo.join(name);
        if let Some(head) = path.is_file().then(|| read_head(&path, 0, MAX_MANIFEST_LINES)).flatten() {
            push_section(&mut out, &format!("Manifest: {name}"), head);
        }
    }

    let mut sampled = 0;
    for dir in SOURCE_DIRS {
        if sampled >= MAX_SOURCE_FILES {
            break;
        }
        let dir_path = repo.join(dir);
        if !dir_path.is_dir() {
            continue;
        }
        let budget = MAX_SOURCE_FILES - sampled;
        for path in source_candidates(&dir_path)
            .into_iter()
            .take(SOURCE_CANDIDATES_PER_DIR)
            .take(budget)
        {
            let Some(head) = read_head(&path, 0, MAX_SOURCE_LINES) else {
                continue;
            };
            if head.trim().chars().count() < MIN_SOURCE_CHARS {
                continue;
            }
            let rel = path.strip_prefix(repo).unwrap_or(&path).display().to_string();
            push_section(&mut out, &format!("Source: {rel}"), head);
            sampled += 1;
        }
    }
    debug!(repo = %name, sampled, "gathered repository context");

    Ok(out.join("\n"))
}

/// Final path segment of `repo`, after resolving `.` and `..`.
pub fn repo_name(repo: &Path) -> String {
    let resolved = repo.canonicalize().unwrap_or_else(|_| repo.to_path_buf());
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn push_section(out: &mut Vec<String>, title: &str, body: String) {
    out.push(format!("## {title}"));
    out.push(body);
    out.push(String::new());
}

/// First `max_lines` lines, cut to `max_chars` chars when non-zero.
/// `None` when the file cannot be read.
fn read_head(path: &Path, max_chars: usize, max_lines: usize) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            debug!(?path, error = %e, "skipping unreadable file");
            return None;
        }
    };
    let text = String::from_utf8_lossy(&bytes);
    let head = text.lines().take(max_lines).collect::<Vec<_>>().join("\n");
    if max_chars > 0 && head.chars().count() > max_chars {
        let mut cut: String = head.chars().take(max_chars).collect();
        cut.push_str(TRUNCATED_MARKER);
        return Some(cut);
    }
    Some(head)
}

fn sorted_markdown(dir: &Path) -> Vec<std::path::PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();
    files
}

fn top_level_listing(repo: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(repo) else {
        return Vec::new();
    };
    let mut paths: Vec<_> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();

    let name_of = |p: &std::path::PathBuf| p.file_name().map(|n| n.to_string_lossy().into_owned());
    let files: Vec<String> = paths
        .iter()
        .filter(|p| p.is_file())
        .filter_map(name_of)
        .take(MAX_TOP_FILES)
        .collect();
    let dirs: Vec<String> = paths
        .iter()
        .filter(|p| p.is_dir())
        .filter_map(name_of)
        .filter(|n| !n.starts_with('.') && !SKIP_DIRS.contains(&n.as_str()))
        .take(MAX_TOP_DIRS)
        .collect();

    let listing = |label: &str, names: &[String]| {
        if names.is_empty() {
            format!("{label}: (none)")
        } else {
            format!("{label}: {}", names.join(", "))
        }
    };
    vec![
        "## Top-level layout".to_string(),
        listing("Files", &files),
        listing("Directories", &dirs),
        String::new(),
    ]
}

/// Source files under `dir` with a sampled extension, skipping [`SKIP_DIRS`],
/// in name order.
fn source_candidates(dir: &Path) -> Vec<std::path::PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || e.file_name().to_str().is_none_or(|n| !SKIP_DIRS.contains(&n))
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
        })
        .filter(|p| !in_skip_dir(dir, p))
        .collect()
}

fn in_skip_dir(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root).unwrap_or(path).components().any(|c| match c {
        Component::Normal(s) => s.to_str().is_some_and(|s| SKIP_DIRS.contains(&s)),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn repo() -> tempfile::TempDir {
        tempfile::Builder::new().prefix("sample-repo").tempdir().unwrap()
    }

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn not_a_directory_is_validation_error() {
        let err = gather_repo_context(Path::new("/nonexistent/repo")).unwrap_err();
        assert!(matches!(err, AirskillError::Validation(_)));
    }

    #[test]
    fn readme_is_truncated() {
        let dir = repo();
        write(dir.path(), "README.md", &"x".repeat(MAX_README_CHARS + 100));
        let ctx = gather_repo_context(dir.path()).unwrap();
        assert!(ctx.contains("## README"));
        assert!(ctx.contains("...(truncated)"));
    }

    #[test]
    fn first_readme_wins() {
        let dir = repo();
        write(dir.path(), "README.md", "upper readme");
        write(dir.path(), "README.rst", "rst readme");
        let ctx = gather_repo_context(dir.path()).unwrap();
        assert!(ctx.contains("upper readme"));
        assert!(!ctx.contains("rst readme"));
    }

    #[test]
    fn listing_skips_hidden_and_build_dirs() {
        let dir = repo();
        write(dir.path(), "Cargo.toml", "[package]\nname = \"demo\"");
        write(dir.path(), "node_modules/x.js", "x");
        write(dir.path(), ".github/ci.yml", "x");
        write(dir.path(), "crates/a.rs", "x");
        let ctx = gather_repo_context(dir.path()).unwrap();
        assert!(ctx.contains("Files: Cargo.toml"));
        assert!(ctx.contains("Directories: crates"));
        assert!(ctx.contains("## Manifest: Cargo.toml"));
    }

    #[test]
    fn source_sample_skips_tiny_and_vendored_files() {
        let dir = repo();
        let body = "fn main() {\n    println!(\"a real source file\");\n}\n";
        write(dir.path(), "src/main.rs", body);
        write(dir.path(), "src/tiny.rs", "//");
        write(dir.path(), "src/node_modules/dep.js", body);
        write(dir.path(), "src/image.png", body);
        let ctx = gather_repo_context(dir.path()).unwrap();
        assert!(ctx.contains("## Source: src/main.rs"));
        assert!(!ctx.contains("tiny.rs"));
        assert!(!ctx.contains("dep.js"));
        assert!(!ctx.contains("image.png"));
    }

    #[test]
    fn source_sample_is_capped() {
        let dir = repo();
        for i in 0..30 {
            write(dir.path(), &format!("lib/f{i:02}.py"), &"print('sampled line')\n".repeat(3));
        }
        let ctx = gather_repo_context(dir.path()).unwrap();
        assert_eq!(ctx.matches("## Source: ").count(), MAX_SOURCE_FILES);
    }

    #[test]
    fn docs_dir_is_sampled_in_order() {
        let dir = repo();
        for i in 0..7 {
            write(dir.path(), &format!("docs/{i}.md"), "doc");
        }
        let ctx = gather_repo_context(dir.path()).unwrap();
        assert!(ctx.contains("## docs/0.md"));
        assert!(ctx.contains("## docs/4.md"));
        assert!(!ctx.contains("## docs/5.md"));
    }

    #[test]
    fn header_names_repository() {
        let dir = repo();
        let ctx = gather_repo_context(dir.path()).unwrap();
        assert!(ctx.starts_with(&format!("# Repository: {}", repo_name(dir.path()))));
        assert!(repo_name(dir.path()).starts_with("sample-repo"));
    }
}
