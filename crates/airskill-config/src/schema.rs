use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration, maps to `airskill.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AirskillConfig {
    pub site: SiteConfig,
    pub paths: PathsConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
    /// Directory relative paths are resolved against (the config file's
    /// directory, or the working directory when no file exists).
    #[serde(skip)]
    pub root: PathBuf,
}

impl Default for AirskillConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            paths: PathsConfig::default(),
            llm: LlmConfig::default(),
            logging: LoggingConfig::default(),
            root: PathBuf::from("."),
        }
    }
}

// ── Site ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Published address of the skills root; every Direct Link starts with it.
    pub base_url: String,
    /// Custom domain written to `CNAME` next to the output page. `None` skips it.
    pub cname: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://skill.ruska.cn/skills".into(),
            cname: Some("skill.ruska.cn".into()),
        }
    }
}

// ── Paths ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub skills_dir: PathBuf,
    /// Manifest template containing the `{{SKILL_LIST}}` token.
    pub template: PathBuf,
    /// Published page.
    pub output: PathBuf,
    /// Where `discover` writes its markdown and CSV reports.
    pub report_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            skills_dir: PathBuf::from("skills"),
            template: PathBuf::from("templates/manifest_template.txt"),
            output: PathBuf::from("index.html"),
            report_dir: PathBuf::from("tests/output"),
        }
    }
}

// ── LLM ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// "gemini", "anthropic", or "openai".
    pub provider: String,
    pub model: String,
    /// API key. When unset, filled from the provider's env var.
    pub api_key: Option<String>,
    /// Override the provider's API endpoint.
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".into(),
            model: "gemini-2.0-flash".into(),
            api_key: None,
            base_url: None,
            max_tokens: 4096,
            temperature: 0.4,
        }
    }
}

impl LlmConfig {
    /// Environment variable the API key falls back to for this provider.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self.provider.as_str() {
            "gemini" => Some("GEMINI_API_KEY"),
            "anthropic" => Some("ANTHROPIC_API_KEY"),
            "openai" => Some("OPENAI_API_KEY"),
            _ => None,
        }
    }

    /// The configured key, ignoring blank values.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty" or "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Resolved paths ─────────────────────────────────────────────

impl AirskillConfig {
    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }

    pub fn skills_dir(&self) -> PathBuf {
        self.resolve(&self.paths.skills_dir)
    }

    pub fn template_path(&self) -> PathBuf {
        self.resolve(&self.paths.template)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.paths.output)
    }

    pub fn report_dir(&self) -> PathBuf {
        self.resolve(&self.paths.report_dir)
    }

    /// `CNAME` lives next to the published page.
    pub fn cname_path(&self) -> PathBuf {
        self.output_path()
            .parent()
            .map(|p| p.join("CNAME"))
            .unwrap_or_else(|| PathBuf::from("CNAME"))
    }

    /// Copy safe to print: the API key is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.llm.api_key.is_some() {
            copy.llm.api_key = Some("***".into());
        }
        copy
    }
}

// ── Validation ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let icon = match self.severity {
            WarningSeverity::Error => "❌",
            WarningSeverity::Warning => "⚠️ ",
            WarningSeverity::Info => "💡",
        };
        write!(f, "{} {}: {}", icon, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {}", h)?;
        }
        Ok(())
    }
}

impl AirskillConfig {
    /// Validate the config and return a list of warnings.
    /// Returns `Err` with all messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── Base URL ───
        let base = self.site.base_url.trim();
        if base.is_empty() {
            warnings.push(ConfigWarning {
                field: "site.base_url".into(),
                message: "base URL is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 'https://skill.ruska.cn/skills'".into()),
            });
        } else if !(base.starts_with("https://") || base.starts_with("http://")) {
            warnings.push(ConfigWarning {
                field: "site.base_url".into(),
                message: format!("base URL '{}' is not an http(s) address", base),
                severity: WarningSeverity::Error,
                hint: Some("Direct Links must be fetchable by agents".into()),
            });
        } else if base.starts_with("http://") {
            warnings.push(ConfigWarning {
                field: "site.base_url".into(),
                message: "base URL uses plain http".into(),
                severity: WarningSeverity::Info,
                hint: None,
            });
        }

        // ── LLM provider ───
        let valid_providers = ["gemini", "anthropic", "openai"];
        if !valid_providers.contains(&self.llm.provider.as_str()) {
            warnings.push(ConfigWarning {
                field: "llm.provider".into(),
                message: format!("unknown provider '{}'", self.llm.provider),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_providers.join(", "))),
            });
        }

        if self.llm.model.trim().is_empty() {
            warnings.push(ConfigWarning {
                field: "llm.model".into(),
                message: "model is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 'gemini-2.0-flash'".into()),
            });
        }

        if self.llm.temperature < 0.0 || self.llm.temperature > 2.0 {
            warnings.push(ConfigWarning {
                field: "llm.temperature".into(),
                message: format!("temperature {} is out of range", self.llm.temperature),
                severity: WarningSeverity::Error,
                hint: Some("Temperature must be between 0.0 and 2.0".into()),
            });
        }

        if self.llm.max_tokens == 0 {
            warnings.push(ConfigWarning {
                field: "llm.max_tokens".into(),
                message: "max_tokens is 0, so the provider would produce no output".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 4096".into()),
            });
        }

        // ── Logging ───
        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Error,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_levels.join(", "))),
            });
        }

        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}
