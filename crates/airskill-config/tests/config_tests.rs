#[cfg(test)]
mod tests {
    use airskill_config::ConfigLoader;
    use airskill_config::schema::*;
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    // ── Default tests ──────────────────────────────────────────

    #[test]
    fn test_airskill_config_defaults() {
        let config = AirskillConfig::default();
        assert_eq!(config.site.base_url, "https://skill.ruska.cn/skills");
        assert_eq!(config.site.cname.as_deref(), Some("skill.ruska.cn"));
        assert_eq!(config.paths.skills_dir, PathBuf::from("skills"));
        assert_eq!(config.paths.output, PathBuf::from("index.html"));
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.model, "gemini-2.0-flash");
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "pretty");
    }

    // ── TOML tests ─────────────────────────────────────────────

    #[test]
    fn test_config_toml_roundtrip() {
        let config = AirskillConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let restored: AirskillConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(restored.site.base_url, config.site.base_url);
        assert_eq!(restored.llm.model, config.llm.model);
        assert_eq!(restored.paths.template, config.paths.template);
    }

    #[test]
    fn test_partial_toml_applies_defaults() {
        let toml_str = r#"
[llm]
provider = "anthropic"
model = "claude-sonnet-4-20250514"
"#;
        let config: AirskillConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.site.base_url, "https://skill.ruska.cn/skills");
        assert_eq!(config.paths.skills_dir, PathBuf::from("skills"));
    }

    // ── Path resolution ────────────────────────────────────────

    #[test]
    fn test_paths_resolve_against_root() {
        let mut config = AirskillConfig::default();
        config.root = PathBuf::from("/srv/site");
        assert_eq!(config.skills_dir(), PathBuf::from("/srv/site/skills"));
        assert_eq!(config.output_path(), PathBuf::from("/srv/site/index.html"));
        assert_eq!(config.cname_path(), PathBuf::from("/srv/site/CNAME"));

        config.paths.output = PathBuf::from("/var/www/index.html");
        assert_eq!(config.output_path(), PathBuf::from("/var/www/index.html"));
    }

    #[test]
    fn test_redacted_masks_key() {
        let mut config = AirskillConfig::default();
        config.llm.api_key = Some("secret".into());
        assert_eq!(config.redacted().llm.api_key.as_deref(), Some("***"));
    }

    // ── Env overrides ──────────────────────────────────────────

    #[test]
    fn test_api_key_falls_back_to_provider_env() {
        let config = ConfigLoader::apply_env_overrides(
            AirskillConfig::default(),
            env(&[("GEMINI_API_KEY", " g-key "), ("OPENAI_API_KEY", "o-key")]),
        );
        assert_eq!(config.llm.api_key.as_deref(), Some("g-key"));
    }

    #[test]
    fn test_file_key_wins_over_env() {
        let mut config = AirskillConfig::default();
        config.llm.api_key = Some("from-file".into());
        let config = ConfigLoader::apply_env_overrides(config, env(&[("GEMINI_API_KEY", "env")]));
        assert_eq!(config.llm.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_provider_override_selects_key_var() {
        let config = ConfigLoader::apply_env_overrides(
            AirskillConfig::default(),
            env(&[
                ("AIRSKILL_LLM_PROVIDER", "OpenAI"),
                ("GEMINI_API_KEY", "g-key"),
                ("OPENAI_API_KEY", "o-key"),
            ]),
        );
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.api_key.as_deref(), Some("o-key"));
    }

    #[test]
    fn test_blank_env_key_ignored() {
        let config =
            ConfigLoader::apply_env_overrides(AirskillConfig::default(), env(&[("GEMINI_API_KEY", "  ")]));
        assert!(config.llm.credential().is_none());
    }

    // ── Loader ─────────────────────────────────────────────────

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("airskill.toml");
        let loader = ConfigLoader::load_with_env(&path, env(&[])).unwrap();
        let config = loader.get();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.skills_dir(), dir.path().join("skills"));
        assert_eq!(loader.path(), path.as_path());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("airskill.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "[site]\nbase_url = \"https://docs.example.com/skills\"\n\n[paths]\nskills_dir = \"content\""
        )
        .unwrap();

        let config = ConfigLoader::load_with_env(&path, env(&[])).unwrap().get();
        assert_eq!(config.site.base_url, "https://docs.example.com/skills");
        assert_eq!(config.skills_dir(), dir.path().join("content"));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("airskill.toml");
        std::fs::write(&path, "[site\nbase_url = ").unwrap();
        let err = ConfigLoader::load_with_env(&path, env(&[])).err().unwrap();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_load_rejects_invalid_values_as_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("airskill.toml");
        std::fs::write(&path, "[logging]\nformat = \"compact\"\n").unwrap();
        let err = ConfigLoader::load_with_env(&path, env(&[])).err().unwrap();
        assert!(
            matches!(err, airskill_core::AirskillError::Config(ref m) if m.contains("logging.format"))
        );
    }

    #[test]
    fn test_resolve_explicit_path() {
        let p = ConfigLoader::resolve_path(Some(Path::new("/etc/airskill.toml")));
        assert_eq!(p, PathBuf::from("/etc/airskill.toml"));
    }

    // ── Validation ─────────────────────────────────────────────

    #[test]
    fn test_validate_default_is_clean() {
        let warnings = AirskillConfig::default().validate().unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let mut config = AirskillConfig::default();
        config.site.base_url = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.contains("site.base_url"));
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let mut config = AirskillConfig::default();
        config.site.base_url = "ftp://example.com/skills".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_warns_unknown_provider() {
        let mut config = AirskillConfig::default();
        config.llm.provider = "cohere".into();
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.field == "llm.provider"));
    }

    #[test]
    fn test_validate_warns_mock_provider() {
        let mut config = AirskillConfig::default();
        config.llm.provider = "mock".into();
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.field == "llm.provider"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = AirskillConfig::default();
        config.logging.format = "compact".into();
        let err = config.validate().unwrap_err();
        assert!(err.contains("logging.format"));

        config.logging.format = "json".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let mut config = AirskillConfig::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }
}
