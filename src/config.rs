use anyhow::{Context, Result};
use chat_format::{FormatError, Intent, RenderOptions, TextVariant};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "chatfmt.json";

/// Top-level chatfmt.json schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatterConfig {
    #[serde(default = "default_variant")]
    pub variant: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_preview_length")]
    pub preview_length: usize,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default = "default_intent")]
    pub intent: String,

    #[serde(default = "default_max_response_length")]
    pub max_response_length: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            color: default_color(),
            preview_length: default_preview_length(),
            extensions: default_extensions(),
            out_dir: default_out_dir(),
            intent: default_intent(),
            max_response_length: default_max_response_length(),
        }
    }
}

fn default_variant() -> String {
    "body1".to_string()
}
fn default_color() -> String {
    "text.primary".to_string()
}
fn default_preview_length() -> usize {
    chat_format::DEFAULT_PREVIEW_LENGTH
}
fn default_extensions() -> Vec<String> {
    vec!["txt".to_string(), "md".to_string()]
}
fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}
fn default_intent() -> String {
    "general".to_string()
}
fn default_max_response_length() -> usize {
    800
}

impl FormatterConfig {
    /// Render options from the config, with optional CLI overrides.
    pub fn render_options(
        &self,
        variant: Option<&str>,
        color: Option<&str>,
    ) -> Result<RenderOptions, FormatError> {
        let variant: TextVariant = variant.unwrap_or(&self.variant).parse()?;
        Ok(RenderOptions::new(variant, color.unwrap_or(&self.color)))
    }

    pub fn intent(&self, override_intent: Option<&str>) -> Intent {
        override_intent
            .unwrap_or(&self.intent)
            .parse()
            .unwrap_or_default()
    }

    /// Whether `path` has one of the configured transcript extensions.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
    }
}

/// Load config from `explicit`, or from chatfmt.json in `dir`.
///
/// A missing default file yields defaults; a missing explicit file is an
/// error.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<FormatterConfig> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = dir.join(CONFIG_FILE);
            if !path.exists() {
                log::debug!("no {} in {}, using defaults", CONFIG_FILE, dir.display());
                return Ok(FormatterConfig::default());
            }
            path
        }
    };

    let raw = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: FormatterConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    log::debug!("loaded config from {}", config_path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "variant": "caption",
            "color": "text.secondary",
            "previewLength": 300,
            "extensions": ["log"],
            "outDir": "site",
            "intent": "technical",
            "maxResponseLength": 500
        }"#;

        let config: FormatterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.variant, "caption");
        assert_eq!(config.preview_length, 300);
        assert_eq!(config.extensions, vec!["log"]);
        assert_eq!(config.out_dir, PathBuf::from("site"));
        assert_eq!(config.intent(None), Intent::Technical);
        assert_eq!(config.max_response_length, 500);

        let options = config.render_options(None, None).unwrap();
        assert_eq!(options.variant, TextVariant::Caption);
        assert_eq!(options.color, "text.secondary");
    }

    #[test]
    fn test_defaults() {
        let config: FormatterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FormatterConfig::default());
        assert_eq!(config.preview_length, 1200);
        assert_eq!(config.intent(None), Intent::General);
    }

    #[test]
    fn test_overrides_win() {
        let config = FormatterConfig::default();
        let options = config.render_options(Some("body2"), Some("red")).unwrap();
        assert_eq!(options.variant, TextVariant::Body2);
        assert_eq!(options.color, "red");
        assert_eq!(config.intent(Some("code")), Intent::Code);
    }

    #[test]
    fn test_unknown_variant_is_error() {
        let config = FormatterConfig {
            variant: "headline".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.render_options(None, None),
            Err(FormatError::UnknownVariant(_))
        ));
    }

    #[test]
    fn test_extension_match() {
        let config = FormatterConfig::default();
        assert!(config.matches_extension(Path::new("a/answer.TXT")));
        assert!(config.matches_extension(Path::new("notes.md")));
        assert!(!config.matches_extension(Path::new("page.html")));
        assert!(!config.matches_extension(Path::new("README")));
    }

    #[test]
    fn test_missing_default_file_gives_defaults() {
        let dir = std::env::temp_dir().join(format!("chatfmt-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = load_config(None, &dir).unwrap();
        assert_eq!(config, FormatterConfig::default());
        assert!(load_config(Some(dir.join("nope.json").as_path()), &dir).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
