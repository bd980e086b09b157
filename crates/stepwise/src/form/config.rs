//! Form configuration.
//!
//! Presentation and reporting settings for a form, loadable from TOML:
//!
//! ```toml
//! form_id = "course-enrollment"
//! variant = "compact"
//! show_progress = true
//! user_email = "ada@example.com"
//! shrink_policy = "clamp_to_last"
//! ```
//!
//! Every key is optional. Unknown keys are rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stepwise_core::logging::targets;
use stepwise_core::{Error, Result};

use super::engine::ShrinkPolicy;
use super::indicator::IndicatorVariant;

/// Settings for one form instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    /// Identifier attached to every analytics event.
    pub form_id: String,
    /// Step indicator layout.
    pub variant: IndicatorVariant,
    /// Whether the progress bar is shown.
    pub show_progress: bool,
    /// Email attached to the completion event.
    pub user_email: Option<String>,
    /// Behavior when the visible steps shrink past the current one.
    pub shrink_policy: ShrinkPolicy,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_id: "form".to_string(),
            variant: IndicatorVariant::Default,
            show_progress: true,
            user_email: None,
            shrink_policy: ShrinkPolicy::ClampToLast,
        }
    }
}

impl FormConfig {
    /// Create a configuration for `form_id` with default settings.
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            ..Self::default()
        }
    }

    /// Set the indicator variant using builder pattern.
    pub fn with_variant(mut self, variant: IndicatorVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the completion email using builder pattern.
    pub fn with_user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = Some(email.into());
        self
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(Error::config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        tracing::debug!(target: targets::FORM, path = %path.display(), "loading form configuration");
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FormConfig::from_toml_str("").unwrap();
        assert_eq!(config, FormConfig::default());
        assert!(config.show_progress);
        assert_eq!(config.shrink_policy, ShrinkPolicy::ClampToLast);
    }

    #[test]
    fn test_parse_all_keys() {
        let config = FormConfig::from_toml_str(
            r#"
            form_id = "course-enrollment"
            variant = "vertical"
            show_progress = false
            user_email = "ada@example.com"
            shrink_policy = "reset_to_start"
            "#,
        )
        .unwrap();

        assert_eq!(config.form_id, "course-enrollment");
        assert_eq!(config.variant, IndicatorVariant::Vertical);
        assert!(!config.show_progress);
        assert_eq!(config.user_email.as_deref(), Some("ada@example.com"));
        assert_eq!(config.shrink_policy, ShrinkPolicy::ResetToStart);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = FormConfig::from_toml_str("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "form_id = \"signup\"\nvariant = \"compact\"").unwrap();

        let config = FormConfig::from_file(file.path()).unwrap();
        assert_eq!(config, FormConfig::new("signup").with_variant(IndicatorVariant::Compact));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FormConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
