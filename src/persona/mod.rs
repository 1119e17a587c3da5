//! Persona profiles: the fixed system prompt and priming turn injected ahead
//! of every conversation.
//!
//! Persona text is configuration, not code. Two profiles ship built in
//! ("guide" answers with one full deliverable, "staged" delivers it a section
//! at a time) and a deployment can swap in its own via a YAML file, so prompt
//! revisions never touch the handler.

mod profiles;

use serde::Deserialize;
use std::path::Path;

use crate::api::Content;
use crate::config::{ConfigError, PersonaConfig};

pub use profiles::{GUIDE, STAGED};

/// A versioned persona: system prompt plus the scripted model acknowledgment.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PersonaProfile {
    pub name: String,
    pub version: String,
    pub system_prompt: String,
    pub acknowledgment: String,
}

impl PersonaProfile {
    /// The two synthetic turns that lead every upstream payload: the persona
    /// definition as a user turn, then the scripted model acknowledgment.
    pub fn conversation_prefix(&self) -> Vec<Content> {
        vec![
            Content::text("user", self.system_prompt.clone()),
            Content::text("model", self.acknowledgment.clone()),
        ]
    }

    /// Resolve the active profile from configuration.
    ///
    /// A `file` override wins over the built-in `profile` name.
    pub fn from_config(config: &PersonaConfig) -> Result<Self, ConfigError> {
        if let Some(ref path) = config.file {
            return Self::from_file(path);
        }
        builtin(&config.profile).ok_or_else(|| {
            ConfigError::Validation(format!(
                "Unknown persona profile '{}'. Built-in profiles: guide, staged",
                config.profile
            ))
        })
    }

    /// Load a profile from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let profile: PersonaProfile = serde_yaml::from_str(&content)?;
        Ok(profile)
    }
}

/// Look up a built-in profile by name
pub fn builtin(name: &str) -> Option<PersonaProfile> {
    match name {
        "guide" => Some(GUIDE.clone()),
        "staged" => Some(STAGED.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert!(builtin("guide").is_some());
        assert!(builtin("staged").is_some());
        assert!(builtin("freeform").is_none());
    }

    #[test]
    fn test_conversation_prefix_shape() {
        let profile = builtin("guide").unwrap();
        let prefix = profile.conversation_prefix();

        assert_eq!(prefix.len(), 2);
        assert_eq!(prefix[0].role.as_deref(), Some("user"));
        assert_eq!(prefix[0].parts[0].text, profile.system_prompt);
        assert_eq!(prefix[1].role.as_deref(), Some("model"));
        assert_eq!(prefix[1].parts[0].text, profile.acknowledgment);
    }

    #[test]
    fn test_from_config_builtin() {
        let config = PersonaConfig {
            profile: "staged".to_string(),
            file: None,
        };
        let profile = PersonaProfile::from_config(&config).unwrap();
        assert_eq!(profile.name, "staged");
    }

    #[test]
    fn test_from_config_unknown_profile() {
        let config = PersonaConfig {
            profile: "freeform".to_string(),
            file: None,
        };
        let err = PersonaProfile::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_from_file_override() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("persona.yaml");
        std::fs::write(
            &path,
            r#"
name: custom
version: "2026-01"
system_prompt: "You are a test persona."
acknowledgment: "Understood."
"#,
        )
        .unwrap();

        let config = PersonaConfig {
            profile: "guide".to_string(),
            file: Some(path.display().to_string()),
        };
        let profile = PersonaProfile::from_config(&config).unwrap();
        assert_eq!(profile.name, "custom");
        assert_eq!(profile.system_prompt, "You are a test persona.");
    }

    #[test]
    fn test_from_file_missing() {
        let result = PersonaProfile::from_file("/nonexistent/persona.yaml");
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound(_)));
    }
}
