//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application settings
//! with [`FileConfig::to_settings`].

mod creativity;
mod game;
mod provider;
mod server;

pub use creativity::FileCreativityConfig;
pub use game::{FileContestantConfig, FileGameConfig};
pub use provider::FileProviderConfig;
pub use server::{FileLoggingConfig, FileServerConfig};

use serde::{Deserialize, Serialize};
use spotlight_application::GameSettings;
use spotlight_domain::{Creativity, RosterError};
use std::collections::HashSet;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot work at all.
    Error,
    /// The configuration works but may not behave as expected.
    Warning,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted path of the offending key, e.g. `game.max_rounds`
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Rounds and contestants
    pub game: FileGameConfig,
    /// Creativity per kind of generation call
    pub creativity: FileCreativityConfig,
    /// Text generation provider
    pub provider: FileProviderConfig,
    /// HTTP transport
    pub server: FileServerConfig,
    /// Game transcript
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.game.max_rounds == 0 {
            issues.push(ConfigIssue::error(
                "game.max_rounds",
                "game.max_rounds must be at least 1",
            ));
        }

        // Roster shape
        let humans = self.game.contestants.iter().filter(|c| c.human).count();
        match humans {
            0 => issues.push(ConfigIssue::error(
                "game.contestants",
                "no contestant is marked human = true",
            )),
            1 => {}
            n => issues.push(ConfigIssue::error(
                "game.contestants",
                format!("{} contestants are marked human = true, expected exactly one", n),
            )),
        }
        if self.game.contestants.len() == humans {
            issues.push(ConfigIssue::error(
                "game.contestants",
                "at least one AI contestant is required",
            ));
        }
        let mut seen = HashSet::new();
        for contestant in &self.game.contestants {
            if contestant.id.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    "game.contestants",
                    "contestant id cannot be empty",
                ));
            } else if !seen.insert(contestant.id.as_str()) {
                issues.push(ConfigIssue::error(
                    "game.contestants",
                    format!("duplicate contestant id '{}'", contestant.id),
                ));
            }
            if !contestant.human
                && contestant
                    .personality
                    .as_deref()
                    .is_none_or(|p| p.trim().is_empty())
            {
                issues.push(ConfigIssue::warning(
                    "game.contestants",
                    format!("AI contestant '{}' has no personality", contestant.id),
                ));
            }
        }

        for (name, value) in self.creativity.entries() {
            if !(Creativity::MIN..=Creativity::MAX).contains(&value) {
                issues.push(ConfigIssue::warning(
                    format!("creativity.{}", name),
                    format!(
                        "creativity.{} = {} is outside [0, 1] and will be clamped",
                        name, value
                    ),
                ));
            }
        }

        if self.provider.timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                "provider.timeout_seconds",
                "provider.timeout_seconds cannot be 0",
            ));
        }
        if self.provider.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                "provider.model",
                "provider.model cannot be empty",
            ));
        }

        issues
    }

    /// Build the settings every game session starts from
    pub fn to_settings(&self) -> Result<GameSettings, RosterError> {
        Ok(GameSettings::default()
            .with_max_rounds(self.game.max_rounds)
            .with_roster(self.game.to_roster()?)
            .with_creativity(self.creativity.to_profile()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[game]
max_rounds = 5

[[game.contestants]]
id = "ace"
personality = "Smooth talker"

[[game.contestants]]
id = "me"
human = true

[creativity]
question = 1.0

[provider]
base_url = "http://localhost:11434"
model = "llama3"
max_retries = 0

[server]
port = 9000

[logging]
event_log = "logs/show.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.game.max_rounds, 5);
        assert_eq!(config.game.contestants.len(), 2);
        assert_eq!(config.creativity.question, 1.0);
        assert_eq!(config.provider.model, "llama3");
        assert_eq!(config.provider.max_retries, 0);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.logging.event_log.is_some());
        assert!(config.validate().is_empty());

        let settings = config.to_settings().unwrap();
        assert_eq!(settings.max_rounds, 5);
        assert_eq!(settings.roster.human().id.as_str(), "me");
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.to_settings().unwrap(), GameSettings::default());
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let toml_str = r#"
[game]
max_rounds = 0

[[game.contestants]]
id = "twin"
human = true

[[game.contestants]]
id = "twin"
human = true

[creativity]
rating = 1.5

[provider]
timeout_seconds = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();

        assert!(fields.contains(&"game.max_rounds"));
        assert!(fields.contains(&"creativity.rating"));
        assert!(fields.contains(&"provider.timeout_seconds"));
        assert!(issues.iter().any(|i| i.message.contains("expected exactly one")));
        assert!(issues.iter().any(|i| i.message.contains("AI contestant is required")));
        assert!(issues.iter().any(|i| i.message.contains("duplicate")));
        assert!(
            issues
                .iter()
                .filter(|i| i.field == "creativity.rating")
                .all(|i| i.severity == Severity::Warning)
        );
    }
}
