//! Game configuration from TOML (`[game]` section)

use serde::{Deserialize, Serialize};
use spotlight_domain::{Contestant, Roster, RosterError};

/// One `[[game.contestants]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileContestantConfig {
    pub id: String,
    /// Played by the person at the keyboard
    #[serde(default)]
    pub human: bool,
    /// Ignored for the human contestant
    #[serde(default)]
    pub personality: Option<String>,
}

impl FileContestantConfig {
    fn to_contestant(&self) -> Contestant {
        if self.human {
            Contestant::human(self.id.as_str())
        } else {
            Contestant::ai(
                self.id.as_str(),
                self.personality.clone().unwrap_or_default(),
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGameConfig {
    pub max_rounds: u32,
    /// Contestants in roster order; the order decides ties
    pub contestants: Vec<FileContestantConfig>,
}

impl Default for FileGameConfig {
    fn default() -> Self {
        let contestants = Roster::default()
            .contestants()
            .iter()
            .map(|c| FileContestantConfig {
                id: c.id.to_string(),
                human: c.is_human(),
                personality: (!c.is_human()).then(|| c.personality().to_string()),
            })
            .collect();

        Self {
            max_rounds: 3,
            contestants,
        }
    }
}

impl FileGameConfig {
    pub fn to_roster(&self) -> Result<Roster, RosterError> {
        Roster::new(
            self.contestants
                .iter()
                .map(FileContestantConfig::to_contestant)
                .collect(),
        )
    }
}
