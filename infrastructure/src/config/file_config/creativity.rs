//! Creativity configuration from TOML (`[creativity]` section)

use serde::{Deserialize, Serialize};
use spotlight_application::CreativityProfile;
use spotlight_domain::Creativity;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCreativityConfig {
    /// Introductions and the winner announcement
    pub default: f32,
    pub question: f32,
    pub answer: f32,
    pub rating: f32,
}

impl Default for FileCreativityConfig {
    fn default() -> Self {
        let profile = CreativityProfile::default();
        Self {
            default: profile.default.value(),
            question: profile.question.value(),
            answer: profile.answer.value(),
            rating: profile.rating.value(),
        }
    }
}

impl FileCreativityConfig {
    /// Named values, for validation messages
    pub fn entries(&self) -> [(&'static str, f32); 4] {
        [
            ("default", self.default),
            ("question", self.question),
            ("answer", self.answer),
            ("rating", self.rating),
        ]
    }

    pub fn to_profile(&self) -> CreativityProfile {
        CreativityProfile {
            default: Creativity::new(self.default),
            question: Creativity::new(self.question),
            answer: Creativity::new(self.answer),
            rating: Creativity::new(self.rating),
        }
    }
}
