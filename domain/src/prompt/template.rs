//! Instruction templates with named slots

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while filling a template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template '{template}' is missing a value for slot '{slot}'")]
    MissingSlot {
        template: &'static str,
        slot: &'static str,
    },

    #[error("template '{template}' has no slot named '{slot}'")]
    UnknownSlot {
        template: &'static str,
        slot: String,
    },
}

/// A static instruction with `{slot}` placeholders
///
/// # Example
///
/// ```
/// use spotlight_domain::{InstructionTemplate, SlotValues};
///
/// const GREETING: InstructionTemplate =
///     InstructionTemplate::new("greeting", "Say hello to {name}.", &["name"]);
///
/// let text = GREETING.render(&SlotValues::new().with("name", "the audience")).unwrap();
/// assert_eq!(text, "Say hello to the audience.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionTemplate {
    name: &'static str,
    text: &'static str,
    slots: &'static [&'static str],
}

impl InstructionTemplate {
    pub const fn new(name: &'static str, text: &'static str, slots: &'static [&'static str]) -> Self {
        Self { name, text, slots }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn slots(&self) -> &'static [&'static str] {
        self.slots
    }

    /// Fill every declared slot.
    ///
    /// Every declared slot must have a value and every value must belong to
    /// a declared slot.
    pub fn render(&self, values: &SlotValues) -> Result<String, TemplateError> {
        if let Some(unknown) = values.keys().find(|key| !self.slots.contains(&key.as_str())) {
            return Err(TemplateError::UnknownSlot {
                template: self.name,
                slot: unknown.clone(),
            });
        }

        for &slot in self.slots {
            if values.get(slot).is_none() {
                return Err(TemplateError::MissingSlot {
                    template: self.name,
                    slot,
                });
            }
        }

        // Single pass over the template; inserted values are never rescanned.
        let mut rendered = String::with_capacity(self.text.len());
        let mut rest = self.text;
        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let value = after
                .find('}')
                .and_then(|close| Some((close, values.get(&after[..close])?)));
            match value {
                Some((close, value)) => {
                    rendered.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    rendered.push('{');
                    rest = after;
                }
            }
        }
        rendered.push_str(rest);
        Ok(rendered)
    }
}

/// Named values for a template's slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotValues(BTreeMap<String, String>);

impl SlotValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(slot.into(), value.into());
        self
    }

    pub fn get(&self, slot: &str) -> Option<&str> {
        self.0.get(slot).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Sampling temperature for one generation call, kept within `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Creativity(f32);

impl Creativity {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 1.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for Creativity {
    fn default() -> Self {
        Self(0.7)
    }
}
