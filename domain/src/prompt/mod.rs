//! Prompt domain
//!
//! Instruction templates with named slots, the creativity setting passed
//! along with each generation request, and the show's own templates.

pub mod show;
mod template;

pub use template::{Creativity, InstructionTemplate, SlotValues, TemplateError};
