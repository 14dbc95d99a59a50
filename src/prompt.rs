//! User input and interaction handling.
//! Strata only asks questions when a template ships default data and no
//! user data document was found; everything goes through [`Prompter`] so the
//! interactive backend can be swapped out.

use crate::error::Result;
use dialoguer::{Confirm, Input};

/// Interactive collaborator used to collect missing data.
pub trait Prompter {
    /// Asks a yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Asks for a free text value, pre-filled with `default`.
    fn input(&self, prompt: &str, default: &str) -> Result<String>;
}

/// Terminal prompter backed by `dialoguer`.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new().with_prompt(prompt).default(default).interact()?)
    }

    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        Ok(Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()?)
    }
}
