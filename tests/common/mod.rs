#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use strata::error::{Error, Result};
use strata::prompt::Prompter;

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write<P: AsRef<Path>>(root: P, relative: &str, content: &str) {
    let path = root.as_ref().join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn read<P: AsRef<Path>>(root: P, relative: &str) -> String {
    fs::read_to_string(root.as_ref().join(relative)).unwrap()
}

/// Prompter answering from a fixed script and recording every question.
#[derive(Default)]
pub struct ScriptedPrompter {
    inputs: RefCell<VecDeque<String>>,
    confirms: RefCell<VecDeque<bool>>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(inputs: &[&str], confirms: &[bool]) -> Self {
        Self {
            inputs: RefCell::new(inputs.iter().map(|s| s.to_string()).collect()),
            confirms: RefCell::new(confirms.iter().copied().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// A prompter with nothing scripted: inputs take their default, confirms fail.
    pub fn silent() -> Self {
        Self::default()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        self.asked.borrow_mut().push(prompt.to_string());
        self.confirms
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::PromptError(format!("unexpected question: {prompt}")))
    }

    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        self.asked.borrow_mut().push(prompt.to_string());
        Ok(self.inputs.borrow_mut().pop_front().unwrap_or_else(|| default.to_string()))
    }
}
