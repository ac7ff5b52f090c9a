//! User interaction: directory selection and acknowledgment
//!
//! The pipeline only talks to the [`Prompt`] trait. The native implementation
//! opens an `rfd` folder dialog; [`PresetPrompt`] answers from a fixed table
//! and is what tests and scripted runs use.

use crate::error::{BouncerError, Result};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::{debug, info};

/// Directory labels the pipeline asks for
pub const SHOWCASE_LABEL: &str = "Showcase";
pub const ALP_LABEL: &str = "ALP";
pub const STEMS_LABEL: &str = "Stems";

/// Blocking user interaction backend
pub trait Prompt {
    /// Ask the user to pick a directory
    ///
    /// Cancelling yields [`BouncerError::SelectionCancelled`].
    fn select_directory(&self, label: &str) -> Result<PathBuf>;

    /// Show a message and wait until the user acknowledges it
    fn acknowledge(&self, message: &str);
}

/// Native folder dialog plus a console "Press Enter" acknowledgment
pub struct DialogPrompt {
    /// Wait for Enter on acknowledgments (off for scripted runs)
    pause: bool,
}

impl DialogPrompt {
    pub fn new(pause: bool) -> Self {
        Self { pause }
    }
}

impl Default for DialogPrompt {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Prompt for DialogPrompt {
    fn select_directory(&self, label: &str) -> Result<PathBuf> {
        println!(
            "Please select the {} Directory using the file explorer popup",
            label
        );
        let selected = rfd::FileDialog::new()
            .set_title(format!("Select the {} Directory", label))
            .pick_folder();

        match selected {
            Some(dir) => {
                info!("Selected {} directory: {}", label, dir.display());
                Ok(dir)
            }
            None => Err(BouncerError::SelectionCancelled {
                label: label.to_string(),
            }),
        }
    }

    fn acknowledge(&self, message: &str) {
        println!("{}", message);
        if self.pause {
            let mut line = String::new();
            // Nothing to do if stdin is closed; carry on exiting
            let _ = std::io::stdin().lock().read_line(&mut line);
        }
    }
}

/// Prompt that answers directory requests from a preset table
///
/// Labels without an answer behave like a cancelled dialog.
#[derive(Debug, Default)]
pub struct PresetPrompt {
    answers: HashMap<String, PathBuf>,
    acknowledged: std::cell::RefCell<Vec<String>>,
}

impl PresetPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests for `label` with `dir`
    pub fn with_answer(mut self, label: &str, dir: impl Into<PathBuf>) -> Self {
        self.answers.insert(label.to_string(), dir.into());
        self
    }

    /// Messages acknowledged so far
    pub fn acknowledged(&self) -> Vec<String> {
        self.acknowledged.borrow().clone()
    }
}

impl Prompt for PresetPrompt {
    fn select_directory(&self, label: &str) -> Result<PathBuf> {
        debug!("Preset answer requested for {} directory", label);
        self.answers
            .get(label)
            .cloned()
            .ok_or_else(|| BouncerError::SelectionCancelled {
                label: label.to_string(),
            })
    }

    fn acknowledge(&self, message: &str) {
        self.acknowledged.borrow_mut().push(message.to_string());
    }
}
