//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Question registry file (must end in `.json`)
    pub registry_file: PathBuf,

    /// Folder holding the prompt templates
    pub prompt_folder: PathBuf,

    /// Meta template used to author new question prompts
    pub template_file: String,

    /// Prefix of prompt files written for newly added questions
    pub prompt_file_prefix: String,

    /// Maximum contract length (characters)
    pub max_contract_length: usize,

    /// Normalised Levenshtein distance under which two strings match
    pub string_distance_threshold: f64,

    /// Normalise whitespace before prompting
    pub preprocess: bool,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.registry_file.extension().and_then(|e| e.to_str()) != Some("json") {
            return Err(format!(
                "registry_file {} is not a JSON file",
                self.registry_file.display()
            ));
        }
        if self.template_file.trim().is_empty() {
            return Err("template_file must not be empty".to_string());
        }
        if self.max_contract_length == 0 {
            return Err("max_contract_length must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.string_distance_threshold) {
            return Err(format!(
                "string_distance_threshold {} out of range [0.0, 1.0]",
                self.string_distance_threshold
            ));
        }
        Ok(())
    }

    /// Resolve relative paths against `base`
    pub fn rooted_at(mut self, base: &Path) -> Self {
        if self.registry_file.is_relative() {
            self.registry_file = base.join(&self.registry_file);
        }
        if self.prompt_folder.is_relative() {
            self.prompt_folder = base.join(&self.prompt_folder);
        }
        self
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&contents)
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            registry_file: PathBuf::from("question_id_list.json"),
            prompt_folder: PathBuf::from("prompts"),
            template_file: "template_prompt.txt".to_string(),
            prompt_file_prefix: "question_".to_string(),
            max_contract_length: 100_000,
            string_distance_threshold: 0.1,
            preprocess: true,
        }
    }
}
