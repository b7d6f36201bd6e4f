//! Folder of plain-text prompt templates

use crate::error::StoreError;
use scrivener_domain::traits::TemplateSource;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Prompt templates stored as files in a single folder
#[derive(Debug, Clone)]
pub struct PromptStore {
    folder: PathBuf,
}

impl PromptStore {
    /// Create a store rooted at `folder`
    pub fn new<P: Into<PathBuf>>(folder: P) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// Folder the templates live in
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// File name of the prompt written for a newly included question
    ///
    /// # Examples
    ///
    /// ```
    /// use scrivener_store::PromptStore;
    ///
    /// assert_eq!(
    ///     PromptStore::prompt_file_name("question_", "start_date"),
    ///     "question_start_date.txt"
    /// );
    /// ```
    pub fn prompt_file_name(prefix: &str, name_of_entity: &str) -> String {
        format!("{}{}.txt", prefix, name_of_entity)
    }

    /// Read the template stored under `name`
    pub fn load(&self, name: &str) -> Result<String, StoreError> {
        let path = self.resolve(name)?;
        if !path.is_file() {
            return Err(StoreError::TemplateNotFound(path));
        }
        debug!("Loading template {}", path.display());
        Ok(fs::read_to_string(path)?)
    }

    /// Write (or overwrite) the template stored under `name`
    pub fn save(&self, name: &str, contents: &str) -> Result<PathBuf, StoreError> {
        let path = self.resolve(name)?;
        fs::create_dir_all(&self.folder)?;
        fs::write(&path, contents)?;
        debug!("Wrote template {}", path.display());
        Ok(path)
    }

    /// Delete the template stored under `name`, if present
    pub fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.resolve(name)?;
        if path.is_file() {
            fs::remove_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Template names must be plain file names inside the folder
    fn resolve(&self, name: &str) -> Result<PathBuf, StoreError> {
        let candidate = Path::new(name);
        let mut components = candidate.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.folder.join(candidate)),
            _ => Err(StoreError::InvalidData(format!(
                "'{}' is not a plain template file name",
                name
            ))),
        }
    }
}

impl TemplateSource for PromptStore {
    type Error = StoreError;

    fn load_template(&self, name: &str) -> Result<String, Self::Error> {
        self.load(name)
    }
}
