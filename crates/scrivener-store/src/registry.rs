//! Question registry backed by a JSON file
//!
//! The whole mapping is the unit of persistence: every mutation rewrites the
//! file. Mutations hold the write lock across the rewrite so two concurrent
//! writers cannot lose each other's updates.

use crate::error::StoreError;
use scrivener_domain::QuestionRecord;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};

type Questions = BTreeMap<String, QuestionRecord>;

/// Registry of persisted questions, keyed by question id
#[derive(Debug)]
pub struct QuestionRegistry {
    path: PathBuf,
    questions: RwLock<Questions>,
}

impl QuestionRegistry {
    /// Load the registry from an existing JSON file
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the path does not have a `.json`
    /// extension, does not exist, or does not hold a JSON object of records.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        check_extension(path)?;
        if !path.exists() {
            return Err(StoreError::Config(format!(
                "Registry file {} not found",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let questions: Questions = serde_json::from_str(&contents).map_err(|e| {
            StoreError::Config(format!(
                "Registry file {} is malformed: {}",
                path.display(),
                e
            ))
        })?;

        info!(
            "Loaded {} questions from {}",
            questions.len(),
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            questions: RwLock::new(questions),
        })
    }

    /// Open the registry, writing an empty one first if the file is missing
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        check_extension(path)?;
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, "{}")?;
            info!("Created empty registry at {}", path.display());
        }
        Self::open(path)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a question; absence is a normal outcome
    pub fn get(&self, question_id: &str) -> Option<QuestionRecord> {
        self.read().get(question_id).cloned()
    }

    /// Whether a question id is registered
    pub fn contains(&self, question_id: &str) -> bool {
        self.read().contains_key(question_id)
    }

    /// Insert or overwrite a question, then persist the whole registry
    pub fn add(
        &self,
        question_id: impl Into<String>,
        prompt_file: impl Into<String>,
        answer_category: impl Into<String>,
        included: bool,
    ) -> Result<(), StoreError> {
        let record = QuestionRecord::new(prompt_file, answer_category).with_included(included);
        self.insert(question_id, record)
    }

    /// Insert or overwrite a prepared record, then persist the whole registry
    pub fn insert(
        &self,
        question_id: impl Into<String>,
        record: QuestionRecord,
    ) -> Result<(), StoreError> {
        let question_id = question_id.into();
        let mut questions = self.questions.write().map_err(|_| StoreError::LockPoisoned)?;

        let mut updated = questions.clone();
        updated.insert(question_id.clone(), record);
        self.persist(&updated)?;
        *questions = updated;

        info!("Added question '{}'", question_id);
        Ok(())
    }

    /// Delete a question, then persist the whole registry
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the id is absent; the registry and
    /// its file are left untouched in that case.
    pub fn remove(&self, question_id: &str) -> Result<QuestionRecord, StoreError> {
        let mut questions = self.questions.write().map_err(|_| StoreError::LockPoisoned)?;
        if !questions.contains_key(question_id) {
            return Err(StoreError::NotFound(question_id.to_string()));
        }

        let mut updated = questions.clone();
        let removed = updated
            .remove(question_id)
            .ok_or_else(|| StoreError::NotFound(question_id.to_string()))?;
        self.persist(&updated)?;
        *questions = updated;

        info!("Removed question '{}'", question_id);
        Ok(removed)
    }

    /// Snapshot of every registered question
    pub fn list_all(&self) -> BTreeMap<String, QuestionRecord> {
        self.read().clone()
    }

    /// Snapshot of the questions that batch extraction runs, in id order
    pub fn included(&self) -> Vec<(String, QuestionRecord)> {
        self.read()
            .iter()
            .filter(|(_, record)| record.included)
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect()
    }

    /// Number of registered questions
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Questions> {
        // A poisoned lock still holds the last successfully persisted map
        self.questions.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rewrite the backing file via a sibling temp file and rename
    fn persist(&self, questions: &Questions) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(questions)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!(
            "Persisted {} questions to {}",
            questions.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn check_extension(path: &Path) -> Result<(), StoreError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(())
    } else {
        Err(StoreError::Config(format!(
            "Registry file {} is not a JSON file",
            path.display()
        )))
    }
}
