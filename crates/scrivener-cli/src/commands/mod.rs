//! Command implementations.

pub mod add;
pub mod ask;
pub mod list;
pub mod process;
pub mod remove;

pub use self::add::execute_add_question;
pub use self::ask::execute_ask;
pub use self::list::execute_list_questions;
pub use self::process::execute_process;
pub use self::remove::execute_remove_question;

use crate::config::Config;
use crate::error::Result;
use scrivener_extractor::{ExtractionContext, Extractor, SchemaRegistry};
use scrivener_llm::ConfiguredProvider;
use scrivener_reader::FileReader;
use scrivener_store::{PromptStore, QuestionRegistry};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Everything a command needs: registry, prompts, schemas, model and reader.
pub struct Session {
    /// Persisted questions
    pub registry: QuestionRegistry,
    /// Prompt template folder
    pub prompts: PromptStore,
    /// Answer schemas
    pub schemas: SchemaRegistry,
    /// Extraction pipeline
    pub extractor: Extractor<ConfiguredProvider>,
    /// Contract reader
    pub reader: FileReader,
}

impl Session {
    /// Open the configured registry and build the completion provider.
    ///
    /// The registry file is created empty if it does not exist yet.
    pub fn open(config: &Config) -> Result<Self> {
        let provider = config.llm.build()?;
        Self::with_provider(config, provider)
    }

    /// Like [`Session::open`] with an already built provider.
    pub fn with_provider(config: &Config, provider: ConfiguredProvider) -> Result<Self> {
        let registry = QuestionRegistry::open_or_create(&config.extractor.registry_file)?;
        debug!(
            "Opened registry {} with {} questions",
            registry.path().display(),
            registry.len()
        );
        Ok(Self {
            registry,
            prompts: PromptStore::new(&config.extractor.prompt_folder),
            schemas: SchemaRegistry::default(),
            extractor: Extractor::new(provider, config.extractor.clone()),
            reader: FileReader::new(),
        })
    }

    /// Borrowed view used by the extractor.
    pub fn context(&self) -> ExtractionContext<'_, PromptStore> {
        ExtractionContext::new(&self.registry, &self.schemas, &self.prompts)
    }

    /// Read and preprocess a contract.
    pub async fn read_contract(&self, locator: &str) -> Result<String> {
        let raw = self.reader.read(locator).await?;
        Ok(self.extractor.prepare_contract(&raw))
    }
}

/// Ask a yes/no question on stdout and read the reply from `input`.
pub fn confirm(message: &str, input: &mut impl BufRead) -> Result<bool> {
    print!("{} [y/N] ", message);
    io::stdout().flush()?;

    let mut response = String::new();
    input.read_line(&mut response)?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_confirm() {
        assert!(confirm("Continue?", &mut Cursor::new("y\n")).unwrap());
        assert!(confirm("Continue?", &mut Cursor::new("Y")).unwrap());
        assert!(!confirm("Continue?", &mut Cursor::new("\n")).unwrap());
        assert!(!confirm("Continue?", &mut Cursor::new("yes please")).unwrap());
    }
}
