//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use scrivener_domain::{Answer, QuestionRecord};
use scrivener_extractor::EvaluationReport;
use std::collections::BTreeMap;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format answers keyed by question id.
    pub fn format_answers(&self, answers: &BTreeMap<String, Answer>) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(answers)?),
            OutputFormat::Quiet => Ok(answers
                .iter()
                .map(|(id, answer)| format!("{}\t{}", id, answer))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if answers.is_empty() {
                    return Ok(self.colorize("No questions answered.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Question", "Answer"]);
                for (id, answer) in answers {
                    let value = if answer.is_not_available() {
                        self.colorize(&answer.to_string(), "yellow")
                    } else {
                        answer.to_string()
                    };
                    builder.push_record([id.clone(), value]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format a single answer.
    pub fn format_answer(&self, question_id: &str, answer: &Answer) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "questionid": question_id,
                "answer": answer,
            }))?),
            OutputFormat::Quiet => Ok(answer.to_string()),
            OutputFormat::Table => {
                let mut answers = BTreeMap::new();
                answers.insert(question_id.to_string(), answer.clone());
                self.format_answers(&answers)
            }
        }
    }

    /// Format the registered questions.
    pub fn format_questions(&self, questions: &BTreeMap<String, QuestionRecord>) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(questions)?),
            OutputFormat::Quiet => Ok(questions.keys().cloned().collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                if questions.is_empty() {
                    return Ok(self.colorize("No questions registered.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Category", "Prompt file", "Included"]);
                for (id, record) in questions {
                    builder.push_record([
                        id.as_str(),
                        record.answer_category.as_str(),
                        record.prompt_file.as_str(),
                        if record.included { "yes" } else { "no" },
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format the outcome of a prompt evaluation.
    pub fn format_evaluation(&self, report: &EvaluationReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "samples": report.samples,
                "accuracy": report.accuracy(),
            }))?),
            OutputFormat::Quiet => Ok(report
                .accuracy()
                .map(|a| format!("{:.1}", a))
                .unwrap_or_default()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Contract", "Answer", "Ground truth", "Result"]);
                for sample in &report.samples {
                    let result = match sample.passed {
                        Some(true) => self.colorize("pass", "green"),
                        Some(false) => self.colorize("fail", "red"),
                        None => "-".to_string(),
                    };
                    builder.push_record([
                        sample.locator.clone(),
                        sample.answer.to_string(),
                        sample.ground_truth.clone().unwrap_or_else(|| "-".to_string()),
                        result,
                    ]);
                }

                let mut output = self.render(builder);
                if let Some(accuracy) = report.accuracy() {
                    output.push('\n');
                    output.push_str(&self.info(&format!("Accuracy: {:.1}%", accuracy)));
                }
                Ok(output)
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
