//! Offline evaluation of answers against ground truth
//!
//! Used when authoring a new question: the candidate prompt is run over a
//! few sample contracts and each answer is compared with a known value.

use scrivener_domain::{parse_day_first, Answer, AnswerValue};
use serde::Serialize;

/// Default normalised edit distance under which two strings match
pub const DEFAULT_STRING_DISTANCE_THRESHOLD: f64 = 0.1;

/// Compares answers with ground truth values
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    distance_threshold: f64,
    number_tolerance: f64,
}

impl Evaluator {
    /// Create an evaluator with a string distance threshold and exact numbers
    pub fn new(distance_threshold: f64) -> Self {
        Self {
            distance_threshold,
            number_tolerance: 0.0,
        }
    }

    /// Accept numeric answers within `tolerance` of the truth
    pub fn with_number_tolerance(mut self, tolerance: f64) -> Self {
        self.number_tolerance = tolerance.abs();
        self
    }

    /// Whether `answer` matches `truth`
    ///
    /// `N/A` never matches.
    pub fn matches(&self, truth: &str, answer: &Answer) -> bool {
        match answer {
            Answer::NotAvailable => false,
            Answer::Found(AnswerValue::Text(text)) => {
                string_matches(truth, text, self.distance_threshold)
            }
            Answer::Found(AnswerValue::Date(date)) => parse_day_first(truth) == Some(*date),
            Answer::Found(value) => value
                .as_f64()
                .is_some_and(|n| self.number_matches(truth, n)),
        }
    }

    fn number_matches(&self, truth: &str, answer: f64) -> bool {
        match truth.trim().parse::<f64>() {
            Ok(expected) => (expected - answer).abs() <= self.number_tolerance,
            Err(_) => false,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_STRING_DISTANCE_THRESHOLD)
    }
}

/// Lowercase, drop commas and periods, turn hyphens into spaces
pub fn clean_string(s: &str) -> String {
    s.to_lowercase()
        .replace([',', '.'], "")
        .replace('-', " ")
}

/// Lenient string comparison
///
/// Matches when the cleaned truth is contained in the cleaned prediction,
/// when their normalised Levenshtein distance is below `threshold`, or when
/// every word of the truth appears in the prediction.
pub fn string_matches(truth: &str, prediction: &str, threshold: f64) -> bool {
    let truth = clean_string(truth);
    let prediction = clean_string(prediction);

    if prediction.contains(&truth) {
        return true;
    }

    let distance = 1.0 - strsim::normalized_levenshtein(&prediction, &truth);
    if distance < threshold {
        return true;
    }

    let words: Vec<&str> = prediction.split_whitespace().collect();
    truth.split_whitespace().all(|word| words.contains(&word))
}

/// Outcome for one sample contract
#[derive(Debug, Clone, Serialize)]
pub struct SampleOutcome {
    /// Contract the question was run on
    pub locator: String,

    /// Parsed answer
    pub answer: Answer,

    /// Known correct value, if supplied
    pub ground_truth: Option<String>,

    /// Whether the answer matched the ground truth
    pub passed: Option<bool>,
}

/// Results of running a candidate question over sample contracts
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationReport {
    /// One entry per sample, in input order
    pub samples: Vec<SampleOutcome>,
}

impl EvaluationReport {
    /// Percentage of graded samples that passed, if any were graded
    pub fn accuracy(&self) -> Option<f64> {
        let graded: Vec<bool> = self.samples.iter().filter_map(|s| s.passed).collect();
        if graded.is_empty() {
            return None;
        }
        let passed = graded.iter().filter(|p| **p).count();
        Some(passed as f64 / graded.len() as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> Answer {
        Answer::Found(AnswerValue::Text(s.to_string()))
    }

    #[test]
    fn test_clean_string() {
        assert_eq!(clean_string("ACME-Holding, Inc."), "acme holding inc");
    }

    #[test]
    fn test_string_containment() {
        assert!(string_matches("ACME GmbH", "The employer is ACME GmbH.", 0.1));
    }

    #[test]
    fn test_string_small_edit_distance() {
        assert!(string_matches("Johannes Schmidt", "Johannes Schmitt", 0.1));
        assert!(!string_matches("Johannes Schmidt", "Maria Weber", 0.1));
    }

    #[test]
    fn test_string_all_words_present() {
        assert!(string_matches("Jane Doe", "Doe, Jane", 0.1));
    }

    #[test]
    fn test_not_available_never_matches() {
        let evaluator = Evaluator::default();
        assert!(!evaluator.matches("N/A", &Answer::NotAvailable));
        assert!(!evaluator.matches("", &Answer::NotAvailable));
    }

    #[test]
    fn test_number_tolerance() {
        let exact = Evaluator::default();
        assert!(exact.matches("40", &Answer::Found(AnswerValue::Integer(40))));
        assert!(!exact.matches("40", &Answer::Found(AnswerValue::Integer(38))));

        let lenient = Evaluator::default().with_number_tolerance(2.0);
        assert!(lenient.matches("40", &Answer::Found(AnswerValue::Integer(38))));
        assert!(lenient.matches("3500.5", &Answer::Found(AnswerValue::Float(3501.0))));
        assert!(!lenient.matches("forty", &Answer::Found(AnswerValue::Integer(40))));
    }

    #[test]
    fn test_dates_compare_by_value() {
        let answer = Answer::Found(AnswerValue::Date(NaiveDate::from_ymd_opt(2023, 4, 1).unwrap()));
        let evaluator = Evaluator::default();
        assert!(evaluator.matches("01.04.2023", &answer));
        assert!(evaluator.matches("2023-04-01", &answer));
        assert!(!evaluator.matches("04.01.2023", &answer));
    }

    #[test]
    fn test_accuracy() {
        let mut report = EvaluationReport::default();
        assert_eq!(report.accuracy(), None);

        for (truth, answer) in [("ACME", text("ACME")), ("ACME", Answer::NotAvailable)] {
            report.samples.push(SampleOutcome {
                locator: "contract.txt".to_string(),
                passed: Some(Evaluator::default().matches(truth, &answer)),
                answer,
                ground_truth: Some(truth.to_string()),
            });
        }
        report.samples.push(SampleOutcome {
            locator: "ungraded.txt".to_string(),
            answer: text("x"),
            ground_truth: None,
            passed: None,
        });

        assert_eq!(report.accuracy(), Some(50.0));
    }
}
