use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::convert::TryFrom;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{error, info};

use crate::error::{ExamError, Result};
use crate::output::{ExamOutput, Message};

pub mod question;

pub use question::{Options, Question, QuestionType, RawQuestion};

#[cfg(test)]
pub mod fixtures;

#[derive(Deserialize)]
struct WrappedBank {
    questions: Vec<RawQuestion>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BankStatistics {
    pub single: usize,
    pub multiple: usize,
}

#[derive(Clone, Debug, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<QuestionBank> {
        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(ExamError::Format(format!(
                    "duplicate question id {}",
                    question.id
                )));
            }
        }
        Ok(QuestionBank { questions })
    }

    pub fn open(source: &Path) -> Result<QuestionBank> {
        let bytes = fs::read(source).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ExamError::NotFound(source.to_path_buf()),
            _ => ExamError::Io(e),
        })?;
        QuestionBank::from_slice(&bytes)
    }

    /// Parses either a top-level array of questions or an object with a `questions` array.
    pub fn from_slice(bytes: &[u8]) -> Result<QuestionBank> {
        let shape: Value = serde_json::from_slice(bytes)
            .map_err(|e| ExamError::Format(format!("not valid JSON: {}", e)))?;

        // Typed parsing goes back to the raw bytes so option order survives.
        let raw_questions: Vec<RawQuestion> = match shape {
            Value::Array(_) => serde_json::from_slice(bytes),
            Value::Object(ref fields) if fields.get("questions").map_or(false, Value::is_array) => {
                serde_json::from_slice::<WrappedBank>(bytes).map(|w| w.questions)
            }
            _ => {
                return Err(ExamError::Format(
                    "expected an array of questions or an object with a \"questions\" array"
                        .to_owned(),
                ))
            }
        }
        .map_err(|e| ExamError::Format(e.to_string()))?;

        let questions = raw_questions
            .into_iter()
            .map(Question::try_from)
            .collect::<Result<Vec<_>>>()?;
        QuestionBank::new(questions)
    }

    /// Loads a bank without failing: problems are reported to the output and an empty bank is returned.
    pub fn load<O: ExamOutput>(source: &Path, output: &O) -> QuestionBank {
        match QuestionBank::open(source) {
            Ok(bank) => {
                info!("Loaded {} questions from {}", bank.len(), source.display());
                output.say(&Message::BankLoaded(bank.len()));
                bank
            }
            Err(e) => {
                error!("Could not load question bank {}: {}", source.display(), e);
                output.say(&Message::BankLoadFailed(e.to_string()));
                QuestionBank::default()
            }
        }
    }

    pub fn save(&self, destination: &Path) -> Result<()> {
        let raw_questions: Vec<RawQuestion> = self.questions.iter().map(RawQuestion::from).collect();
        let json = serde_json::to_string_pretty(&raw_questions)
            .map_err(|e| ExamError::Format(e.to_string()))?;
        fs::write(destination, json)?;
        info!(
            "Saved {} questions to {}",
            self.questions.len(),
            destination.display()
        );
        Ok(())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn statistics(&self) -> BankStatistics {
        let multiple = self.questions.iter().filter(|q| q.is_multiple()).count();
        BankStatistics {
            single: self.questions.len() - multiple,
            multiple,
        }
    }
}
