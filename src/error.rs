use std::path::PathBuf;
use thiserror::Error;

use crate::exam::PhaseKind;

#[derive(Debug, Error)]
pub enum ExamError {
    #[error("Question bank not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid question bank: {0}")]
    Format(String),

    #[error("Question {position} is out of range (exam has {len} questions)")]
    Range { position: isize, len: usize },

    #[error("The question bank is empty")]
    EmptyBank,

    #[error("An exam must have at least one question")]
    InvalidQuestionCount,

    #[error("Cannot {operation} while the exam is {phase}")]
    WrongPhase {
        operation: &'static str,
        phase: PhaseKind,
    },

    #[error("Option {key} does not exist for this question")]
    UnknownOption { key: char },

    #[error("This question accepts a single answer ({selected} selected)")]
    TooManySelections { selected: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExamError>;
