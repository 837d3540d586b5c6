use serde::Serialize;
use std::fmt;

use crate::bank::Question;
use crate::exam::Answers;


#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuestionResult {
    pub question_id: i64,
    pub user_answer: Vec<char>,
    pub correct_answer: Vec<char>,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreReport {
    pub total: usize,
    pub correct_count: usize,
    pub percentage: f64,
    pub per_question: Vec<QuestionResult>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PerformanceLevel {
    Excellent,
    VeryGood,
    Good,
    Acceptable,
    NeedsReview,
}

impl PerformanceLevel {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            PerformanceLevel::Excellent
        } else if percentage >= 80.0 {
            PerformanceLevel::VeryGood
        } else if percentage >= 70.0 {
            PerformanceLevel::Good
        } else if percentage >= 60.0 {
            PerformanceLevel::Acceptable
        } else {
            PerformanceLevel::NeedsReview
        }
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PerformanceLevel::Excellent => "Excellent! Outstanding performance",
            PerformanceLevel::VeryGood => "Very good! Strong performance",
            PerformanceLevel::Good => "Good, with room to improve",
            PerformanceLevel::Acceptable => "Acceptable, needs more study",
            PerformanceLevel::NeedsReview => "Needs a thorough review",
        };
        write!(f, "{}", label)
    }
}

impl ScoreReport {
    pub fn incorrect_count(&self) -> usize {
        self.total - self.correct_count
    }

    pub fn performance(&self) -> PerformanceLevel {
        PerformanceLevel::from_percentage(self.percentage)
    }
}

/// Scores an exam. A question counts only when the selected keys equal the correct keys exactly.
pub fn score(exam: &[Question], answers: &Answers) -> ScoreReport {
    let per_question: Vec<QuestionResult> = exam
        .iter()
        .enumerate()
        .map(|(position, question)| {
            let selection = answers.selection(position);
            QuestionResult {
                question_id: question.id,
                is_correct: question.is_selection_correct(&selection),
                user_answer: selection.into_iter().collect(),
                correct_answer: question.correct_answer.iter().copied().collect(),
            }
        })
        .collect();

    let total = per_question.len();
    let correct_count = per_question.iter().filter(|r| r.is_correct).count();
    let percentage = if total == 0 {
        0.0
    } else {
        100.0 * correct_count as f64 / total as f64
    };

    ScoreReport {
        total,
        correct_count,
        percentage,
        per_question,
    }
}
