use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::bank::Question;
use crate::score::ScoreReport;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DetailedAnswer {
    pub question_id: i64,
    pub question: String,
    pub user_answer: Vec<char>,
    pub correct_answer: Vec<char>,
    pub is_correct: bool,
}

/// The downloadable result document of a finished exam.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ResultExport {
    pub exam_date: DateTime<Local>,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub score_percentage: f64,
    pub time_taken: String,
    pub detailed_answers: Vec<DetailedAnswer>,
}

/// Formats a duration as `H:MM:SS`.
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

impl ResultExport {
    pub fn new(
        exam: &[Question],
        report: &ScoreReport,
        time_taken: Duration,
        exam_date: DateTime<Utc>,
    ) -> Self {
        let detailed_answers = exam
            .iter()
            .zip(report.per_question.iter())
            .map(|(question, result)| DetailedAnswer {
                question_id: result.question_id,
                question: question.text.clone(),
                user_answer: result.user_answer.clone(),
                correct_answer: result.correct_answer.clone(),
                is_correct: result.is_correct,
            })
            .collect();

        ResultExport {
            exam_date: exam_date.with_timezone(&Local),
            total_questions: report.total,
            correct_answers: report.correct_count,
            score_percentage: report.percentage,
            time_taken: format_duration(time_taken),
            detailed_answers,
        }
    }

    pub fn file_name(&self) -> String {
        format!(
            "exam_results_{}.json",
            self.exam_date.format("%Y%m%d_%H%M%S")
        )
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Could not serialize exam results")
    }

    pub fn write_to_dir(&self, directory: &Path) -> Result<PathBuf> {
        fs::create_dir_all(directory)
            .with_context(|| format!("Could not create {}", directory.display()))?;
        let path = directory.join(self.file_name());
        fs::write(&path, self.to_json()?)
            .with_context(|| format!("Could not write {}", path.display()))?;
        info!("Exported exam results to {}", path.display());
        Ok(path)
    }
}
