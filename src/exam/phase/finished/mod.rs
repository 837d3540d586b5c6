use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::bank::Question;
use crate::exam::{Answers, State};
use crate::output::{ExamOutput, Message};
use crate::report::ResultExport;
use crate::score::{self, ScoreReport};

#[cfg(test)]
mod tests;

pub struct FinishedState<O> {
    exam: Vec<Question>,
    answers: Answers,
    start_time: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    remaining_time: Duration,
    output: O,
}

impl<O: ExamOutput> FinishedState<O> {
    pub fn new(
        exam: Vec<Question>,
        answers: Answers,
        start_time: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        remaining_time: Duration,
        output: O,
    ) -> Self {
        FinishedState {
            exam,
            answers,
            start_time,
            finished_at,
            remaining_time,
            output,
        }
    }

    pub fn exam(&self) -> &[Question] {
        &self.exam
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn remaining_time(&self) -> Duration {
        self.remaining_time
    }

    pub fn time_taken(&self) -> Duration {
        (self.finished_at - self.start_time)
            .to_std()
            .unwrap_or_default()
    }

    pub fn report(&self) -> ScoreReport {
        score::score(&self.exam, &self.answers)
    }

    pub fn export(&self, exam_date: DateTime<Utc>) -> ResultExport {
        ResultExport::new(&self.exam, &self.report(), self.time_taken(), exam_date)
    }
}

impl<O: ExamOutput> State for FinishedState<O> {
    fn on_begin(&mut self) {
        self.output.say(&Message::ExamFinished);
    }

    fn on_end(&mut self) {}

    fn is_over(&self) -> bool {
        false
    }
}
