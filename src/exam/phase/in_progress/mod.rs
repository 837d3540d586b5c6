use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::convert::TryFrom;
use std::time::Duration;
use tracing::debug;

use crate::bank::Question;
use crate::error::{ExamError, Result};
use crate::exam::clock::Clock;
use crate::exam::phase::FinishedState;
use crate::exam::{Answers, State};
use crate::output::{ExamOutput, Message};


#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuestionStatus {
    Current,
    Answered,
    Unanswered,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SelectionAdvice {
    Complete,
    Missing(u32),
    TooMany(u32),
}

pub struct InProgressState<O, C> {
    exam: Vec<Question>,
    answers: Answers,
    current_index: usize,
    start_time: DateTime<Utc>,
    duration: Duration,
    pending_warnings: Vec<Duration>,
    output: O,
    clock: C,
}

impl<O: ExamOutput + Clone, C: Clock> InProgressState<O, C> {
    pub fn new(
        exam: Vec<Question>,
        duration: Duration,
        time_warnings: &[Duration],
        output: O,
        clock: C,
    ) -> Self {
        let mut pending_warnings: Vec<Duration> = time_warnings
            .iter()
            .copied()
            .filter(|w| *w < duration)
            .collect();
        pending_warnings.sort_by(|a, b| b.cmp(a));

        InProgressState {
            exam,
            answers: Answers::new(),
            current_index: 0,
            start_time: clock.now(),
            duration,
            pending_warnings,
            output,
            clock,
        }
    }

    pub fn exam(&self) -> &[Question] {
        &self.exam
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn remaining_time(&self) -> Duration {
        let elapsed = (self.clock.now() - self.start_time)
            .to_std()
            .unwrap_or_default();
        self.duration.checked_sub(elapsed).unwrap_or_default()
    }

    fn question_at(&self, position: usize) -> Result<&Question> {
        self.exam.get(position).ok_or(ExamError::Range {
            position: position as isize,
            len: self.exam.len(),
        })
    }

    pub fn set_answer(&mut self, position: usize, selection: BTreeSet<char>) -> Result<()> {
        let question = self.question_at(position)?;
        let selection: BTreeSet<char> = selection
            .into_iter()
            .map(|k| k.to_ascii_uppercase())
            .collect();

        if let Some(key) = selection.iter().find(|k| !question.options.contains(**k)) {
            return Err(ExamError::UnknownOption { key: *key });
        }
        if !question.is_multiple() && selection.len() > 1 {
            return Err(ExamError::TooManySelections {
                selected: selection.len(),
            });
        }

        let is_multiple = question.is_multiple();
        let select_count = question.select_count;
        let selected = selection.len();
        debug!("Question {} answer set to {:?}", position + 1, selection);
        self.answers.set(position, selection);

        if is_multiple && selected > select_count as usize {
            self.output.say(&Message::SelectionOverLimit {
                position,
                select_count,
                selected,
            });
        }
        Ok(())
    }

    /// Clicking an option: replaces a single answer, toggles a multiple answer.
    pub fn select_option(&mut self, position: usize, key: char) -> Result<()> {
        let key = key.to_ascii_uppercase();
        let question = self.question_at(position)?;
        if !question.options.contains(key) {
            return Err(ExamError::UnknownOption { key });
        }

        let selection = if question.is_multiple() {
            let mut selection = self.answers.selection(position);
            if !selection.remove(&key) {
                selection.insert(key);
            }
            selection
        } else {
            std::iter::once(key).collect()
        };
        self.set_answer(position, selection)
    }

    pub fn clear_answer(&mut self, position: usize) -> Result<()> {
        self.question_at(position)?;
        self.answers.clear(position);
        Ok(())
    }

    pub fn goto(&mut self, position: isize) -> Result<()> {
        let len = self.exam.len();
        let target = usize::try_from(position)
            .ok()
            .filter(|p| *p < len)
            .ok_or(ExamError::Range { position, len })?;
        if target != self.current_index {
            debug!("Moving to question {}", target + 1);
            self.current_index = target;
        }
        Ok(())
    }

    pub fn next(&mut self) {
        if self.current_index + 1 < self.exam.len() {
            self.current_index += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.current_index > 0 {
            self.current_index -= 1;
        }
    }

    pub fn question_map(&self) -> Vec<QuestionStatus> {
        (0..self.exam.len())
            .map(|position| {
                if position == self.current_index {
                    QuestionStatus::Current
                } else if self.answers.is_answered(position) {
                    QuestionStatus::Answered
                } else {
                    QuestionStatus::Unanswered
                }
            })
            .collect()
    }

    pub fn selection_advice(&self, position: usize) -> Result<SelectionAdvice> {
        let question = self.question_at(position)?;
        let selected = self.answers.get(position).map_or(0, |s| s.len()) as u32;
        let advice = if selected > question.select_count {
            SelectionAdvice::TooMany(question.select_count)
        } else if selected < question.select_count {
            SelectionAdvice::Missing(question.select_count - selected)
        } else {
            SelectionAdvice::Complete
        };
        Ok(advice)
    }

    /// Announces the smallest warning threshold crossed since the last observation.
    pub fn announce_time_remaining(&mut self) {
        let remaining = self.remaining_time();
        if remaining == Duration::default() {
            return;
        }
        let crossed = self
            .pending_warnings
            .iter()
            .copied()
            .filter(|w| remaining <= *w)
            .min();
        if let Some(threshold) = crossed {
            self.pending_warnings.retain(|w| remaining > *w);
            self.output.say(&Message::TimeRemaining(threshold));
        }
    }

    pub fn to_finished(&self) -> FinishedState<O> {
        let now = self.clock.now();
        // A late observation still finishes the exam at its deadline.
        let deadline = chrono::Duration::from_std(self.duration)
            .ok()
            .and_then(|duration| self.start_time.checked_add_signed(duration));
        let finished_at = match deadline {
            Some(deadline) if deadline < now => deadline,
            _ => now,
        };
        FinishedState::new(
            self.exam.clone(),
            self.answers.clone(),
            self.start_time,
            finished_at,
            self.remaining_time(),
            self.output.clone(),
        )
    }
}

impl<O: ExamOutput + Clone, C: Clock> State for InProgressState<O, C> {
    fn on_begin(&mut self) {
        self.output.say(&Message::ExamBegins {
            question_count: self.exam.len(),
            duration: self.duration,
        });
    }

    fn on_end(&mut self) {}

    fn is_over(&self) -> bool {
        self.remaining_time() == Duration::default()
    }
}
