use rand::Rng;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::bank::{Question, QuestionBank};
use crate::error::{ExamError, Result};
use crate::output::{ExamOutput, Message};
use crate::report::ResultExport;
use crate::score::ScoreReport;

use self::phase::*;

mod answers;
pub mod clock;
pub mod generator;
mod phase;
pub mod settings;

pub use self::answers::Answers;
pub use self::clock::{Clock, SystemClock};
pub use self::phase::{QuestionStatus, SelectionAdvice};
pub use self::settings::Settings;


trait State {
    fn on_begin(&mut self);
    fn on_end(&mut self);
    fn is_over(&self) -> bool;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PhaseKind {
    NotStarted,
    InProgress,
    Finished,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseKind::NotStarted => write!(f, "not started"),
            PhaseKind::InProgress => write!(f, "in progress"),
            PhaseKind::Finished => write!(f, "finished"),
        }
    }
}

enum Phase<O, C> {
    NotStarted,
    InProgress(InProgressState<O, C>),
    Finished(FinishedState<O>),
}

impl<O: ExamOutput + Clone, C: Clock> Phase<O, C> {
    fn get_state(&mut self) -> Option<&mut dyn State> {
        match self {
            Phase::NotStarted => None,
            Phase::InProgress(s) => Some(s),
            Phase::Finished(s) => Some(s),
        }
    }

    fn kind(&self) -> PhaseKind {
        match self {
            Phase::NotStarted => PhaseKind::NotStarted,
            Phase::InProgress(_) => PhaseKind::InProgress,
            Phase::Finished(_) => PhaseKind::Finished,
        }
    }
}

/// One taker's attempt at an exam.
///
/// Time is never ticked: every query recomputes the remaining time from the clock,
/// and `observe` (called before rendering and before every in-progress operation)
/// ends the exam once the deadline has passed.
pub struct Session<O: ExamOutput + Clone, C: Clock = SystemClock> {
    settings: Settings,
    current_phase: Phase<O, C>,
    output: O,
    clock: C,
}

impl<O: ExamOutput + Clone> Session<O, SystemClock> {
    pub fn new(settings: Settings, output: O) -> Self {
        Session::with_clock(settings, output, SystemClock)
    }
}

impl<O: ExamOutput + Clone, C: Clock> Session<O, C> {
    pub fn with_clock(settings: Settings, output: O, clock: C) -> Self {
        Session {
            settings,
            current_phase: Phase::NotStarted,
            output,
            clock,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> PhaseKind {
        self.current_phase.kind()
    }

    fn set_current_phase(&mut self, phase: Phase<O, C>) {
        if let Some(state) = self.current_phase.get_state() {
            state.on_end();
        }

        self.current_phase = phase;
        debug!("Entering exam phase: {}", self.current_phase.kind());

        if let Some(state) = self.current_phase.get_state() {
            state.on_begin();
        }
    }

    pub fn start(&mut self, bank: &QuestionBank, count: usize) -> Result<()> {
        self.start_with_rng(bank, count, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        count: usize,
        rng: &mut R,
    ) -> Result<()> {
        if bank.is_empty() {
            return Err(ExamError::EmptyBank);
        }
        if count == 0 {
            return Err(ExamError::InvalidQuestionCount);
        }

        let generated = generator::generate(bank.questions(), count, rng);
        if let Some(reduced) = generated.reduced {
            self.output.say(&Message::CountReduced {
                requested: reduced.requested,
                available: reduced.available,
            });
        }

        info!(
            "Starting an exam of {} questions ({} minutes)",
            generated.questions.len(),
            self.settings.duration.as_secs() / 60
        );
        let state = InProgressState::new(
            generated.questions,
            self.settings.duration,
            &self.settings.time_warnings,
            self.output.clone(),
            self.clock.clone(),
        );
        self.set_current_phase(Phase::InProgress(state));
        Ok(())
    }

    /// Re-checks the timer; finishes the exam if time ran out.
    pub fn observe(&mut self) -> PhaseKind {
        let timed_out = match &mut self.current_phase {
            Phase::InProgress(state) => {
                state.announce_time_remaining();
                state.is_over()
            }
            _ => false,
        };
        if timed_out {
            info!("Time is up");
            self.output.say(&Message::TimeUp);
            self.end_exam();
        }
        self.phase()
    }

    fn in_progress(&mut self, operation: &'static str) -> Result<&mut InProgressState<O, C>> {
        self.observe();
        match &mut self.current_phase {
            Phase::InProgress(state) => Ok(state),
            phase => Err(ExamError::WrongPhase {
                operation,
                phase: phase.kind(),
            }),
        }
    }

    pub fn set_answer<I>(&mut self, position: usize, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = char>,
    {
        let selection: BTreeSet<char> = keys.into_iter().collect();
        self.in_progress("answer")?.set_answer(position, selection)
    }

    pub fn select_option(&mut self, position: usize, key: char) -> Result<()> {
        self.in_progress("answer")?.select_option(position, key)
    }

    pub fn clear_answer(&mut self, position: usize) -> Result<()> {
        self.in_progress("clear an answer")?.clear_answer(position)
    }

    pub fn goto(&mut self, position: isize) -> Result<()> {
        self.in_progress("navigate")?.goto(position)
    }

    pub fn next(&mut self) -> Result<()> {
        self.in_progress("navigate")?.next();
        Ok(())
    }

    pub fn previous(&mut self) -> Result<()> {
        self.in_progress("navigate")?.previous();
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        match self.observe() {
            PhaseKind::InProgress => {
                self.end_exam();
                Ok(())
            }
            PhaseKind::Finished => Ok(()),
            phase => Err(ExamError::WrongPhase {
                operation: "finish",
                phase,
            }),
        }
    }

    fn end_exam(&mut self) {
        let finished = match &self.current_phase {
            Phase::InProgress(state) => state.to_finished(),
            _ => return,
        };
        self.set_current_phase(Phase::Finished(finished));
    }

    pub fn reset(&mut self) {
        self.set_current_phase(Phase::NotStarted);
        self.output.say(&Message::ExamReset);
    }

    pub fn remaining_time(&self) -> Duration {
        match &self.current_phase {
            Phase::NotStarted => self.settings.duration,
            Phase::InProgress(state) => state.remaining_time(),
            Phase::Finished(state) => state.remaining_time(),
        }
    }

    pub fn exam(&self) -> &[Question] {
        match &self.current_phase {
            Phase::NotStarted => &[],
            Phase::InProgress(state) => state.exam(),
            Phase::Finished(state) => state.exam(),
        }
    }

    pub fn answers(&self) -> Option<&Answers> {
        match &self.current_phase {
            Phase::NotStarted => None,
            Phase::InProgress(state) => Some(state.answers()),
            Phase::Finished(state) => Some(state.answers()),
        }
    }

    pub fn selection(&self, position: usize) -> BTreeSet<char> {
        self.answers()
            .map(|a| a.selection(position))
            .unwrap_or_default()
    }

    pub fn answered_count(&self) -> usize {
        self.answers().map_or(0, Answers::answered_count)
    }

    pub fn current_index(&self) -> Option<usize> {
        match &self.current_phase {
            Phase::InProgress(state) => Some(state.current_index()),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.current_phase {
            Phase::InProgress(state) => state.exam().get(state.current_index()),
            _ => None,
        }
    }

    pub fn question_map(&self) -> Vec<QuestionStatus> {
        match &self.current_phase {
            Phase::InProgress(state) => state.question_map(),
            _ => Vec::new(),
        }
    }

    pub fn selection_advice(&self, position: usize) -> Result<SelectionAdvice> {
        match &self.current_phase {
            Phase::InProgress(state) => state.selection_advice(position),
            phase => Err(ExamError::WrongPhase {
                operation: "check a selection",
                phase: phase.kind(),
            }),
        }
    }

    pub fn time_taken(&self) -> Option<Duration> {
        match &self.current_phase {
            Phase::Finished(state) => Some(state.time_taken()),
            _ => None,
        }
    }

    pub fn report(&self) -> Result<ScoreReport> {
        match &self.current_phase {
            Phase::Finished(state) => Ok(state.report()),
            phase => Err(ExamError::WrongPhase {
                operation: "score the exam",
                phase: phase.kind(),
            }),
        }
    }

    pub fn export(&self) -> Result<ResultExport> {
        match &self.current_phase {
            Phase::Finished(state) => Ok(state.export(self.clock.now())),
            phase => Err(ExamError::WrongPhase {
                operation: "export results",
                phase: phase.kind(),
            }),
        }
    }
}
