use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::bank::Question;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReducedCount {
    pub requested: usize,
    pub available: usize,
}

#[derive(Debug)]
pub struct GeneratedExam {
    pub questions: Vec<Question>,
    pub reduced: Option<ReducedCount>,
}

/// Draws `requested` distinct questions in random order, or the whole bank when it is smaller.
pub fn generate<R: Rng + ?Sized>(bank: &[Question], requested: usize, rng: &mut R) -> GeneratedExam {
    let reduced = if requested > bank.len() {
        warn!(
            "Requested {} questions but only {} are available",
            requested,
            bank.len()
        );
        Some(ReducedCount {
            requested,
            available: bank.len(),
        })
    } else {
        None
    };

    let count = requested.min(bank.len());
    let mut questions: Vec<Question> = bank.choose_multiple(rng, count).cloned().collect();
    questions.shuffle(rng);

    GeneratedExam { questions, reduced }
}
