use std::time::Duration;

pub mod console;
#[cfg(test)]
pub mod mock;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Message {
    BankLoaded(usize),
    BankLoadFailed(String),
    CountReduced { requested: usize, available: usize },
    ExamBegins { question_count: usize, duration: Duration },
    ExamFinished,
    ExamReset,
    SelectionOverLimit { position: usize, select_count: u32, selected: usize },
    TimeRemaining(Duration),
    TimeUp,
}

pub trait ExamOutput {
    fn say(&self, message: &Message);
}
