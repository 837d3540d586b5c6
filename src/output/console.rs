use itertools::Itertools;
use std::collections::BTreeSet;
use std::time::Duration;

use crate::bank::Question;
use crate::exam::{QuestionStatus, SelectionAdvice};
use crate::output::{ExamOutput, Message};
use crate::score::ScoreReport;

const MAP_ROW_LENGTH: usize = 10;

/// Prints exam messages to the terminal.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn new() -> Self {
        ConsoleOutput
    }

    fn interpret_message(&self, message: &Message) -> String {
        use Message::*;
        match message {
            BankLoaded(count) => format!("📚 Loaded {} questions.", count),
            BankLoadFailed(reason) => format!("❌ Could not load the question bank: {}", reason),
            CountReduced {
                requested,
                available,
            } => format!(
                "⚠️ Only {} questions are available, the exam will have {} instead of {}.",
                available, available, requested
            ),
            ExamBegins {
                question_count,
                duration,
            } => format!(
                "📝 The exam begins: {} questions in {} minutes. Type `h` for help.",
                question_count,
                duration.as_secs() / 60
            ),
            ExamFinished => "🏁 The exam is over.".into(),
            ExamReset => "The exam was reset.".into(),
            SelectionOverLimit {
                position,
                select_count,
                selected,
            } => format!(
                "⚠️ Question {} asks for {} answers, you selected {}.",
                position + 1,
                select_count,
                selected
            ),
            TimeRemaining(duration) => format!("🕒 Only {} left!", format_countdown(*duration)),
            TimeUp => "⏰ Time's up! Your answers were submitted.".into(),
        }
    }
}

impl ExamOutput for ConsoleOutput {
    fn say(&self, message: &Message) {
        println!("{}", self.interpret_message(message));
    }
}

/// `MM:SS` under an hour, `H:MM:SS` otherwise.
pub fn format_countdown(duration: Duration) -> String {
    let seconds = duration.as_secs();
    if seconds >= 3600 {
        format!(
            "{}:{:02}:{:02}",
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        )
    } else {
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    }
}

fn format_keys(keys: &BTreeSet<char>) -> String {
    if keys.is_empty() {
        "(none)".to_owned()
    } else {
        keys.iter().join(", ")
    }
}

pub fn render_question(
    position: usize,
    total: usize,
    question: &Question,
    selection: &BTreeSet<char>,
    remaining: Duration,
    advice: SelectionAdvice,
) -> String {
    let mut screen = format!(
        "⏳ {}    Question {} of {}    [{}]\n\n{}\n",
        format_countdown(remaining),
        position + 1,
        total,
        question.category,
        question.text
    );
    if question.is_multiple() {
        screen += &format!("(Select {})\n", question.select_count);
    }
    for (key, text) in question.options.iter() {
        let marker = if selection.contains(&key) { "x" } else { " " };
        screen += &format!("\n  [{}] {}. {}", marker, key, text);
    }
    if question.is_multiple() {
        match advice {
            SelectionAdvice::Complete => (),
            SelectionAdvice::Missing(count) => {
                screen += &format!("\n\nSelect {} more.", count);
            }
            SelectionAdvice::TooMany(count) => {
                screen += &format!("\n\n⚠️ Only {} answers are expected.", count);
            }
        }
    }
    screen
}

pub fn render_map(map: &[QuestionStatus]) -> String {
    let rows = map
        .iter()
        .enumerate()
        .map(|(position, status)| {
            let marker = match status {
                QuestionStatus::Current => '>',
                QuestionStatus::Answered => '✓',
                QuestionStatus::Unanswered => '·',
            };
            format!("{}{:>3}", marker, position + 1)
        })
        .chunks(MAP_ROW_LENGTH);
    let rendered = rows.into_iter().map(|mut row| row.join(" ")).join("\n");
    rendered
}

pub fn render_results(report: &ScoreReport, time_taken: Duration) -> String {
    format!(
        "📊 Results\n\nScore: {:.1}%\nCorrect: {}\nIncorrect: {}\nTotal: {}\nTime taken: {}\n\n{}",
        report.percentage,
        report.correct_count,
        report.incorrect_count(),
        report.total,
        format_countdown(time_taken),
        report.performance()
    )
}

pub fn render_review(exam: &[Question], report: &ScoreReport) -> String {
    exam.iter()
        .zip(report.per_question.iter())
        .enumerate()
        .map(|(position, (question, result))| {
            let verdict = if result.is_correct { "✅" } else { "❌" };
            let user_answer: BTreeSet<char> = result.user_answer.iter().copied().collect();
            let correct_answer: BTreeSet<char> = result.correct_answer.iter().copied().collect();
            let mut entry = format!(
                "{} Question {} [{}]\n{}\nYour answer: {}\nCorrect answer: {}",
                verdict,
                position + 1,
                question.category,
                question.text,
                format_keys(&user_answer),
                format_keys(&correct_answer)
            );
            if let Some(explanation) = &question.explanation {
                entry += &format!("\nExplanation: {}", explanation);
            }
            entry
        })
        .join("\n\n")
}

pub fn render_exam_help() -> String {
    [
        "a-e, A-Z    select or toggle an option",
        "n, next     next question",
        "p, prev     previous question",
        "g, goto N   go to question N",
        "clear       clear the current answer",
        "m, map      show answered questions",
        "f, finish   submit the exam",
        "r, reset    abandon the exam",
        "q, quit     leave",
        "h, help     show this help",
    ]
    .join("\n")
}

pub fn render_results_help() -> String {
    [
        "review      show every question with its answer",
        "export      save the results as JSON",
        "new         start another exam",
        "q, quit     leave",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::fixtures;
    use crate::exam::Answers;
    use crate::score::score;

    #[test]
    fn formats_countdowns() {
        assert_eq!(format_countdown(Duration::from_secs(0)), "00:00");
        assert_eq!(format_countdown(Duration::from_secs(9 * 60 + 5)), "09:05");
        assert_eq!(format_countdown(Duration::from_secs(90 * 60)), "1:30:00");
    }

    #[test]
    fn interprets_messages() {
        let output = ConsoleOutput::new();
        assert_eq!(
            output.interpret_message(&Message::SelectionOverLimit {
                position: 4,
                select_count: 2,
                selected: 3
            }),
            "⚠️ Question 5 asks for 2 answers, you selected 3."
        );
        assert!(output
            .interpret_message(&Message::TimeRemaining(Duration::from_secs(60)))
            .contains("01:00"));
    }

    #[test]
    fn renders_selected_options() {
        let question = fixtures::multiple(8, &['A', 'C']);
        let selection: BTreeSet<char> = vec!['C'].into_iter().collect();
        let screen = render_question(
            2,
            65,
            &question,
            &selection,
            Duration::from_secs(75),
            SelectionAdvice::Missing(1),
        );
        assert!(screen.contains("Question 3 of 65"));
        assert!(screen.contains("01:15"));
        assert!(screen.contains("(Select 2)"));
        assert!(screen.contains("[x] C. example option C 8"));
        assert!(screen.contains("[ ] A. example option A 8"));
        assert!(screen.contains("Select 1 more."));
    }

    #[test]
    fn renders_map_in_rows() {
        let mut map = vec![QuestionStatus::Unanswered; 12];
        map[0] = QuestionStatus::Answered;
        map[11] = QuestionStatus::Current;
        let rendered = render_map(&map);
        let rows: Vec<&str> = rendered.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("✓  1"));
        assert_eq!(rows[1], "· 11 > 12");
    }

    #[test]
    fn renders_review_with_explanations() {
        let exam = vec![fixtures::single(1, 'B'), fixtures::multiple(2, &['A', 'D'])];
        let mut answers = Answers::new();
        answers.set(0, vec!['B'].into_iter().collect());
        let report = score(&exam, &answers);

        let review = render_review(&exam, &report);
        assert!(review.contains("✅ Question 1"));
        assert!(review.contains("❌ Question 2"));
        assert!(review.contains("Your answer: (none)"));
        assert!(review.contains("Correct answer: A, D"));
        assert!(review.contains("Explanation: example explanation 2"));
    }

    #[test]
    fn renders_results_summary() {
        let exam: Vec<_> = (1..=4).map(|id| fixtures::single(id, 'A')).collect();
        let mut answers = Answers::new();
        for position in 0..3 {
            answers.set(position, vec!['A'].into_iter().collect());
        }
        let rendered = render_results(&score(&exam, &answers), Duration::from_secs(125));
        assert!(rendered.contains("Score: 75.0%"));
        assert!(rendered.contains("Incorrect: 1"));
        assert!(rendered.contains("Time taken: 02:05"));
    }
}
