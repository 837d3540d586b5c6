use crate::bank::{Options, Question, QuestionBank, QuestionType};

pub fn single(id: i64, correct: char) -> Question {
    question(id, QuestionType::Single, "ABCD", &[correct])
}

pub fn multiple(id: i64, correct: &[char]) -> Question {
    question(id, QuestionType::Multiple, "ABCDE", correct)
}

pub fn question(id: i64, question_type: QuestionType, letters: &str, correct: &[char]) -> Question {
    let mut options = Options::new();
    for letter in letters.chars() {
        options.insert(letter, format!("example option {} {}", letter, id));
    }
    Question {
        id,
        category: "example category".to_owned(),
        text: format!("example question {}", id),
        options,
        correct_answer: correct.iter().copied().collect(),
        question_type,
        select_count: match question_type {
            QuestionType::Single => 1,
            QuestionType::Multiple => correct.len() as u32,
        },
        explanation: Some(format!("example explanation {}", id)),
    }
}

pub fn bank(size: i64) -> QuestionBank {
    QuestionBank::new((1..=size).map(|id| single(id, 'A')).collect()).unwrap()
}
