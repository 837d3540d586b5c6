use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{ExamError, Result};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Single,
    Multiple,
}

impl Default for QuestionType {
    fn default() -> Self {
        QuestionType::Single
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Single => write!(f, "single"),
            QuestionType::Multiple => write!(f, "multiple"),
        }
    }
}

/// Option letters and their text, in display order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Options(Vec<(char, String)>);

impl Options {
    pub fn new() -> Self {
        Options(Vec::new())
    }

    /// Appends an option unless its key is already present.
    pub fn insert(&mut self, key: char, text: String) -> bool {
        if self.contains(key) {
            return false;
        }
        self.0.push((key, text));
        true
    }

    pub fn contains(&self, key: char) -> bool {
        self.0.iter().any(|(k, _)| *k == key)
    }

    pub fn get(&self, key: char) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, text)| text.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.0.iter().map(|(k, text)| (*k, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn parse_option_key(raw: &str) -> Option<char> {
    let mut chars = raw.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}

impl Serialize for Options {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, text) in &self.0 {
            map.serialize_entry(&key.to_string(), text)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Options {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionsVisitor;

        impl<'de> Visitor<'de> for OptionsVisitor {
            type Value = Options;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object mapping option letters to option text")
            }

            fn visit_map<M>(self, mut access: M) -> std::result::Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut options = Options::new();
                while let Some((key, text)) = access.next_entry::<String, String>()? {
                    let letter = parse_option_key(&key).ok_or_else(|| {
                        de::Error::invalid_value(de::Unexpected::Str(&key), &"a single letter")
                    })?;
                    if !options.insert(letter, text) {
                        return Err(de::Error::custom(format!("duplicate option {}", letter)));
                    }
                }
                Ok(options)
            }
        }

        deserializer.deserialize_map(OptionsVisitor)
    }
}

/// A question record as it appears in a bank file.
#[derive(Debug, Deserialize, Serialize)]
pub struct RawQuestion {
    pub id: i64,
    #[serde(default = "default_category")]
    pub category: String,
    pub question: String,
    pub options: Options,
    pub correct_answer: Vec<String>,
    #[serde(default)]
    pub question_type: QuestionType,
    #[serde(default = "default_select_count")]
    pub select_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

pub const DEFAULT_CATEGORY: &str = "General";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_owned()
}

fn default_select_count() -> u32 {
    1
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Question {
    pub id: i64,
    pub category: String,
    pub text: String,
    pub options: Options,
    pub correct_answer: BTreeSet<char>,
    pub question_type: QuestionType,
    pub select_count: u32,
    pub explanation: Option<String>,
}

impl Question {
    pub fn is_selection_correct(&self, selection: &BTreeSet<char>) -> bool {
        *selection == self.correct_answer
    }

    pub fn is_multiple(&self) -> bool {
        self.question_type == QuestionType::Multiple
    }
}

impl std::convert::TryFrom<RawQuestion> for Question {
    type Error = ExamError;

    fn try_from(raw_question: RawQuestion) -> Result<Self> {
        let id = raw_question.id;

        let mut correct_answer = BTreeSet::new();
        for answer in &raw_question.correct_answer {
            let key = parse_option_key(answer).ok_or_else(|| {
                ExamError::Format(format!("question {}: invalid answer key {:?}", id, answer))
            })?;
            if !raw_question.options.contains(key) {
                return Err(ExamError::Format(format!(
                    "question {}: answer {} is not one of its options",
                    id, key
                )));
            }
            correct_answer.insert(key);
        }
        if correct_answer.is_empty() {
            return Err(ExamError::Format(format!(
                "question {} has no correct answer",
                id
            )));
        }

        let select_count = match raw_question.question_type {
            QuestionType::Single => 1,
            QuestionType::Multiple => raw_question.select_count.max(1),
        };
        if raw_question.question_type == QuestionType::Multiple
            && select_count as usize != correct_answer.len()
        {
            tracing::warn!(
                "Question {} asks for {} answers but has {} correct answers",
                id,
                select_count,
                correct_answer.len()
            );
        }
        if raw_question.question_type == QuestionType::Single && correct_answer.len() > 1 {
            tracing::warn!(
                "Single answer question {} lists {} correct answers",
                id,
                correct_answer.len()
            );
        }

        let explanation = raw_question
            .explanation
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty());

        Ok(Question {
            id,
            category: raw_question.category,
            text: raw_question.question,
            options: raw_question.options,
            correct_answer,
            question_type: raw_question.question_type,
            select_count,
            explanation,
        })
    }
}

impl From<&Question> for RawQuestion {
    fn from(question: &Question) -> Self {
        RawQuestion {
            id: question.id,
            category: question.category.clone(),
            question: question.text.clone(),
            options: question.options.clone(),
            correct_answer: question
                .correct_answer
                .iter()
                .map(|k| k.to_string())
                .collect(),
            question_type: question.question_type,
            select_count: question.select_count,
            explanation: question.explanation.clone(),
        }
    }
}
