//! Turns exam text extracted from a PDF into question records.
//!
//! The input is irregular, so every rule below is a best-effort pattern over plain
//! text. Each rule is a separate function so its edge cases can be handled alone.

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};
use unidecode::unidecode;

use crate::bank::question::DEFAULT_CATEGORY;
use crate::bank::{Options, Question, QuestionType};

#[cfg(test)]
mod tests;

lazy_static! {
    static ref QUESTION_MARKER_REGEX: Regex = Regex::new(r"Question:\s*(\d+)").unwrap();
    static ref CATEGORY_REGEX: Regex = Regex::new(r"\[([^\]\n]*)\]").unwrap();
    static ref OPTION_MARKER_REGEX: Regex = Regex::new(r"\b([A-E])\.(?:\s+|$)").unwrap();
    static ref ANSWER_MARKER_REGEX: Regex = Regex::new(r"Answer:").unwrap();
    static ref ANSWER_REGEX: Regex = Regex::new(r"Answer:\s*((?:[A-E]\b[\s,]*)+)").unwrap();
    static ref EXPLANATION_REGEX: Regex = Regex::new(r"(?s)Explanation:\s*(.*)").unwrap();
    static ref SELECT_COUNT_REGEX: Regex =
        Regex::new(r"select\s+(two|three|\d+)|choose\s+(two|three)").unwrap();
    static ref LEADING_PUNCTUATION_REGEX: Regex = Regex::new(r"^[^\w]*").unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExtractionSummary {
    pub extracted: usize,
    pub discarded: usize,
    pub single: usize,
    pub multiple: usize,
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}

/// Splits the text on `Question: <n>` markers, dropping anything before the first one.
pub fn split_blocks(text: &str) -> Vec<(i64, &str)> {
    let markers: Vec<_> = QUESTION_MARKER_REGEX.captures_iter(text).collect();
    markers
        .iter()
        .enumerate()
        .filter_map(|(index, captures)| {
            let whole = captures.get(0)?;
            let number = captures[1].parse::<i64>().ok()?;
            let end = markers
                .get(index + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());
            Some((number, &text[whole.end()..end]))
        })
        .collect()
}

fn first_option_start(block: &str) -> Option<usize> {
    let limit = ANSWER_MARKER_REGEX
        .find(block)
        .map_or(block.len(), |m| m.start());
    OPTION_MARKER_REGEX
        .find(&block[..limit])
        .map(|m| m.start())
}

fn category_match(block: &str) -> Option<regex::Match<'_>> {
    let limit = first_option_start(block).unwrap_or(block.len());
    CATEGORY_REGEX
        .captures(&block[..limit])
        .and_then(|captures| captures.get(1))
}

pub fn extract_category(block: &str) -> String {
    category_match(block)
        .map(|m| m.as_str().trim().to_owned())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned())
}

pub fn extract_question_text(block: &str) -> Option<String> {
    let start = category_match(block).map_or(0, |m| m.end() + 1);
    let end = first_option_start(block)?;
    if start > end {
        return None;
    }
    let text = LEADING_PUNCTUATION_REGEX.replace(block[start..end].trim(), "");
    Some(collapse_whitespace(&text)).filter(|t| !t.is_empty())
}

/// Option text runs from its marker to the next marker, `Answer:`, or the end of the block.
pub fn extract_options(block: &str) -> Options {
    let mut options = Options::new();
    let start = match first_option_start(block) {
        Some(start) => start,
        None => return options,
    };
    let end = ANSWER_MARKER_REGEX
        .find_at(block, start)
        .map_or(block.len(), |m| m.start());
    let region = &block[start..end];

    let markers: Vec<_> = OPTION_MARKER_REGEX.captures_iter(region).collect();
    for (index, captures) in markers.iter().enumerate() {
        let (letter, marker) = match (captures[1].chars().next(), captures.get(0)) {
            (Some(letter), Some(marker)) => (letter, marker),
            _ => continue,
        };
        let text_end = markers
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map_or(region.len(), |m| m.start());
        let text = collapse_whitespace(&region[marker.end()..text_end]);
        if text.is_empty() {
            continue;
        }
        if !options.insert(letter, text) {
            debug!("Ignoring repeated option {}", letter);
        }
    }
    options
}

pub fn extract_correct_answer(block: &str) -> Vec<char> {
    ANSWER_REGEX
        .captures(block)
        .map(|captures| {
            captures[1]
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter_map(|token| {
                    let mut chars = token.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c @ 'A'..='E'), None) => Some(c),
                        _ => None,
                    }
                })
                .unique()
                .collect()
        })
        .unwrap_or_default()
}

pub fn extract_explanation(block: &str) -> Option<String> {
    EXPLANATION_REGEX
        .captures(block)
        .map(|captures| collapse_whitespace(&captures[1]))
        .filter(|e| !e.is_empty())
}

/// Looks for "select two", "select 3", "choose three" and the like.
pub fn infer_question_type(question_text: &str, block: &str) -> (QuestionType, u32) {
    let haystack = unidecode(&format!("{} {}", question_text, block)).to_lowercase();
    let count = SELECT_COUNT_REGEX.captures(&haystack).and_then(|captures| {
        let word = captures.get(1).or_else(|| captures.get(2))?.as_str();
        match word {
            "two" => Some(2),
            "three" => Some(3),
            digits => digits.parse::<u32>().ok(),
        }
    });
    match count {
        Some(count) if count >= 2 => (QuestionType::Multiple, count),
        _ => (QuestionType::Single, 1),
    }
}

pub fn extract_question(id: i64, block: &str) -> Option<Question> {
    let block = block.trim();

    let text = match extract_question_text(block) {
        Some(text) => text,
        None => {
            warn!("Question {}: no question text found", id);
            return None;
        }
    };

    let options = extract_options(block);
    if options.is_empty() {
        warn!("Question {}: no options found", id);
        return None;
    }

    let correct_answer = extract_correct_answer(block);
    if correct_answer.is_empty() {
        warn!("Question {}: no answer found", id);
        return None;
    }
    if let Some(missing) = correct_answer.iter().find(|k| !options.contains(**k)) {
        warn!("Question {}: answer {} is not one of its options", id, missing);
        return None;
    }

    let (question_type, select_count) = infer_question_type(&text, block);

    Some(Question {
        id,
        category: extract_category(block),
        text,
        options,
        correct_answer: correct_answer.into_iter().collect::<BTreeSet<char>>(),
        question_type,
        select_count,
        explanation: extract_explanation(block),
    })
}

/// Extracts every valid question, skipping broken blocks. A repeated number keeps its first valid block.
pub fn process_text(text: &str) -> (Vec<Question>, ExtractionSummary) {
    let mut summary = ExtractionSummary::default();
    let mut seen = HashSet::new();
    let mut questions = Vec::new();

    for (id, block) in split_blocks(text) {
        if seen.contains(&id) {
            warn!("Question {} appears more than once, keeping the first", id);
            summary.discarded += 1;
            continue;
        }
        match extract_question(id, block) {
            Some(question) => {
                seen.insert(id);
                match question.question_type {
                    QuestionType::Single => summary.single += 1,
                    QuestionType::Multiple => summary.multiple += 1,
                }
                questions.push(question);
            }
            None => summary.discarded += 1,
        }
    }

    summary.extracted = questions.len();
    (questions, summary)
}
