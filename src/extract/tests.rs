use super::*;

const SIMPLE_BLOCK: &str =
    "Question: 1\n[Cat]\nWhat is X?\nA. foo\nB. bar\nAnswer: B\nExplanation: because\n";

#[test]
fn extracts_simple_block() {
    let (questions, summary) = process_text(SIMPLE_BLOCK);
    assert_eq!(questions.len(), 1);
    assert_eq!(summary.extracted, 1);
    assert_eq!(summary.discarded, 0);

    let question = &questions[0];
    assert_eq!(question.id, 1);
    assert_eq!(question.category, "Cat");
    assert_eq!(question.text, "What is X?");
    assert_eq!(
        question.options.iter().collect::<Vec<_>>(),
        vec![('A', "foo"), ('B', "bar")]
    );
    assert_eq!(question.correct_answer.iter().copied().collect::<Vec<_>>(), vec!['B']);
    assert_eq!(question.question_type, QuestionType::Single);
    assert_eq!(question.select_count, 1);
    assert_eq!(question.explanation.as_deref(), Some("because"));
}

#[test]
fn splits_blocks_and_drops_preamble() {
    let text = "Exam dump v2\nSome header\nQuestion: 4\nfirst\nQuestion:7 second";
    let blocks = split_blocks(text);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].0, 4);
    assert_eq!(blocks[0].1.trim(), "first");
    assert_eq!(blocks[1].0, 7);
    assert_eq!(blocks[1].1.trim(), "second");
}

#[test]
fn category_defaults_when_missing() {
    assert_eq!(extract_category("What is X?\nA. foo\nAnswer: A"), "General");
}

#[test]
fn category_after_options_is_ignored() {
    let block = "What is X?\nA. foo [not a tag]\nB. bar\nAnswer: A";
    assert_eq!(extract_category(block), "General");
}

#[test]
fn question_text_without_category_starts_at_block() {
    let block = "- What is X?\nA. foo\nAnswer: A";
    assert_eq!(extract_question_text(block).as_deref(), Some("What is X?"));
}

#[test]
fn question_text_collapses_lines() {
    let block = "[Cloud]\nWhich service\nstores objects?\nA. S3\nB. EC2\nAnswer: A";
    assert_eq!(
        extract_question_text(block).as_deref(),
        Some("Which service stores objects?")
    );
}

#[test]
fn question_text_requires_options() {
    assert_eq!(extract_question_text("[Cat]\nWhat is X?\nAnswer: A"), None);
}

#[test]
fn options_span_multiple_lines() {
    let block = "[Cat]\nQ?\nA. first line\ncontinued\nB.   second\nC. third\nAnswer: C";
    let options = extract_options(block);
    assert_eq!(options.len(), 3);
    assert_eq!(options.get('A'), Some("first line continued"));
    assert_eq!(options.get('B'), Some("second"));
    assert_eq!(options.get('C'), Some("third"));
}

#[test]
fn options_stop_at_answer_marker() {
    let block = "[Cat]\nQ?\nA. foo\nB. bar Answer: A\nExplanation: See D. above";
    let options = extract_options(block);
    assert_eq!(options.len(), 2);
    assert_eq!(options.get('B'), Some("bar"));
    assert!(!options.contains('D'));
}

#[test]
fn options_keep_the_first_repeated_letter() {
    let block = "[Cat]\nQ?\nA. foo\nB. bar\nA. again\nAnswer: A";
    let options = extract_options(block);
    assert_eq!(options.len(), 2);
    assert_eq!(options.get('A'), Some("foo"));
}

#[test]
fn correct_answer_with_several_letters() {
    assert_eq!(extract_correct_answer("Answer: A, C"), vec!['A', 'C']);
    assert_eq!(extract_correct_answer("Answer: B D E\nExplanation: x"), vec!['B', 'D', 'E']);
    assert_eq!(extract_correct_answer("Answer: C,C"), vec!['C']);
}

#[test]
fn correct_answer_does_not_swallow_next_marker() {
    assert_eq!(extract_correct_answer("Answer: B\nExplanation: because"), vec!['B']);
}

#[test]
fn correct_answer_missing() {
    assert!(extract_correct_answer("A. foo\nB. bar").is_empty());
    assert!(extract_correct_answer("Answer: none").is_empty());
}

#[test]
fn explanation_is_collapsed() {
    let block = "Answer: A\nExplanation:  The first\n  option   is right.\n";
    assert_eq!(
        extract_explanation(block).as_deref(),
        Some("The first option is right.")
    );
    assert_eq!(extract_explanation("Answer: A"), None);
    assert_eq!(extract_explanation("Answer: A\nExplanation:   "), None);
}

#[test]
fn infers_multiple_answer_questions() {
    assert_eq!(
        infer_question_type("Which are valid? (Select TWO.)", ""),
        (QuestionType::Multiple, 2)
    );
    assert_eq!(
        infer_question_type("Choose three options.", ""),
        (QuestionType::Multiple, 3)
    );
    assert_eq!(
        infer_question_type("Which steps apply? Select 4", ""),
        (QuestionType::Multiple, 4)
    );
    assert_eq!(
        infer_question_type("Which one?", "A. x\nB. y\n(Select two)"),
        (QuestionType::Multiple, 2)
    );
}

#[test]
fn infers_single_answer_questions() {
    assert_eq!(infer_question_type("Which one?", ""), (QuestionType::Single, 1));
    assert_eq!(infer_question_type("Select 1 answer", ""), (QuestionType::Single, 1));
}

#[test]
fn discards_invalid_blocks() {
    let text = "Question: 1\n[Cat]\nNo options here\nAnswer: A\n\
                Question: 2\n[Cat]\nNo answer?\nA. foo\nB. bar\n\
                Question: 3\n[Cat]\nAnswer outside options?\nA. foo\nB. bar\nAnswer: D\n\
                Question: 4\n[Cat]\nFine?\nA. foo\nB. bar\nAnswer: A\n";
    let (questions, summary) = process_text(text);
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].id, 4);
    assert_eq!(summary.extracted, 1);
    assert_eq!(summary.discarded, 3);
}

#[test]
fn keeps_first_of_repeated_numbers() {
    let text = "Question: 1\n[Cat]\nFirst?\nA. foo\nAnswer: A\n\
                Question: 1\n[Cat]\nSecond?\nA. foo\nAnswer: A\n";
    let (questions, summary) = process_text(text);
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].text, "First?");
    assert_eq!(summary.discarded, 1);
}

#[test]
fn broken_block_does_not_hide_a_later_repeat() {
    let text = "Question: 7\n[Cat]\nNo options here\nAnswer: A\n\
                Question: 7\n[Cat]\nSecond try?\nA. foo\nB. bar\nAnswer: B\n";
    let (questions, summary) = process_text(text);
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].text, "Second try?");
    assert_eq!(summary.extracted, 1);
    assert_eq!(summary.discarded, 1);
}

#[test]
fn counts_question_types() {
    let text = "Question: 1\n[Cat]\nPick one?\nA. foo\nB. bar\nAnswer: A\n\
                Question: 2\n[Cat]\nPick two? (Select TWO)\nA. foo\nB. bar\nC. baz\nAnswer: A, C\n";
    let (questions, summary) = process_text(text);
    assert_eq!(questions.len(), 2);
    assert_eq!(summary.single, 1);
    assert_eq!(summary.multiple, 1);
    assert_eq!(questions[1].select_count, 2);
    assert_eq!(
        questions[1].correct_answer.iter().copied().collect::<Vec<_>>(),
        vec!['A', 'C']
    );
}
