use chrono::TimeZone;
use std::time::Duration;

use super::*;
use crate::bank::fixtures;
use crate::output::mock::MockExamOutput;

struct Context {
    state: FinishedState<MockExamOutput>,
    output: MockExamOutput,
}

fn make_context() -> Context {
    let exam = vec![
        fixtures::single(21, 'B'),
        fixtures::multiple(22, &['A', 'D']),
        fixtures::single(23, 'C'),
    ];
    let mut answers = Answers::new();
    answers.set(0, vec!['B'].into_iter().collect());
    answers.set(1, vec!['D', 'A'].into_iter().collect());
    answers.set(2, vec!['A'].into_iter().collect());

    let start_time = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let finished_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 42, 7).unwrap();
    let output = MockExamOutput::new();
    let state = FinishedState::new(
        exam,
        answers,
        start_time,
        finished_at,
        Duration::from_secs(47 * 60 + 53),
        output.clone(),
    );
    Context { state, output }
}

#[test]
fn announces_end_of_exam() {
    let mut ctx = make_context();
    ctx.state.on_begin();
    assert_eq!(ctx.output.flush(), vec![Message::ExamFinished]);
    assert!(!ctx.state.is_over());
}

#[test]
fn time_taken_spans_start_to_finish() {
    let ctx = make_context();
    assert_eq!(ctx.state.time_taken(), Duration::from_secs(42 * 60 + 7));
    assert_eq!(ctx.state.remaining_time(), Duration::from_secs(47 * 60 + 53));
}

#[test]
fn scores_the_answers() {
    let ctx = make_context();
    let report = ctx.state.report();
    assert_eq!(report.total, 3);
    assert_eq!(report.correct_count, 2);
    assert!(!report.per_question[2].is_correct);
}

#[test]
fn exports_results() {
    let ctx = make_context();
    let exam_date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 45, 0).unwrap();
    let export = ctx.state.export(exam_date);
    assert_eq!(export.total_questions, 3);
    assert_eq!(export.correct_answers, 2);
    assert_eq!(export.time_taken, "0:42:07");
    assert_eq!(export.detailed_answers[1].question_id, 22);
}
