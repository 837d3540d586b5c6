use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::bank::QuestionBank;
use crate::exam::generator;
use crate::extract::{self, ExtractionSummary};

pub const DEFAULT_OUTPUT: &str = "questions_data.json";
const SAMPLE_FILE_NAME: &str = "sample_exam.json";

pub struct Extraction {
    pub summary: ExtractionSummary,
    pub sample: Option<(PathBuf, usize)>,
}

/// Extracts questions from `input`, writes them to `output` and optionally a sample exam beside it.
pub fn extract_file(input: &Path, output: &Path, sample: Option<usize>) -> Result<Extraction> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Could not read {}", input.display()))?;
    let (questions, summary) = extract::process_text(&text);
    if questions.is_empty() {
        bail!("No valid questions found in {}", input.display());
    }

    let bank = QuestionBank::new(questions)?;
    bank.save(output)
        .with_context(|| format!("Could not write {}", output.display()))?;
    info!("Saved {} questions to {}", bank.len(), output.display());

    let sample = match sample {
        Some(count) => {
            let generated = generator::generate(bank.questions(), count, &mut rand::thread_rng());
            let path = output.with_file_name(SAMPLE_FILE_NAME);
            let size = generated.questions.len();
            QuestionBank::new(generated.questions)?
                .save(&path)
                .with_context(|| format!("Could not write {}", path.display()))?;
            Some((path, size))
        }
        None => None,
    };

    Ok(Extraction { summary, sample })
}

pub fn run(input: &Path, output: &Path, sample: Option<usize>) -> Result<()> {
    let extraction = extract_file(input, output, sample)?;
    let summary = extraction.summary;
    println!(
        "Extracted {} questions into {}:\n- single answer: {}\n- multiple answer: {}\n- discarded blocks: {}",
        summary.extracted,
        output.display(),
        summary.single,
        summary.multiple,
        summary.discarded
    );
    if let Some((path, size)) = extraction.sample {
        println!("Wrote a sample exam of {} questions to {}", size, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Practice exam\n\
        Question: 1\n[Storage]\nWhich stores objects?\nA. S3\nB. EC2\nAnswer: A\nExplanation: S3 is object storage.\n\
        Question: 2\n[Compute]\nWhich run code? (Select TWO)\nA. Lambda\nB. S3\nC. EC2\nAnswer: A, C\n\
        Question: 3\nBroken block without options\n";

    #[test]
    fn writes_bank_and_sample() {
        let directory = tempfile::tempdir().unwrap();
        let input = directory.path().join("exam.txt");
        let output = directory.path().join("questions_data.json");
        fs::write(&input, TEXT).unwrap();

        let extraction = extract_file(&input, &output, Some(5)).unwrap();
        assert_eq!(extraction.summary.extracted, 2);
        assert_eq!(extraction.summary.discarded, 1);

        let bank = QuestionBank::open(&output).unwrap();
        assert_eq!(bank.statistics().multiple, 1);
        assert_eq!(bank.questions()[1].select_count, 2);

        let (sample_path, size) = extraction.sample.unwrap();
        assert_eq!(size, 2);
        assert_eq!(sample_path, directory.path().join("sample_exam.json"));
        assert_eq!(QuestionBank::open(&sample_path).unwrap().len(), 2);
    }

    #[test]
    fn fails_without_questions() {
        let directory = tempfile::tempdir().unwrap();
        let input = directory.path().join("exam.txt");
        fs::write(&input, "nothing to see").unwrap();
        assert!(extract_file(&input, &directory.path().join("out.json"), None).is_err());
    }
}
