use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::bank::{BankStatistics, QuestionBank};

/// Validates an uploaded bank file and stores it where `take` looks for it.
pub fn import_bank(source: &Path, destination: &Path) -> Result<BankStatistics> {
    let bytes = fs::read(source).with_context(|| format!("Could not read {}", source.display()))?;
    let bank = QuestionBank::from_slice(&bytes)
        .with_context(|| format!("{} is not a valid question bank", source.display()))?;
    bank.save(destination)
        .with_context(|| format!("Could not write {}", destination.display()))?;
    info!(
        "Imported {} questions from {} into {}",
        bank.len(),
        source.display(),
        destination.display()
    );
    Ok(bank.statistics())
}

pub fn run(source: &Path, destination: &Path) -> Result<()> {
    let statistics = import_bank(source, destination)?;
    println!(
        "📚 Imported {} questions into {} ({} single answer, {} multiple answer).",
        statistics.single + statistics.multiple,
        destination.display(),
        statistics.single,
        statistics.multiple
    );
    Ok(())
}
