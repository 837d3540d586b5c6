use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use directories_next::BaseDirs;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::exam::Settings;

pub const DEFAULT_BANK_PATH: &str = "questions.json";

const BANK_PATH_VAR: &str = "EXAM_BANK_PATH";
const QUESTION_COUNT_VAR: &str = "EXAM_QUESTION_COUNT";
const DURATION_VAR: &str = "EXAM_DURATION_MINUTES";
const EXPORT_DIR_VAR: &str = "EXAM_EXPORT_DIR";

fn get_export_dir() -> Result<PathBuf> {
    let mut dir = BaseDirs::new()
        .context("could not locate system directories")?
        .data_dir()
        .to_path_buf();
    dir.push("exam-room");
    dir.push("results");
    Ok(dir)
}

/// Rejects durations the exam clock cannot count down to.
fn duration_from_minutes(minutes: u64) -> Result<Duration> {
    let too_long = || anyhow!("An exam of {} minutes is longer than the clock allows", minutes);
    let duration = minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(too_long)?;
    chrono::Duration::from_std(duration)
        .ok()
        .and_then(|deadline| Utc::now().checked_add_signed(deadline))
        .ok_or_else(too_long)?;
    Ok(duration)
}

/// Values given on the command line. They win over the environment.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub bank_path: Option<PathBuf>,
    pub question_count: Option<usize>,
    pub duration_minutes: Option<u64>,
    pub export_dir: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bank_path: PathBuf,
    pub export_dir: PathBuf,
    pub settings: Settings,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bank_path: PathBuf::from(DEFAULT_BANK_PATH),
            export_dir: get_export_dir().unwrap_or_else(|_| PathBuf::from(".")),
            settings: Settings::default(),
        }
    }
}

impl Config {
    pub fn load(overrides: &Overrides) -> Result<Config> {
        let mut config = Config::from_lookup(|key| env::var(key).ok())?;
        config.apply(overrides)?;
        Ok(config)
    }

    fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup(BANK_PATH_VAR) {
            config.bank_path = PathBuf::from(path);
        }
        if let Some(count) = lookup(QUESTION_COUNT_VAR) {
            config.settings.question_count = count
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{} must be a number, got {:?}", QUESTION_COUNT_VAR, count))?;
        }
        if let Some(minutes) = lookup(DURATION_VAR) {
            let minutes: u64 = minutes
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number, got {:?}", DURATION_VAR, minutes))?;
            config.settings.duration = duration_from_minutes(minutes)
                .with_context(|| format!("{} is out of range", DURATION_VAR))?;
        }
        if let Some(dir) = lookup(EXPORT_DIR_VAR) {
            config.export_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    fn apply(&mut self, overrides: &Overrides) -> Result<()> {
        if let Some(path) = &overrides.bank_path {
            self.bank_path = path.clone();
        }
        if let Some(count) = overrides.question_count {
            self.settings.question_count = count;
        }
        if let Some(minutes) = overrides.duration_minutes {
            self.settings.duration = duration_from_minutes(minutes)?;
        }
        if let Some(dir) = &overrides.export_dir {
            self.export_dir = dir.clone();
        }

        if self.settings.duration == Duration::default() {
            return Err(anyhow!("The exam duration must be at least one minute"));
        }
        debug!("Using configuration {:?}", self);
        Ok(())
    }
}
