use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::bank::QuestionBank;
use crate::commands::{parse_command, Command};
use crate::config::Config;
use crate::exam::{Clock, PhaseKind, Session, SelectionAdvice, SystemClock};
use crate::output::console::{self, ConsoleOutput};
use crate::output::ExamOutput;

#[derive(Debug, Eq, PartialEq)]
pub enum Reply {
    Redraw,
    Show(String),
    Quit,
}

/// The interactive exam: a session plus what it needs to restart and export.
pub struct Terminal<O: ExamOutput + Clone, C: Clock = SystemClock> {
    session: Session<O, C>,
    bank: QuestionBank,
    rng: StdRng,
    export_dir: PathBuf,
}

impl<O: ExamOutput + Clone, C: Clock> Terminal<O, C> {
    pub fn new(session: Session<O, C>, bank: QuestionBank, rng: StdRng, export_dir: PathBuf) -> Self {
        Terminal {
            session,
            bank,
            rng,
            export_dir,
        }
    }

    pub fn session(&self) -> &Session<O, C> {
        &self.session
    }

    pub fn start(&mut self) -> Result<()> {
        let count = self.session.settings().question_count;
        self.session
            .start_with_rng(&self.bank, count, &mut self.rng)
            .context("Could not start the exam")
    }

    pub fn screen(&mut self) -> String {
        match self.session.observe() {
            PhaseKind::NotStarted => "Type `new` to start an exam or `q` to quit.".to_owned(),
            PhaseKind::InProgress => self.question_screen(),
            PhaseKind::Finished => match (self.session.report(), self.session.time_taken()) {
                (Ok(report), Some(time_taken)) => format!(
                    "{}\n\n{}",
                    console::render_results(&report, time_taken),
                    console::render_results_help()
                ),
                _ => console::render_results_help(),
            },
        }
    }

    fn question_screen(&self) -> String {
        let (position, question) = match (self.session.current_index(), self.session.current_question()) {
            (Some(position), Some(question)) => (position, question),
            _ => return String::new(),
        };
        let advice = self
            .session
            .selection_advice(position)
            .unwrap_or(SelectionAdvice::Complete);
        console::render_question(
            position,
            self.session.exam().len(),
            question,
            &self.session.selection(position),
            self.session.remaining_time(),
            advice,
        )
    }

    fn current_position(&self) -> Result<usize> {
        match self.session.current_index() {
            Some(position) => Ok(position),
            None => bail!("There is no exam in progress, type `new` to start one"),
        }
    }

    pub fn handle(&mut self, command: Command) -> Result<Reply> {
        let reply = match command {
            Command::Select(key) => {
                let position = self.current_position()?;
                self.session.select_option(position, key)?;
                Reply::Redraw
            }
            Command::Next => {
                self.session.next()?;
                Reply::Redraw
            }
            Command::Previous => {
                self.session.previous()?;
                Reply::Redraw
            }
            Command::Goto(position) => {
                self.session.goto(position)?;
                Reply::Redraw
            }
            Command::Clear => {
                let position = self.current_position()?;
                self.session.clear_answer(position)?;
                Reply::Redraw
            }
            Command::Map => {
                self.session.observe();
                let map = self.session.question_map();
                if map.is_empty() {
                    bail!("There is no exam in progress");
                }
                Reply::Show(format!(
                    "{}\n\nAnswered {} of {}",
                    console::render_map(&map),
                    self.session.answered_count(),
                    map.len()
                ))
            }
            Command::Finish => {
                self.session.finish()?;
                Reply::Redraw
            }
            Command::Reset => {
                self.session.reset();
                Reply::Redraw
            }
            Command::Review => {
                let report = self.session.report()?;
                Reply::Show(console::render_review(self.session.exam(), &report))
            }
            Command::Export => {
                let path = self.session.export()?.write_to_dir(&self.export_dir)?;
                Reply::Show(format!("💾 Results saved to {}", path.display()))
            }
            Command::New => {
                if self.session.observe() == PhaseKind::InProgress {
                    bail!("Finish or reset the current exam first");
                }
                self.start()?;
                Reply::Redraw
            }
            Command::Quit => Reply::Quit,
            Command::Help => Reply::Show(match self.session.phase() {
                PhaseKind::InProgress => console::render_exam_help(),
                _ => console::render_results_help(),
            }),
        };
        Ok(reply)
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush().context("Could not write to the terminal")
}

pub fn run(config: &Config, seed: Option<u64>) -> Result<()> {
    let output = ConsoleOutput::new();
    let bank = QuestionBank::load(&config.bank_path, &output);
    if bank.is_empty() {
        bail!(
            "No questions to draw from, check {} or use `import`",
            config.bank_path.display()
        );
    }

    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let session = Session::new(config.settings.clone(), output);
    let mut terminal = Terminal::new(session, bank, rng, config.export_dir.clone());
    terminal.start()?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut redraw = true;
    loop {
        if redraw {
            println!("\n{}", terminal.screen());
        }
        prompt()?;
        let line = match lines.next() {
            Some(line) => line.context("Could not read from the terminal")?,
            None => break,
        };
        if line.trim().is_empty() {
            redraw = true;
            continue;
        }

        let result = parse_command(&line).and_then(|command| terminal.handle(command));
        redraw = match result {
            Ok(Reply::Redraw) => true,
            Ok(Reply::Show(text)) => {
                println!("{}", text);
                false
            }
            Ok(Reply::Quit) => break,
            Err(e) => {
                warn!("{:#}", e);
                println!("{:#}", e);
                false
            }
        };
    }

    info!("Leaving the exam room");
    Ok(())
}
