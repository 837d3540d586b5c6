use anyhow::{anyhow, Result};

pub mod extract;
pub mod import;
pub mod take;


/// A line typed at the exam prompt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Select(char),
    Next,
    Previous,
    /// Zero-based; `g 1` is position 0.
    Goto(isize),
    Clear,
    Map,
    Finish,
    Reset,
    Review,
    Export,
    New,
    Quit,
    Help,
}

/// Option letters A to E always pick an option, in either case. Other lower-case
/// single letters are shortcuts; upper-case letters past E pick an option.
pub fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let name = words.next().ok_or_else(|| anyhow!("Type `h` for help"))?;
    let argument = words.next();
    if words.next().is_some() {
        return Err(anyhow!("Too many arguments in `{}`", line.trim()));
    }

    let command = match (name, argument) {
        ("n", None) | ("next", None) => Command::Next,
        ("p", None) | ("prev", None) => Command::Previous,
        ("g", Some(number)) | ("goto", Some(number)) => {
            let number: isize = number
                .parse()
                .map_err(|_| anyhow!("`{}` is not a question number", number))?;
            let position = number
                .checked_sub(1)
                .ok_or_else(|| anyhow!("`{}` is not a question number", number))?;
            Command::Goto(position)
        }
        ("g", None) | ("goto", None) => return Err(anyhow!("Which question? Try `g 12`")),
        ("clear", None) => Command::Clear,
        ("m", None) | ("map", None) => Command::Map,
        ("f", None) | ("finish", None) => Command::Finish,
        ("r", None) | ("reset", None) => Command::Reset,
        ("q", None) | ("quit", None) => Command::Quit,
        ("h", None) | ("help", None) => Command::Help,
        ("review", None) => Command::Review,
        ("export", None) => Command::Export,
        ("new", None) => Command::New,
        (letter, None) if is_option_key(letter) => {
            Command::Select(letter.to_ascii_uppercase().chars().next().unwrap_or_default())
        }
        _ => return Err(anyhow!("Unknown command `{}`, type `h` for help", line.trim())),
    };
    Ok(command)
}

fn is_option_key(word: &str) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_ascii_alphabetic(),
        _ => false,
    }
}
