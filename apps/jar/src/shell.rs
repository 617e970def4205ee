use std::{
    io::{BufRead, Write},
    time::Duration,
};

use anyhow::Result;
use picker_core::{PickError, PickerSession};
use shared::domain::{Mode, Phase};

use crate::paced_draw;

const HELP: &str = "\
commands:
  add <text>      add an item (or just type the item)
  rm <n>          remove item number n
  list            show the active pool
  mode jar|wheel  switch pools (leaving the wheel empties it)
  clear           empty the active pool
  draw            draw an item
  keep            keep the drawn item in the pool
  remove          remove the drawn item from the pool
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellCommand {
    Add(String),
    RemoveAt(usize),
    List,
    Mode(Mode),
    Clear,
    Draw,
    Keep,
    Remove,
    Help,
    Quit,
}

/// Parses one input line. Items are numbered from 1 for humans.
///
/// A line is a command only when it is a bare keyword or a keyword whose
/// argument parses (`add <text>`, `rm <n>`, `mode <jar|wheel>`). Anything
/// else is added as an item, so "Keep calm" is an item, not `keep`.
pub(crate) fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let item = || -> Result<Option<ShellCommand>, String> {
        Ok(Some(ShellCommand::Add(line.to_string())))
    };

    let Some((word, rest)) = line.split_once(char::is_whitespace) else {
        let command = match line.to_ascii_lowercase().as_str() {
            "list" | "ls" => ShellCommand::List,
            "clear" => ShellCommand::Clear,
            "draw" | "shake" | "spin" => ShellCommand::Draw,
            "keep" => ShellCommand::Keep,
            "remove" => ShellCommand::Remove,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            _ => return item(),
        };
        return Ok(Some(command));
    };
    let rest = rest.trim();

    let command = match word.to_ascii_lowercase().as_str() {
        "add" => ShellCommand::Add(rest.to_string()),
        "rm" | "del" => match rest.parse::<usize>() {
            Ok(0) => return Err("items are numbered from 1".to_string()),
            Ok(number) => ShellCommand::RemoveAt(number - 1),
            Err(_) => return item(),
        },
        "mode" => match rest.parse::<Mode>() {
            Ok(mode) => ShellCommand::Mode(mode),
            Err(_) => return item(),
        },
        _ => return item(),
    };
    Ok(Some(command))
}

pub(crate) fn run<R, W>(
    session: &mut PickerSession,
    input: R,
    mut out: W,
    delay: Duration,
    prompt: bool,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "Leave your destiny to the {}. Type 'help' for commands.", session.mode())?;
    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "{}> ", session.mode())?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let command = match parse_command(&line?) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "⚠️ {message}")?;
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }
        execute(session, command, &mut out, delay)?;
    }
    Ok(())
}

fn execute<W: Write>(
    session: &mut PickerSession,
    command: ShellCommand,
    out: &mut W,
    delay: Duration,
) -> Result<()> {
    let outcome = match command {
        ShellCommand::Add(text) => session.add(&text).map(|added| {
            if !added {
                return "nothing to add".to_string();
            }
            format!("{} item(s) in the {}", session.active().size(), session.mode())
        }),
        ShellCommand::RemoveAt(index) => match session.remove_at(index) {
            Ok(item) => Ok(format!("removed {item}")),
            Err(PickError::IndexOutOfRange { len, .. }) => Ok(format!(
                "⚠️ there is no item {}, the {} holds {len}",
                index + 1,
                session.mode()
            )),
            Err(other) => Err(other),
        },
        ShellCommand::List => Ok(listing(session)),
        ShellCommand::Mode(mode) => session
            .set_mode(mode)
            .map(|()| format!("now using the {mode}")),
        ShellCommand::Clear => session
            .clear()
            .map(|()| format!("the {} is empty", session.mode())),
        ShellCommand::Draw => {
            if let Some(warning) = session.draw_warning() {
                writeln!(out, "⚠️ {warning}")?;
                return Ok(());
            }
            writeln!(out, "Shaking...")?;
            out.flush()?;
            paced_draw(session, delay).map(|reveal| {
                format!(
                    "The {} has spoken: {}\n(keep / remove)",
                    reveal.mode,
                    reveal.item.as_str().to_uppercase()
                )
            })
        }
        ShellCommand::Keep => session
            .keep()
            .map(|reveal| format!("kept {}", reveal.item)),
        ShellCommand::Remove => session
            .remove_result()
            .map(|reveal| format!("removed {}", reveal.item)),
        ShellCommand::Help => Ok(HELP.to_string()),
        ShellCommand::Quit => Ok(String::new()),
    };

    match outcome {
        Ok(message) => writeln!(out, "{message}")?,
        Err(error) => writeln!(out, "⚠️ {error}")?,
    }
    Ok(())
}

fn listing(session: &PickerSession) -> String {
    let items = session.active().items();
    if items.is_empty() {
        return format!("the {} is empty", session.mode());
    }
    let mut text = items
        .iter()
        .enumerate()
        .map(|(index, item)| format!("{:>3}. {item}", index + 1))
        .collect::<Vec<_>>()
        .join("\n");
    if session.phase() == Phase::Showing {
        if let Some(reveal) = session.result() {
            text.push_str(&format!("\nshowing: {}", reveal.item));
        }
    }
    text
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
