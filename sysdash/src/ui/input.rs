//! Keyboard input: maps crossterm key events to app commands.

use std::{io, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{Command, InputSource};
use crate::sink::ViewCommand;
use crate::ui::processes::PAGE;
use crate::view::ProcessSort;

/// Drains pending terminal events without blocking.
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn poll_commands(&mut self) -> io::Result<Vec<Command>> {
        let mut out = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(k) = event::read()? {
                if k.kind != KeyEventKind::Release {
                    out.extend(map_key(k));
                }
            }
        }
        Ok(out)
    }
}

pub fn map_key(k: KeyEvent) -> Option<Command> {
    // raw mode swallows SIGINT, so Ctrl-C arrives as a key
    if k.modifiers.contains(KeyModifiers::CONTROL) && matches!(k.code, KeyCode::Char('c')) {
        return Some(Command::Quit);
    }
    let cmd = match k.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char('r') => Command::Connect,
        KeyCode::Char('d') => Command::Disconnect,
        KeyCode::Char('c') => Command::SortBy(ProcessSort::CpuDesc),
        KeyCode::Char('m') => Command::SortBy(ProcessSort::MemDesc),
        KeyCode::Char('i') => Command::ToggleIdleCores,
        KeyCode::Char('h') | KeyCode::Char('?') => Command::View(ViewCommand::ToggleHelp),
        KeyCode::Up | KeyCode::Char('k') => Command::View(ViewCommand::SelectBy(-1)),
        KeyCode::Down | KeyCode::Char('j') => Command::View(ViewCommand::SelectBy(1)),
        KeyCode::PageUp => Command::View(ViewCommand::SelectBy(-PAGE)),
        KeyCode::PageDown => Command::View(ViewCommand::SelectBy(PAGE)),
        KeyCode::Home => Command::View(ViewCommand::SelectFirst),
        KeyCode::End => Command::View(ViewCommand::SelectLast),
        _ => return None,
    };
    Some(cmd)
}
