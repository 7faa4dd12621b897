//! Line-oriented terminal view.
//!
//! The view never reads the controller's state directly while rendering: it
//! keeps its own copy of the visible rows, rebuilt from the change events the
//! controller broadcasts. Free text is sent to ELIZA, lines starting with `/`
//! are commands.

use std::io::{self, BufRead, Write};

use eliza_chat::{ChoiceSource, ConversationController, DefaultChoices, SearchStrategy};
use eliza_core::{DialogEvent, Message};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, info, warn};

const HELP: &str = "\
Type a sentence to talk to ELIZA. Commands:
  /search [strategy] <query>  keep only the matching messages
  /undo                       restore the conversation after a search
  /delete <index>             delete the message with this number
  /clear                      delete every message
  /list                       show the conversation again
  /strategies                 list the search strategies
  /help                       show this help
  /quit                       leave";

// =============================================================================
// Commands
// =============================================================================

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Search {
        strategy: SearchStrategy,
        query: String,
    },
    Undo,
    Delete(usize),
    Clear,
    List,
    Strategies,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: /{0} (try /help)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parse a line of input. Blank lines yield `None`.
///
/// `/search` takes an optional strategy name as its first word; without one
/// the whole remainder is the query and `default_strategy` applies. Only the
/// single separator after the command and strategy words is consumed, so a
/// query may start with whitespace.
pub fn parse_line(
    line: &str,
    default_strategy: SearchStrategy,
) -> Result<Option<Command>, CommandError> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let Some(command_line) = line.trim_start().strip_prefix('/') else {
        return Ok(Some(Command::Say(line.to_string())));
    };

    let (name, rest) = command_line
        .split_once(char::is_whitespace)
        .unwrap_or((command_line, ""));

    let command = match name.to_lowercase().as_str() {
        "search" | "s" => parse_search(rest, default_strategy),
        "undo" | "u" => Command::Undo,
        "delete" | "d" => {
            let index = rest
                .trim()
                .parse::<usize>()
                .map_err(|_| CommandError::Usage("/delete <index>"))?;
            Command::Delete(index)
        }
        "clear" => Command::Clear,
        "list" | "l" => Command::List,
        "strategies" => Command::Strategies,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_search(rest: &str, default_strategy: SearchStrategy) -> Command {
    let (first, remainder) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    match first.parse::<SearchStrategy>() {
        Ok(strategy) => Command::Search {
            strategy,
            query: remainder.to_string(),
        },
        Err(_) => Command::Search {
            strategy: default_strategy,
            query: rest.to_string(),
        },
    }
}

// =============================================================================
// TerminalView
// =============================================================================

/// A view of the conversation, kept in sync through [`DialogEvent`]s.
pub struct TerminalView {
    events: broadcast::Receiver<DialogEvent>,
    rows: Vec<Message>,
    search_active: bool,
}

impl TerminalView {
    pub fn new(events: broadcast::Receiver<DialogEvent>) -> Self {
        Self {
            events,
            rows: Vec::new(),
            search_active: false,
        }
    }

    pub fn rows(&self) -> &[Message] {
        &self.rows
    }

    /// Apply and print every pending event.
    ///
    /// If the view fell too far behind, the missed events are dropped and
    /// the rows are copied from `current` instead.
    pub fn refresh<W: Write>(&mut self, current: &[Message], out: &mut W) -> io::Result<()> {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.apply(event, out)?,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "View fell behind, resynchronizing");
                    while !matches!(
                        self.events.try_recv(),
                        Err(TryRecvError::Empty) | Err(TryRecvError::Closed)
                    ) {}
                    self.rows = current.to_vec();
                    writeln!(out, "----")?;
                    self.print_all(out)?;
                    break;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        Ok(())
    }

    fn apply<W: Write>(&mut self, event: DialogEvent, out: &mut W) -> io::Result<()> {
        debug!(kind = event.kind(), "View received event");
        match event {
            DialogEvent::Added { messages } => {
                for message in &messages {
                    print_row(message, out)?;
                }
                self.rows.extend(messages);
            }
            DialogEvent::Removed { message } => {
                let index = message.sequence_index;
                if index < self.rows.len() {
                    self.rows.remove(index);
                    for row in &mut self.rows[index..] {
                        row.sequence_index -= 1;
                    }
                }
                writeln!(out, "(message {} deleted)", index)?;
            }
            DialogEvent::Cleared => {
                self.rows.clear();
                writeln!(out, "----")?;
            }
            DialogEvent::SearchActiveChanged { active } => {
                self.search_active = active;
                self.print_status(out)?;
            }
        }
        Ok(())
    }

    pub fn print_all<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for row in &self.rows {
            print_row(row, out)?;
        }
        Ok(())
    }

    pub fn print_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.search_active {
            writeln!(out, "Search active, /undo restores the conversation")
        } else {
            writeln!(out, "No active search")
        }
    }
}

fn print_row<W: Write>(message: &Message, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "[{}] {}: {}",
        message.sequence_index, message.author, message.text
    )
}

// =============================================================================
// Shell
// =============================================================================

/// Whether the input loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Reads commands, drives the controller and refreshes the view.
pub struct Shell<C = DefaultChoices> {
    controller: ConversationController<C>,
    view: TerminalView,
    default_strategy: SearchStrategy,
}

impl<C: ChoiceSource> Shell<C> {
    /// `view` must have been subscribed before anything it should display
    /// happened, the greeting included.
    pub fn new(
        controller: ConversationController<C>,
        view: TerminalView,
        default_strategy: SearchStrategy,
    ) -> Self {
        Self {
            controller,
            view,
            default_strategy,
        }
    }

    pub fn controller(&self) -> &ConversationController<C> {
        &self.controller
    }

    pub fn view(&self) -> &TerminalView {
        &self.view
    }

    /// Run until `/quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        self.view.refresh(self.controller.messages(), out)?;
        self.view.print_status(out)?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            let flow = self.handle_line(&line, out)?;
            out.flush()?;
            if flow == Flow::Quit {
                break;
            }
        }
        info!(messages = self.controller.message_count(), "Session ended");
        Ok(())
    }

    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let command = match parse_line(line, self.default_strategy) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                writeln!(out, "{}", e)?;
                return Ok(Flow::Continue);
            }
        };
        let flow = self.execute(command, out)?;
        self.view.refresh(self.controller.messages(), out)?;
        Ok(flow)
    }

    fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<Flow> {
        match command {
            Command::Say(text) => {
                self.controller.submit_message(&text);
            }
            Command::Search { strategy, query } => {
                match self.controller.run_search(strategy, &query) {
                    Ok(found) => {
                        debug!(%strategy, found, "Search from shell");
                        writeln!(out, "{} search for \"{}\": {} found", strategy, query, found)?;
                    }
                    Err(e) => writeln!(out, "{}", e)?,
                }
            }
            Command::Undo => {
                if !self.controller.undo_search() {
                    writeln!(out, "Nothing to undo")?;
                }
            }
            Command::Delete(index) => {
                if self.controller.delete_message(index).is_none() {
                    writeln!(out, "No message numbered {}", index)?;
                }
            }
            Command::Clear => self.controller.clear_all(),
            Command::List => {
                self.view.refresh(self.controller.messages(), out)?;
                self.view.print_all(out)?;
                self.view.print_status(out)?;
            }
            Command::Strategies => {
                for strategy in self.controller.strategies() {
                    if *strategy == self.default_strategy {
                        writeln!(out, "{} (default)", strategy)?;
                    } else {
                        writeln!(out, "{}", strategy)?;
                    }
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}
