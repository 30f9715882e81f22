//! Interactive query loop
//!
//! Reads lines from the terminal, executes `!` commands locally, and runs
//! everything else as a query against the server. Ctrl-C during a query
//! abandons that query's stream and returns to the prompt.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::history::{HistoryLog, QueryRecord};
use crate::proto::Client;
use crate::render::Renderer;

const PROMPT: &str = "delve> ";
const HISTORY_SHOWN: usize = 10;

const WELCOME: &str = r"
Welcome to the delve interpreter!

Local interpreter (non-query) commands may be executed with a ! prefix:
    Use !quit to exit.
    Use !help to see local interpreter commands.
";

const HELP: &str = r"Local interpreter commands:
    !help    - Show this help.
    !history - Show recently executed queries.
    !quit    - Exit the interpreter.";

/// One line of input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Leave the interpreter.
    Quit,
    /// Show interpreter command help.
    Help,
    /// Show recently executed queries.
    History,
    /// Run a query against the server.
    Query(String),
    /// Blank input; prompt again.
    Nothing,
}

/// Classify one input line.
///
/// Lines starting with `!` are local interpreter commands; anything else is
/// query text. Unknown `!` commands are reported back as the error string.
pub fn parse_line(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }

    let Some(rest) = line.strip_prefix('!') else {
        return Ok(Command::Query(line.to_string()));
    };

    match rest.split_whitespace().next().unwrap_or("") {
        "quit" => Ok(Command::Quit),
        "help" => Ok(Command::Help),
        "history" => Ok(Command::History),
        other => Err(format!("unrecognized command '!{other}' (try !help)")),
    }
}

/// The interactive interpreter.
pub struct Repl<W> {
    client: Client,
    renderer: Renderer<W>,
    history: HistoryLog,
}

impl<W: Write> Repl<W> {
    /// Create an interpreter talking to `client` and rendering through
    /// `renderer`.
    pub fn new(client: Client, renderer: Renderer<W>, history: HistoryLog) -> Self {
        Self {
            client,
            renderer,
            history,
        }
    }

    /// Run the interactive loop over `input` until `!quit` or end of input.
    ///
    /// Query transport faults propagate out; the interpreter cannot tell
    /// how much of a stream was lost, so it does not paper over them.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        self.print_line(WELCOME)?;

        let mut lines = input.lines();
        loop {
            self.renderer
                .printer()
                .prompt(PROMPT)
                .context("Failed to write prompt")?;

            let Some(line) = lines.next_line().await.context("Failed to read input")? else {
                // End of input: finish the prompt line and leave.
                self.print_line("")?;
                break;
            };

            match parse_line(&line) {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => self.print_line(HELP)?,
                Ok(Command::History) => self.print_history()?,
                Ok(Command::Query(text)) => self.run_query(&text).await?,
                Ok(Command::Nothing) => {}
                Err(mesg) => self.print_line(&mesg)?,
            }
        }

        Ok(())
    }

    /// Consume the interpreter and return the output writer.
    pub fn into_output(self) -> W {
        self.renderer.into_printer().into_inner()
    }

    async fn run_query(&mut self, text: &str) -> Result<()> {
        // History is a convenience; a failed write must not block the query.
        if let Err(err) = self.history.append(&QueryRecord::new(text)) {
            log::warn!("could not record query history: {err:#}");
        }

        let mut stream = self.client.query(text).await?;

        tokio::select! {
            result = self.renderer.render_stream(&mut stream) => result,
            _ = tokio::signal::ctrl_c() => {
                self.print_line("<ctrl-c>")?;
                Ok(())
            }
        }
    }

    fn print_history(&mut self) -> Result<()> {
        let records = self.history.recent(HISTORY_SHOWN)?;
        if records.is_empty() {
            return self.print_line("No queries recorded yet.");
        }

        for record in records {
            let stamp = record.timestamp.format("%Y-%m-%d %H:%M:%S");
            self.print_line(&format!("{stamp}  {}", record.query))?;
        }
        Ok(())
    }

    fn print_line(&mut self, text: &str) -> Result<()> {
        self.renderer
            .printer()
            .print(text)
            .context("Failed to write output")
    }
}
