//! Terminal front end: prompt, line input and log echo.

use std::io::Write;

use calypso_shared::time::Clock;
use rustyline::{DefaultEditor, error::ReadlineError};

use crate::{
    command::Command,
    event::{EventSender, SessionEvent},
    formatter::MessageFormatter,
    log::LogView,
};

/// Prompt shown while waiting for a command
pub const PROMPT: &str = "calypso> ";

/// Redisplay the prompt after printing asynchronous output
pub fn redisplay_prompt() {
    write_prompt(&mut std::io::stdout());
}

fn write_prompt<W: Write>(out: &mut W) {
    write!(out, "{}", PROMPT).ok();
    out.flush().ok();
}

/// Echoes every appended log line with a timestamp, followed by the prompt
pub struct TerminalView<C: Clock, W: Write + Send = std::io::Stdout> {
    clock: C,
    out: W,
}

impl<C: Clock> TerminalView<C> {
    /// Echo to stdout
    pub fn new(clock: C) -> Self {
        Self::with_writer(clock, std::io::stdout())
    }
}

impl<C: Clock, W: Write + Send> TerminalView<C, W> {
    pub fn with_writer(clock: C, out: W) -> Self {
        Self { clock, out }
    }

    pub fn into_writer(self) -> W {
        self.out
    }
}

impl<C: Clock, W: Write + Send> LogView for TerminalView<C, W> {
    fn line_appended(&mut self, line: &str, _rendered: &str) {
        let formatted = MessageFormatter::format_log_line(line, self.clock.now_millis());
        if let Err(e) = self.out.write_all(formatted.as_bytes()) {
            tracing::warn!("Failed to echo log line: {}", e);
            return;
        }
        write_prompt(&mut self.out);
    }
}

/// Read commands on a blocking thread and forward them as session events.
///
/// Ctrl+C and Ctrl+D are forwarded as [`Command::Quit`].
pub fn spawn_input_thread(events: EventSender) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                let _ = events.send(SessionEvent::Command(Command::Quit));
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line).ok();

                    match Command::parse(line) {
                        Ok(command) => {
                            let quit = command == Command::Quit;
                            if events.send(SessionEvent::Command(command)).is_err() || quit {
                                break;
                            }
                        }
                        Err(e) => print!("{}", MessageFormatter::format_input_error(&e.to_string())),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    let _ = events.send(SessionEvent::Command(Command::Quit));
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    let _ = events.send(SessionEvent::Command(Command::Quit));
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    let _ = events.send(SessionEvent::Command(Command::Quit));
                    break;
                }
            }
        }
    })
}
