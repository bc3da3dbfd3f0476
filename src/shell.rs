use std::io;
use std::io::{
    BufRead,
    Write,
};

use log::{debug, error};

use crate::cancel::CancelToken;
use crate::command::{
    Command,
    CommandError,
    Connector,
    Invoker,
};

pub const PROMPT: &str = "goshare> ";
const FAREWELL: &str = "Exiting the app. Goodbye!";

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RESET: &str = "\x1b[0m";

/// Outcome of dispatching one non-empty input line.
pub enum Dispatch {
    /// A command ran; the payload is its report line, if any.
    Done(Option<String>),
    /// The verb was not recognized. Informational, not a failure.
    Unknown,
}

/// Split one input line into a command, hand it to the invoker and run it.
///
/// Readiness for add/get is checked before the command is built, so a
/// missing session is reported even when the arguments are also wrong.
pub fn dispatch(line: &str, ctx: &CancelToken, connector: &mut Connector, invoker: &mut Invoker) -> Result<Dispatch, CommandError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let verb = match tokens.first() {
        Some(v) => {
            *v
        },
        None => {
            return Ok(Dispatch::Unknown);
        },
    };

    let command = match verb {
        "config" => {
            if tokens.len() != 2 {
                return Err(CommandError::parse(String::from("usage: config <repository>")));
            }
            Command::Config {
                repository: tokens[1].to_string(),
            }
        },
        "add" => {
            if !connector.is_ready() {
                return Err(CommandError::not_configured());
            }
            if tokens.len() != 2 {
                return Err(CommandError::parse(String::from("usage: add <file-path>")));
            }
            Command::Add {
                file_path: tokens[1].to_string(),
            }
        },
        "get" => {
            if !connector.is_ready() {
                return Err(CommandError::not_configured());
            }
            if tokens.len() != 3 {
                return Err(CommandError::parse(String::from("usage: get <cid> <output-path>")));
            }
            Command::Get {
                cid: tokens[1].to_string(),
                output_path: tokens[2].to_string(),
            }
        },
        _ => {
            debug!("unrecognized verb {}", verb);
            return Ok(Dispatch::Unknown);
        },
    };

    invoker.set_command(command);
    let report = invoker.execute_command(ctx, connector)?;
    Ok(Dispatch::Done(report))
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Available commands:")?;
    writeln!(out, " - config <repository>")?;
    writeln!(out, " - add <file-path>")?;
    writeln!(out, " - get <cid> <output-path>")?;
    writeln!(out, " - exit")?;
    Ok(())
}

pub fn report_ok(out: &mut impl Write, v: &str) -> io::Result<()> {
    writeln!(out, "{}{}{}", ANSI_GREEN, v, ANSI_RESET)
}

pub fn report_err(err: &mut impl Write, e: &CommandError) -> io::Result<()> {
    writeln!(err, "{}{}{}", ANSI_RED, e, ANSI_RESET)
}

/// The read-eval-print loop. Blocks on input, dispatches each line,
/// re-prompts after any failure. Returns when the user exits or input runs
/// out.
pub fn run(ctx: &CancelToken, connector: &mut Connector, input: &mut impl BufRead, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
    let mut invoker = Invoker::default();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let mut line = String::new();
        let n = input.read_line(&mut line)?;
        if n == 0 {
            // end of input behaves like exit
            writeln!(out)?;
            writeln!(out, "{}", FAREWELL)?;
            return Ok(());
        }

        let line = line.trim();
        match line {
            "" => {
                continue;
            },
            "help" => {
                print_help(out)?;
            },
            "exit" => {
                writeln!(out, "{}", FAREWELL)?;
                return Ok(());
            },
            _ => {
                match dispatch(line, ctx, connector, &mut invoker) {
                    Ok(Dispatch::Done(report)) => {
                        match report {
                            Some(v) => {
                                report_ok(out, &v)?;
                            },
                            None => {},
                        };
                    },
                    Ok(Dispatch::Unknown) => {
                        writeln!(out, "invalid command: {}", line)?;
                    },
                    Err(e) => {
                        error!("command failed: {}", e);
                        report_err(err, &e)?;
                    },
                };
            },
        };
    }
}
