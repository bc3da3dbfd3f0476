use std::error::Error;
use std::fmt;

use log::debug;

use crate::cancel::CancelToken;
use crate::engine;
use crate::engine::{
    EngineError,
    Session,
};

#[derive(Debug, PartialEq)]
pub enum CommandErrorType {
    ParseError,
    NotConfigured,
    NoCommand,
    EngineError,
}

pub struct CommandError {
    pub typ: CommandErrorType,
    pub v: Option<String>,
}

impl CommandError {
    pub fn parse(v: String) -> CommandError {
        CommandError {
            typ: CommandErrorType::ParseError,
            v: Some(v),
        }
    }

    pub fn not_configured() -> CommandError {
        CommandError {
            typ: CommandErrorType::NotConfigured,
            v: Some(String::from("run config command first")),
        }
    }

    fn no_command() -> CommandError {
        CommandError {
            typ: CommandErrorType::NoCommand,
            v: Some(String::from("command not set")),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.v {
            Some(v) => {
                fmt.write_str(v.as_str())
            },
            None => {
                write!(fmt, "{:?}", self.typ)
            },
        }
    }
}

impl fmt::Debug for CommandError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{:?}", self.typ)
    }
}

impl Error for CommandError {}

impl From<EngineError> for CommandError {
    fn from(e: EngineError) -> CommandError {
        CommandError {
            typ: CommandErrorType::EngineError,
            v: Some(format!("{}", e)),
        }
    }
}

/// Holds the engine session once a config command has succeeded. The session
/// is never cleared for the lifetime of the process; a later config may
/// replace it.
#[derive(Default)]
pub struct Connector {
    session: Option<Session>,
}

impl Connector {
    pub fn is_ready(&self) -> bool {
        self.session.is_some()
    }

    pub fn set(&mut self, session: Session) {
        self.session = Some(session);
    }

    fn session(&self) -> Result<&Session, CommandError> {
        match &self.session {
            Some(v) => {
                Ok(v)
            },
            None => {
                Err(CommandError::not_configured())
            },
        }
    }
}

/// One parsed shell operation. Built fresh from a single input line and
/// executed exactly once.
pub enum Command {
    Config {
        repository: String,
    },
    Add {
        file_path: String,
    },
    Get {
        cid: String,
        output_path: String,
    },
}

impl Command {
    /// Run the operation against the connector. A successful run may carry a
    /// report line for the user.
    pub fn execute(&self, ctx: &CancelToken, connector: &mut Connector) -> Result<Option<String>, CommandError> {
        match self {
            Command::Config { repository } => {
                let session = engine::create_node(ctx, repository)?;
                let repo = format!("{}", session.repo.display());
                connector.set(session);
                Ok(Some(format!("Node ready with repository {}", repo)))
            },
            Command::Add { file_path } => {
                let session = connector.session()?;
                let cid = session.add_file(ctx, file_path)?;
                Ok(Some(format!("Added file with Cid: {}", cid)))
            },
            Command::Get { cid, output_path } => {
                let session = connector.session()?;
                session.get_file(ctx, cid, output_path)?;
                Ok(Some(format!("Successfully Wrote file to {}", output_path)))
            },
        }
    }
}

/// Holds at most one pending command. Setting a new command overwrites any
/// pending one; execution consumes it.
#[derive(Default)]
pub struct Invoker {
    command: Option<Command>,
}

impl Invoker {
    pub fn set_command(&mut self, command: Command) {
        self.command = Some(command);
    }

    pub fn execute_command(&mut self, ctx: &CancelToken, connector: &mut Connector) -> Result<Option<String>, CommandError> {
        match self.command.take() {
            Some(v) => {
                debug!("executing pending command");
                v.execute(ctx, connector)
            },
            None => {
                Err(CommandError::no_command())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Command,
        CommandErrorType,
        Connector,
        Invoker,
    };
    use crate::cancel::CancelToken;

    use std::fs::write;
    use tempfile::tempdir;

    #[test]
    fn test_execute_without_command() {
        let ctx = CancelToken::new();
        let mut connector = Connector::default();
        let mut invoker = Invoker::default();

        let r = invoker.execute_command(&ctx, &mut connector);
        assert_eq!(r.err().unwrap().typ, CommandErrorType::NoCommand);
    }

    #[test]
    fn test_command_consumed_once() {
        let ctx = CancelToken::new();
        let d = tempdir().unwrap();
        let mut connector = Connector::default();
        let mut invoker = Invoker::default();

        invoker.set_command(Command::Config {
            repository: d.path().join("repo").to_str().unwrap().to_string(),
        });
        invoker.execute_command(&ctx, &mut connector).unwrap();

        let r = invoker.execute_command(&ctx, &mut connector);
        assert_eq!(r.err().unwrap().typ, CommandErrorType::NoCommand);
    }

    #[test]
    fn test_last_command_wins() {
        let ctx = CancelToken::new();
        let d = tempdir().unwrap();
        let repo_a = d.path().join("a");
        let repo_b = d.path().join("b");
        let mut connector = Connector::default();
        let mut invoker = Invoker::default();

        invoker.set_command(Command::Config {
            repository: repo_a.to_str().unwrap().to_string(),
        });
        invoker.set_command(Command::Config {
            repository: repo_b.to_str().unwrap().to_string(),
        });
        invoker.execute_command(&ctx, &mut connector).unwrap();

        // only the second command ran
        assert!(!repo_a.exists());
        assert!(repo_b.is_dir());
    }

    #[test]
    fn test_not_configured() {
        let ctx = CancelToken::new();
        let mut connector = Connector::default();

        let cmd = Command::Add {
            file_path: String::from("./file.txt"),
        };
        let r = cmd.execute(&ctx, &mut connector);
        let e = r.err().unwrap();
        assert_eq!(e.typ, CommandErrorType::NotConfigured);
        assert_eq!(format!("{}", e), "run config command first");
        assert!(!connector.is_ready());

        let cmd = Command::Get {
            cid: String::from("deadbeef"),
            output_path: String::from("./out.txt"),
        };
        let r = cmd.execute(&ctx, &mut connector);
        assert_eq!(r.err().unwrap().typ, CommandErrorType::NotConfigured);
    }

    #[test]
    fn test_config_makes_ready() {
        let ctx = CancelToken::new();
        let d = tempdir().unwrap();
        let mut connector = Connector::default();

        let cmd = Command::Config {
            repository: d.path().join("repo").to_str().unwrap().to_string(),
        };
        cmd.execute(&ctx, &mut connector).unwrap();
        assert!(connector.is_ready());

        // a second config overwrites the session, readiness stays
        let cmd = Command::Config {
            repository: d.path().join("other").to_str().unwrap().to_string(),
        };
        cmd.execute(&ctx, &mut connector).unwrap();
        assert!(connector.is_ready());
    }

    #[test]
    fn test_add_and_get_via_invoker() {
        let ctx = CancelToken::new();
        let d = tempdir().unwrap();
        let mut connector = Connector::default();
        let mut invoker = Invoker::default();

        invoker.set_command(Command::Config {
            repository: d.path().join("repo").to_str().unwrap().to_string(),
        });
        invoker.execute_command(&ctx, &mut connector).unwrap();

        let src = d.path().join("in.txt");
        write(&src, b"foo").unwrap();

        invoker.set_command(Command::Add {
            file_path: src.to_str().unwrap().to_string(),
        });
        let report = invoker.execute_command(&ctx, &mut connector).unwrap().unwrap();
        assert!(report.contains("2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"));

        let out = d.path().join("out.txt");
        invoker.set_command(Command::Get {
            cid: String::from("2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"),
            output_path: out.to_str().unwrap().to_string(),
        });
        let report = invoker.execute_command(&ctx, &mut connector).unwrap().unwrap();
        assert!(report.contains(out.to_str().unwrap()));
        assert!(out.is_file());
    }
}
