use std::fs::File;
use std::fs::create_dir_all;
use std::fs::copy as fs_copy;
use std::io::{
    Write,
    Read,
};
use std::path::{
    PathBuf,
    Path,
};
use std::error::Error;
use std::fmt;
use std::sync::Once;

use sha2::{Sha256, Digest};
use tempfile::NamedTempFile;

use log::{debug, info, error};

use crate::cancel::CancelToken;

const CHUNK_SIZE: usize = 65535;
const DIGEST_SIZE: usize = 32;

static ENGINE_SETUP: Once = Once::new();

#[derive(Debug, PartialEq)]
pub enum EngineErrorType {
    SetupError,
    RepoError,
    ReadError,
    WriteError,
    InputError,
    Cancelled,
}

pub struct EngineError {
    pub typ: EngineErrorType,
    pub v: Option<String>,
}

impl EngineError {
    fn new(typ: EngineErrorType, v: String) -> EngineError {
        EngineError {
            typ,
            v: Some(v),
        }
    }

    fn cancelled() -> EngineError {
        EngineError {
            typ: EngineErrorType::Cancelled,
            v: Some(String::from("operation cancelled")),
        }
    }
}

impl fmt::Display for EngineError {
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

impl fmt::Debug for EngineError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{:?}", self.typ)
    }
}

impl Error for EngineError {}

/// An open repository session. All content lives directly under the
/// repository directory, keyed by the lowercase hex sha256 digest of the
/// content.
pub struct Session {
    pub repo: PathBuf,
}

/// One-time engine bring-up, guarded by a process-wide flag. Set at first
/// call, never reset.
fn setup() {
    ENGINE_SETUP.call_once(|| {
        debug!("storage engine initialized");
    });
}

/// Create or open the repository at the given path and return a session
/// bound to it. Safe to call again for the same or another path.
pub fn create_node(ctx: &CancelToken, repository: &str) -> Result<Session, EngineError> {
    setup();

    if ctx.is_cancelled() {
        return Err(EngineError::cancelled());
    }

    let repo_path = Path::new(repository);
    match create_dir_all(repo_path) {
        Ok(_) => {},
        Err(e) => {
            error!("cannot create repository {}: {}", repository, e);
            return Err(EngineError::new(EngineErrorType::RepoError, format!("failed to create/get repo dir: {}", e)));
        },
    };

    let repo_canon = match repo_path.canonicalize() {
        Ok(v) => {
            v
        },
        Err(e) => {
            return Err(EngineError::new(EngineErrorType::RepoError, format!("cannot resolve repo dir: {}", e)));
        },
    };

    info!("repository open at {:?}", repo_canon);
    Ok(Session {
        repo: repo_canon,
    })
}

fn decode_cid(cid: &str) -> Result<Vec<u8>, EngineError> {
    let digest = match hex::decode(cid) {
        Ok(v) => {
            v
        },
        Err(e) => {
            return Err(EngineError::new(EngineErrorType::InputError, format!("invalid content id {}: {}", cid, e)));
        },
    };
    if digest.len() != DIGEST_SIZE {
        return Err(EngineError::new(EngineErrorType::InputError, format!("invalid content id {}: wrong length", cid)));
    }
    Ok(digest)
}

impl Session {
    /// Publish a local file into the repository. Returns the content id of
    /// the stored content.
    pub fn add_file(&self, ctx: &CancelToken, file_path: &str) -> Result<String, EngineError> {
        let mut f = match File::open(file_path) {
            Ok(v) => {
                v
            },
            Err(e) => {
                return Err(EngineError::new(EngineErrorType::ReadError, format!("failed to load file: {}", e)));
            },
        };

        let tempfile = match NamedTempFile::new() {
            Ok(v) => {
                v
            },
            Err(e) => {
                return Err(EngineError::new(EngineErrorType::WriteError, format!("failed to open spool file: {}", e)));
            },
        };
        debug!("writing {} to tempfile {:?}", file_path, tempfile.path());

        let mut buf: [u8; CHUNK_SIZE] = [0; CHUNK_SIZE];
        let mut h = Sha256::new();
        loop {
            if ctx.is_cancelled() {
                return Err(EngineError::cancelled());
            }
            match f.read(&mut buf[..]) {
                Ok(v) => {
                    if v == 0 {
                        break;
                    }
                    let data = &buf[..v];
                    h.update(data);
                    match tempfile.as_file().write_all(data) {
                        Ok(_) => {},
                        Err(e) => {
                            return Err(EngineError::new(EngineErrorType::WriteError, format!("cannot write spool file: {}", e)));
                        },
                    };
                },
                Err(e) => {
                    error!("cannot read from {}: {}", file_path, e);
                    return Err(EngineError::new(EngineErrorType::ReadError, format!("cannot read from file: {}", e)));
                },
            }
        }

        let z = h.finalize().to_vec();
        let cid = hex::encode(&z);
        info!("have content id {} for {}", cid, file_path);

        let final_path_buf = self.repo.join(&cid);
        match fs_copy(tempfile.path(), final_path_buf.as_path()) {
            Ok(_) => {},
            Err(e) => {
                return Err(EngineError::new(EngineErrorType::WriteError, format!("cannot store content: {}", e)));
            },
        };

        Ok(cid)
    }

    /// Retrieve content by id and write it to the given output path.
    pub fn get_file(&self, ctx: &CancelToken, cid: &str, output_path: &str) -> Result<(), EngineError> {
        let digest = decode_cid(cid)?;
        let pointer = hex::encode(&digest);

        let content_path_buf = self.repo.join(&pointer);
        let mut f = match File::open(content_path_buf.as_path()) {
            Ok(v) => {
                v
            },
            Err(e) => {
                debug!("no content at {:?}: {}", content_path_buf, e);
                return Err(EngineError::new(EngineErrorType::ReadError, format!("content not found: {}", cid)));
            },
        };

        let mut of = match File::create(output_path) {
            Ok(v) => {
                v
            },
            Err(e) => {
                return Err(EngineError::new(EngineErrorType::WriteError, format!("cannot write output {}: {}", output_path, e)));
            },
        };

        let mut buf: [u8; CHUNK_SIZE] = [0; CHUNK_SIZE];
        loop {
            if ctx.is_cancelled() {
                return Err(EngineError::cancelled());
            }
            match f.read(&mut buf[..]) {
                Ok(v) => {
                    if v == 0 {
                        break;
                    }
                    match of.write_all(&buf[..v]) {
                        Ok(_) => {},
                        Err(e) => {
                            return Err(EngineError::new(EngineErrorType::WriteError, format!("cannot write output {}: {}", output_path, e)));
                        },
                    };
                },
                Err(e) => {
                    return Err(EngineError::new(EngineErrorType::ReadError, format!("cannot read content {}: {}", cid, e)));
                },
            }
        }

        info!("wrote content {} to {}", cid, output_path);
        Ok(())
    }
}
