#![crate_name = "goshare"]

//! goshare is an interactive shell for a content-addressed storage node.
//!
//! A session starts empty. The `config` command creates or opens a
//! repository directory and binds the shell to it. After that, `add`
//! publishes a local file into the repository and prints its content id,
//! and `get` retrieves content by id and writes it to a local path.
//!
//! The content id is the SHA256 hash of the content, in hex, lowercase,
//! without a 0x prefix. The same content always yields the same id.
//!
//! ## Running the shell
//!
//! ``` ignore,
//! $ goshare
//! goshare> config /tmp/repo
//! goshare> add ./file.txt
//! goshare> get 2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae /tmp/out.txt
//! goshare> exit
//! ```
//!
//! A repository may also be opened up front with `goshare -r /tmp/repo`.
//!
//! All storage behavior lives in the [engine](crate::engine) module behind
//! three operations; the shell itself only parses lines and drives the
//! command invoker.

/// Process argument handling.
pub mod arg;

/// Cancellation token passed to every engine operation.
pub mod cancel;

/// Connector handle, command variants and the invoker.
pub mod command;

/// The storage engine adapter: create a node, add a file, get a file.
pub mod engine;

/// Line dispatch and the read-eval-print loop.
pub mod shell;
