//! TeXBox runtime: the I/O layer beneath a sandboxed TeX engine.
//!
//! The engine is an old Pascal program compiled for a WebAssembly-style
//! sandbox, and it still calls the Pascal runtime library: `reset` and
//! `rewrite` to open files, `get`/`put` to move single blocks,
//! `eof`/`eoln`/`erstat` to poll status, print procedures for terminal and
//! log output, and a handful of wall-clock queries. This crate supplies
//! that surface with no real filesystem underneath: files live in a seeded
//! in-memory store, the terminal is a line-buffered console, and stdin is
//! a pre-bound input script.
//!
//! # Architecture
//!
//! - `store`: filename → bytes map the orchestrator seeds before a run
//! - `names`: legacy filename normalization pipeline
//! - `table`: append-only file handle table with Pascal status flags
//! - `memory`: shared view over the sandbox's linear memory
//! - `stdio`: input script feed + line-buffered console sink
//! - `fonts`: deterministic synthetic font metrics
//! - `clock`: local wall-clock queries
//! - `ctx`: [`IoCtx`], the per-run context tying it all together
//!
//! One run = one [`IoCtx`] value; there is no global state. Concurrent
//! runs are independent contexts on independent threads.

pub mod clock;
pub mod ctx;
pub mod fonts;
pub mod memory;
pub mod names;
pub mod stdio;
pub mod store;
pub mod table;

pub use ctx::IoCtx;
pub use memory::{SharedMemory, PAGE_SIZE};
pub use table::Fd;

use thiserror::Error;

/// Raised errors of the runtime.
///
/// Everything the Pascal program can observe (a failed open, end of file)
/// is reported cooperatively through `erstat`/`eof`/`eoln`. An `Err` from
/// this crate always means the embedder or the engine broke the hosting
/// contract itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShimError {
    /// Descriptor does not name a file table entry.
    #[error("descriptor {0} does not name an open file")]
    BadDescriptor(Fd),
    /// A memory-touching primitive ran before `bind_memory`.
    #[error("no sandbox memory bound to this run")]
    MemoryNotBound,
    /// `read_back` of a file the run never produced.
    #[error("no file named `{0}` was produced by this run")]
    ReadBackNotFound(String),
}
