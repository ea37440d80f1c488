//! File handles.
//!
//! Every open appends a [`VirtualFile`] to the run's [`FileTable`] and
//! hands the engine the new index as its descriptor. The table is
//! append-only: `close` is a no-op, descriptors are never reused or
//! invalidated, and written content stays readable until teardown. That is
//! what lets the orchestrator collect output files after the run ends.

use crate::names::TTY_DEVICE;

/// Descriptor as the engine passes it: a non-negative index into the run's
/// file table. `-1` is accepted by the print procedures only and means "no
/// handle, print to the terminal".
pub type Fd = i32;

/// What a handle stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Ordinary in-memory file.
    Regular,
    /// Terminal read side; `get` serves bytes from the bound input script.
    Stdin,
    /// Terminal write side; prints route to the console sink.
    Stdout,
}

/// One open file.
///
/// `eof` is sticky: only read operations set it and nothing clears it.
/// `eoln` is recomputed by every successful fetch.
#[derive(Debug, Clone)]
pub struct VirtualFile {
    pub filename: String,
    pub kind: FileKind,
    /// Backing bytes. Grows on writes, never shrinks.
    pub content: Vec<u8>,
    /// Cursor shared by reads and writes. Pascal files are strictly
    /// sequential; nothing ever seeks.
    pub position: usize,
    /// Pascal `erstat` register: 0 = the open succeeded, 1 = it failed.
    pub erstat: i32,
    pub eof: bool,
    pub eoln: bool,
}

impl VirtualFile {
    /// Successfully opened regular file with the given starting content.
    pub fn opened(filename: String, content: Vec<u8>) -> Self {
        VirtualFile {
            filename,
            kind: FileKind::Regular,
            content,
            position: 0,
            erstat: 0,
            eof: false,
            eoln: false,
        }
    }

    /// Failed open: no backing buffer, `erstat` already raised.
    pub fn missing(filename: String) -> Self {
        VirtualFile {
            erstat: 1,
            ..VirtualFile::opened(filename, Vec::new())
        }
    }

    /// Terminal read pseudo-file.
    pub fn stdin() -> Self {
        VirtualFile {
            kind: FileKind::Stdin,
            ..VirtualFile::opened(String::from(TTY_DEVICE), Vec::new())
        }
    }

    /// Terminal write pseudo-file.
    pub fn stdout() -> Self {
        VirtualFile {
            kind: FileKind::Stdout,
            ..VirtualFile::opened(String::from(TTY_DEVICE), Vec::new())
        }
    }

    /// True if reads can be served from `content`: a regular file whose
    /// open succeeded. Not-found handles and the terminal pseudo-files
    /// have nothing behind them.
    pub fn has_backing(&self) -> bool {
        self.kind == FileKind::Regular && self.erstat == 0
    }

    /// Bytes left between the cursor and the end of `content`.
    pub fn remaining(&self) -> usize {
        self.content.len().saturating_sub(self.position)
    }

    /// Append `data` at the cursor, growing the buffer as needed. The
    /// buffer never shrinks.
    pub fn write_at_cursor(&mut self, data: &[u8]) {
        let end = self.position + data.len();
        if end > self.content.len() {
            self.content.resize(end, 0);
        }
        self.content[self.position..end].copy_from_slice(data);
        self.position = end;
    }

    /// The written prefix of the file: everything up to the cursor.
    ///
    /// Stdin cursors run past their empty buffer (the script lives
    /// elsewhere), hence the clamp.
    pub fn valid_prefix(&self) -> &[u8] {
        &self.content[..self.position.min(self.content.len())]
    }
}

// ─── File table ─────────────────────────────────────────────────────

/// Append-only table of every file opened during the run.
#[derive(Debug, Default)]
pub struct FileTable {
    files: Vec<VirtualFile>,
}

impl FileTable {
    /// Create an empty table.
    pub fn new() -> Self {
        FileTable { files: Vec::new() }
    }

    /// Append a file, returning its descriptor.
    pub fn push(&mut self, file: VirtualFile) -> Fd {
        self.files.push(file);
        (self.files.len() - 1) as Fd
    }

    /// Entry behind `fd`, if the descriptor is a live index.
    pub fn get(&self, fd: Fd) -> Option<&VirtualFile> {
        usize::try_from(fd).ok().and_then(|i| self.files.get(i))
    }

    /// Mutable entry behind `fd`.
    pub fn get_mut(&mut self, fd: Fd) -> Option<&mut VirtualFile> {
        usize::try_from(fd).ok().and_then(|i| self.files.get_mut(i))
    }

    /// True if some earlier open of `filename` succeeded. Read misses use
    /// this probe: a name the run already produced opens as an empty but
    /// valid file instead of raising `erstat`.
    pub fn has_valid_entry(&self, filename: &str) -> bool {
        self.files
            .iter()
            .any(|f| f.filename == filename && f.erstat == 0)
    }

    /// Written prefix of the first backed entry named `filename`.
    pub fn read_back(&self, filename: &str) -> Option<Vec<u8>> {
        self.files
            .iter()
            .find(|f| f.filename == filename && f.has_backing())
            .map(|f| f.valid_prefix().to_vec())
    }

    /// Number of handles ever opened in this run.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True if nothing was opened yet.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Drop every handle (teardown).
    pub fn clear(&mut self) {
        self.files.clear();
    }
}
