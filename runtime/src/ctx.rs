//! Per-run I/O context.
//!
//! [`IoCtx`] owns everything one engine run touches: the seeded file
//! store, the handle table, the bound sandbox memory, the input script and
//! the console sink. The orchestrator drives the seed/bind surface before
//! the run and `read_back`/`teardown` after it; the engine drives the
//! Pascal primitive surface during it. Calls are strictly sequential; the
//! context is single-threaded by construction.

use log::debug;

use crate::fonts;
use crate::memory::SharedMemory;
use crate::names::{self, TTY_DEVICE};
use crate::stdio::{ConsoleSink, InputFeed, INPUT_SENTINEL};
use crate::store::FileStore;
use crate::table::{Fd, FileKind, FileTable, VirtualFile};
use crate::ShimError;

/// Bytes `eoln` reports: line feed and carriage return.
fn is_line_boundary(byte: u8) -> bool {
    matches!(byte, b'\n' | b'\r')
}

/// Terminal rendition of print output: one character per byte. The
/// engine's text is 8-bit, not UTF-8.
fn console_text(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// One run's I/O state.
pub struct IoCtx {
    store: FileStore,
    files: FileTable,
    memory: Option<SharedMemory>,
    input: InputFeed,
    console: ConsoleSink,
}

impl IoCtx {
    /// Fresh context: empty store and table, no memory bound, empty input
    /// script, console disabled.
    pub fn new() -> Self {
        IoCtx {
            store: FileStore::new(),
            files: FileTable::new(),
            memory: None,
            input: InputFeed::new(),
            console: ConsoleSink::new(),
        }
    }

    // ─── Orchestrator surface ───────────────────────────────────────

    /// Stage a file the engine can later open for read.
    pub fn seed_store(&mut self, filename: &str, bytes: Vec<u8>) {
        let name = names::normalize(filename);
        debug!("seed {} ({} bytes)", name, bytes.len());
        self.store.seed(&name, bytes);
    }

    /// True if `filename` is staged in the store.
    pub fn file_exists(&self, filename: &str) -> bool {
        self.store.contains(&names::normalize(filename))
    }

    /// Install the shared handle to the sandbox's linear memory.
    pub fn bind_memory(&mut self, memory: SharedMemory) {
        self.memory = Some(memory);
    }

    /// Bind the script served as the engine's standard input.
    pub fn bind_input(&mut self, script: impl Into<Vec<u8>>) {
        self.input.bind(script.into());
    }

    /// Register a hook fired once, by the first stdin read past the end
    /// of the script. Engines idle on their terminal when done, so this is
    /// the natural run-completion signal.
    pub fn on_input_exhausted(&mut self, hook: impl FnOnce() + 'static) {
        self.input.set_hook(Box::new(hook));
    }

    /// Enable the console, forwarding each complete output line to `sink`.
    pub fn enable_console(&mut self, sink: impl FnMut(&str) + 'static) {
        self.console.enable(Box::new(sink));
    }

    /// Flush the console's pending fragment as a final line.
    pub fn flush_console(&mut self) {
        self.console.flush();
    }

    /// Bytes of a file the run produced: the written prefix of the first
    /// matching handle. The name is normalized like every other name on
    /// this surface. Fails if no such file was ever opened with a backing
    /// buffer.
    pub fn read_back(&self, filename: &str) -> Result<Vec<u8>, ShimError> {
        let name = names::normalize(filename);
        match self.files.read_back(&name) {
            Some(bytes) => {
                debug!("read_back {} ({} bytes)", name, bytes.len());
                Ok(bytes)
            }
            None => Err(ShimError::ReadBackNotFound(name)),
        }
    }

    /// Reset every component to its post-`new` state. Dropping the
    /// context is equivalent; this exists for orchestrators that pool and
    /// reuse contexts between runs.
    pub fn teardown(&mut self) {
        debug!(
            "teardown: {} store entries, {} handles",
            self.store.len(),
            self.files.len()
        );
        self.store.clear();
        self.files.clear();
        self.memory = None;
        self.input.clear();
        self.console.clear();
    }

    // ─── Open primitives ────────────────────────────────────────────

    /// Pascal `reset`: open for read. The engine places the filename in
    /// sandbox memory at `(ptr, len)`.
    pub fn reset(&mut self, len: usize, ptr: usize) -> Result<Fd, ShimError> {
        let name = self.name_from_memory(len, ptr)?;
        Ok(self.open_read(&name))
    }

    /// Pascal `rewrite`: open for write, filename in sandbox memory.
    pub fn rewrite(&mut self, len: usize, ptr: usize) -> Result<Fd, ShimError> {
        let name = self.name_from_memory(len, ptr)?;
        Ok(self.open_write(&name))
    }

    /// Open for read, addressed by name. Resolution order: terminal
    /// device, store, font synthesis, names the run already produced,
    /// not-found handle (erstat 1). Opens never raise Pascal-visible
    /// errors; a miss is a valid handle with `erstat` set.
    pub fn open_read(&mut self, filename: &str) -> Fd {
        let name = names::normalize(filename);
        if name == TTY_DEVICE {
            debug!("open_read {}: terminal", name);
            return self.files.push(VirtualFile::stdin());
        }
        let file = if let Some(bytes) = self.store.get(&name) {
            debug!("open_read {}: store hit ({} bytes)", name, bytes.len());
            VirtualFile::opened(name, bytes.to_vec())
        } else if fonts::is_font_metric(&name) {
            debug!("open_read {}: synthesized font metrics", name);
            let metrics = fonts::synthesize(&name);
            VirtualFile::opened(name, metrics)
        } else if self.files.has_valid_entry(&name) {
            debug!("open_read {}: produced earlier in this run", name);
            VirtualFile::opened(name, Vec::new())
        } else {
            debug!("open_read {}: not found", name);
            VirtualFile::missing(name)
        };
        self.files.push(file)
    }

    /// Open for write, addressed by name: always a fresh empty handle,
    /// never seeded from the store or the synthesizers. The terminal
    /// device opens as the console-backed stdout pseudo-file.
    pub fn open_write(&mut self, filename: &str) -> Fd {
        let name = names::normalize(filename);
        if name == TTY_DEVICE {
            debug!("open_write {}: terminal", name);
            return self.files.push(VirtualFile::stdout());
        }
        debug!("open_write {}", name);
        self.files.push(VirtualFile::opened(name, Vec::new()))
    }

    // ─── Status primitives ──────────────────────────────────────────

    /// Pascal `close`. Validates the descriptor and nothing else: the
    /// table is append-only, so written bytes stay readable for
    /// `read_back` until teardown.
    pub fn close(&mut self, fd: Fd) -> Result<(), ShimError> {
        self.file(fd).map(|_| ())
    }

    /// Pascal `eof`.
    pub fn eof(&self, fd: Fd) -> Result<bool, ShimError> {
        Ok(self.file(fd)?.eof)
    }

    /// Pascal `eoln`.
    pub fn eoln(&self, fd: Fd) -> Result<bool, ShimError> {
        Ok(self.file(fd)?.eoln)
    }

    /// Pascal `erstat` register: 0 = the open succeeded, 1 = it failed.
    pub fn erstat(&self, fd: Fd) -> Result<i32, ShimError> {
        Ok(self.file(fd)?.erstat)
    }

    // ─── Block transfer ─────────────────────────────────────────────

    /// Pascal `get`: read one block of `len` bytes into sandbox memory at
    /// `ptr`.
    ///
    /// Stdin handles serve one script byte per call (the carriage-return
    /// sentinel once the script is exhausted). Handles without backing
    /// content only raise their flags. Regular handles copy from the
    /// cursor; a read past the end or of zero length stores a NUL
    /// sentinel, a short read copies what remains. `eof` and `eoln`
    /// follow each outcome.
    pub fn get(&mut self, fd: Fd, ptr: usize, len: usize) -> Result<(), ShimError> {
        let memory = self.bound_memory()?;
        let file = self
            .files
            .get_mut(fd)
            .ok_or(ShimError::BadDescriptor(fd))?;

        match file.kind {
            FileKind::Stdin => match self.input.byte_at(file.position) {
                Some(byte) => {
                    memory.write_u8(ptr, byte);
                    file.position += len;
                    file.eoln = is_line_boundary(byte);
                }
                None => {
                    memory.write_u8(ptr, INPUT_SENTINEL);
                    file.eof = true;
                    file.eoln = true;
                    self.input.notify_exhausted();
                }
            },
            _ if !file.has_backing() => {
                // Not-found handle or the terminal write side: flags only,
                // memory untouched.
                file.eof = true;
                file.eoln = true;
            }
            _ => {
                let available = file.remaining();
                if available == 0 || len == 0 {
                    // Nothing transfers, but the engine still expects a
                    // byte at the destination.
                    memory.write_u8(ptr, 0);
                    file.eof = true;
                    file.eoln = true;
                } else if available < len {
                    memory.write(ptr, &file.content[file.position..]);
                    file.position += available;
                    file.eof = true;
                    file.eoln = true;
                } else {
                    let first = file.content[file.position];
                    memory.write(ptr, &file.content[file.position..file.position + len]);
                    file.position += len;
                    file.eoln = is_line_boundary(first);
                }
            }
        }
        Ok(())
    }

    /// Pascal `put`: write one block of `len` bytes from sandbox memory
    /// at `ptr` to the handle cursor, growing the file as needed.
    pub fn put(&mut self, fd: Fd, ptr: usize, len: usize) -> Result<(), ShimError> {
        let memory = self.bound_memory()?;
        let file = self
            .files
            .get_mut(fd)
            .ok_or(ShimError::BadDescriptor(fd))?;
        let data = memory.read(ptr, len);
        file.write_at_cursor(&data);
        Ok(())
    }

    // ─── Print procedures ───────────────────────────────────────────

    /// `print_string`: length-prefixed string in sandbox memory. The byte
    /// at `ptr` is the length, the text follows it.
    pub fn print_string(&mut self, fd: Fd, ptr: usize) -> Result<(), ShimError> {
        let memory = self.bound_memory()?;
        let len = usize::from(memory.read_u8(ptr));
        let bytes = memory.read(ptr + 1, len);
        self.print(fd, &bytes)
    }

    /// `print_boolean`: Pascal spells booleans upper-case.
    pub fn print_boolean(&mut self, fd: Fd, value: bool) -> Result<(), ShimError> {
        let text = if value { "TRUE" } else { "FALSE" };
        self.print(fd, text.as_bytes())
    }

    /// `print_char`: one character by code. A file receives the byte as
    /// is; the terminal shows the character it codes for.
    pub fn print_char(&mut self, fd: Fd, code: u8) -> Result<(), ShimError> {
        self.print(fd, &[code])
    }

    /// `print_integer`: canonical decimal.
    pub fn print_integer(&mut self, fd: Fd, value: i32) -> Result<(), ShimError> {
        let text = value.to_string();
        self.print(fd, text.as_bytes())
    }

    /// `print_float`: shortest round-trip decimal.
    pub fn print_float(&mut self, fd: Fd, value: f64) -> Result<(), ShimError> {
        let text = value.to_string();
        self.print(fd, text.as_bytes())
    }

    /// `print_newline`.
    pub fn print_newline(&mut self, fd: Fd) -> Result<(), ShimError> {
        self.print(fd, b"\n")
    }

    // ─── Internals ──────────────────────────────────────────────────

    /// Route print output wherever `fd` points: the console for negative
    /// descriptors and terminal handles, the handle buffer otherwise.
    /// Files receive `bytes` verbatim; only the console decodes them.
    fn print(&mut self, fd: Fd, bytes: &[u8]) -> Result<(), ShimError> {
        if fd < 0 {
            self.console.write(&console_text(bytes));
            return Ok(());
        }
        let file = self
            .files
            .get_mut(fd)
            .ok_or(ShimError::BadDescriptor(fd))?;
        if file.kind == FileKind::Stdout {
            self.console.write(&console_text(bytes));
        } else {
            file.write_at_cursor(bytes);
        }
        Ok(())
    }

    fn file(&self, fd: Fd) -> Result<&VirtualFile, ShimError> {
        self.files.get(fd).ok_or(ShimError::BadDescriptor(fd))
    }

    fn bound_memory(&self) -> Result<SharedMemory, ShimError> {
        self.memory.clone().ok_or(ShimError::MemoryNotBound)
    }

    /// Read a filename the engine placed in sandbox memory.
    fn name_from_memory(&self, len: usize, ptr: usize) -> Result<String, ShimError> {
        let bytes = self.bound_memory()?.read(ptr, len);
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Default for IoCtx {
    fn default() -> Self {
        IoCtx::new()
    }
}
