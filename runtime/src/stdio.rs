//! Terminal streams.
//!
//! Both sides of the engine's terminal are synthetic. Reads come from an
//! input script the orchestrator bound before the run; writes are
//! line-buffered and handed to an external sink one complete line at a
//! time. Neither side touches a real tty.

/// Byte served for stdin reads past the end of the script: an endless
/// carriage return, which the engine parses as an empty input line.
pub const INPUT_SENTINEL: u8 = b'\r';

/// Receives each complete console line, without its newline.
pub type LineSink = Box<dyn FnMut(&str)>;

/// Fired once, by the first stdin read past the end of the script.
pub type ExhaustedHook = Box<dyn FnOnce()>;

// ─── Input feed ─────────────────────────────────────────────────────

/// The engine's standard input: a byte script served one byte per `get`.
///
/// The read cursor is not here. It lives on the stdin pseudo-file handle,
/// so several terminal read handles scan the same script independently.
#[derive(Default)]
pub struct InputFeed {
    script: Vec<u8>,
    hook: Option<ExhaustedHook>,
}

impl InputFeed {
    /// Empty feed: every read is already past the end.
    pub fn new() -> Self {
        InputFeed {
            script: Vec::new(),
            hook: None,
        }
    }

    /// Replace the script. Cursors of already-open stdin handles are
    /// untouched.
    pub fn bind(&mut self, script: Vec<u8>) {
        self.script = script;
    }

    /// Register the exhaustion hook. A later registration replaces an
    /// unfired one.
    pub fn set_hook(&mut self, hook: ExhaustedHook) {
        self.hook = Some(hook);
    }

    /// Byte at `cursor`, or `None` past the end of the script.
    pub fn byte_at(&self, cursor: usize) -> Option<u8> {
        self.script.get(cursor).copied()
    }

    /// Script length in bytes.
    pub fn len(&self) -> usize {
        self.script.len()
    }

    /// True if no script is bound.
    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    /// Fire the exhaustion hook. Only the first call does anything.
    pub fn notify_exhausted(&mut self) {
        if let Some(hook) = self.hook.take() {
            hook();
        }
    }

    /// Drop the script and any unfired hook (teardown).
    pub fn clear(&mut self) {
        self.script.clear();
        self.hook = None;
    }
}

// ─── Console sink ───────────────────────────────────────────────────

/// Line-buffered console output.
///
/// Disabled until a sink is installed; writes while disabled are dropped,
/// which is how a headless run stays quiet. Once enabled, text accumulates
/// until a newline completes a line. Complete non-empty lines go to the
/// sink; the trailing fragment stays pending for the next write.
#[derive(Default)]
pub struct ConsoleSink {
    sink: Option<LineSink>,
    pending: String,
}

impl ConsoleSink {
    /// Disabled console.
    pub fn new() -> Self {
        ConsoleSink {
            sink: None,
            pending: String::new(),
        }
    }

    /// Install the line sink and start forwarding output.
    pub fn enable(&mut self, sink: LineSink) {
        self.sink = Some(sink);
    }

    /// True once a sink is installed.
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Append terminal output. Every completed non-empty line is emitted;
    /// empty lines are suppressed.
    pub fn write(&mut self, text: &str) {
        let sink = match self.sink.as_mut() {
            Some(sink) => sink,
            None => return,
        };
        self.pending.push_str(text);
        while let Some(newline) = self.pending.find('\n') {
            let mut line: String = self.pending.drain(..=newline).collect();
            line.pop();
            if !line.is_empty() {
                sink(&line);
            }
        }
    }

    /// Emit the pending fragment as a final line. No-op when nothing is
    /// pending.
    pub fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.write("\n");
        }
    }

    /// The unterminated tail waiting for its newline.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Drop the sink and any pending fragment (teardown).
    pub fn clear(&mut self) {
        self.sink = None;
        self.pending.clear();
    }
}
