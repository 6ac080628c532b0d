//! Host I/O abstraction for the `PRINT` and `INPUT` operators.
//!
//! Implement [`PrintWriter`] and [`InputReader`] to capture or redirect the
//! interpreter's console traffic; the defaults talk to stdout/stdin.

use std::{
    cell::RefCell,
    collections::VecDeque,
    io::{self, BufRead as _, Write as _},
    rc::Rc,
};

/// Trait for handling output from the `PRINT` operator.
pub trait PrintWriter {
    /// Writes one formatted argument's text, without separators or a
    /// trailing newline.
    fn write_text(&mut self, output: &str);

    /// Writes a single separator or terminator character.
    fn push_char(&mut self, end: char);
}

/// Default `PrintWriter` that writes to stdout, flushing after each call so
/// prompts without trailing newlines become visible.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn write_text(&mut self, output: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(output.as_bytes());
        let _ = stdout.flush();
    }

    fn push_char(&mut self, end: char) {
        let mut buf = [0u8; 4];
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(end.encode_utf8(&mut buf).as_bytes());
        let _ = stdout.flush();
    }
}

/// A `PrintWriter` that collects all output into a shared string.
///
/// The buffer is behind `Rc<RefCell<..>>` so a clone handed to the
/// interpreter and a clone kept by the test observe the same output.
#[derive(Debug, Default, Clone)]
pub struct CollectStringPrint(Rc<RefCell<String>>);

impl CollectStringPrint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The output collected so far.
    #[must_use]
    pub fn output(&self) -> String {
        self.0.borrow().clone()
    }
}

impl PrintWriter for CollectStringPrint {
    fn write_text(&mut self, output: &str) {
        self.0.borrow_mut().push_str(output);
    }

    fn push_char(&mut self, end: char) {
        self.0.borrow_mut().push(end);
    }
}

/// `PrintWriter` that ignores all output.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn write_text(&mut self, _output: &str) {}

    fn push_char(&mut self, _end: char) {}
}

/// Trait for providing lines to the `INPUT` operator.
pub trait InputReader {
    /// Returns the next input line including its trailing newline, or `None`
    /// at end of input. `INPUT` trims a single trailing newline itself.
    fn read_line(&mut self) -> Option<String>;
}

/// Default `InputReader` backed by stdin.
#[derive(Debug, Default)]
pub struct StdInput;

impl InputReader for StdInput {
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }
}

/// An `InputReader` fed from a shared queue of lines.
///
/// Clones share the queue, so a test can keep one handle to push lines and
/// give the other to the interpreter.
#[derive(Debug, Default, Clone)]
pub struct QueueInput(Rc<RefCell<VecDeque<String>>>);

impl QueueInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one line of input; a newline is appended if missing.
    pub fn push_line(&self, line: impl Into<String>) {
        let mut line = line.into();
        if !line.ends_with('\n') {
            line.push('\n');
        }
        self.0.borrow_mut().push_back(line);
    }
}

impl InputReader for QueueInput {
    fn read_line(&mut self) -> Option<String> {
        self.0.borrow_mut().pop_front()
    }
}
