//! Append-only result log
//!
//! Each candidate contributes one entry: the solver transcript, optionally an
//! annotation line, then a separator of 30 `#` characters on its own line.
//! The log is itself a [`Write`] sink so a solver can stream its transcript
//! straight into the current entry.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Width of the separator line
pub const SEPARATOR_WIDTH: usize = 30;

/// Separator line written after every entry, without the newline
pub fn separator() -> String {
    "#".repeat(SEPARATOR_WIDTH)
}

/// Result log over any writer
pub struct ResultLog<W: Write = BufWriter<File>> {
    writer: W,
    entries: u64,
    at_line_start: bool,
}

impl ResultLog<BufWriter<File>> {
    /// Create (or truncate) the log file at `path`
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> ResultLog<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            entries: 0,
            at_line_start: true,
        }
    }

    fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        if let Some(&last) = bytes.last() {
            self.writer.write_all(bytes)?;
            self.at_line_start = last == b'\n';
        }
        Ok(())
    }

    /// Append a `!! <note>` line to the current entry
    pub fn annotate(&mut self, note: &str) -> io::Result<()> {
        self.end_line()?;
        self.write_raw(format!("!! {note}\n").as_bytes())?;
        self.writer.flush()
    }

    /// Terminate the current entry with the separator line
    pub fn close_entry(&mut self) -> io::Result<()> {
        self.end_line()?;
        self.write_raw(format!("{}\n", separator()).as_bytes())?;
        self.writer.flush()?;
        self.entries += 1;
        Ok(())
    }

    fn end_line(&mut self) -> io::Result<()> {
        if !self.at_line_start {
            self.write_raw(b"\n")?;
        }
        Ok(())
    }

    /// Number of closed entries
    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Flush and hand back the writer
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Transcript bytes written to the log go into the current entry verbatim
impl<W: Write> Write for ResultLog<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.writer.write(buf)?;
        if written > 0 {
            self.at_line_start = buf[written - 1] == b'\n';
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
