use core::str;

use heapless::Vec;

use crate::error::Error;
use crate::RX_BUFFER_SIZE;

/// Longest line the assembler holds
pub const LINE_CAPACITY: usize = RX_BUFFER_SIZE - 1;

/// A complete serial line without its terminator
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandLine(Vec<u8, LINE_CAPACITY>);

impl CommandLine {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str(&self) -> Result<&str, Error> {
        str::from_utf8(&self.0).map_err(|_| Error::InvalidInput)
    }
}

/// Collects serial bytes until `\n` or `\r`.
///
/// A line longer than [`LINE_CAPACITY`] is dropped as a whole: the bytes
/// up to the next terminator are discarded. Empty lines are skipped.
#[derive(Default)]
pub struct LineAssembler {
    buf: Vec<u8, LINE_CAPACITY>,
    discarding: bool,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, byte: u8) -> Result<Option<CommandLine>, Error> {
        if byte == b'\n' || byte == b'\r' {
            if self.discarding {
                self.discarding = false;
                return Ok(None);
            }
            if self.buf.is_empty() {
                return Ok(None);
            }
            let line = core::mem::take(&mut self.buf);
            return Ok(Some(CommandLine(line)));
        }

        if self.discarding {
            return Ok(None);
        }

        if self.buf.push(byte).is_err() {
            self.buf.clear();
            self.discarding = true;
            return Err(Error::LineOverflow);
        }

        Ok(None)
    }

    /// Bytes of the line in progress
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
