//! A write handle that follows a script

use std::collections::HashMap;
use std::io::{self, Write};

/// What a [`ScriptedHandle`] does on one write call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Accept the whole buffer
    Accept,
    /// Accept all but the given number of bytes
    Short(usize),
    /// Fail with an I/O error of the given kind
    Fail(io::ErrorKind),
}

/// In-memory write handle recording every call
///
/// Calls are numbered from 1. Calls without a scripted step accept the
/// whole buffer.
#[derive(Debug, Default, Clone)]
pub struct ScriptedHandle {
    script: HashMap<usize, Step>,
    writes: Vec<usize>,
    data: Vec<u8>,
}

impl ScriptedHandle {
    /// A handle that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Make call number `call` accept `shortfall` bytes less than asked
    pub fn short_on_call(self, call: usize, shortfall: usize) -> Self {
        self.with_step(call, Step::Short(shortfall))
    }

    /// Make call number `call` fail with `kind`
    pub fn fail_on_call(self, call: usize, kind: io::ErrorKind) -> Self {
        self.with_step(call, Step::Fail(kind))
    }

    /// Script an arbitrary step for call number `call`
    pub fn with_step(mut self, call: usize, step: Step) -> Self {
        self.script.insert(call, step);
        self
    }

    /// Requested length of every write call so far
    pub fn writes(&self) -> &[usize] {
        &self.writes
    }

    /// Number of write calls so far
    pub fn calls(&self) -> usize {
        self.writes.len()
    }

    /// Bytes accepted so far
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the handle, returning the accepted bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl Write for ScriptedHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes.push(buf.len());
        let call = self.writes.len();

        match self.script.get(&call).copied().unwrap_or(Step::Accept) {
            Step::Accept => {
                self.data.extend_from_slice(buf);
                Ok(buf.len())
            }
            Step::Short(shortfall) => {
                let accepted = buf.len().saturating_sub(shortfall);
                self.data.extend_from_slice(&buf[..accepted]);
                Ok(accepted)
            }
            Step::Fail(kind) => Err(io::Error::new(kind, format!("scripted failure on call {}", call))),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
