//! Host-side fakes for the hardware and filesystem seams.

use std::collections::VecDeque;

use crate::{
    capture::{TimeBase, TimerFault},
    console::Transport,
    session::log_file_name,
    status::{StatusLine, StatusOutputs},
    storage::{CreateError, LogStorage},
    RawSample,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FakeError {
    NoCard,
    Io,
}

#[derive(Debug)]
pub(crate) struct FakeFile;

#[derive(Default)]
pub(crate) struct FakeStorage {
    pub(crate) existing: Vec<String>,
    pub(crate) attempts: Vec<String>,
    pub(crate) created: Option<String>,
    pub(crate) written: Vec<u8>,
    pub(crate) append_calls: usize,
    pub(crate) flush_calls: usize,
    pub(crate) fail_mount: bool,
    pub(crate) fail_create: bool,
    /// 1-based append call that accepts one byte less than offered.
    pub(crate) short_write_on: Option<usize>,
    pub(crate) fail_write_on: Option<usize>,
    /// 1-based flush call that fails.
    pub(crate) fail_flush_on: Option<usize>,
}

impl FakeStorage {
    pub(crate) fn with_existing(count: u16) -> Self {
        Self {
            existing: (0..count)
                .map(|index| log_file_name(index).as_str().to_owned())
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn written_text(&self) -> String {
        String::from_utf8_lossy(&self.written).into_owned()
    }
}

impl LogStorage for FakeStorage {
    type File = FakeFile;
    type Error = FakeError;

    fn mount(&mut self) -> Result<(), Self::Error> {
        if self.fail_mount {
            Err(FakeError::NoCard)
        } else {
            Ok(())
        }
    }

    fn create_exclusive(&mut self, name: &str) -> Result<Self::File, CreateError<Self::Error>> {
        self.attempts.push(name.to_owned());
        if self.fail_create {
            return Err(CreateError::Storage(FakeError::Io));
        }
        if self.existing.iter().any(|existing| existing == name) {
            return Err(CreateError::AlreadyExists);
        }
        self.existing.push(name.to_owned());
        self.created = Some(name.to_owned());
        Ok(FakeFile)
    }

    fn append(&mut self, _file: &mut Self::File, bytes: &[u8]) -> Result<usize, Self::Error> {
        self.append_calls += 1;
        if self.fail_write_on == Some(self.append_calls) {
            return Err(FakeError::Io);
        }
        let accepted = if self.short_write_on == Some(self.append_calls) {
            bytes.len() - 1
        } else {
            bytes.len()
        };
        self.written.extend_from_slice(&bytes[..accepted]);
        Ok(accepted)
    }

    fn flush(&mut self, _file: &mut Self::File) -> Result<(), Self::Error> {
        self.flush_calls += 1;
        if self.fail_flush_on == Some(self.flush_calls) {
            Err(FakeError::Io)
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeTransport {
    pub(crate) bytes: Vec<u8>,
}

impl FakeTransport {
    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl Transport for FakeTransport {
    fn transmit(&mut self, byte: u8) {
        self.bytes.push(byte);
    }
}

#[derive(Default)]
pub(crate) struct FakeTimeBase {
    intervals: VecDeque<RawSample>,
    pub(crate) latches: usize,
    pub(crate) timer_restarts: usize,
    pub(crate) fail_restart: bool,
}

impl FakeTimeBase {
    pub(crate) fn with_intervals(intervals: &[RawSample]) -> Self {
        Self {
            intervals: intervals.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl TimeBase for FakeTimeBase {
    fn latch_capture(&mut self) -> RawSample {
        self.latches += 1;
        self.intervals.pop_front().unwrap_or(RawSample::MAX)
    }

    fn restart_timers(&mut self) -> Result<(), TimerFault> {
        self.timer_restarts += 1;
        if self.fail_restart {
            Err(TimerFault)
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeOutputs {
    pub(crate) drives: Vec<(StatusLine, bool)>,
}

impl FakeOutputs {
    pub(crate) fn level(&self, line: StatusLine) -> Option<bool> {
        self.drives
            .iter()
            .rev()
            .find(|(driven, _)| *driven == line)
            .map(|(_, active)| *active)
    }
}

impl StatusOutputs for FakeOutputs {
    fn drive(&mut self, line: StatusLine, active: bool) {
        self.drives.push((line, active));
    }
}
