//! Log session: provisions a fresh `hlogNNN.txt` and appends flushed records.

mod engine;
mod events;
mod machine;
#[cfg(test)]
mod tests;

use core::fmt::{self, Write as _};

use heapless::String;

use crate::{
    config::{LOG_FILE_ATTEMPTS, LOG_NAME_EXT, LOG_NAME_MAX, LOG_NAME_PREFIX},
    console::{Console, Transport},
    rate::LogRecord,
    storage::{CreateError, LogStorage},
};

use engine::SessionEngine;
use events::SessionEvent;
pub use machine::SessionPhase;
use machine::TransitionStatus;

#[derive(Debug, PartialEq, Eq)]
pub enum ProvisionError<E> {
    Mount(E),
    Create(E),
    Exhausted { attempts: u16 },
    NotProvisioning,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AppendError<E> {
    ShortWrite { written: usize, expected: usize },
    Write(E),
    Flush(E),
    NotActive,
}

impl<E: fmt::Debug> fmt::Display for ProvisionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mount(err) => write!(f, "mount failed: {err:?}"),
            Self::Create(err) => write!(f, "log file create failed: {err:?}"),
            Self::Exhausted { attempts } => {
                write!(f, "no free log file name after {attempts} attempts")
            }
            Self::NotProvisioning => f.write_str("session already provisioned"),
        }
    }
}

impl<E: fmt::Debug> fmt::Display for AppendError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortWrite { written, expected } => {
                write!(f, "short write: {written} of {expected} bytes")
            }
            Self::Write(err) => write!(f, "write failed: {err:?}"),
            Self::Flush(err) => write!(f, "sync failed: {err:?}"),
            Self::NotActive => f.write_str("session not active"),
        }
    }
}

/// Result codes echoed as `res = <code>` while provisioning, in FatFs
/// numbering: no file yet, then name already taken.
const RES_NO_FILE: u8 = 4;
const RES_EXIST: u8 = 8;

/// `hlog000.txt`, `hlog001.txt`, ...
pub fn log_file_name(index: u16) -> String<LOG_NAME_MAX> {
    let mut name = String::new();
    let _ = write!(&mut name, "{LOG_NAME_PREFIX}{index:03}.{LOG_NAME_EXT}");
    name
}

pub struct LogWriter<S: LogStorage> {
    storage: S,
    file: Option<S::File>,
    session: SessionEngine,
    name: String<LOG_NAME_MAX>,
}

impl<S: LogStorage> LogWriter<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            file: None,
            session: SessionEngine::new(),
            name: String::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    /// Name of the open log, once provisioned.
    pub fn file_name(&self) -> Option<&str> {
        if self.name.is_empty() {
            None
        } else {
            Some(self.name.as_str())
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mounts storage and creates the first unused log file name.
    ///
    /// Name collisions move on to the next suffix, up to `LOG_FILE_ATTEMPTS`
    /// names. Every other failure is final and stops the session.
    pub fn provision<T: Transport>(
        &mut self,
        console: &mut Console<T>,
    ) -> Result<(), ProvisionError<S::Error>> {
        if self.phase() != SessionPhase::Provisioning {
            return Err(ProvisionError::NotProvisioning);
        }

        if let Err(err) = self.storage.mount() {
            console.line(format_args!("mount failed"));
            return Err(self.fail_provisioning(ProvisionError::Mount(err)));
        }
        console.line(format_args!("mount successful"));

        let mut last = RES_NO_FILE;
        for index in 0..LOG_FILE_ATTEMPTS {
            let name = log_file_name(index);
            console.line(format_args!("res = {last} trying {name}"));
            match self.storage.create_exclusive(&name) {
                Ok(file) => {
                    console.line(format_args!("file opened successfully"));
                    log::info!("logging to {}", name.as_str());
                    self.file = Some(file);
                    self.name = name;
                    self.transition(SessionEvent::Opened);
                    return Ok(());
                }
                Err(CreateError::AlreadyExists) => {
                    log::debug!("{} exists", name.as_str());
                    last = RES_EXIST;
                }
                Err(CreateError::Storage(err)) => {
                    console.line(format_args!("file open failed"));
                    return Err(self.fail_provisioning(ProvisionError::Create(err)));
                }
            }
        }

        console.line(format_args!("file open failed"));
        Err(self.fail_provisioning(ProvisionError::Exhausted {
            attempts: LOG_FILE_ATTEMPTS,
        }))
    }

    fn transition(&mut self, event: SessionEvent) {
        let result = self.session.apply(event);
        if result.status == TransitionStatus::InvalidTransition {
            log::warn!("session event {:?} ignored in {:?}", event, result.before);
        } else if result.changed() {
            log::info!("session {:?} -> {:?}", result.before, result.after);
        }
    }

    fn fail_provisioning(&mut self, err: ProvisionError<S::Error>) -> ProvisionError<S::Error> {
        log::error!("provisioning failed: {}", err);
        self.transition(SessionEvent::ProvisioningFailed);
        err
    }

    /// Writes one record and syncs it. Any failure stops the session for good.
    pub fn append<T: Transport>(
        &mut self,
        record: &LogRecord,
        console: &mut Console<T>,
    ) -> Result<(), AppendError<S::Error>> {
        if self.phase() != SessionPhase::Active {
            return Err(AppendError::NotActive);
        }
        let Some(file) = self.file.as_mut() else {
            return Err(AppendError::NotActive);
        };

        let bytes = record.as_bytes();
        let result = match self.storage.append(file, bytes) {
            Ok(written) if written == bytes.len() => {
                self.storage.flush(file).map_err(AppendError::Flush)
            }
            Ok(written) => Err(AppendError::ShortWrite {
                written,
                expected: bytes.len(),
            }),
            Err(err) => Err(AppendError::Write(err)),
        };

        match &result {
            Ok(()) => {
                self.transition(SessionEvent::Committed);
            }
            Err(err) => {
                match err {
                    AppendError::ShortWrite { written, .. } => {
                        console.line(format_args!("Oops, only wrote {written} bytes"));
                    }
                    AppendError::Write(_) => {
                        console.line(format_args!("Oops, only wrote 0 bytes"));
                    }
                    AppendError::Flush(_) => {
                        console.line(format_args!("error syncing to disk."));
                    }
                    AppendError::NotActive => {}
                }
                log::error!("{}: {}", self.name.as_str(), err);
                self.file = None;
                self.transition(SessionEvent::IntegrityLost);
            }
        }
        result
    }
}
