//! Narrow contract onto the filesystem collaborator.

use core::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum CreateError<E> {
    AlreadyExists,
    Storage(E),
}

impl<E> From<E> for CreateError<E> {
    fn from(value: E) -> Self {
        Self::Storage(value)
    }
}

impl<E: fmt::Debug> fmt::Display for CreateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => f.write_str("file already exists"),
            Self::Storage(err) => write!(f, "storage error: {err:?}"),
        }
    }
}

pub trait LogStorage {
    type File;
    type Error: fmt::Debug;

    fn mount(&mut self) -> Result<(), Self::Error>;

    /// Creates `name` for writing; must fail with `AlreadyExists` rather than
    /// truncate an existing file.
    fn create_exclusive(&mut self, name: &str) -> Result<Self::File, CreateError<Self::Error>>;

    /// Appends `bytes`, returning how many were accepted.
    fn append(&mut self, file: &mut Self::File, bytes: &[u8]) -> Result<usize, Self::Error>;

    /// Pushes everything appended so far to durable storage.
    fn flush(&mut self, file: &mut Self::File) -> Result<(), Self::Error>;
}
