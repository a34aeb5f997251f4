use std::fmt;

/// Failure taxonomy for the persistence layer. `Init` means a store never
/// became usable and the app should not continue; `Read`/`Write` are
/// per-operation failures surfaced to the caller, never retried internally.
#[derive(Debug)]
pub enum StoreError {
    Init(String),
    Read(String),
    Write(String),
}

impl StoreError {
    pub(crate) fn init(err: impl fmt::Display) -> Self {
        StoreError::Init(err.to_string())
    }

    pub(crate) fn read(err: impl fmt::Display) -> Self {
        StoreError::Read(err.to_string())
    }

    pub(crate) fn write(err: impl fmt::Display) -> Self {
        StoreError::Write(err.to_string())
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Init(msg) => write!(f, "initialization error: {msg}"),
            StoreError::Read(msg) => write!(f, "read error: {msg}"),
            StoreError::Write(msg) => write!(f, "write error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
