use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure raised by any peripheral operation.
///
/// Every variant carries the native diagnostic as its source; there is no
/// retry or partial-success path anywhere in the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller supplied an invalid combination of arguments.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// A device, chip, or channel could not be acquired.
    #[error("failed to open `{}`: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A bus transfer (read, write, or full-duplex exchange) failed.
    #[error("transfer failed: {source}")]
    Transfer {
        #[source]
        source: io::Error,
    },

    /// A blocking read/write or event wait failed at the native layer.
    #[error("{op} failed: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// A device property could not be applied.
    #[error("failed to configure {property}: {source}")]
    Configure {
        property: &'static str,
        #[source]
        source: io::Error,
    },

    /// A device or line could not be released.
    #[error("failed to release device: {source}")]
    Close {
        #[source]
        source: io::Error,
    },

    /// A caller-supplied event handler failed or panicked. The failure is
    /// contained here instead of unwinding into the poll loop.
    #[error("event handler failed: {source}")]
    Handler {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Open {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn transfer(errno: nix::errno::Errno) -> Self {
        Error::Transfer {
            source: errno_to_io(errno),
        }
    }

    pub(crate) fn configure(property: &'static str, errno: nix::errno::Errno) -> Self {
        Error::Configure {
            property,
            source: errno_to_io(errno),
        }
    }
}

pub(crate) fn errno_to_io(errno: nix::errno::Errno) -> io::Error {
    io::Error::from_raw_os_error(errno as i32)
}
