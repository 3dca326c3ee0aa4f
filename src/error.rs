use std::path::PathBuf;

/// What went wrong during a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Server answered with a non 2xx status
    Http(u16),
    Connection,
    Timeout,
    /// Any other transport problem (building the client or request, redirects, body reading)
    Request,
    /// Body was not JSON
    Decode,
    /// Body was JSON but had no `response` key
    MissingResponse,
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchErrorKind::Http(status) => write!(f, "HTTP error ({})", status),
            FetchErrorKind::Connection => write!(f, "Connection error"),
            FetchErrorKind::Timeout => write!(f, "Timeout error"),
            FetchErrorKind::Request => write!(f, "Request error"),
            FetchErrorKind::Decode => write!(f, "Decode error"),
            FetchErrorKind::MissingResponse => write!(f, "Missing response field"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Sorts a reqwest error into one of our kinds. Timeout is checked before connect, a
    /// connect timeout reports both.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if let Some(status) = err.status() {
            FetchErrorKind::Http(status.as_u16())
        } else if err.is_timeout() {
            FetchErrorKind::Timeout
        } else if err.is_connect() {
            FetchErrorKind::Connection
        } else if err.is_decode() {
            FetchErrorKind::Decode
        } else {
            FetchErrorKind::Request
        };
        Self::new(kind, err.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::from_reqwest(err)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Error saving file to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error serializing data for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SaveError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            SaveError::Io { path, .. } | SaveError::Serialize { path, .. } => path,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_message_names_kind() {
        let err = FetchError::new(FetchErrorKind::Http(404), "Not Found");
        assert_eq!(err.to_string(), "HTTP error (404): Not Found");
        let err = FetchError::new(FetchErrorKind::Timeout, "operation timed out");
        assert_eq!(err.to_string(), "Timeout error: operation timed out");
    }

    #[test]
    fn save_error_names_path() {
        let err = SaveError::Io {
            path: PathBuf::from("/nope/x.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.path(), std::path::Path::new("/nope/x.json"));
        assert!(err.to_string().starts_with("Error saving file to /nope/x.json"));
    }
}
