use thiserror::Error;

/// Failure of a read against the orchestrator backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: status {status}")]
    Http { status: u16, message: Option<String> },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Coarse classification used when deciding how to degrade a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    Parse,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Parse(_) => FetchErrorKind::Parse,
            FetchError::Network(_) | FetchError::Http { .. } | FetchError::NotFound(_) => {
                FetchErrorKind::Network
            }
        }
    }

    /// Message the backend attached to an error response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            FetchError::Http { message, .. } => message.as_deref(),
            FetchError::NotFound(message) if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// Short text shown in place of a region that could not be loaded.
    pub fn placeholder(&self) -> String {
        match self {
            FetchError::Network(_) => "backend unreachable".to_string(),
            FetchError::Http { status, .. } => format!("backend returned HTTP {}", status),
            FetchError::Parse(_) => "unexpected response from backend".to_string(),
            FetchError::NotFound(_) => "no longer available".to_string(),
        }
    }
}

/// Failure of a mutating command (start, stop, create task).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{0} is already in progress")]
    Busy(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CommandError {
    /// The reason to put in front of the operator: the server's own words when it gave any.
    pub fn user_message(&self) -> String {
        match self {
            CommandError::Rejected(reason) => reason.clone(),
            CommandError::Fetch(err) => match err.server_message() {
                Some(message) => message.to_string(),
                None => err.to_string(),
            },
            CommandError::Busy(_) => self.to_string(),
            CommandError::InvalidInput(reason) => reason.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum UltimaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type UltimaResult<T> = Result<T, UltimaError>;
