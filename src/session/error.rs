use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Model load or camera setup failed while starting a session.
    LoadFailure(String),
    /// Capture, filtering or prediction failed during one tick.
    TickFailure(String),
}

impl SessionError {
    pub fn load(error: impl fmt::Display) -> Self {
        SessionError::LoadFailure(error.to_string())
    }

    pub fn tick(error: impl fmt::Display) -> Self {
        SessionError::TickFailure(error.to_string())
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::LoadFailure(reason) => write!(f, "load failure: {}", reason),
            SessionError::TickFailure(reason) => write!(f, "tick failure: {}", reason),
        }
    }
}

impl std::error::Error for SessionError {}
