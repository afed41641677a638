use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    AuthenticationFailed,
    Api(String),
    MissingCredentials,
    HabitNotFound,
    InvalidInput(String),
    InvalidData(String),
    Io(String),
}

impl AppError {
    pub fn api<M: Into<String>>(message: M) -> Self {
        Self::Api(message.into())
    }

    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "auth_failed",
            Self::Api(_) => "api_error",
            Self::MissingCredentials => "missing_credentials",
            Self::HabitNotFound => "habit_not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::AuthenticationFailed => {
                "failed to authenticate with Habitica, check your credentials"
            }
            Self::Api(message) => message,
            Self::MissingCredentials => "Habitica credentials not found, log in first",
            Self::HabitNotFound => "selected habit not found, select a different one",
            Self::InvalidInput(message) => message,
            Self::InvalidData(message) => message,
            Self::Io(message) => message,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}
