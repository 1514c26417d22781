use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    Transport,
    Parse,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
    pub http_status: Option<u16>,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http_status {
            Some(status) => write!(f, "{} (http_status={})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for GatewayError {}

pub fn transport_error(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::Transport, message)
}

pub fn parse_error(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::Parse, message)
}

pub fn configuration_error(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::Configuration, message)
}

pub fn internal_error(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::Internal, message)
}
