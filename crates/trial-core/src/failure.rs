//! Failure values captured from tests and hooks, and their rendering

use colored::*;
use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::panic::Location;

/// Why a test or hook failed.
///
/// The variants mirror what a callback can hand back: an error with
/// optional details, a bare message, a structured value, or nothing
/// recognizable at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// An error, with details such as a cause chain, backtrace or location
    Error {
        message: String,
        details: Option<String>,
    },
    /// A plain message
    Message(String),
    /// A structured value that is not an error
    Value(serde_json::Value),
    /// A payload that could not be interpreted
    Unknown,
}

impl Failure {
    /// Assertion failure pointing at the caller's location
    #[track_caller]
    pub fn assertion(message: impl Into<String>) -> Self {
        Failure::Error {
            message: message.into(),
            details: Some(format!("at {}", Location::caller())),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Failure::Message(message.into())
    }

    pub fn value(value: serde_json::Value) -> Self {
        Failure::Value(value)
    }

    /// Capture an error with its cause chain.
    ///
    /// Errors without a source fall back to a backtrace when
    /// `RUST_BACKTRACE` enables one.
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        let details = if !causes.is_empty() {
            let lines: Vec<String> = causes
                .iter()
                .enumerate()
                .map(|(i, c)| format!("  {}: {}", i, c))
                .collect();
            Some(format!("Caused by:\n{}", lines.join("\n")))
        } else {
            let backtrace = Backtrace::capture();
            match backtrace.status() {
                BacktraceStatus::Captured => Some(backtrace.to_string()),
                _ => None,
            }
        };

        Failure::Error {
            message: error.to_string(),
            details,
        }
    }

    /// Interpret a panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Failure>() {
            Ok(failure) => return *failure,
            Err(other) => other,
        };
        let payload = match payload.downcast::<String>() {
            Ok(message) => return Failure::Message(*message),
            Err(other) => other,
        };
        let payload = match payload.downcast::<&'static str>() {
            Ok(message) => return Failure::Message((*message).to_string()),
            Err(other) => other,
        };
        match payload.downcast::<serde_json::Value>() {
            Ok(value) => Failure::Value(*value),
            Err(_) => Failure::Unknown,
        }
    }

    /// Render the block shown for a failed test or hook.
    pub fn render(&self, name: &str) -> String {
        let header = format!("\"{}\" failed.", name).bold().to_string();
        let body = match self {
            Failure::Error {
                message,
                details: Some(details),
            } => format!("{}\n{}\n{}", "Details:".dimmed(), message, details),
            Failure::Error {
                message,
                details: None,
            } => message.clone(),
            Failure::Message(message) => message.clone(),
            Failure::Value(value) => {
                let raw = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
                format!("{}\n{}", "Could not parse error, raw value:".yellow(), raw)
            }
            Failure::Unknown => "An unknown error occurred.".to_string(),
        };
        format!("{}\n{}", header, body)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Error { message, .. } => write!(f, "{}", message),
            Failure::Message(message) => write!(f, "{}", message),
            Failure::Value(value) => write!(f, "{}", value),
            Failure::Unknown => write!(f, "unknown error"),
        }
    }
}

impl<E> From<E> for Failure
where
    E: std::error::Error,
{
    fn from(error: E) -> Self {
        Failure::from_error(&error)
    }
}
