// src/error.rs

//! Unified error handling for the timetable application.

use std::fmt;

use thiserror::Error;

use crate::models::ScheduleError;

/// Result type alias for timetable operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Schedule string could not be parsed
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Search option or input validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catalog resource could not be loaded
    #[error("Catalog error for {resource}: {message}")]
    Catalog { resource: String, message: String },

    /// Timetable id not present in the schedule book
    #[error("Unknown timetable: {0}")]
    UnknownTable(String),

    /// Page rendering failed
    #[error("Render error for {route}: {message}")]
    Render { route: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a catalog error with the resource that failed.
    pub fn catalog(resource: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Catalog {
            resource: resource.into(),
            message: message.to_string(),
        }
    }

    /// Create a render error for a route.
    pub fn render(route: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Render {
            route: route.into(),
            message: message.to_string(),
        }
    }
}
