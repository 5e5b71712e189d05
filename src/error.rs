use serde::{Serialize, Deserialize};
use std::fmt;

use crate::backend::BackendError;

/// Unified error type for the studyloop crate.
/// Fallible operations return Result<T, StudyError>; the stage names where
/// in the engagement flow the failure happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyError {
    pub message: String,
    pub stage: String,
    pub user_id: Option<String>,
    pub context: Option<String>,
    pub source: Option<String>,
}

impl StudyError {
    pub fn new<S: Into<String>>(message: S, stage: &'static str) -> Self {
        StudyError {
            message: message.into(),
            stage: stage.to_string(),
            user_id: None,
            context: None,
            source: None,
        }
    }

    /// Attach the user whose snapshot or events were involved
    pub fn with_user<S: Into<String>>(mut self, user_id: S) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for StudyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)?;
        if let Some(ref user_id) = self.user_id {
            write!(f, " (user: {})", user_id)?;
        }
        if let Some(ref context) = self.context {
            write!(f, " (context: {})", context)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (source: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StudyError {}

impl From<anyhow::Error> for StudyError {
    fn from(err: anyhow::Error) -> Self {
        StudyError::new(format!("{:#}", err), "unknown").with_source("anyhow")
    }
}

impl From<std::io::Error> for StudyError {
    fn from(err: std::io::Error) -> Self {
        StudyError::new(format!("I/O error: {}", err), "io").with_source("std::io")
    }
}

impl From<serde_json::Error> for StudyError {
    fn from(err: serde_json::Error) -> Self {
        StudyError::new(format!("JSON error: {}", err), "json_parse").with_source("serde_json")
    }
}

impl From<BackendError> for StudyError {
    fn from(err: BackendError) -> Self {
        StudyError::new(err.to_string(), "backend").with_source(err.kind())
    }
}
