use std::path::PathBuf;

use thiserror::Error;

/// Failures of the fetch / align / persist pipeline.
///
/// An empty filter result is not represented here: it is a valid
/// `FilteredView` with no records.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Transport error or non-success status from the remote source.
    #[error("Fetch failed: {reason}")]
    Fetch { reason: String },

    /// Malformed payload, unparsable date, or mismatched coverage across the
    /// mandatory series. Nothing is written when this happens.
    #[error("Alignment failed: {cause}")]
    Alignment { cause: String },

    /// No saved table for the country.
    #[error("No saved data for '{country}' ({})", path.display())]
    NotFound { country: String, path: PathBuf },

    /// A saved table exists but cannot be parsed.
    #[error("Saved data '{}' is corrupt: {cause}", path.display())]
    LoadCorrupt { path: PathBuf, cause: String },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DashboardError {
    pub fn fetch(reason: impl Into<String>) -> Self {
        Self::Fetch {
            reason: reason.into(),
        }
    }

    pub fn alignment(cause: impl Into<String>) -> Self {
        Self::Alignment {
            cause: cause.into(),
        }
    }

    /// Process exit code used when this error ends a CLI run.
    pub fn exit_code(&self) -> u8 {
        match self {
            DashboardError::NotFound { .. } => 3,
            DashboardError::Fetch { .. } | DashboardError::Alignment { .. } => 4,
            DashboardError::LoadCorrupt { .. } | DashboardError::Io { .. } => 5,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_errors_map_to_exit_codes() {
        let not_found = DashboardError::NotFound {
            country: "india".to_string(),
            path: PathBuf::from("india_covid_data.csv"),
        };
        let app: AppError = not_found.into();
        assert_eq!(app.exit_code(), 3);
        assert!(app.to_string().contains("india_covid_data.csv"));

        let app: AppError = DashboardError::fetch("status 404").into();
        assert_eq!(app.exit_code(), 4);
        assert_eq!(app.to_string(), "Fetch failed: status 404");
    }
}
