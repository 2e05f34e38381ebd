// SPDX-License-Identifier: MPL-2.0

//! Error types for the capture player

use crate::backends::BackendError;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Device discovery or capture session errors
    Backend(BackendError),
    /// No device of the requested kind is selected
    NoDeviceSelected(&'static str),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Backend(e) => write!(f, "{}", e),
            AppError::NoDeviceSelected(kind) => write!(f, "No {} device selected", kind),
        }
    }
}

impl std::error::Error for AppError {}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Backend(err)
    }
}

impl From<gstreamer::glib::Error> for AppError {
    fn from(err: gstreamer::glib::Error) -> Self {
        AppError::Backend(BackendError::InitializationFailed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_passes_through() {
        let err: AppError = BackendError::DeviceNotFound("cam".to_string()).into();
        assert_eq!(err.to_string(), "Device not found: cam");
    }

    #[test]
    fn test_no_device_message() {
        assert_eq!(
            AppError::NoDeviceSelected("video").to_string(),
            "No video device selected"
        );
    }
}
