// SPDX-License-Identifier: MIT
//
// Human-readable error messages for the scanner UI.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The taxonomy uses three severity levels that drive UI presentation.

use crate::error::VaraqError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Momentary failure, safe to retry.
    Transient,
    /// User must do something (grant permission, pick a different file).
    ActionRequired,
    /// Cannot be fixed by retrying: unsupported format, damaged file.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying the same action can succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `VaraqError` into a `HumanError` suitable for a blocking alert.
pub fn humanize_error(err: &VaraqError) -> HumanError {
    match err {
        // -- Camera errors --
        VaraqError::CameraPermission(_) => HumanError {
            message: "The app isn't allowed to use the camera.".into(),
            suggestion: "Allow camera access when your device asks, or enable it in your browser or system settings, then try again.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        VaraqError::CameraUnavailable(detail) => humanize_camera_error(detail),

        VaraqError::NoActiveStream => HumanError {
            message: "The camera isn't running.".into(),
            suggestion: "Open the camera again before taking a photo.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Scan flow --
        VaraqError::StageMismatch { .. } | VaraqError::NoCapturedFrame => HumanError {
            message: "That action isn't possible right now.".into(),
            suggestion: "Finish the current step first, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Document errors --
        VaraqError::UnsupportedDocument(detail) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!("Try a JPEG, PNG, or PDF file instead. (File type: {detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        VaraqError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try taking the photo again or picking a different file.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        VaraqError::PdfError(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged. Try opening it elsewhere to check it works, or pick a different file.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        VaraqError::ExportError(_) => HumanError {
            message: "The document couldn't be exported.".into(),
            suggestion: "Try exporting again. Your scanned pages are still saved.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Collaborators --
        VaraqError::UploadFailed(_) => HumanError {
            message: "The document couldn't be uploaded.".into(),
            suggestion: "Check your internet connection and try again. Your scanned pages are still on this device.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        VaraqError::Bridge(_) => HumanError {
            message: "A device-specific feature didn't work.".into(),
            suggestion: "Try restarting the app. Some features may not be available on all devices.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        VaraqError::PlatformUnavailable => HumanError {
            message: "This feature isn't available on your device.".into(),
            suggestion: "Some features require a phone or tablet with a camera.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Storage --
        VaraqError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        VaraqError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

/// Parse camera failure details into human-readable messages.
fn humanize_camera_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("denied") || lower.contains("permission") || lower.contains("not allowed") {
        HumanError {
            message: "The app isn't allowed to use the camera.".into(),
            suggestion: "Allow camera access when your device asks, then try again.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("not found") || lower.contains("no camera") || lower.contains("no device") {
        HumanError {
            message: "No camera was found on this device.".into(),
            suggestion: "You can still add pages by picking photos from your gallery.".into(),
            retriable: false,
            severity: Severity::Permanent,
        }
    } else if lower.contains("in use") || lower.contains("busy") {
        HumanError {
            message: "The camera is being used by another app.".into(),
            suggestion: "Close other apps that might be using the camera, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        }
    } else {
        HumanError {
            message: "The camera couldn't be started.".into(),
            suggestion: format!("Try again. If this keeps happening, restart the app. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_is_action_required() {
        let err = VaraqError::CameraPermission("NotAllowedError: Permission denied".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.retriable);
    }

    #[test]
    fn missing_camera_is_permanent() {
        let err = VaraqError::CameraUnavailable("NotFoundError: no camera available".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }

    #[test]
    fn busy_camera_is_transient() {
        let err = VaraqError::CameraUnavailable("device in use by another application".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
    }

    #[test]
    fn upload_failure_is_retriable() {
        let err = VaraqError::UploadFailed("HTTP 502".into());
        let human = humanize_error(&err);
        assert!(human.retriable);
        assert_eq!(human.severity, Severity::Transient);
    }

    #[test]
    fn unsupported_format_is_permanent() {
        let err = VaraqError::UnsupportedDocument("application/msword".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
    }
}
