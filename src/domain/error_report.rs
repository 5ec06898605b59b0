use chrono::{DateTime, Utc};
use std::error::Error;
use std::panic::Location;

/// Source position of the `catch` call that produced a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLocation {
    pub file_path: String,
    pub line_number: u32,
}

impl From<&Location<'_>> for ReportLocation {
    fn from(location: &Location<'_>) -> Self {
        Self {
            file_path: location.file().to_string(),
            line_number: location.line(),
        }
    }
}

/// Everything captured from an error at the point it is caught.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    /// `Display` of the caught error alone.
    pub text: String,
    /// The error followed by its whole `source()` chain.
    pub message: String,
    pub location: ReportLocation,
    pub event_time: DateTime<Utc>,
}

impl ErrorReport {
    /// Captures `error` and the location of the caller.
    #[track_caller]
    pub fn capture<E: Error + ?Sized>(error: &E) -> Self {
        Self::with_location(error, Location::caller())
    }

    pub fn with_location<E: Error + ?Sized>(error: &E, location: &Location<'_>) -> Self {
        let text = error.to_string();
        let mut message = text.clone();

        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str("\nCaused by: ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        Self {
            text,
            message,
            location: location.into(),
            event_time: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "order rejected")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_capture_renders_source_chain() {
        let error = Outer(std::io::Error::other("broker unreachable"));
        let report = ErrorReport::capture(&error);

        assert_eq!(report.text, "order rejected");
        assert_eq!(
            report.message,
            "order rejected\nCaused by: broker unreachable"
        );
    }

    #[test]
    fn test_capture_records_caller_location() {
        let error = std::io::Error::other("boom");
        let line = line!() + 1;
        let report = ErrorReport::capture(&error);

        assert!(report.location.file_path.ends_with("error_report.rs"));
        assert_eq!(report.location.line_number, line);
    }

    #[test]
    fn test_capture_accepts_trait_objects() {
        let error: Box<dyn Error> = "plain failure".into();
        let report = ErrorReport::capture(error.as_ref());

        assert_eq!(report.text, "plain failure");
        assert_eq!(report.message, "plain failure");
    }
}
