/// Severity inferred from the text of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Unclassified,
}

impl Severity {
    /// Case-insensitive substring scan for "error", then "warning".
    /// A message containing both is an error.
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("error") {
            Severity::Error
        } else if lowered.contains("warning") {
            Severity::Warning
        } else {
            Severity::Unclassified
        }
    }

    /// CSS class applied to the table row, empty when unclassified
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Error => "log-error",
            Severity::Warning => "log-warning",
            Severity::Unclassified => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_any_case() {
        assert_eq!(Severity::classify("ERROR: connection reset"), Severity::Error);
        assert_eq!(Severity::classify("unhandled Error in handler"), Severity::Error);
        assert_eq!(Severity::classify("errors=0"), Severity::Error);
    }

    #[test]
    fn test_warning_only() {
        assert_eq!(Severity::classify("Warning: retrying"), Severity::Warning);
        assert_eq!(Severity::classify("WARNING"), Severity::Warning);
    }

    #[test]
    fn test_neither() {
        assert_eq!(Severity::classify("START RequestId: 42"), Severity::Unclassified);
        assert_eq!(Severity::classify("warn: close but no"), Severity::Unclassified);
        assert_eq!(Severity::classify(""), Severity::Unclassified);
    }

    #[test]
    fn test_error_wins_over_warning() {
        assert_eq!(Severity::classify("warning: previous error ignored"), Severity::Error);
    }
}
