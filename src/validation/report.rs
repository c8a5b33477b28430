use serde::Serialize;

/// Diagnostic class, orthogonal to [`Severity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    /// Malformed structure: brackets, quotes, required clauses.
    #[display("syntax")]
    Syntax,
    /// Valid structure, dubious meaning.
    #[display("semantic")]
    Semantic,
    /// Unknown identifier or function.
    #[display("reference")]
    Reference,
    /// Literal or argument of the wrong type.
    #[display("type")]
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[display("error")]
    Error,
    #[display("warning")]
    Warning,
    #[display("info")]
    Info,
}

/// One diagnostic, positioned for editor highlighting (1-based line, 1-based
/// character column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "camelCase")]
#[display("{line}:{column}: {severity}: {message}")]
pub struct ValidationError {
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub error_type: ErrorType,
    pub severity: Severity,
}

impl ValidationError {
    pub fn new(
        (line, column): (usize, usize),
        message: impl Into<String>,
        error_type: ErrorType,
        severity: Severity,
    ) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            error_type,
            severity,
        }
    }
}

/// Outcome of a validator call. `valid` is exactly `errors.is_empty()`; the
/// only way to build one is through [`Report::finish`], which enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    /// Result carrying a single error, for input the toolchain refuses to look
    /// at (e.g. an unsupported language).
    pub fn rejected(message: impl Into<String>, error_type: ErrorType) -> Self {
        let mut report = Report::new();
        report.error((1, 1), message, error_type);
        report.finish()
    }

    /// Every diagnostic, errors first.
    pub fn diagnostics(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().chain(self.warnings.iter())
    }

    pub fn has(&self, error_type: ErrorType) -> bool {
        self.diagnostics().any(|d| d.error_type == error_type)
    }

    /// Error messages joined for a one-line failure summary.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Accumulates diagnostics and hints while a validator pipeline runs.
#[derive(Debug, Default)]
pub struct Report {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
    hints: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: ValidationError) {
        match diagnostic.severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning | Severity::Info => self.warnings.push(diagnostic),
        }
    }

    pub fn error(&mut self, at: (usize, usize), message: impl Into<String>, error_type: ErrorType) {
        self.push(ValidationError::new(at, message, error_type, Severity::Error));
    }

    pub fn warning(&mut self, at: (usize, usize), message: impl Into<String>, error_type: ErrorType) {
        self.push(ValidationError::new(at, message, error_type, Severity::Warning));
    }

    pub fn info(&mut self, at: (usize, usize), message: impl Into<String>, error_type: ErrorType) {
        self.push(ValidationError::new(at, message, error_type, Severity::Info));
    }

    /// Record a free-text hint; duplicates are ignored.
    pub fn hint(&mut self, hint: impl Into<String>) {
        let hint = hint.into();
        if !self.hints.contains(&hint) {
            self.hints.push(hint);
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn finish(self) -> ValidationResult {
        ValidationResult {
            valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
            suggestions: self.hints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_tracks_errors_only() {
        let mut report = Report::new();
        report.warning((1, 1), "careful", ErrorType::Semantic);
        report.info((1, 1), "fyi", ErrorType::Semantic);
        let result = report.finish();
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);

        let mut report = Report::new();
        report.error((2, 5), "broken", ErrorType::Syntax);
        let result = report.finish();
        assert!(!result.valid);
        assert_eq!(result.errors[0].to_string(), "2:5: error: broken");
    }

    #[test]
    fn hints_are_deduplicated() {
        let mut report = Report::new();
        report.hint("add LIMIT");
        report.hint("add LIMIT");
        assert_eq!(report.finish().suggestions, vec!["add LIMIT".to_string()]);
    }

    #[test]
    fn serializes_type_and_severity_in_lowercase() {
        let result = ValidationResult::rejected("nope", ErrorType::Syntax);
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"][0]["errorType"], "syntax");
        assert_eq!(json["errors"][0]["severity"], "error");
    }
}
