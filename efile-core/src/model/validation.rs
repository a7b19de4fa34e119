use serde::{Deserialize, Serialize};

/// Outcome of one validation pass: blocking errors plus advisory warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, code: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            code: code.to_string(),
            message: message.into(),
            field: None,
        });
    }

    pub fn error_on(&mut self, code: &str, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            code: code.to_string(),
            message: message.into(),
            field: Some(field.to_string()),
        });
    }

    pub fn warning(&mut self, code: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            code: code.to_string(),
            message: message.into(),
            field: None,
        });
    }

    pub fn warning_on(&mut self, code: &str, field: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            code: code.to_string(),
            message: message.into(),
            field: Some(field.to_string()),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
    pub field: Option<String>,
}
