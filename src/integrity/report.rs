use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The dataset checks a publishable file must pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IntegrityRule {
    /// Parses as JSON and has a root collection of character records.
    Structure,
    UniqueIds,
    SortedIds,
    TierRange,
    /// Enhancement values in range, at least one per synergy set.
    EnhancementRange,
    SlotCapacity,
    /// Every referenced character id exists.
    References,
    /// Closed schema: no unknown fields, well-formed values.
    Schema,
    Indentation,
}

impl IntegrityRule {
    pub const ALL: [IntegrityRule; 9] = [
        Self::Structure,
        Self::UniqueIds,
        Self::SortedIds,
        Self::TierRange,
        Self::EnhancementRange,
        Self::SlotCapacity,
        Self::References,
        Self::Schema,
        Self::Indentation,
    ];

    pub fn number(&self) -> u8 {
        match self {
            Self::Structure => 1,
            Self::UniqueIds => 2,
            Self::SortedIds => 3,
            Self::TierRange => 4,
            Self::EnhancementRange => 5,
            Self::SlotCapacity => 6,
            Self::References => 7,
            Self::Schema => 8,
            Self::Indentation => 9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::UniqueIds => "unique-ids",
            Self::SortedIds => "sorted-ids",
            Self::TierRange => "tier-range",
            Self::EnhancementRange => "enhancement-range",
            Self::SlotCapacity => "slot-capacity",
            Self::References => "references",
            Self::Schema => "schema",
            Self::Indentation => "indentation",
        }
    }
}

impl fmt::Display for IntegrityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule {} ({})", self.number(), self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub rule: IntegrityRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    pub message: String,
}

impl ValidationDiagnostic {
    pub fn error(rule: IntegrityRule, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Error, rule, message)
    }

    pub fn warning(rule: IntegrityRule, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Warning, rule, message)
    }

    fn new(severity: ValidationSeverity, rule: IntegrityRule, message: impl Into<String>) -> Self {
        Self {
            severity,
            rule,
            character_id: None,
            set_index: None,
            field: None,
            observed: None,
            expected: None,
            message: message.into(),
        }
    }

    pub fn character(mut self, id: impl Into<String>) -> Self {
        self.character_id = Some(id.into());
        self
    }

    pub fn set(mut self, index: usize) -> Self {
        self.set_index = Some(index);
        self
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn observed(mut self, observed: impl fmt::Display) -> Self {
        self.observed = Some(observed.to_string());
        self
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Location path, e.g. `id='REY'.synergySets[1].characters`.
    pub fn context(&self) -> String {
        let mut context = match &self.character_id {
            Some(id) => format!("id='{id}'"),
            None => "dataset".to_string(),
        };
        if let Some(index) = self.set_index {
            context.push_str(&format!(".synergySets[{index}]"));
        }
        if let Some(field) = &self.field {
            context.push('.');
            context.push_str(field);
        }
        context
    }
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.severity,
            self.rule,
            self.context(),
            self.message
        )?;
        match (&self.observed, &self.expected) {
            (Some(observed), Some(expected)) => {
                write!(f, " (observed {observed}, expected {expected})")
            }
            (Some(observed), None) => write!(f, " (observed {observed})"),
            (None, Some(expected)) => write!(f, " (expected {expected})"),
            (None, None) => Ok(()),
        }
    }
}

/// Every problem found in one pass, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(&mut self, diagnostic: ValidationDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn for_rule(&self, rule: IntegrityRule) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics.iter().filter(move |diag| diag.rule == rule)
    }

    pub fn count_for(&self, rule: IntegrityRule) -> usize {
        self.for_rule(rule).count()
    }
}
