//! Integrity validation of the tier dataset.
//!
//! A dataset is publishable when [validate_json] reports no errors. Loading
//! never depends on validation; only persistence and publishing do.

pub mod dataset;
mod format;
pub mod record;
pub mod report;
pub mod schema;

pub use dataset::{
    validate_dataset, validate_dataset_with_reference, validate_json,
    validate_json_with_reference,
};
pub use record::{validate_record, validate_record_with_reference};
pub use report::{IntegrityRule, ValidationDiagnostic, ValidationReport, ValidationSeverity};
