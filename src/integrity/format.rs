//! Indentation check on the persisted text so diffs stay reviewable.

use crate::integrity::report::{IntegrityRule, ValidationDiagnostic, ValidationReport};

/// Every indented line uses spaces only, in multiples of `unit`, and nests at
/// most one level deeper than the line before it.
pub(crate) fn check_indentation(raw: &str, unit: usize, report: &mut ValidationReport) {
    let mut previous = 0usize;
    for (number, line) in raw.lines().enumerate() {
        let number = number + 1;
        let body = line.trim_start();
        if body.is_empty() {
            continue;
        }
        let leading = &line[..line.len() - body.len()];
        let located = |diag: ValidationDiagnostic| diag.field(format!("line {number}"));

        if leading.chars().any(|ch| ch != ' ') {
            report.push(located(
                ValidationDiagnostic::error(
                    IntegrityRule::Indentation,
                    format!("line {number} is indented with characters other than spaces"),
                )
                .expected("spaces"),
            ));
            continue;
        }

        let width = leading.len();
        if width % unit != 0 {
            report.push(located(
                ValidationDiagnostic::error(
                    IntegrityRule::Indentation,
                    format!("line {number} is not indented by a multiple of {unit} spaces"),
                )
                .observed(width)
                .expected(format!("multiple of {unit}")),
            ));
        } else if width > previous + unit {
            report.push(located(
                ValidationDiagnostic::error(
                    IntegrityRule::Indentation,
                    format!("line {number} nests more than one level deeper than the line before"),
                )
                .observed(width)
                .expected(format!("at most {}", previous + unit)),
            ));
        }
        previous = width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(raw: &str) -> ValidationReport {
        let mut report = ValidationReport::default();
        check_indentation(raw, 2, &mut report);
        report
    }

    #[test]
    fn canonical_layout_passes() {
        assert!(check("[\n  {\n    \"id\": \"A\",\n    \"baseTier\": 1\n  }\n]\n").is_clean());
        assert!(check("[{\"id\":\"A\",\"baseTier\":1}]").is_clean());
    }

    #[test]
    fn tabs_odd_widths_and_jumps_are_reported() {
        let report = check("[\n\t{\n   \"id\": \"A\"\n  }\n]\n");
        assert_eq!(report.count_for(IntegrityRule::Indentation), 2);

        let report = check("[\n      {}\n]\n");
        let diag = &report.diagnostics[0];
        assert_eq!(diag.observed.as_deref(), Some("6"));
        assert_eq!(diag.field.as_deref(), Some("line 2"));
    }
}
