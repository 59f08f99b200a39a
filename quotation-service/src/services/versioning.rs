//! Version numbering for new quotations.
//!
//! A client who comes back after a closed (won or lost) deal starts a new
//! major lineage: `1.0`, `2.0`, ... Iterations inside an open negotiation are
//! labelled by the caller and never pass through here.

use tracing::debug;

use crate::models::{Quotation, VersionLabel};

/// Read a stored label leniently. The major component is the run of leading
/// digits; anything after the first `.` is the minor. A label without a
/// leading integer, or one too large to represent, yields major 0.
pub fn parse_legacy_label(label: &str) -> VersionLabel {
    let trimmed = label.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());

    let major = trimmed[..digits_end].parse::<u64>().unwrap_or(0);
    let minor = match trimmed[digits_end..].strip_prefix('.') {
        Some(rest) => rest.to_string(),
        None => trimmed[digits_end..].to_string(),
    };

    VersionLabel::new(major, minor)
}

/// Highest major version among the client's closed quotations, judged by
/// each quotation's most recently created version. 0 when there are none.
pub fn highest_closed_major(client_quotations: &[Quotation]) -> u64 {
    client_quotations
        .iter()
        .filter(|q| q.status.is_closed())
        .filter_map(|q| q.latest_version())
        .map(|v| parse_legacy_label(&v.version).major)
        .max()
        .unwrap_or(0)
}

/// Label for the first version of a new quotation. An explicit label is used
/// verbatim.
pub fn next_version_label(client_quotations: &[Quotation], explicit: Option<&str>) -> String {
    if let Some(label) = explicit {
        return label.to_string();
    }

    let highest = highest_closed_major(client_quotations);
    let label = VersionLabel::first_of_lineage(highest.saturating_add(1));

    debug!(highest_closed_major = highest, label = %label, "Assigned version label");

    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuotationStatus, QuotationTotals, QuotationVersion};
    use chrono::Utc;
    use uuid::Uuid;

    fn quotation(status: QuotationStatus, labels: &[&str]) -> Quotation {
        let quotation_id = Uuid::new_v4();
        Quotation {
            quotation_id,
            client_id: Uuid::nil(),
            title: "Test".to_string(),
            status,
            currency: "INR".to_string(),
            versions: labels
                .iter()
                .map(|label| QuotationVersion {
                    version_id: Uuid::new_v4(),
                    quotation_id,
                    version: label.to_string(),
                    brand: None,
                    is_final: false,
                    lines: vec![],
                    totals: QuotationTotals::default(),
                    created_utc: Utc::now(),
                })
                .collect(),
            created_utc: Utc::now(),
            updated_utc: Utc::now(),
        }
    }

    #[test]
    fn test_parse_legacy_label() {
        assert_eq!(parse_legacy_label("2.3"), VersionLabel::new(2, "3"));
        assert_eq!(parse_legacy_label("10"), VersionLabel::new(10, ""));
        assert_eq!(parse_legacy_label("4b"), VersionLabel::new(4, "b"));
        assert_eq!(parse_legacy_label("v2.0").major, 0);
        assert_eq!(parse_legacy_label("").major, 0);
        assert_eq!(parse_legacy_label("99999999999999999999999.0").major, 0);
    }

    #[test]
    fn test_first_quotation_is_one() {
        assert_eq!(next_version_label(&[], None), "1.0");
    }

    #[test]
    fn test_closed_lineage_increments_major() {
        let history = vec![
            quotation(QuotationStatus::Won, &["1.0"]),
            quotation(QuotationStatus::Lost, &["2.0", "2.3"]),
        ];
        assert_eq!(next_version_label(&history, None), "3.0");
    }

    #[test]
    fn test_won_and_lost_scenario() {
        let history = vec![
            quotation(QuotationStatus::Won, &["1.0", "2.0"]),
            quotation(QuotationStatus::Lost, &["1.5"]),
        ];
        assert_eq!(next_version_label(&history, None), "3.0");
    }

    #[test]
    fn test_open_quotations_ignored() {
        let history = vec![
            quotation(QuotationStatus::Draft, &["7.0"]),
            quotation(QuotationStatus::Won, &["1.2"]),
        ];
        assert_eq!(next_version_label(&history, None), "2.0");
    }

    #[test]
    fn test_only_latest_version_counts() {
        let history = vec![quotation(QuotationStatus::Lost, &["5.0", "1.0"])];
        assert_eq!(next_version_label(&history, None), "2.0");
    }

    #[test]
    fn test_unparseable_label_counts_as_zero() {
        let history = vec![quotation(QuotationStatus::Won, &["final-draft"])];
        assert_eq!(next_version_label(&history, None), "1.0");
    }

    #[test]
    fn test_explicit_label_wins() {
        let history = vec![quotation(QuotationStatus::Won, &["4.0"])];
        assert_eq!(next_version_label(&history, Some("1.7-alt")), "1.7-alt");
    }
}
