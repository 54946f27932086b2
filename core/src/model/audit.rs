use std::fmt;

use crate::model::record::{Coalition, ResultRecord};
use crate::model::totals::ResultsTable;

/// Percentage points a sum may drift before it is reported.
pub const TOLERANCE: f64 = 0.5;

/// A consistency finding. Findings are reported, never enforced.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditFinding {
    PartySum {
        record: String,
        coalition: Coalition,
        expected: f64,
        actual: f64,
    },
    RecordSum {
        record: String,
        actual: f64,
    },
    CoalitionTotals {
        actual: f64,
    },
    TurnoutSplit {
        actual: f64,
    },
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditFinding::PartySum {
                record,
                coalition,
                expected,
                actual,
            } => write!(
                f,
                "{record}: {} parties sum to {actual:.2}, coalition share {expected:.2}",
                coalition.label()
            ),
            AuditFinding::RecordSum { record, actual } => {
                write!(f, "{record}: coalition shares sum to {actual:.2}")
            }
            AuditFinding::CoalitionTotals { actual } => {
                write!(f, "coalition totals sum to {actual:.2}%")
            }
            AuditFinding::TurnoutSplit { actual } => {
                write!(f, "turnout split sums to {actual:.2}%")
            }
        }
    }
}

pub fn audit(table: &ResultsTable) -> Vec<AuditFinding> {
    let mut findings = Vec::new();

    for record in table.municipalities.iter().chain(table.urban_units.iter()) {
        audit_record(record, &mut findings);
    }

    if !table.coalitions.is_empty() {
        let actual: f64 = table.coalitions.iter().map(|total| total.percent).sum();
        if drifts(actual, 100.0) {
            findings.push(AuditFinding::CoalitionTotals { actual });
        }
    }

    if let Some(split) = &table.turnout {
        let actual = split.voted.percent + split.abstained.percent;
        if drifts(actual, 100.0) {
            findings.push(AuditFinding::TurnoutSplit { actual });
        }
    }

    findings
}

fn audit_record(record: &ResultRecord, findings: &mut Vec<AuditFinding>) {
    if let (Some(left), Some(right), Some(other)) = (record.left, record.right, record.other) {
        let actual = left + right + other;
        if drifts(actual, 100.0) {
            findings.push(AuditFinding::RecordSum {
                record: record.name.clone(),
                actual,
            });
        }
    }

    for coalition in [Coalition::Left, Coalition::Right] {
        let parties = record.parties(coalition);
        // Parties with a missing share make the sum meaningless.
        if parties.is_empty() || parties.iter().any(|party| party.share.is_none()) {
            continue;
        }
        let Some(expected) = record.share(coalition) else {
            continue;
        };
        let actual: f64 = parties.iter().filter_map(|party| party.share).sum();
        if drifts(actual, expected) {
            findings.push(AuditFinding::PartySum {
                record: record.name.clone(),
                coalition,
                expected,
                actual,
            });
        }
    }
}

fn drifts(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() > TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::{Level, PartyShare};
    use crate::model::totals::{CoalitionTotal, TurnoutSplit};

    fn consistent_record() -> ResultRecord {
        let mut record =
            ResultRecord::new("Sampierdarena", Level::UrbanUnit).with_shares(60.0, 35.0, 5.0);
        record.left_parties = vec![PartyShare::new("PD", 40.0), PartyShare::new("AVS", 19.8)];
        record.right_parties = vec![PartyShare::new("FdI", 35.0)];
        record
    }

    #[test]
    fn consistent_table_has_no_findings() {
        let table = ResultsTable {
            urban_units: vec![consistent_record()],
            coalitions: vec![
                CoalitionTotal::new("Centrosinistra", 600, 60.0),
                CoalitionTotal::new("Centrodestra", 400, 40.0),
            ],
            ..Default::default()
        };
        assert!(audit(&table).is_empty());
    }

    #[test]
    fn drifting_sums_are_reported() {
        let mut record = consistent_record();
        record.left_parties.push(PartyShare::new("M5S", 6.0));
        record.other = Some(9.0);
        let table = ResultsTable {
            municipalities: vec![record],
            turnout: Some(TurnoutSplit {
                voted: CoalitionTotal::new("Votanti", 10, 52.0),
                abstained: CoalitionTotal::new("Astenuti", 9, 47.0),
            }),
            ..Default::default()
        };

        let findings = audit(&table);
        assert_eq!(findings.len(), 3);
        assert!(matches!(
            findings[0],
            AuditFinding::RecordSum { actual, .. } if (actual - 104.0).abs() < 1e-9
        ));
        assert!(matches!(
            findings[1],
            AuditFinding::PartySum { coalition: Coalition::Left, .. }
        ));
        assert!(matches!(findings[2], AuditFinding::TurnoutSplit { .. }));
        let message = findings[1].to_string();
        assert!(message.starts_with("Sampierdarena: Centrosinistra"));
    }

    #[test]
    fn missing_party_share_skips_sum_check() {
        let mut record = consistent_record();
        record.left_parties.push(PartyShare {
            party: "M5S".into(),
            share: None,
        });
        record.left_parties[0].share = Some(1.0);
        let table = ResultsTable {
            urban_units: vec![record],
            ..Default::default()
        };
        assert!(audit(&table).is_empty());
    }
}
