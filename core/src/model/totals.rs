use serde::{Deserialize, Serialize};

use crate::model::record::{Level, ResultRecord};
use crate::model::row::record_from_value;
use crate::prelude::{LoadError, LoadResult};

/// Absolute votes and share of valid votes for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoalitionTotal {
    pub name: String,
    pub votes: i64,
    pub percent: f64,
}

impl CoalitionTotal {
    pub fn new(name: impl Into<String>, votes: i64, percent: f64) -> Self {
        Self {
            name: name.into(),
            votes,
            percent,
        }
    }
}

/// Voters who cast a ballot against those who did not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoutSplit {
    pub voted: CoalitionTotal,
    pub abstained: CoalitionTotal,
}

impl TurnoutSplit {
    pub fn entries(&self) -> [&CoalitionTotal; 2] {
        [&self.voted, &self.abstained]
    }
}

/// Wire layout of `percentuali.json` in its object form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsDocument {
    pub records: Vec<ResultRecord>,
    #[serde(default)]
    pub coalitions: Vec<CoalitionTotal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnout: Option<TurnoutSplit>,
}

/// Parsed results, split by aggregation level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsTable {
    pub municipalities: Vec<ResultRecord>,
    pub urban_units: Vec<ResultRecord>,
    pub coalitions: Vec<CoalitionTotal>,
    pub turnout: Option<TurnoutSplit>,
}

impl ResultsTable {
    pub fn from_document(document: ResultsDocument) -> Self {
        let (municipalities, urban_units) = document
            .records
            .into_iter()
            .partition(|record| record.level == Level::Municipality);
        Self {
            municipalities,
            urban_units,
            coalitions: document.coalitions,
            turnout: document.turnout,
        }
    }

    /// Accepts either the object form or a bare array of records.
    ///
    /// A bare array carries no coalition totals and no turnout split; its
    /// entries may also be flat `Municipio`/`UU` rows.
    pub fn parse(contents: &str) -> LoadResult<Self> {
        let value: serde_json::Value = serde_json::from_str(contents)?;
        let document = match value {
            serde_json::Value::Array(entries) => ResultsDocument {
                records: entries
                    .into_iter()
                    .map(record_from_value)
                    .collect::<LoadResult<_>>()?,
                ..Default::default()
            },
            serde_json::Value::Object(_) => serde_json::from_value(value)?,
            other => {
                return Err(LoadError::Malformed(format!(
                    "expected an object or an array of records, found {}",
                    json_kind(&other)
                )))
            }
        };
        Ok(Self::from_document(document))
    }

    pub fn to_document(&self) -> ResultsDocument {
        ResultsDocument {
            records: self
                .municipalities
                .iter()
                .chain(self.urban_units.iter())
                .cloned()
                .collect(),
            coalitions: self.coalitions.clone(),
            turnout: self.turnout.clone(),
        }
    }

    pub fn records(&self, level: Level) -> &[ResultRecord] {
        match level {
            Level::Municipality => &self.municipalities,
            Level::UrbanUnit => &self.urban_units,
        }
    }

    pub fn record_count(&self) -> usize {
        self.municipalities.len() + self.urban_units.len()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBJECT_FORM: &str = r#"{
        "records": [
            {"name": "I Centro Est", "level": "municipality", "left": 55.0, "right": 40.0, "other": 5.0, "turnout": 50.0},
            {"name": "Molo", "level": "urban-unit", "left": 60.0, "right": 35.0, "other": 5.0, "turnout": 45.0},
            {"name": "II Centro Ovest", "level": "municipality", "left": 58.0, "right": 37.0, "other": 5.0, "turnout": 44.0}
        ],
        "coalitions": [
            {"name": "Centrosinistra", "votes": 1000, "percent": 55.5},
            {"name": "Centrodestra", "votes": 800, "percent": 44.5}
        ],
        "turnout": {
            "voted": {"name": "Votanti", "votes": 1800, "percent": 52.0},
            "abstained": {"name": "Astenuti", "votes": 1661, "percent": 48.0}
        }
    }"#;

    #[test]
    fn object_form_splits_records_by_level() {
        let table = ResultsTable::parse(OBJECT_FORM).unwrap();
        assert_eq!(table.municipalities.len(), 2);
        assert_eq!(table.urban_units.len(), 1);
        assert_eq!(table.municipalities[1].name, "II Centro Ovest");
        assert_eq!(table.coalitions.len(), 2);
        assert_eq!(table.turnout.as_ref().unwrap().voted.votes, 1800);
    }

    #[test]
    fn bare_array_has_no_totals() {
        let table = ResultsTable::parse(
            r#"[{"name": "Molo", "level": "urban-unit", "left": 60.0}]"#,
        )
        .unwrap();
        assert_eq!(table.urban_units.len(), 1);
        assert!(table.coalitions.is_empty());
        assert!(table.turnout.is_none());
    }

    #[test]
    fn flat_rows_split_by_their_name_column() {
        let table = ResultsTable::parse(
            r#"[{"Municipio": "I Centro Est", "PD": 30.1}, {"UU": "Molo", "PD": 28.4}]"#,
        )
        .unwrap();
        assert_eq!(table.municipalities.len(), 1);
        assert_eq!(table.urban_units[0].name, "Molo");
        assert_eq!(table.municipalities[0].left, Some(30.1));
        assert_eq!(table.urban_units[0].left_parties[0].party, "PD");
    }

    #[test]
    fn scalar_document_is_malformed() {
        let err = ResultsTable::parse("42").unwrap_err();
        assert!(matches!(err, LoadError::Malformed(message) if message.contains("a number")));
    }

    #[test]
    fn document_keeps_municipalities_first() {
        let table = ResultsTable::parse(OBJECT_FORM).unwrap();
        let document = table.to_document();
        assert_eq!(document.records.len(), 3);
        assert_eq!(document.records[2].name, "Molo");
        assert_eq!(ResultsTable::from_document(document), table);
    }
}
