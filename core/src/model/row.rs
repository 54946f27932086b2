use serde_json::{Map, Value};

use crate::model::record::{Level, PartyShare, ResultRecord};
use crate::prelude::{LoadError, LoadResult};

/// Keys naming a row in the flat spreadsheet export, with the level each implies.
const NAME_KEYS: [(&str, Level); 2] = [
    ("Municipio", Level::Municipality),
    ("UU", Level::UrbanUnit),
];

const LEFT_LISTS: [&str; 5] = ["PD", "AVS", "M5S", "Lista Salis", "Riformisti"];
const RIGHT_LISTS: [&str; 5] = [
    "FdI",
    "Forza Italia",
    "Lega",
    "Vince Genova",
    "Orgoglio Genova",
];

/// Decodes one entry of a bare results array.
///
/// Entries carrying `name` and `level` use the record layout. Entries named by
/// `Municipio` or `UU` are flat rows: every other column is a share. Known
/// lists go to their coalition, unknown columns add up into `other`, and a
/// missing coalition share is the sum of its lists.
pub fn record_from_value(value: Value) -> LoadResult<ResultRecord> {
    match value {
        Value::Object(row) if !row.contains_key("level") && row_name_key(&row).is_some() => {
            record_from_row(row)
        }
        other => Ok(serde_json::from_value(other)?),
    }
}

fn row_name_key(row: &Map<String, Value>) -> Option<(&'static str, Level)> {
    NAME_KEYS
        .iter()
        .copied()
        .find(|(key, _)| row.contains_key(*key))
}

fn record_from_row(mut row: Map<String, Value>) -> LoadResult<ResultRecord> {
    let Some((key, level)) = row_name_key(&row) else {
        return Err(LoadError::Malformed("row without Municipio or UU".into()));
    };
    let name = match row.remove(key) {
        Some(Value::String(name)) => name.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => return Err(LoadError::Malformed(format!("{key} must be a name"))),
    };

    let mut record = ResultRecord::new(name, level);
    let mut unlisted: Option<f64> = None;
    for (column, value) in row {
        let share = numeric_cell(&record.name, &column, value)?;
        match column.as_str() {
            "left" => record.left = share,
            "right" => record.right = share,
            "other" => record.other = share,
            "turnout" | "Affluenza" => record.turnout = share,
            list if LEFT_LISTS.contains(&list) => record.left_parties.push(PartyShare {
                party: list.to_string(),
                share,
            }),
            list if RIGHT_LISTS.contains(&list) => record.right_parties.push(PartyShare {
                party: list.to_string(),
                share,
            }),
            _ => {
                if let Some(share) = share {
                    unlisted = Some(unlisted.unwrap_or(0.0) + share);
                }
            }
        }
    }

    record.left = record.left.or_else(|| list_sum(&record.left_parties));
    record.right = record.right.or_else(|| list_sum(&record.right_parties));
    record.other = record.other.or(unlisted);
    Ok(record)
}

fn numeric_cell(row: &str, column: &str, value: Value) -> LoadResult<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => Ok(number.as_f64()),
        _ => Err(LoadError::Malformed(format!(
            "{row}: column {column} is not a number"
        ))),
    }
}

fn list_sum(parties: &[PartyShare]) -> Option<f64> {
    let mut shares = parties.iter().filter_map(|party| party.share).peekable();
    shares.peek()?;
    Some(shares.sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_municipio_row_becomes_record() {
        let record = record_from_value(json!({
            "Municipio": "I Centro Est",
            "PD": 30.0,
            "AVS": 8.5,
            "FdI": 14.0,
            "Altro": 2.0,
            "Affluenza": 48.9
        }))
        .unwrap();
        assert_eq!(record.name, "I Centro Est");
        assert_eq!(record.level, Level::Municipality);
        assert_eq!(record.left, Some(38.5));
        assert_eq!(record.right, Some(14.0));
        assert_eq!(record.other, Some(2.0));
        assert_eq!(record.turnout, Some(48.9));
        assert_eq!(record.left_parties.len(), 2);
    }

    #[test]
    fn uu_row_keeps_explicit_shares() {
        let row = json!({"UU": "Molo", "left": 60.0, "PD": 28.4});
        let record = record_from_value(row).unwrap();
        assert_eq!(record.level, Level::UrbanUnit);
        assert_eq!(record.left, Some(60.0));
        assert_eq!(record.right, None);
        assert_eq!(record.left_parties, vec![PartyShare::new("PD", 28.4)]);
    }

    #[test]
    fn null_cell_stays_missing() {
        let row = json!({"UU": "Nervi", "Lega": null});
        let record = record_from_value(row).unwrap();
        assert_eq!(record.right_parties[0].share, None);
        assert_eq!(record.right, None);
    }

    #[test]
    fn text_cell_is_malformed() {
        let row = json!({"UU": "Nervi", "PD": "trenta"});
        let err = record_from_value(row).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(message) if message.contains("PD")));
    }

    #[test]
    fn record_layout_still_requires_name() {
        let row = json!({"level": "urban-unit", "left": 1.0});
        let err = record_from_value(row).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }
}
