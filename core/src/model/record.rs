use serde::{Deserialize, Serialize};

/// Geographic granularity a record is aggregated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Level {
    Municipality,
    UrbanUnit,
}

/// One party's share of the valid votes inside an aggregation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyShare {
    pub party: String,
    #[serde(default)]
    pub share: Option<f64>,
}

impl PartyShare {
    pub fn new(party: impl Into<String>, share: f64) -> Self {
        Self {
            party: party.into(),
            share: Some(share),
        }
    }
}

/// Vote shares for a municipality or urban unit.
///
/// Every numeric field is optional: a missing value stays `None` and is shown
/// as "n/a" rather than being replaced by zero. A value of the wrong JSON type
/// fails the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub name: String,
    pub level: Level,
    #[serde(default)]
    pub left: Option<f64>,
    #[serde(default)]
    pub right: Option<f64>,
    #[serde(default)]
    pub other: Option<f64>,
    #[serde(default)]
    pub turnout: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub left_parties: Vec<PartyShare>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub right_parties: Vec<PartyShare>,
}

impl ResultRecord {
    pub fn new(name: impl Into<String>, level: Level) -> Self {
        Self {
            name: name.into(),
            level,
            left: None,
            right: None,
            other: None,
            turnout: None,
            left_parties: Vec::new(),
            right_parties: Vec::new(),
        }
    }

    pub fn with_shares(mut self, left: f64, right: f64, other: f64) -> Self {
        self.left = Some(left);
        self.right = Some(right);
        self.other = Some(other);
        self
    }

    pub fn with_turnout(mut self, turnout: f64) -> Self {
        self.turnout = Some(turnout);
        self
    }

    pub fn share(&self, coalition: Coalition) -> Option<f64> {
        match coalition {
            Coalition::Left => self.left,
            Coalition::Right => self.right,
            Coalition::Other => self.other,
        }
    }

    /// Party breakdown for a coalition; `Other` has none.
    pub fn parties(&self, coalition: Coalition) -> &[PartyShare] {
        match coalition {
            Coalition::Left => &self.left_parties,
            Coalition::Right => &self.right_parties,
            Coalition::Other => &[],
        }
    }

    /// Left minus right, in percentage points, when both shares are known.
    pub fn margin(&self) -> Option<f64> {
        Some(self.left? - self.right?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coalition {
    Left,
    Right,
    Other,
}

impl Coalition {
    pub const ALL: [Coalition; 3] = [Coalition::Left, Coalition::Right, Coalition::Other];

    pub fn label(self) -> &'static str {
        match self {
            Coalition::Left => "Centrosinistra",
            Coalition::Right => "Centrodestra",
            Coalition::Other => "Altri",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_with_missing_shares() {
        let record: ResultRecord =
            serde_json::from_str(r#"{"name":"Nervi","level":"urban-unit","left":48.0}"#).unwrap();
        assert_eq!(record.level, Level::UrbanUnit);
        assert_eq!(record.left, Some(48.0));
        assert_eq!(record.turnout, None);
        assert!(record.parties(Coalition::Left).is_empty());
        assert_eq!(record.margin(), None);
    }

    #[test]
    fn record_rejects_non_numeric_share() {
        let parsed = serde_json::from_str::<ResultRecord>(
            r#"{"name":"Nervi","level":"urban-unit","turnout":"high"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn margin_is_left_minus_right() {
        let record = ResultRecord::new("Molo", Level::UrbanUnit).with_shares(55.0, 40.0, 5.0);
        assert_eq!(record.margin(), Some(15.0));
        assert_eq!(record.share(Coalition::Other), Some(5.0));
    }
}
