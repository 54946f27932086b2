use serde::{Deserialize, Serialize};

use crate::prelude::{LoadError, LoadResult};

/// A GeoJSON feature collection handed to the map delegate untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoBoundary(serde_json::Value);

impl GeoBoundary {
    /// Parses a document and checks only that it has a `features` array.
    pub fn parse(contents: &str) -> LoadResult<Self> {
        let value: serde_json::Value = serde_json::from_str(contents)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> LoadResult<Self> {
        match value.get("features") {
            Some(serde_json::Value::Array(_)) => Ok(Self(value)),
            _ => Err(LoadError::Malformed(
                "boundary document has no features array".into(),
            )),
        }
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    pub fn feature_count(&self) -> usize {
        self.0
            .get("features")
            .and_then(|features| features.as_array())
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_feature_collection() {
        let boundary =
            GeoBoundary::parse(r#"{"type":"FeatureCollection","features":[{},{}]}"#).unwrap();
        assert_eq!(boundary.feature_count(), 2);
    }

    #[test]
    fn parse_rejects_document_without_features() {
        assert!(matches!(
            GeoBoundary::parse(r#"{"type":"FeatureCollection"}"#),
            Err(LoadError::Malformed(_))
        ));
        assert!(matches!(
            GeoBoundary::parse("not json"),
            Err(LoadError::Malformed(_))
        ));
    }
}
