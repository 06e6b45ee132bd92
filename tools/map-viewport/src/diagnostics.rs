use serde::Serialize;
use tracing::warn;

/// Kind of input feature, as reported when one is dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Marker,
    Route,
    Polygon,
    Circle,
}

impl FeatureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKind::Marker => "marker",
            FeatureKind::Route => "route",
            FeatureKind::Polygon => "polygon",
            FeatureKind::Circle => "circle",
        }
    }
}

/// One entry per feature (or route/polygon vertex) left out of the framing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedFeature {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub index: usize,
    pub reason: String,
}

/// Sink for dropped features: every entry is logged and kept so it can be
/// handed back with the tool result.
#[derive(Debug, Default)]
pub struct Diagnostics {
    dropped: Vec<DroppedFeature>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drop_feature(&mut self, kind: FeatureKind, index: usize, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(feature_type = kind.as_str(), index, reason = %reason, "dropping feature");
        self.dropped.push(DroppedFeature {
            kind,
            index,
            reason,
        });
    }

    pub fn dropped(&self) -> &[DroppedFeature] {
        &self.dropped
    }

    pub fn into_dropped(self) -> Vec<DroppedFeature> {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagnostics, FeatureKind};

    #[test]
    fn dropped_entries_keep_insertion_order() {
        let mut diag = Diagnostics::new();
        diag.drop_feature(FeatureKind::Marker, 2, "latitude out of range");
        diag.drop_feature(FeatureKind::Route, 0, "not an array");

        let dropped = diag.into_dropped();
        assert_eq!(dropped.len(), 2);
        assert_eq!(dropped[0].kind, FeatureKind::Marker);
        assert_eq!(dropped[0].index, 2);
        assert_eq!(dropped[1].reason, "not an array");
    }

    #[test]
    fn serializes_kind_as_type() {
        let mut diag = Diagnostics::new();
        diag.drop_feature(FeatureKind::Circle, 1, "radius must be positive");
        let json = serde_json::to_value(diag.dropped()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"type": "circle", "index": 1, "reason": "radius must be positive"}])
        );
    }
}
