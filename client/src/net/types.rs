//! Shared wire DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! The server depends on this crate with the `ssr` feature and reuses these
//! types for both its browser-facing routes and its upstream fab API calls,
//! so the JSON shapes exist in exactly one place.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::de::{Error as _, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Prediction value meaning "no defect detected".
pub const NO_DEFECT: &str = "none";

// =============================================================================
// FAB -> CAMERA MAP
// =============================================================================

/// Mapping from fab identifier to its ordered camera identifiers.
///
/// Entries keep the order they arrived in, including duplicate fab keys, so
/// callers can decide how duplicates are presented.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FabCameraMap {
    entries: Vec<(String, Vec<String>)>,
}

impl FabCameraMap {
    #[must_use]
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// Fab identifiers, each listed once in order of first appearance.
    /// Matching is exact and case-sensitive.
    #[must_use]
    pub fn fab_ids(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::with_capacity(self.entries.len());
        for (fab, _) in &self.entries {
            if !seen.iter().any(|s| s == fab) {
                seen.push(fab.clone());
            }
        }
        seen
    }

    /// Cameras for `fab`. A duplicated key resolves to its last entry, which
    /// is how a JSON object lookup behaves.
    #[must_use]
    pub fn cameras_for(&self, fab: &str) -> &[String] {
        self.entries
            .iter()
            .rev()
            .find(|(key, _)| key == fab)
            .map(|(_, cameras)| cameras.as_slice())
            .unwrap_or_default()
    }
}

impl Serialize for FabCameraMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (fab, cameras) in &self.entries {
            map.serialize_entry(fab, cameras)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FabCameraMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = FabCameraMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping fab ids to camera id arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((fab, cameras)) = access.next_entry::<String, Vec<String>>()? {
                    entries.push((fab, cameras));
                }
                Ok(FabCameraMap { entries })
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

// =============================================================================
// IMAGES
// =============================================================================

/// One captured wafer-map image with its model prediction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Image identifier, also the object-storage file stem.
    pub imgid: String,
    /// Predicted defect label, or `"none"`.
    pub prediction: String,
    /// Model confidence in `0..=1`. Accepts a number or a numeric string.
    #[serde(deserialize_with = "deserialize_f64_from_number_or_string")]
    pub probability: f64,
}

impl ImageRecord {
    #[must_use]
    pub fn is_defect(&self) -> bool {
        self.prediction != NO_DEFECT
    }
}

/// Filter for an image-list request. Timestamps are unix seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageQuery {
    pub fab: String,
    pub camera: String,
    pub fromts: i64,
    pub tots: i64,
}

impl ImageQuery {
    /// Query-string pairs in the order the API documents them.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("fab", self.fab.clone()),
            ("camera", self.camera.clone()),
            ("fromts", self.fromts.to_string()),
            ("tots", self.tots.to_string()),
        ]
    }
}

/// Human-corrected label for one image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruth {
    pub imgid: String,
    pub fab: String,
    pub camera: String,
    pub truth: String,
}

// =============================================================================
// CONFIG / AUTH
// =============================================================================

/// Public, static settings the browser needs to locate image bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub region: String,
    pub bucket: String,
}

impl ClientConfig {
    /// Object-storage URL for an image.
    #[must_use]
    pub fn image_url(&self, fab: &str, camera: &str, imgid: &str) -> String {
        format!(
            "https://s3-{}.amazonaws.com/{}/{fab}/{camera}/{imgid}.png",
            self.region, self.bucket
        )
    }
}

/// The signed-in user as reported by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// JSON error body returned by every failing server route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn deserialize_f64_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| D::Error::custom("expected finite number")),
        serde_json::Value::String(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("expected numeric string, got {raw:?}"))),
        _ => Err(D::Error::custom("expected number or numeric string")),
    }
}
