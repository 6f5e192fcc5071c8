//! Persisted selection document.
//!
//! Shape:
//! ```json
//! {
//!   "activeProfile": "profile:default",
//!   "activeRegion": "us-east-1",
//!   "recentlyUsedProfiles": ["profile:default", "profile:prod"],
//!   "recentlyUsedRegions": ["us-east-1"]
//! }
//! ```
//! Absent selections are omitted rather than written as null or "".
//! Decoding is per-field tolerant: a field of the wrong type is logged and
//! treated as absent instead of failing the whole document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::CodecError;

const ACTIVE_PROFILE: &str = "activeProfile";
const ACTIVE_REGION: &str = "activeRegion";
const RECENT_PROFILES: &str = "recentlyUsedProfiles";
const RECENT_REGIONS: &str = "recentlyUsedRegions";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_region: Option<String>,
    #[serde(default)]
    pub recently_used_profiles: Vec<String>,
    #[serde(default)]
    pub recently_used_regions: Vec<String>,
}

impl PersistedSelection {
    /// No selection and no history: equivalent to no prior state.
    pub fn is_empty(&self) -> bool {
        self.active_profile.is_none()
            && self.active_region.is_none()
            && self.recently_used_profiles.is_empty()
            && self.recently_used_regions.is_empty()
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a document. Only non-JSON input or a non-object root fails.
    pub fn from_json(data: &str) -> Result<Self, CodecError> {
        let root: Value = serde_json::from_str(data)?;
        Self::from_value(&root)
    }

    pub fn from_value(root: &Value) -> Result<Self, CodecError> {
        let obj = root
            .as_object()
            .ok_or_else(|| CodecError::NotAnObject(json_type(root)))?;

        Ok(Self {
            active_profile: string_field(obj, ACTIVE_PROFILE),
            active_region: string_field(obj, ACTIVE_REGION),
            recently_used_profiles: string_list_field(obj, RECENT_PROFILES),
            recently_used_regions: string_list_field(obj, RECENT_REGIONS),
        })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            warn!(field = key, found = json_type(other), "Ignoring malformed selection field");
            None
        }
    }
}

fn string_list_field(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                other => {
                    warn!(field = key, found = json_type(other), "Skipping malformed list entry");
                    None
                }
            })
            .collect(),
        Some(other) => {
            warn!(field = key, found = json_type(other), "Ignoring malformed selection field");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_selection_is_omitted() {
        let doc = PersistedSelection {
            active_profile: None,
            active_region: Some("eu-west-1".to_string()),
            recently_used_profiles: vec![],
            recently_used_regions: vec!["eu-west-1".to_string()],
        };
        let json: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("activeProfile"));
        assert_eq!(obj["activeRegion"], "eu-west-1");
        assert_eq!(obj["recentlyUsedProfiles"], serde_json::json!([]));
        assert_eq!(obj["recentlyUsedRegions"], serde_json::json!(["eu-west-1"]));
    }

    #[test]
    fn decodes_full_document() {
        let doc = PersistedSelection::from_json(
            r#"{
                "activeProfile": "Mock",
                "activeRegion": "us-west-2",
                "recentlyUsedProfiles": ["Mock", "profile:default"],
                "recentlyUsedRegions": ["us-west-2"]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.active_profile.as_deref(), Some("Mock"));
        assert_eq!(doc.active_region.as_deref(), Some("us-west-2"));
        assert_eq!(doc.recently_used_profiles, vec!["Mock", "profile:default"]);
        assert!(!doc.is_empty());
    }

    #[test]
    fn malformed_fields_become_absent() {
        let doc = PersistedSelection::from_json(
            r#"{
                "activeProfile": 42,
                "activeRegion": "",
                "recentlyUsedProfiles": ["a", 7, null, "b"],
                "recentlyUsedRegions": "us-east-1"
            }"#,
        )
        .unwrap();
        assert!(doc.active_profile.is_none());
        assert!(doc.active_region.is_none());
        assert_eq!(doc.recently_used_profiles, vec!["a", "b"]);
        assert!(doc.recently_used_regions.is_empty());
    }

    #[test]
    fn empty_object_is_empty_selection() {
        let doc = PersistedSelection::from_json("{}").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc, PersistedSelection::default());
    }

    #[test]
    fn non_object_root_fails() {
        let err = PersistedSelection::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, CodecError::NotAnObject("array")));
        assert!(matches!(
            PersistedSelection::from_json("{not json").unwrap_err(),
            CodecError::Json(_)
        ));
    }
}
