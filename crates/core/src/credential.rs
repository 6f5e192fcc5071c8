use serde::{Deserialize, Serialize};

/// Prefix used by identifiers that refer to a named profile.
pub const PROFILE_ID_PREFIX: &str = "profile:";

/// Identifier of the conventional default profile.
pub const DEFAULT_PROFILE_ID: &str = "profile:default";

/// Opaque reference to a set of access credentials, resolved through a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialIdentifier {
    /// Unique id, e.g. `profile:default`.
    pub id: String,
    /// Human-readable name shown in listings.
    pub display_name: String,
    /// Region the credential prefers when no region has been chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_region_id: Option<String>,
}

impl CredentialIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let display_name = id.clone();
        Self {
            id,
            display_name,
            default_region_id: None,
        }
    }

    /// Identifier for a named profile (`profile:<name>`).
    pub fn profile(name: &str) -> Self {
        Self {
            id: format!("{PROFILE_ID_PREFIX}{name}"),
            display_name: name.to_string(),
            default_region_id: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_default_region(mut self, region_id: impl Into<String>) -> Self {
        self.default_region_id = Some(region_id.into());
        self
    }

    /// Profile name if this identifier follows the `profile:<name>` convention.
    pub fn profile_name(&self) -> Option<&str> {
        self.id.strip_prefix(PROFILE_ID_PREFIX)
    }

    pub fn is_default_profile(&self) -> bool {
        self.id == DEFAULT_PROFILE_ID
    }
}

impl std::fmt::Display for CredentialIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Static access key material for a credential identifier.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

// Secrets never reach logs through Debug.
impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"********")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "********"),
            )
            .finish()
    }
}
