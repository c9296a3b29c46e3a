use serde::{Deserialize, Serialize};

/// Caller identity produced by a successful token verification.
///
/// Lives only for the duration of the request that carried the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub subject_id: String,
    pub email: String,
}
