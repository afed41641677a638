use serde::{Deserialize, Serialize};

/// Identity pair stored verbatim and replayed as `x-api-user` / `x-api-key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub user_id: String,
    pub api_token: String,
}

/// One task as the remote service reports it. Only `type == "daily"` items
/// are surfaced to selection; the optional fields are absent on other kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub streak: Option<i64>,
    #[serde(default)]
    pub is_due: Option<bool>,
}

impl Habit {
    pub fn display_name(&self) -> &str {
        if self.text.is_empty() {
            "Unnamed Habit"
        } else {
            &self.text
        }
    }

    pub fn is_daily(&self) -> bool {
        self.kind == "daily"
    }

    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginReply {
    pub id: String,
    pub api_token: String,
    #[serde(default)]
    pub new_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    pub id: String,
    pub auth: ApiAuth,
    pub profile: ApiProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAuth {
    pub api_token: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiProfile {
    pub name: String,
}

/// Uniform `{success, data, message}` wrapper around every response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}
