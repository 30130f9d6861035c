//! The JSON payload served in response to a server-list ping.

use serde::Serialize;

/// The full `StatusResponse` JSON body, matching the schema vanilla clients
/// render in the multiplayer list.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub version: Version,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Players>,
    pub description: strata_utils::text::TextComponent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(rename = "enforcesSecureChat")]
    pub enforce_secure_chat: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Version {
    pub name: &'static str,
    pub protocol: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Players {
    pub max: i32,
    pub online: i32,
    pub sample: Vec<PlayerSample>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSample {
    pub name: String,
    pub id: uuid::Uuid,
}

/// The protocol revision this library speaks; reported in every status
/// response and checked against the client's handshake.
pub const MC_PROTOCOL: i32 = 757;
pub const MC_VERSION: &str = "1.18.0";

impl Status {
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned())
    }
}
