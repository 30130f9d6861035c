//! The Mojang session-server `hasJoined` call that authenticates an
//! online-mode login.

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

const SESSION_SERVER_URL: &str = "https://sessionserver.mojang.com/session/minecraft/hasJoined";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Mojang session server did not respond")]
    FailedResponse,
    #[error("session server reported the username was not verified")]
    UnverifiedUsername,
    #[error("session server returned malformed JSON")]
    FailedParse,
}

/// The subset of Mojang's `hasJoined` response this server needs.
#[derive(Debug, Clone, Deserialize)]
pub struct GameProfile {
    #[serde(rename = "id")]
    pub uuid: Uuid,
    #[serde(rename = "name")]
    pub username: String,
}

/// Confirms with Mojang that `username` requested a join with the given
/// server hash (see [`crate::yggdrasil::server_hash`]) within the last
/// thirty seconds.
pub async fn has_joined(username: &str, server_hash: &str) -> Result<GameProfile, AuthError> {
    let response = reqwest::Client::new()
        .get(SESSION_SERVER_URL)
        .query(&[("username", username), ("serverId", server_hash)])
        .send()
        .await
        .map_err(|_| AuthError::FailedResponse)?;

    if response.status() == reqwest::StatusCode::NO_CONTENT {
        return Err(AuthError::UnverifiedUsername);
    }

    response.json().await.map_err(|_| AuthError::FailedParse)
}
