//! Outbound HTTP client to the external scoring hub (§4.11).
//!
//! Grounded on `gerdoe-jr-dd-pg`'s `base-http` crate, which takes the same
//! `reqwest` (rustls-tls) dependency for its own outbound HTTP client. Calls
//! are fire-and-forget from the tick's perspective (§5); callers `tokio::spawn`
//! these futures and route the result back into the worker's inbound channel
//! rather than awaiting them inline.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum HubError {
    #[error("hub request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("hub responded with status {0}")]
    Status(u16),
}

#[derive(Debug, Clone, Deserialize)]
pub struct HubPlayer {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PlayerKey")]
    pub player_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentGameResponse {
    #[serde(rename = "Players", default)]
    pub players: Vec<HubPlayer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScorePlayerRef {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PlayerKey")]
    pub player_key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerScore {
    #[serde(rename = "Score")]
    pub score: u8,
    #[serde(rename = "Player")]
    pub player: ScorePlayerRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitScoreRequest {
    #[serde(rename = "HostedGameKey")]
    pub hosted_game_key: String,
    #[serde(rename = "PlayerScores")]
    pub player_scores: Vec<PlayerScore>,
}

#[derive(Clone)]
pub struct HubClient {
    client: reqwest::Client,
    base_url: String,
    hosted_game_key: String,
}

impl HubClient {
    pub fn new(base_url: String, hosted_game_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client builder with static config cannot fail");
        Self { client, base_url, hosted_game_key }
    }

    pub async fn fetch_current_game(&self) -> Result<CurrentGameResponse, HubError> {
        let url = format!("{}/Game/currentGame", self.base_url);
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(HubError::Status(resp.status().as_u16()));
        }
        Ok(resp.json::<CurrentGameResponse>().await?)
    }

    pub async fn submit_score(&self, name: String, player_key: String, score: u8) -> Result<(), HubError> {
        let url = format!("{}/Game/Score", self.base_url);
        let body = SubmitScoreRequest {
            hosted_game_key: self.hosted_game_key.clone(),
            player_scores: vec![PlayerScore { score, player: ScorePlayerRef { name, player_key } }],
        };
        let resp = self.client.post(url).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(HubError::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}
