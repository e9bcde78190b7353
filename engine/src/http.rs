//! JSON-over-HTTP client for the combat authority.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::authority::{
    AuthorityError, BoostRequest, CombatAuthority, RoundRequest, RoundResponse,
};
use crate::character::{Character, NewCharacter};
use crate::config::ClientConfig;

#[derive(Clone)]
pub struct HttpAuthority {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct LoadRequest<'a> {
    name: &'a str,
}

impl HttpAuthority {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AuthorityError> {
        let client = Client::builder().timeout(timeout).build().map_err(transport)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(cfg: &ClientConfig) -> Result<Self, AuthorityError> {
        Self::new(&cfg.base_url, Duration::from_secs(cfg.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, AuthorityError> {
        debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AuthorityError> {
        let response = self.post(path, body).await?;
        let text = response.text().await.map_err(transport)?;
        parse_body(&text)
    }
}

fn transport(e: reqwest::Error) -> AuthorityError {
    AuthorityError::Transport(e.to_string())
}

async fn check_status(response: Response) -> Result<Response, AuthorityError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(AuthorityError::Status {
        status,
        body: body.trim().to_string(),
    })
}

pub(crate) fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, AuthorityError> {
    serde_json::from_str(text).map_err(|e| AuthorityError::Malformed(e.to_string()))
}

#[async_trait]
impl CombatAuthority for HttpAuthority {
    async fn create_character(&self, req: &NewCharacter) -> Result<Character, AuthorityError> {
        self.post_json("create-character", req).await
    }

    async fn randomize_card(&self) -> Result<u32, AuthorityError> {
        debug!("GET randomize-card");
        let response = self
            .client
            .get(self.url("randomize-card"))
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;
        let text = response.text().await.map_err(transport)?;
        parse_body(&text)
    }

    async fn apply_stat_boost(&self, req: &BoostRequest) -> Result<Character, AuthorityError> {
        self.post_json("apply-stat-boost", req).await
    }

    async fn play_round(&self, req: &RoundRequest) -> Result<RoundResponse, AuthorityError> {
        self.post_json("start-combat", req).await
    }

    async fn save_progress(&self, snapshot: &Character) -> Result<String, AuthorityError> {
        let response = self.post("save-progress", snapshot).await?;
        let text = response.text().await.map_err(transport)?;
        Ok(text.trim().to_string())
    }

    async fn load_progress(&self, name: &str) -> Result<Character, AuthorityError> {
        self.post_json("load-progress", &LoadRequest { name }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::RoundAction;
    use crate::catalog::CardId;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let http = HttpAuthority::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(http.base_url(), "http://localhost:8080");
        assert_eq!(http.url("start-combat"), "http://localhost:8080/start-combat");
    }

    #[test]
    fn client_keeps_the_configured_server() {
        let cfg = ClientConfig {
            base_url: "http://arena:9000/".into(),
            timeout_secs: 3,
            catalog_path: None,
        };
        let http = HttpAuthority::from_config(&cfg).unwrap();
        assert_eq!(http.base_url(), "http://arena:9000");
    }

    #[test]
    fn character_without_stats_is_malformed() {
        let body = r#"{"name":"Ayla","race":"Elf","class":"Mage","level":1,"xp":0,
            "health":80,"maxHealth":80,"mana":85,"maxMana":85,"gold":100,
            "armor":"Old Teared Cloak","weapon":"Stale Tree Branch"}"#;
        let err = parse_body::<Character>(body).unwrap_err();
        assert!(matches!(err, AuthorityError::Malformed(_)));
    }

    #[test]
    fn cast_request_carries_card_id() {
        let req = RoundRequest {
            action: RoundAction::CastSpell,
            card_id: Some(CardId(3)),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"action": "castSpell", "cardId": 3}));

        let start = RoundRequest {
            action: RoundAction::Start,
            card_id: None,
        };
        let json = serde_json::to_value(&start).unwrap();
        assert_eq!(json, serde_json::json!({"action": "start"}));
    }
}
