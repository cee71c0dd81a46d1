use super::decode;
use crate::client::{ApiClient, HttpTransport, RequestBody};
use crate::error::ApiError;
use crate::tokens::TokenStore;
use crate::types::{Agent, NewAgent};

/// CRUD over the caller's agent records.
pub struct AgentsApi<'a, T, S> {
    client: &'a ApiClient<T, S>,
}

impl<'a, T: HttpTransport, S: TokenStore> AgentsApi<'a, T, S> {
    pub(super) fn new(client: &'a ApiClient<T, S>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Agent>, ApiError> {
        decode(self.client.get("/agents").await?)
    }

    pub async fn get(&self, id: i64) -> Result<Agent, ApiError> {
        decode(self.client.get(&format!("/agents/{id}")).await?)
    }

    pub async fn create(&self, agent: &NewAgent) -> Result<Agent, ApiError> {
        let body = RequestBody::Json(serde_json::to_value(agent)?);
        decode(self.client.post("/agents", body).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/agents/{id}")).await?;
        Ok(())
    }

    pub async fn available_capabilities(&self) -> Result<Vec<String>, ApiError> {
        decode(self.client.get("/agents/capabilities/available").await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::ApiClient;
    use crate::config::ApiConfig;
    use crate::test_support::{empty_response, json_response, ScriptedTransport};
    use crate::tokens::MemoryTokenStore;
    use crate::types::NewAgent;

    fn api(transport: ScriptedTransport) -> ApiClient<ScriptedTransport, MemoryTokenStore> {
        ApiClient::new(ApiConfig::new("http://api.test"), transport, MemoryTokenStore::new())
    }

    #[tokio::test]
    async fn list_decodes_agents() {
        let transport = ScriptedTransport::new(vec![json_response(
            200,
            serde_json::json!([{
                "id": 1,
                "name": "scribe",
                "description": "takes notes",
                "capabilities": ["summarize"],
                "status": "idle",
                "created_at": "2025-01-01T00:00:00Z"
            }]),
        )]);
        let api = api(transport.clone());

        let agents = api.agents().list().await.unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].name, "scribe");
        assert_eq!(transport.seen().await[0].url, "http://api.test/agents");
    }

    #[tokio::test]
    async fn create_sends_shaped_body() {
        let transport = ScriptedTransport::new(vec![json_response(
            201,
            serde_json::json!({
                "id": 2,
                "name": "scout",
                "description": null,
                "capabilities": [],
                "status": "idle",
                "created_at": "2025-01-01T00:00:00Z"
            }),
        )]);
        let api = api(transport.clone());

        let created = api
            .agents()
            .create(&NewAgent {
                name: "scout".to_string(),
                ..NewAgent::default()
            })
            .await
            .unwrap();
        assert_eq!(created.id, 2);
    }

    #[tokio::test]
    async fn delete_accepts_no_content() {
        let transport = ScriptedTransport::new(vec![empty_response(204)]);
        let api = api(transport.clone());

        api.agents().delete(5).await.unwrap();
        assert_eq!(transport.seen().await[0].url, "http://api.test/agents/5");
    }
}
