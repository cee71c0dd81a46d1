const ENV_API_URL: &str = "AISTAFF_API_URL";
const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Where the backend lives. The base URL is joined with the endpoint
/// paths the services use (`/auth/login`, `/agents`, ...).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Resolve the base URL from `AISTAFF_API_URL`, falling back to the
    /// local development server.
    pub fn from_env() -> Self {
        if let Ok(value) = std::env::var(ENV_API_URL) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Self::new(trimmed);
            }
        }
        Self::new(DEFAULT_API_URL)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
