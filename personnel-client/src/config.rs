/// Where the API lives. Defaults to the local development origin the server
/// binds by default.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("PERSONNEL_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5237".to_string());
        Self { api_base_url }
    }
}
