#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 16 * 1024,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn origin_allowed(&self, origin: &str) -> bool {
        self.cors_allowed_origins.is_empty()
            || self.cors_allowed_origins.iter().any(|o| o == origin)
    }
}
