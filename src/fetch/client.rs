use async_trait::async_trait;
use reqwest::{Request, Response};

/// Seam for HTTP retrieval, so data loading can be exercised against a
/// stub transport.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
