use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes an HTTP request. Providers receive this as a composable
/// stack: a base client optionally wrapped by auth decorators.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
