use async_trait::async_trait;
use reqwest::{Request, Response};

/// Seam for the file loader: tests and alternative transports supply their
/// own implementation instead of hitting the network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
