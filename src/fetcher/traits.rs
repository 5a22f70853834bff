use crate::model::{FetchError, FetchRequest};

/// Remote source of daily price history. Returns the raw response body.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self, req: &FetchRequest) -> Result<String, FetchError>;
}
