use async_trait::async_trait;

use crate::Result;

#[async_trait]
pub trait InferenceModel: Send + Sync {
    fn name(&self) -> &str;

    /// Send a single prompt and return the model's free-text answer
    async fn complete(&self, prompt: &str) -> Result<String>;
}
