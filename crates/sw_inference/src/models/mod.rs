use std::sync::Arc;

use sw_core::{Error, InferenceModel, Result};

use crate::Config;

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

pub async fn create_model(config: Option<Config>) -> Result<Arc<dyn InferenceModel>> {
    let config = config.unwrap_or_default();
    let kind = config.model.as_deref().unwrap_or("openai").to_lowercase();

    match kind.as_str() {
        "openai" => Ok(Arc::new(OpenAiModel::new(&config)?)),
        "dummy" => Ok(Arc::new(DummyModel::new(Some(config)).await?)),
        other => Err(Error::Inference(format!(
            "Unknown model '{}'. Available models: openai, dummy",
            other
        ))),
    }
}
