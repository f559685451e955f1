use std::fmt;

use sw_core::{InferenceModel, Result};

use crate::Config;

pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub async fn new(_config: Option<Config>) -> Result<Self> {
        Ok(Self)
    }
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        // Echo the first 20 words of the last non-empty line
        let last_line = prompt
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last()
            .unwrap_or_default();
        let words: Vec<&str> = last_line.split_whitespace().take(20).collect();
        Ok(format!("Dummy summary: {}", words.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::new(None).await.unwrap();
        let reply = model.complete("header\n\n  last line here  \n").await.unwrap();
        assert_eq!(reply, "Dummy summary: last line here");

        let empty = model.complete("").await.unwrap();
        assert_eq!(empty, "Dummy summary: ");
    }
}
