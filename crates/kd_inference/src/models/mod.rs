use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use kd_core::config::ModelConfig;
use kd_core::{Error, Result};

pub mod dummy;
pub mod gemini;

pub use dummy::DummyModel;
pub use gemini::GeminiModel;

/// A text-in, text-out generative model.
#[async_trait]
pub trait DigestModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Send one prompt and return the model's full text reply
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build a model by CLI name. `gemini` needs an API key, `dummy` does not.
pub fn create_model(
    name: &str,
    config: &ModelConfig,
    api_key: Option<String>,
) -> Result<Arc<dyn DigestModel>> {
    match name {
        "gemini" => {
            let api_key = api_key
                .ok_or_else(|| Error::Inference("Gemini API key is required".to_string()))?;
            Ok(Arc::new(GeminiModel::new(config, api_key)?))
        }
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Inference(format!(
            "Unknown model: {}. Available models: gemini, dummy",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_model() {
        let config = ModelConfig::default();
        let model = create_model("gemini", &config, Some("key".to_string())).unwrap();
        assert_eq!(model.name(), "Gemini");
        assert_eq!(create_model("dummy", &config, None).unwrap().name(), "Dummy");

        let err = create_model("gemini", &config, None).unwrap_err();
        assert_eq!(err.to_string(), "Inference error: Gemini API key is required");
        assert!(create_model("gpt", &config, None).is_err());
    }
}
