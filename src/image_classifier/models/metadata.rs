use serde::Deserialize;
use std::path::Path;

fn default_image_size() -> u32 {
    224
}

/// `metadata.json` as exported next to a Teachable Machine image model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub labels: Vec<String>,
    #[serde(default = "default_image_size")]
    pub image_size: u32,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub tm_version: Option<String>,
}

impl ModelMetadata {
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let metadata: ModelMetadata = serde_json::from_str(json)?;
        if metadata.labels.is_empty() {
            return Err("Model metadata lists no labels".into());
        }
        if metadata.image_size == 0 {
            return Err("Model metadata image size must be positive".into());
        }
        Ok(metadata)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_json(&json)
    }
}
