use crate::image_classifier::interface::{Classification, ImageClassifier, ImageClassifierLoader};
use crate::image_classifier::models::metadata::ModelMetadata;
use crate::image_classifier::models::model_config::ModelConfig;
use crate::image_classifier::tract::image::{frame_to_tensor, input_shape};
use crate::library::logger::interface::Logger;
use image::RgbaImage;
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::*;

pub struct ImageClassifierTractOnnx {
    model: TypedRunnableModel<TypedModel>,
    metadata: ModelMetadata,
    config: ModelConfig,
}

impl ImageClassifierTractOnnx {
    pub fn new(
        model_path: &Path,
        metadata: ModelMetadata,
        config: ModelConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let shape = input_shape(metadata.image_size, &config);
        let model = tract_onnx::onnx()
            .model_for_path(model_path)?
            .with_input_fact(0, f32::fact(shape).into())?
            .into_optimized()?
            .into_runnable()?;

        Ok(Self {
            model,
            metadata,
            config,
        })
    }
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn total_classes(&self) -> usize {
        self.metadata.labels.len()
    }

    fn predict(
        &self,
        image: &RgbaImage,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        let input = frame_to_tensor(image, self.metadata.image_size, &self.config);
        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        pair_scores(&self.metadata.labels, &outputs)
    }
}

/// Pairs the first output's scores with the labels, in label order.
fn pair_scores(
    labels: &[String],
    outputs: &[TValue],
) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
    let output = outputs.first().ok_or("Model produced no outputs")?;
    let scores: Vec<f32> = output.to_array_view::<f32>()?.iter().copied().collect();

    if scores.len() < labels.len() {
        return Err(format!(
            "Model produced {} scores for {} labels",
            scores.len(),
            labels.len()
        )
        .into());
    }

    Ok(labels
        .iter()
        .zip(scores)
        .map(|(label, probability)| Classification {
            class_name: label.clone(),
            probability,
        })
        .collect())
}

pub struct ImageClassifierTractOnnxLoader {
    logger: Arc<dyn Logger + Send + Sync>,
    config: ModelConfig,
}

impl ImageClassifierTractOnnxLoader {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, config: ModelConfig) -> Self {
        Self {
            logger: logger.with_namespace("classifier").with_namespace("tract"),
            config,
        }
    }
}

impl ImageClassifierLoader for ImageClassifierTractOnnxLoader {
    fn load(
        &self,
        model_url: &str,
        metadata_url: &str,
    ) -> Result<Box<dyn ImageClassifier + Send>, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!("Loading model {}", model_url))?;
        let metadata = ModelMetadata::load(Path::new(metadata_url))?;
        let classifier = ImageClassifierTractOnnx::new(Path::new(model_url), metadata, self.config)?;
        self.logger.info(&format!(
            "Model loaded with {} classes",
            classifier.total_classes()
        ))?;
        Ok(Box::new(classifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;

    fn loader() -> ImageClassifierTractOnnxLoader {
        let logger = Arc::new(LoggerConsole::new(
            chrono::FixedOffset::east_opt(0).unwrap(),
        ));
        ImageClassifierTractOnnxLoader::new(logger, ModelConfig::default())
    }

    #[test]
    fn test_load_fails_without_metadata() {
        let directory = tempfile::tempdir().unwrap();
        let model = directory.path().join("model.onnx");
        let metadata = directory.path().join("metadata.json");

        let result = loader().load(model.to_str().unwrap(), metadata.to_str().unwrap());

        assert!(result.is_err());
    }

    #[test]
    fn test_load_fails_on_invalid_model_file() {
        let directory = tempfile::tempdir().unwrap();
        let model = directory.path().join("model.onnx");
        let metadata = directory.path().join("metadata.json");
        std::fs::write(&model, b"not an onnx model").unwrap();
        std::fs::write(&metadata, r#"{"labels": ["A", "B"], "imageSize": 224}"#).unwrap();

        let result = loader().load(model.to_str().unwrap(), metadata.to_str().unwrap());

        assert!(result.is_err());
    }

    fn labels() -> Vec<String> {
        vec!["Aspirin".to_string(), "Ibuprofen".to_string()]
    }

    #[test]
    fn test_pair_scores_follows_label_order() {
        let outputs = tvec!(tensor1(&[0.75f32, 0.25]).into_tvalue());

        let classifications = pair_scores(&labels(), &outputs).unwrap();

        assert_eq!(
            classifications,
            vec![
                Classification {
                    class_name: "Aspirin".to_string(),
                    probability: 0.75
                },
                Classification {
                    class_name: "Ibuprofen".to_string(),
                    probability: 0.25
                },
            ]
        );
    }

    #[test]
    fn test_pair_scores_errors_instead_of_panicking() {
        let empty: TVec<TValue> = tvec!();
        let short = tvec!(tensor1(&[1.0f32]).into_tvalue());

        assert!(pair_scores(&labels(), &empty).is_err());
        assert!(pair_scores(&labels(), &short).is_err());
    }
}
