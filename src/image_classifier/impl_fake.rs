use crate::image_classifier::interface::{Classification, ImageClassifier, ImageClassifierLoader};
use crate::library::logger::interface::Logger;
use image::RgbaImage;
use rand::distr::{Distribution, Uniform};
use std::sync::Arc;

/// Produces random probabilities over a fixed label set.
pub struct ImageClassifierFake {
    labels: Vec<String>,
}

impl ImageClassifierFake {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn total_classes(&self) -> usize {
        self.labels.len()
    }

    fn predict(
        &self,
        _image: &RgbaImage,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        let mut rng = rand::rng();
        let score_dist = Uniform::new(0.0f32, 1.0)?;

        let scores: Vec<f32> = self
            .labels
            .iter()
            .map(|_| score_dist.sample(&mut rng))
            .collect();
        let total: f32 = scores.iter().sum();

        let classifications = self
            .labels
            .iter()
            .zip(scores)
            .map(|(label, score)| Classification {
                class_name: label.clone(),
                probability: if total > 0.0 { score / total } else { 0.0 },
            })
            .collect();

        Ok(classifications)
    }
}

pub struct ImageClassifierFakeLoader {
    logger: Arc<dyn Logger + Send + Sync>,
    labels: Vec<String>,
}

impl ImageClassifierFakeLoader {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, labels: Vec<String>) -> Self {
        Self {
            logger: logger.with_namespace("classifier").with_namespace("fake"),
            labels,
        }
    }
}

impl ImageClassifierLoader for ImageClassifierFakeLoader {
    fn load(
        &self,
        model_url: &str,
        metadata_url: &str,
    ) -> Result<Box<dyn ImageClassifier + Send>, Box<dyn std::error::Error + Send + Sync>> {
        if self.labels.is_empty() {
            return Err("Fake classifier needs at least one label".into());
        }
        self.logger.info(&format!(
            "Pretending to load {} with {} ({} classes)",
            model_url,
            metadata_url,
            self.labels.len()
        ))?;
        Ok(Box::new(ImageClassifierFake::new(self.labels.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_keeps_label_order_and_sums_to_one() {
        let labels = vec!["Aspirin".to_string(), "Ibuprofen".to_string(), "Other".to_string()];
        let classifier = ImageClassifierFake::new(labels.clone());

        for _ in 0..10 {
            let prediction = classifier.predict(&RgbaImage::new(4, 4)).unwrap();
            let names: Vec<String> = prediction.iter().map(|c| c.class_name.clone()).collect();
            let total: f32 = prediction.iter().map(|c| c.probability).sum();

            assert_eq!(names, labels);
            assert!((total - 1.0).abs() < 1e-4);
            assert!(prediction
                .iter()
                .all(|c| (0.0..=1.0).contains(&c.probability)));
        }
        assert_eq!(classifier.total_classes(), 3);
    }
}
