use image::RgbaImage;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub class_name: String,
    pub probability: f32,
}

/// A loaded classifier. `predict` returns one entry per class, always in the
/// same class order.
pub trait ImageClassifier {
    fn total_classes(&self) -> usize;
    fn predict(
        &self,
        image: &RgbaImage,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>>;
}

pub trait ImageClassifierLoader {
    fn load(
        &self,
        model_url: &str,
        metadata_url: &str,
    ) -> Result<Box<dyn ImageClassifier + Send>, Box<dyn std::error::Error + Send + Sync>>;
}
