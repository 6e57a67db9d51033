#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TensorLayout {
    #[default]
    Nhwc,
    Nchw,
}

impl TensorLayout {
    pub fn parse(value: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nhwc" => Ok(TensorLayout::Nhwc),
            "nchw" => Ok(TensorLayout::Nchw),
            other => Err(format!("Unknown tensor layout '{}'", other).into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelNormalization {
    /// `c / 127.5 - 1`
    #[default]
    MinusOneToOne,
    /// `c / 255`
    ZeroToOne,
}

impl PixelNormalization {
    pub fn parse(value: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        match value.trim() {
            "-1..1" | "minus-one-to-one" => Ok(PixelNormalization::MinusOneToOne),
            "0..1" | "zero-to-one" => Ok(PixelNormalization::ZeroToOne),
            other => Err(format!("Unknown pixel range '{}'", other).into()),
        }
    }
}

/// How frames are turned into the model's input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelConfig {
    pub layout: TensorLayout,
    pub normalization: PixelNormalization,
}
