use image::RgbaImage;

/// Per-channel linear brightness correction: `clamp(0, 255, round(c * gain + offset))`
/// on R, G and B. Alpha is never touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessFilter {
    pub gain: f32,
    pub offset: f32,
}

impl BrightnessFilter {
    pub const IDENTITY: BrightnessFilter = BrightnessFilter {
        gain: 1.0,
        offset: 0.0,
    };

    pub const SUBTLE: BrightnessFilter = BrightnessFilter {
        gain: 1.0,
        offset: 50.0,
    };

    pub const STRONG: BrightnessFilter = BrightnessFilter {
        gain: 1.5,
        offset: 100.0,
    };

    pub fn new(gain: f32, offset: f32) -> Self {
        Self { gain, offset }
    }

    /// Accepts a preset name (`identity`, `subtle`, `strong`) or `gain,offset`.
    pub fn parse(value: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "identity" | "off" => return Ok(Self::IDENTITY),
            "subtle" => return Ok(Self::SUBTLE),
            "strong" => return Ok(Self::STRONG),
            _ => {}
        }

        let (gain, offset) = value
            .split_once(',')
            .ok_or_else(|| format!("Invalid brightness filter '{}'", value))?;
        let gain: f32 = gain
            .trim()
            .parse()
            .map_err(|e| format!("Invalid brightness gain '{}': {}", gain.trim(), e))?;
        let offset: f32 = offset
            .trim()
            .parse()
            .map_err(|e| format!("Invalid brightness offset '{}': {}", offset.trim(), e))?;
        if !gain.is_finite() || !offset.is_finite() {
            return Err(format!("Brightness filter '{}' is not finite", value).into());
        }

        Ok(Self::new(gain, offset))
    }

    pub fn is_identity(&self) -> bool {
        self.gain == 1.0 && self.offset == 0.0
    }

    pub fn adjust(&self, value: u8) -> u8 {
        let adjusted = (value as f32 * self.gain + self.offset).round();
        adjusted.clamp(0.0, 255.0) as u8
    }

    /// Applies the filter in place to a packed RGBA buffer. A trailing partial
    /// pixel is left as is.
    pub fn apply_rgba(&self, data: &mut [u8]) {
        if self.is_identity() {
            return;
        }

        for pixel in data.chunks_exact_mut(4) {
            for channel in &mut pixel[..3] {
                *channel = self.adjust(*channel);
            }
        }
    }

    pub fn apply(&self, frame: &mut RgbaImage) {
        self.apply_rgba(frame);
    }
}

impl Default for BrightnessFilter {
    fn default() -> Self {
        BrightnessFilter::STRONG
    }
}
