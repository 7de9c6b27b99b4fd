use egui::Color32;

/// Quantization step for the persisted size ratio. Frozen: blobs written with
/// this constant are already on disk, so changing it breaks old settings.
const PRECISION: i32 = 100_000;

/// Stream version tag for the persisted blob.
const STREAM_VERSION: u8 = 1;

/// Encoded length: version tag + i32 ratio + 4 color bytes.
const ENCODED_LEN: usize = 1 + 4 + 4;

// Immutable brush settings chosen in the color picker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    size_ratio: f32,
    color: Color32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            size_ratio: 0.0,
            color: Color32::WHITE,
        }
    }
}

impl Brush {
    /// Create a new brush. The size ratio is clamped to [0, 1].
    pub fn new(size_ratio: f32, color: Color32) -> Self {
        Self {
            size_ratio: size_ratio.clamp(0.0, 1.0),
            color,
        }
    }

    pub fn size_ratio(&self) -> f32 {
        self.size_ratio
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    /// Serialize to the persisted-settings blob format:
    /// `[u8 version][i32be quantized ratio][r][g][b][a]`.
    pub fn encode(&self) -> Vec<u8> {
        let quantized = (self.size_ratio * PRECISION as f32) as i32;
        let mut out = Vec::with_capacity(ENCODED_LEN);
        out.push(STREAM_VERSION);
        out.extend_from_slice(&quantized.to_be_bytes());
        out.extend_from_slice(&self.color.to_array());
        out
    }

    /// Deserialize a persisted blob. Truncated, oversized or unknown-version
    /// data yields the default brush so corrupted settings never fail a
    /// session start.
    pub fn decode(data: &[u8]) -> Self {
        if data.len() != ENCODED_LEN || data[0] != STREAM_VERSION {
            log::warn!("unreadable brush blob ({} bytes), using defaults", data.len());
            return Self::default();
        }
        let quantized = i32::from_be_bytes([data[1], data[2], data[3], data[4]]);
        let color = Color32::from_rgba_premultiplied(data[5], data[6], data[7], data[8]);
        Self {
            size_ratio: quantized as f32 / PRECISION as f32,
            color,
        }
    }
}
