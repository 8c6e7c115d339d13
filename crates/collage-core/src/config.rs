use crate::model::Size;
use serde::{Deserialize, Serialize};

/// Layout configuration.
///
/// Every tunable of the algorithm lives here, including the RNG seed for the
/// span coin flip; two runs with identical input and config produce
/// byte-identical plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollageConfig {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Probability that a photo spans two similar-height neighbor columns (0..=1).
    #[serde(default = "default_span_probability")]
    pub span_probability: f64,
    /// Two neighbor columns count as similar when their heights differ by at
    /// most this many pixels.
    #[serde(default = "default_similar_height_tolerance")]
    pub similar_height_tolerance: u32,
    /// Seed for the span coin flip.
    #[serde(default)]
    pub seed: u64,
    /// Force a column count instead of estimating one from the photo set.
    #[serde(default)]
    pub columns: Option<usize>,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1080,
            canvas_height: 1920,
            span_probability: default_span_probability(),
            similar_height_tolerance: default_similar_height_tolerance(),
            seed: 0,
            columns: None,
        }
    }
}

fn default_span_probability() -> f64 {
    0.2
}
fn default_similar_height_tolerance() -> u32 {
    10
}

impl CollageConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::CollageError;

        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(CollageError::InvalidDimensions {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if !(0.0..=1.0).contains(&self.span_probability) {
            return Err(CollageError::InvalidConfig(format!(
                "span_probability must be within 0..=1, got {}",
                self.span_probability
            )));
        }
        if self.columns == Some(0) {
            return Err(CollageError::InvalidConfig(
                "columns must be at least 1 when forced".into(),
            ));
        }
        Ok(())
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    /// Create a fluent builder for `CollageConfig`.
    pub fn builder() -> CollageConfigBuilder {
        CollageConfigBuilder::new()
    }
}

/// Builder for `CollageConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct CollageConfigBuilder {
    cfg: CollageConfig,
}

impl CollageConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: CollageConfig::default(),
        }
    }
    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.cfg.canvas_width = width;
        self.cfg.canvas_height = height;
        self
    }
    pub fn span_probability(mut self, v: f64) -> Self {
        self.cfg.span_probability = v;
        self
    }
    pub fn similar_height_tolerance(mut self, v: u32) -> Self {
        self.cfg.similar_height_tolerance = v;
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = v;
        self
    }
    pub fn columns(mut self, v: Option<usize>) -> Self {
        self.cfg.columns = v;
        self
    }
    pub fn build(self) -> CollageConfig {
        self.cfg
    }
}
