//! Develop configuration types

use std::fmt;

/// Stages a mosaic passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevelopStage {
    RawDecoded,
    Normalized,
    WhiteBalanced,
    Demosaiced,
    ColorCorrected,
    /// Cropped to the active area and oriented
    Final,
}

impl DevelopStage {
    pub fn name(self) -> &'static str {
        match self {
            DevelopStage::RawDecoded => "raw_decoded",
            DevelopStage::Normalized => "normalized",
            DevelopStage::WhiteBalanced => "white_balanced",
            DevelopStage::Demosaiced => "demosaiced",
            DevelopStage::ColorCorrected => "color_corrected",
            DevelopStage::Final => "final",
        }
    }
}

impl fmt::Display for DevelopStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for developing a RAW image
#[derive(Debug, Clone)]
pub struct DevelopConfig {
    /// Whether to validate image dimensions before developing
    pub validate_dimensions: bool,
    /// Maximum allowed width or height
    pub max_dimension: Option<usize>,
    /// Whether to cut the masked sensor border away
    pub crop_to_active_area: bool,
    /// Whether to honour the stored orientation code
    pub apply_orientation: bool,
}

impl Default for DevelopConfig {
    fn default() -> Self {
        Self {
            validate_dimensions: true,
            max_dimension: Some(65535),
            crop_to_active_area: true,
            apply_orientation: true,
        }
    }
}

impl DevelopConfig {
    pub fn builder() -> DevelopConfigBuilder {
        DevelopConfigBuilder::default()
    }
}

/// Builder for DevelopConfig
#[derive(Default)]
pub struct DevelopConfigBuilder {
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    crop_to_active_area: Option<bool>,
    apply_orientation: Option<bool>,
}

impl DevelopConfigBuilder {
    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn crop_to_active_area(mut self, enable: bool) -> Self {
        self.crop_to_active_area = Some(enable);
        self
    }

    pub fn apply_orientation(mut self, enable: bool) -> Self {
        self.apply_orientation = Some(enable);
        self
    }

    pub fn build(self) -> DevelopConfig {
        let default = DevelopConfig::default();
        DevelopConfig {
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            crop_to_active_area: self.crop_to_active_area.unwrap_or(default.crop_to_active_area),
            apply_orientation: self.apply_orientation.unwrap_or(default.apply_orientation),
        }
    }
}
