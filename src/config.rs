use std::env::VarError;
use std::path::PathBuf;

use crate::canvas::Spacing;
use crate::error::{GridError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Figure width in pixels.
    pub width: u32,
    /// Figure height in pixels.
    pub height: u32,
    /// Caption font size in pixels.
    pub font_size: u32,
    pub hspace: f64,
    pub wspace: f64,
    pub output_path: PathBuf,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            font_size: 14,
            hspace: 0.8,
            wspace: 0.4,
            output_path: PathBuf::from("figures/image_grid.png"),
        }
    }
}

impl GridConfig {
    /// Defaults overridden by `LABELGRID_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(width) = env_number("LABELGRID_WIDTH")? {
            config.width = width;
        }
        if let Some(height) = env_number("LABELGRID_HEIGHT")? {
            config.height = height;
        }
        if let Some(font_size) = env_number("LABELGRID_FONT_SIZE")? {
            config.font_size = font_size;
        }
        if let Some(path) = std::env::var_os("LABELGRID_OUTPUT") {
            config.output_path = PathBuf::from(path);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GridError::InvalidConfig(format!(
                "figure size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.font_size == 0 {
            return Err(GridError::InvalidConfig("font size must be non-zero".to_string()));
        }
        if !(self.hspace >= 0.0 && self.wspace >= 0.0) {
            return Err(GridError::InvalidConfig(format!(
                "spacing must be non-negative, got hspace={} wspace={}",
                self.hspace, self.wspace
            )));
        }
        Ok(())
    }

    pub fn spacing(&self) -> Spacing {
        Spacing {
            hspace: self.hspace,
            wspace: self.wspace,
        }
    }
}

fn env_number(key: &str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| GridError::InvalidConfig(format!("{}={:?}: {}", key, raw, e))),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(GridError::InvalidConfig(format!(
            "{}={:?}: not valid unicode",
            key, raw
        ))),
    }
}
