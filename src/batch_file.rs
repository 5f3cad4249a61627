use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::batch::{ClassNames, GridBatch, Labels};
use crate::error::{GridError, Result};
use crate::pixels::{Image, PixelError};

/// Label column as found in a file: flat `[0, 1]` or nested `[[0], [1]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelArray {
    Flat(Vec<usize>),
    Nested(Vec<Vec<usize>>),
}

impl LabelArray {
    /// Normalize to the canonical rank-1 form.
    pub fn into_labels(self) -> Result<Labels> {
        match self {
            LabelArray::Flat(values) => Ok(Labels::new(values)),
            LabelArray::Nested(rows) => Labels::squeeze(&rows),
        }
    }
}

/// Pixel array as found in a file: H×W or H×W×C.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PixelArray {
    Plane(Vec<Vec<f32>>),
    Channels(Vec<Vec<Vec<f32>>>),
}

impl PixelArray {
    pub fn to_image(&self) -> std::result::Result<Image, PixelError> {
        match self {
            PixelArray::Plane(rows) => Image::from_intensity(rows),
            PixelArray::Channels(rows) => Image::from_channels(rows),
        }
    }
}

/// A batch of labeled images stored as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFile {
    pub class_names: Vec<String>,
    pub images: Vec<PixelArray>,
    pub labels: LabelArray,
    #[serde(default)]
    pub predictions: Option<LabelArray>,
}

impl BatchFile {
    /// Save batch to JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| GridError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load batch from JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| GridError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Convert pixels and label shapes into a render-ready batch.
    pub fn into_batch(self) -> Result<GridBatch> {
        let images = self
            .images
            .iter()
            .enumerate()
            .map(|(index, pixels)| {
                pixels
                    .to_image()
                    .map_err(|source| GridError::InvalidImage { index, source })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GridBatch {
            images,
            labels: self.labels.into_labels()?,
            class_names: ClassNames::new(self.class_names),
            predictions: self.predictions.map(LabelArray::into_labels).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn nested_and_flat_labels_parse() {
        let flat: LabelArray = serde_json::from_str("[0, 1, 1]").unwrap();
        let nested: LabelArray = serde_json::from_str("[[0], [1], [1]]").unwrap();
        assert_eq!(flat.into_labels().unwrap(), nested.into_labels().unwrap());
    }

    #[test]
    fn plane_and_channels_are_distinguished() {
        let plane: PixelArray = serde_json::from_str("[[0.0, 1.0]]").unwrap();
        let rgb: PixelArray = serde_json::from_str("[[[1.0, 0.0, 0.0]]]").unwrap();
        assert!(matches!(plane, PixelArray::Plane(_)));
        assert!(matches!(rgb.to_image().unwrap(), Image::Color(_)));
    }

    #[test]
    fn batch_file_save_load() {
        let original = BatchFile {
            class_names: vec!["cat".to_string(), "dog".to_string()],
            images: vec![
                PixelArray::Plane(vec![vec![0.0, 1.0], vec![1.0, 0.0]]),
                PixelArray::Plane(vec![vec![1.0, 1.0], vec![0.0, 0.0]]),
            ],
            labels: LabelArray::Nested(vec![vec![0], vec![1]]),
            predictions: Some(LabelArray::Flat(vec![1, 1])),
        };

        let temp_file = NamedTempFile::new().unwrap();
        original.save_json(temp_file.path()).unwrap();
        let loaded = BatchFile::load_json(temp_file.path()).unwrap();
        assert_eq!(loaded, original);

        let batch = loaded.into_batch().unwrap();
        assert_eq!(batch.images.len(), 2);
        assert_eq!(batch.labels.as_slice(), &[0, 1]);
        assert_eq!(batch.predictions.unwrap().as_slice(), &[1, 1]);
        assert_eq!(batch.class_names.lookup(1).unwrap(), "dog");
    }

    #[test]
    fn missing_predictions_default_to_none() {
        let json = r#"{"class_names": ["a"], "images": [[[0.5]]], "labels": [0]}"#;
        let file: BatchFile = serde_json::from_str(json).unwrap();
        assert!(file.predictions.is_none());
    }

    #[test]
    fn invalid_image_reports_index() {
        let file = BatchFile {
            class_names: vec!["a".to_string()],
            images: vec![
                PixelArray::Plane(vec![vec![0.0]]),
                PixelArray::Plane(vec![vec![0.0, 1.0], vec![1.0]]),
            ],
            labels: LabelArray::Flat(vec![0, 0]),
            predictions: None,
        };
        assert!(matches!(
            file.into_batch(),
            Err(GridError::InvalidImage {
                index: 1,
                source: PixelError::RaggedRow { row: 1, .. }
            })
        ));
    }
}
