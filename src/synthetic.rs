use image::{ImageBuffer, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::batch::{ClassNames, GridBatch, Labels};
use crate::error::{GridError, Result};
use crate::pixels::Image;

const SIDE: u32 = 28;
const NOISE: f32 = 0.15;
/// Chance that a synthetic prediction disagrees with its label.
const MISTAKE_RATE: f64 = 0.25;

/// Deterministic batch of striped intensity images for demos and tests.
///
/// Each class gets its own stripe angle, so a glance at the grid shows
/// whether captions line up with the pictures. At least one class name is
/// required.
pub fn synthetic_batch(
    count: usize,
    class_names: &[&str],
    seed: u64,
    with_predictions: bool,
) -> Result<GridBatch> {
    if class_names.is_empty() {
        return Err(GridError::NoClassNames);
    }
    let classes = class_names.len();
    let mut rng = StdRng::seed_from_u64(seed);

    let labels: Vec<usize> = (0..count).map(|_| rng.gen_range(0..classes)).collect();
    let images = labels
        .iter()
        .map(|&label| striped_image(label, classes, &mut rng))
        .collect();

    let predictions = with_predictions.then(|| {
        let predicted = labels
            .iter()
            .map(|&label| {
                if rng.gen_bool(MISTAKE_RATE) {
                    rng.gen_range(0..classes)
                } else {
                    label
                }
            })
            .collect();
        Labels::new(predicted)
    });

    Ok(GridBatch {
        images,
        labels: Labels::new(labels),
        class_names: ClassNames::new(class_names.iter().copied()),
        predictions,
    })
}

fn striped_image(label: usize, classes: usize, rng: &mut StdRng) -> Image {
    let angle = std::f32::consts::PI * label as f32 / classes as f32;
    let (sin, cos) = angle.sin_cos();
    Image::Intensity(ImageBuffer::from_fn(SIDE, SIDE, |x, y| {
        let phase = (x as f32 * cos + y as f32 * sin) * 0.5;
        Luma([0.5 + 0.5 * phase.sin() + rng.gen_range(-NOISE..NOISE)])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_batch() {
        let a = synthetic_batch(6, &["cat", "dog", "bird"], 7, true).unwrap();
        let b = synthetic_batch(6, &["cat", "dog", "bird"], 7, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn labels_and_predictions_stay_in_range() {
        let batch = synthetic_batch(9, &["cat", "dog"], 42, true).unwrap();
        assert_eq!(batch.images.len(), 9);
        assert_eq!(batch.labels.len(), 9);
        let predictions = batch.predictions.as_ref().unwrap();
        assert_eq!(predictions.len(), 9);
        for &label in batch.labels.as_slice().iter().chain(predictions.as_slice()) {
            assert!(batch.class_names.lookup(label).is_ok());
        }
        assert_eq!(batch.images[0].dimensions(), (28, 28));
    }

    #[test]
    fn predictions_are_optional() {
        let batch = synthetic_batch(3, &["cat"], 1, false).unwrap();
        assert!(batch.predictions.is_none());
        assert_eq!(batch.labels.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn empty_class_table_is_rejected() {
        assert!(matches!(
            synthetic_batch(4, &[], 42, true),
            Err(GridError::NoClassNames)
        ));
    }
}
