use crate::error::{GridError, Result};
use crate::pixels::Image;

/// Rank-1 batch of class indices, one per image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Labels(Vec<usize>);

impl Labels {
    pub fn new(values: Vec<usize>) -> Self {
        Self(values)
    }

    /// Flatten an N×1 label column into rank-1 form.
    ///
    /// Rows with anything other than exactly one value are rejected.
    pub fn squeeze<R: AsRef<[usize]>>(rows: &[R]) -> Result<Self> {
        rows.iter()
            .enumerate()
            .map(|(row, values)| match values.as_ref() {
                [value] => Ok(*value),
                other => Err(GridError::NotSingleton {
                    row,
                    len: other.len(),
                }),
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<usize> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for Labels {
    fn from(values: Vec<usize>) -> Self {
        Self(values)
    }
}

/// Lookup table from label index to display name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassNames(Vec<String>);

impl ClassNames {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Resolve a label to its class name.
    pub fn lookup(&self, label: usize) -> Result<&str> {
        self.0
            .get(label)
            .map(String::as_str)
            .ok_or(GridError::LabelOutOfRange {
                label,
                classes: self.0.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Everything one grid render needs, already in canonical shape.
#[derive(Debug, Clone, PartialEq)]
pub struct GridBatch {
    pub images: Vec<Image>,
    pub labels: Labels,
    pub class_names: ClassNames,
    pub predictions: Option<Labels>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squeeze_flattens_column() {
        let nested = vec![vec![0], vec![1], vec![1]];
        assert_eq!(Labels::squeeze(&nested).unwrap(), Labels::new(vec![0, 1, 1]));

        let arrays = [[2usize], [0]];
        assert_eq!(Labels::squeeze(&arrays).unwrap().as_slice(), &[2, 0]);
    }

    #[test]
    fn squeeze_rejects_wide_rows() {
        let nested = vec![vec![0], vec![1, 2]];
        match Labels::squeeze(&nested) {
            Err(GridError::NotSingleton { row, len }) => {
                assert_eq!(row, 1);
                assert_eq!(len, 2);
            }
            other => panic!("expected NotSingleton, got {:?}", other),
        }
        assert!(Labels::squeeze(&[Vec::<usize>::new()]).is_err());
    }

    #[test]
    fn lookup_is_checked() {
        let names = ClassNames::new(["cat", "dog"]);
        assert_eq!(names.lookup(1).unwrap(), "dog");
        assert!(matches!(
            names.lookup(2),
            Err(GridError::LabelOutOfRange { label: 2, classes: 2 })
        ));
    }
}
