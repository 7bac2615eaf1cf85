use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ndarray::Array1;

use featsel_helpers::{DataPoint, Dataset, DatasetError};

/// Errors raised while reading a dataset file.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    /// A token is not a real number.
    Parse { line: usize, token: String },
    /// The class label is not a finite integral value.
    InvalidLabel { line: usize, value: f64 },
    /// A row has a different number of columns than the first row.
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// The input holds no rows.
    Empty,
    Dataset(DatasetError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "Unable to read dataset: {}", e),
            LoadError::Parse { line, token } => {
                write!(f, "Line {}: '{}' is not a number", line, token)
            }
            LoadError::InvalidLabel { line, value } => {
                write!(f, "Line {}: class label {} is not an integer", line, value)
            }
            LoadError::RaggedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "Line {}: expected {} columns, found {}",
                line, expected, found
            ),
            LoadError::Empty => write!(f, "Dataset contains no rows"),
            LoadError::Dataset(e) => write!(f, "{}", e),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Dataset(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

/// Reads a dataset of whitespace-separated rows from `path`.
/// See [`parse_dataset`] for the format.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset<i64, f64>, LoadError> {
    let file = File::open(path.as_ref())?;
    let dataset = parse_dataset(BufReader::new(file))?;
    log::info!(
        "Loaded {} instances with {} features from {}",
        dataset.n_instances(),
        dataset.n_features(),
        path.as_ref().display()
    );
    Ok(dataset)
}

/// Parses rows of whitespace-separated reals. Column 0 of each row is the
/// integral class label, the remaining columns are the features. Blank lines
/// are skipped and every row must have the same number of columns.
pub fn parse_dataset<R: BufRead>(reader: R) -> Result<Dataset<i64, f64>, LoadError> {
    let mut points = Vec::new();
    let mut n_columns: Option<usize> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let values = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| LoadError::Parse {
                    line: line_no,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, LoadError>>()?;
        if values.is_empty() {
            continue;
        }

        let expected = *n_columns.get_or_insert(values.len());
        if values.len() != expected {
            return Err(LoadError::RaggedRow {
                line: line_no,
                expected,
                found: values.len(),
            });
        }

        let label = to_label(values[0]).ok_or(LoadError::InvalidLabel {
            line: line_no,
            value: values[0],
        })?;
        points.push(DataPoint::new(Array1::from(values[1..].to_vec()), label));
    }

    if points.is_empty() {
        return Err(LoadError::Empty);
    }
    Dataset::new(points).map_err(LoadError::Dataset)
}

fn to_label(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value <= i64::MAX as f64;
    if value.is_finite() && value.fract() == 0.0 && in_range {
        Some(value as i64)
    } else {
        None
    }
}
