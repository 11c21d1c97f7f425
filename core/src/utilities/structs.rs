use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

use crate::utilities::error::{InvalidParam, KMeansError, Result};

pub const DEFAULT_MAX_ITER: usize = 200;
pub const MAX_ITER_LIMIT: usize = 1000;
pub const DEFAULT_EPSILON: f64 = 0.001;

/// Dense row-major matrix. Points and centroids share this layout; the
/// shape is checked once here so the hot loops can index without checks.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

fn reserve(values: usize) -> Result<Vec<f64>> {
    let mut v = Vec::new();
    v.try_reserve_exact(values)
        .map_err(|_| KMeansError::ResourceExhaustion { values })?;
    Ok(v)
}

fn checked_len(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols)
        .ok_or(KMeansError::ResourceExhaustion { values: usize::MAX })
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        if cols == 0 {
            return Err(InvalidParam::Dimension.into());
        }
        let len = checked_len(rows, cols)?;
        let mut data = reserve(len)?;
        data.resize(len, 0.0);
        Ok(Self { rows, cols, data })
    }

    pub fn from_flat(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        if cols == 0 {
            return Err(InvalidParam::Dimension.into());
        }
        let len = checked_len(rows, cols)?;
        if data.len() != len {
            return Err(KMeansError::malformed(
                0,
                format!("expected {rows}x{cols} values, found {}", data.len()),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn from_slice(values: &[f64], rows: usize, cols: usize) -> Result<Self> {
        let mut data = reserve(values.len())?;
        data.extend_from_slice(values);
        Self::from_flat(data, rows, cols)
    }

    /// Builds a matrix from nested rows. Row numbers in errors are 1-based.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(InvalidParam::Points.into());
        };
        let cols = first.len();
        let mut data = reserve(checked_len(rows.len(), cols)?)?;
        for (i, r) in rows.iter().enumerate() {
            if r.len() != cols {
                return Err(KMeansError::malformed(
                    i + 1,
                    format!("expected {cols} values, found {}", r.len()),
                ));
            }
            data.extend_from_slice(r);
        }
        Self::from_flat(data, rows.len(), cols)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.data.chunks_exact(self.cols)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copy of the first `k` rows.
    pub fn head(&self, k: usize) -> Result<Self> {
        if k > self.rows {
            return Err(InvalidParam::Clusters.into());
        }
        Self::from_slice(&self.data[..k * self.cols], k, self.cols)
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(|r| r.to_vec()).collect()
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(self.rows))?;
        for r in self.iter_rows() {
            seq.serialize_element(r)?;
        }
        seq.end()
    }
}

/// When the driver considers the centroids settled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopPolicy {
    /// Largest centroid movement of the last iteration is below `epsilon`.
    #[default]
    Threshold,
    /// Every centroid moved at most `epsilon` against the previous
    /// iteration's snapshot. With `epsilon == 0.0` the centroids must be
    /// bit-identical.
    Stable,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansOptions {
    pub max_iter: usize,
    pub epsilon: f64,
    pub stop: StopPolicy,
    pub cores: usize,
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
            epsilon: DEFAULT_EPSILON,
            stop: StopPolicy::Threshold,
            cores: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Running,
    Converged,
    Exhausted,
}
