//! Dense cost matrix.

use crate::error::{Result, SwarmError};

/// An immutable n×n cost matrix stored in row-major order.
///
/// Location 0 is the depot. Costs must be finite and non-negative; the
/// diagonal is never read by the solver, so any finite non-negative value
/// (often a large sentinel) is accepted there.
///
/// # Examples
///
/// ```
/// use u_swarm_tsp::cost::CostMatrix;
///
/// let cm = CostMatrix::from_rows(vec![
///     vec![0.0, 2.0, 9.0],
///     vec![2.0, 0.0, 6.0],
///     vec![9.0, 6.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(cm.size(), 3);
/// assert_eq!(cm.get(1, 2), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    data: Vec<f64>,
    size: usize,
}

impl CostMatrix {
    /// Creates a cost matrix from an explicit row-major grid.
    ///
    /// Returns [`SwarmError::InvalidMatrix`] if the data length doesn't match
    /// `size * size` or any entry is negative or non-finite.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != size * size {
            return Err(SwarmError::InvalidMatrix(format!(
                "expected {} entries for size {size}, got {}",
                size * size,
                data.len()
            )));
        }
        if let Some(pos) = data.iter().position(|c| !c.is_finite() || *c < 0.0) {
            return Err(SwarmError::InvalidMatrix(format!(
                "entry ({}, {}) = {} is not a finite non-negative cost",
                pos / size,
                pos % size,
                data[pos]
            )));
        }
        Ok(Self { data, size })
    }

    /// Creates a cost matrix from nested rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        if let Some(i) = rows.iter().position(|r| r.len() != size) {
            return Err(SwarmError::InvalidMatrix(format!(
                "row {i} has {} entries, expected {size}",
                rows[i].len()
            )));
        }
        Self::from_data(size, rows.into_iter().flatten().collect())
    }

    /// Creates a cost matrix by evaluating `f(from, to)` for every cell.
    pub fn from_fn<F>(size: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                data.push(f(i, j));
            }
        }
        Self::from_data(size, data)
    }

    /// Returns the cost of travelling from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of locations, depot included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}
