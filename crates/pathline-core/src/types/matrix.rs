//! Symmetric pairwise distance matrix.

/// Square symmetric matrix of pairwise pathway distances in `[0, 1]`
/// with a zero diagonal. Stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            values: vec![0.0; n * n],
        }
    }

    /// Rebuild from a flat row-major buffer. `None` unless the buffer
    /// holds exactly `n * n` values.
    pub fn from_values(n: usize, values: Vec<f64>) -> Option<Self> {
        if values.len() != n * n {
            return None;
        }
        Some(Self { n, values })
    }

    /// Number of pathways (one row/column each).
    pub fn size(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Set both `(i, j)` and `(j, i)`.
    pub fn set_symmetric(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.n + j] = value;
        self.values[j * self.n + i] = value;
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Upper-triangle condensed form: `(0,1), (0,2), .., (n-2,n-1)`.
    /// The input layout hierarchical linkage consumes.
    pub fn condensed(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.n * (self.n.saturating_sub(1)) / 2);
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                out.push(self.get(i, j));
            }
        }
        out
    }

    pub fn is_symmetric(&self, eps: f64) -> bool {
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                if (self.get(i, j) - self.get(j, i)).abs() > eps {
                    return false;
                }
            }
        }
        true
    }
}
