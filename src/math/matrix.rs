use rand::prelude::*;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Dense row-major matrix. Vectors are stored as single-column matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    pub fn ones(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![1.0; cols]; rows]
        }
    }

    /// Builds an `n × 1` column vector.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect()
        }
    }

    /// Uniform samples in [-1.0, 1.0] drawn from the thread-local RNG.
    pub fn random(rows: usize, cols: usize) -> Matrix {
        Matrix::random_with(rows, cols, &mut rand::thread_rng())
    }

    /// Uniform samples in [-1.0, 1.0], each entry drawn independently from `rng`.
    pub fn random_with<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen_range(-1.0..=1.0);
            }
        }

        res
    }

    /// Wraps row data. Fails when there are no rows, no columns, or the rows are ragged.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |row| row.len());
        if rows == 0 || cols == 0 {
            return Err(Error::Config("matrix must have at least one row and one column".into()));
        }
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(Error::shape("from_data", (rows, cols), (1, bad.len())));
        }

        Ok(Matrix { rows, cols, data })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True when `data` really is `rows × cols`.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|row| row.len() == self.cols)
    }

    /// Shape `data` actually has, reporting the first ragged row's length as columns.
    pub fn data_shape(&self) -> (usize, usize) {
        let cols = self.data.iter()
            .map(|row| row.len())
            .find(|&len| len != self.cols)
            .unwrap_or(self.cols);
        (self.data.len(), cols)
    }

    /// Fails with a shape mismatch when `data` disagrees with `rows × cols`.
    pub fn check_consistent(&self, operation: &'static str) -> Result<()> {
        if !self.is_consistent() {
            return Err(Error::shape(operation, self.shape(), self.data_shape()));
        }
        Ok(())
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect()
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Row-major flattening.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().flatten().copied().collect()
    }

    /// Matrix product `self · rhs`.
    pub fn dot(&self, rhs: &Matrix) -> Result<Matrix> {
        self.check_consistent("dot")?;
        rhs.check_consistent("dot")?;
        if self.cols != rhs.rows {
            return Err(Error::shape("dot", self.shape(), rhs.shape()));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "hadamard", |a, b| a * b)
    }

    pub fn checked_add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "add", |a, b| a + b)
    }

    pub fn checked_sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "sub", |a, b| a - b)
    }

    /// In-place `self -= rhs`.
    pub fn sub_assign(&mut self, rhs: &Matrix) -> Result<()> {
        self.check_consistent("sub_assign")?;
        rhs.check_consistent("sub_assign")?;
        if self.shape() != rhs.shape() {
            return Err(Error::shape("sub_assign", self.shape(), rhs.shape()));
        }

        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, y) in row.iter_mut().zip(rhs_row.iter()) {
                *x -= y;
            }
        }

        Ok(())
    }

    fn zip_with<F>(&self, rhs: &Matrix, operation: &'static str, functor: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.check_consistent(operation)?;
        rhs.check_consistent(operation)?;
        if self.shape() != rhs.shape() {
            return Err(Error::shape(operation, self.shape(), rhs.shape()));
        }

        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(&a, &b)| functor(a, b)).collect()
            })
            .collect();

        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}
