/// A row-major 2-D block of `f32` pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatImage {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl FloatImage {
    pub(crate) fn new(rows: usize, cols: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    pub(crate) fn empty() -> Self {
        Self::new(0, 0, Vec::new())
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether the image holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixel at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// One full row.
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.data.get(start..start + self.cols)
    }

    /// All pixels in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
