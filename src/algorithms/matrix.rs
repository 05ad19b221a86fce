//! Grid traversal orders. Each order visits every cell exactly once.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::trace::{Recorder, Step, Trace};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Rectangular grid of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<i64>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<i64>>,
}

impl Matrix {
    pub fn new(cells: Vec<Vec<i64>>) -> Result<Self, MatrixError> {
        let cols = cells.first().map_or(0, Vec::len);
        if let Some((row, found)) = cells
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(MatrixError::Ragged {
                row,
                expected: cols,
                found,
            });
        }
        Ok(Self {
            rows: if cols == 0 { 0 } else { cells.len() },
            cols,
            cells,
        })
    }

    /// `rows x cols` grid filled with 1, 2, 3, ... in row-major order.
    pub fn sequential(rows: usize, cols: usize) -> Self {
        let cells = (0..rows)
            .map(|r| (0..cols).map(|c| (r * cols + c + 1) as i64).collect())
            .collect();
        Self {
            rows: if cols == 0 { 0 } else { rows },
            cols: if rows == 0 { 0 } else { cols },
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        self.cells.get(row)?.get(col).copied()
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

impl TryFrom<Vec<Vec<i64>>> for Matrix {
    type Error = MatrixError;

    fn try_from(cells: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        Matrix::new(cells)
    }
}

impl From<Matrix> for Vec<Vec<i64>> {
    fn from(matrix: Matrix) -> Self {
        matrix.cells
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatrixOrder {
    RowMajor,
    ColumnMajor,
    Diagonal,
    AntiDiagonal,
    Spiral,
    Zigzag,
}

impl MatrixOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            MatrixOrder::RowMajor => "row-major",
            MatrixOrder::ColumnMajor => "column-major",
            MatrixOrder::Diagonal => "diagonal",
            MatrixOrder::AntiDiagonal => "anti-diagonal",
            MatrixOrder::Spiral => "spiral",
            MatrixOrder::Zigzag => "zigzag",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixStepKind {
    Init,
    Visit,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixStep {
    pub kind: MatrixStepKind,
    pub message: String,
    pub cell: Option<(usize, usize)>,
    pub value: Option<i64>,
    /// Cells visited so far, in order.
    pub visited: Vec<(usize, usize)>,
}

impl Step for MatrixStep {
    fn kind(&self) -> &'static str {
        match self.kind {
            MatrixStepKind::Init => "init",
            MatrixStepKind::Visit => "visit",
            MatrixStepKind::Complete => "complete",
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

struct Sweep<'m> {
    matrix: &'m Matrix,
    visited: Vec<(usize, usize)>,
    rec: Recorder<MatrixStep>,
}

impl Sweep<'_> {
    fn visit(&mut self, row: usize, col: usize, note: &str) {
        let value = self.matrix.cells[row][col];
        self.visited.push((row, col));
        self.rec.emit(MatrixStep {
            kind: MatrixStepKind::Visit,
            message: format!("Visit ({row}, {col}) = {value}{note}"),
            cell: Some((row, col)),
            value: Some(value),
            visited: self.visited.clone(),
        });
    }
}

/// Visit every cell of `matrix` in `order`.
pub fn traverse(matrix: &Matrix, order: MatrixOrder) -> Trace<MatrixStep> {
    let mut sweep = Sweep {
        matrix,
        visited: Vec::with_capacity(matrix.cell_count()),
        rec: Recorder::new("matrix"),
    };
    sweep.rec.emit(MatrixStep {
        kind: MatrixStepKind::Init,
        message: format!(
            "{} traversal of a {}x{} grid",
            order.as_str(),
            matrix.rows(),
            matrix.cols()
        ),
        cell: None,
        value: None,
        visited: Vec::new(),
    });

    if matrix.cell_count() > 0 {
        match order {
            MatrixOrder::RowMajor => row_major(&mut sweep),
            MatrixOrder::ColumnMajor => column_major(&mut sweep),
            MatrixOrder::Diagonal => diagonal(&mut sweep),
            MatrixOrder::AntiDiagonal => anti_diagonal(&mut sweep),
            MatrixOrder::Spiral => spiral(&mut sweep),
            MatrixOrder::Zigzag => zigzag(&mut sweep),
        }
    }

    let count = sweep.visited.len();
    sweep.rec.emit(MatrixStep {
        kind: MatrixStepKind::Complete,
        message: format!("{} traversal visited {count} cells", order.as_str()),
        cell: None,
        value: None,
        visited: sweep.visited,
    });
    sweep.rec.finish()
}

fn row_major(sweep: &mut Sweep<'_>) {
    let (rows, cols) = (sweep.matrix.rows(), sweep.matrix.cols());
    for i in 0..rows {
        for j in 0..cols {
            sweep.visit(i, j, "");
        }
    }
}

fn column_major(sweep: &mut Sweep<'_>) {
    let (rows, cols) = (sweep.matrix.rows(), sweep.matrix.cols());
    for j in 0..cols {
        for i in 0..rows {
            sweep.visit(i, j, "");
        }
    }
}

/// Diagonals `i + j = d`, each walked down-left from its top cell.
fn diagonal(sweep: &mut Sweep<'_>) {
    let (rows, cols) = (sweep.matrix.rows(), sweep.matrix.cols());
    for d in 0..=rows + cols - 2 {
        let mut i = d.saturating_sub(cols - 1);
        let mut j = d - i;
        let note = format!(" on diagonal {d}");
        loop {
            sweep.visit(i, j, &note);
            if i + 1 >= rows || j == 0 {
                break;
            }
            i += 1;
            j -= 1;
        }
    }
}

/// Diagonals `j - i = d - (rows - 1)`, from the bottom-left corner to the
/// top-right, each walked down-right.
fn anti_diagonal(sweep: &mut Sweep<'_>) {
    let (rows, cols) = (sweep.matrix.rows(), sweep.matrix.cols());
    for d in 0..=rows + cols - 2 {
        let mut i = (rows - 1).saturating_sub(d);
        let mut j = d.saturating_sub(rows - 1);
        let note = format!(" on anti-diagonal {d}");
        loop {
            sweep.visit(i, j, &note);
            if i + 1 >= rows || j + 1 >= cols {
                break;
            }
            i += 1;
            j += 1;
        }
    }
}

fn spiral(sweep: &mut Sweep<'_>) {
    let (rows, cols) = (sweep.matrix.rows(), sweep.matrix.cols());
    // Signed bounds so that `bottom`/`right` may cross below zero.
    let (mut top, mut bottom) = (0isize, rows as isize - 1);
    let (mut left, mut right) = (0isize, cols as isize - 1);

    while top <= bottom && left <= right {
        for j in left..=right {
            sweep.visit(top as usize, j as usize, " (right)");
        }
        top += 1;

        for i in top..=bottom {
            sweep.visit(i as usize, right as usize, " (down)");
        }
        right -= 1;

        if top <= bottom {
            for j in (left..=right).rev() {
                sweep.visit(bottom as usize, j as usize, " (left)");
            }
            bottom -= 1;
        }

        if left <= right {
            for i in (top..=bottom).rev() {
                sweep.visit(i as usize, left as usize, " (up)");
            }
            left += 1;
        }
    }
}

fn zigzag(sweep: &mut Sweep<'_>) {
    let (rows, cols) = (sweep.matrix.rows(), sweep.matrix.cols());
    for i in 0..rows {
        if i % 2 == 0 {
            for j in 0..cols {
                sweep.visit(i, j, " (left to right)");
            }
        } else {
            for j in (0..cols).rev() {
                sweep.visit(i, j, " (right to left)");
            }
        }
    }
}
