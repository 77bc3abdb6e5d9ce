//! Exact minimum-cost perfect matching on a square matrix.
//!
//! Shortest augmenting paths with row and column potentials (the Hungarian
//! method in its `O(n^3)` form). Rows are added one at a time; each addition
//! grows a Dijkstra-like tree over the columns using reduced costs until it
//! reaches a free column, then flips the path.

use crate::cost::Encoded;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    /// `col_of_row[r]` is the column matched to row `r`.
    pub col_of_row: Vec<usize>,
    pub total: Encoded,
}

/// # Panics
///
/// Panics if the matrix is not square.
pub fn solve(costs: &[Vec<Encoded>]) -> Matching {
    let n = costs.len();
    assert!(costs.iter().all(|row| row.len() == n), "cost matrix must be square");
    if n == 0 {
        return Matching { col_of_row: Vec::new(), total: 0 };
    }

    // 1-based internally; column 0 is the virtual root of each search
    let mut u = vec![0 as Encoded; n + 1];
    let mut v = vec![0 as Encoded; n + 1];
    let mut row_of_col = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        row_of_col[0] = row;
        let mut col0 = 0;
        let mut min_reduced = vec![Encoded::MAX; n + 1];
        let mut used = vec![false; n + 1];
        loop {
            used[col0] = true;
            let row0 = row_of_col[col0];
            let mut delta = Encoded::MAX;
            let mut col1 = 0;
            for col in 1..=n {
                if used[col] {
                    continue;
                }
                let reduced = costs[row0 - 1][col - 1] - u[row0] - v[col];
                if reduced < min_reduced[col] {
                    min_reduced[col] = reduced;
                    way[col] = col0;
                }
                if min_reduced[col] < delta {
                    delta = min_reduced[col];
                    col1 = col;
                }
            }
            for col in 0..=n {
                if used[col] {
                    u[row_of_col[col]] += delta;
                    v[col] -= delta;
                } else {
                    min_reduced[col] -= delta;
                }
            }
            col0 = col1;
            if row_of_col[col0] == 0 {
                break;
            }
        }
        loop {
            let col1 = way[col0];
            row_of_col[col0] = row_of_col[col1];
            col0 = col1;
            if col0 == 0 {
                break;
            }
        }
    }

    let mut col_of_row = vec![0; n];
    for col in 1..=n {
        col_of_row[row_of_col[col] - 1] = col - 1;
    }
    let total = col_of_row.iter().enumerate().map(|(row, col)| costs[row][*col]).sum();
    Matching { col_of_row, total }
}
