//! Row dispatch for per-pixel operations.
//!
//! Every operation in this crate reads from immutable inputs and writes to
//! disjoint output rows, so rows can run on the Rayon pool without changing
//! results. With the `parallel` feature disabled the same closures run
//! serially.
//!
//! # Example
//!
//! ```rust
//! use mirage_ops::parallel::for_each_row;
//!
//! let mut data = vec![0u8; 4 * 3 * 2]; // 3x2 RGBA
//! for_each_row(&mut data, 3 * 4, |y, row| row.fill(y as u8));
//! assert_eq!(data[12], 1);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls `f(y, row)` for every `row_len`-sized row of `data`.
///
/// `row_len` must be non-zero; a trailing partial row is passed as-is.
pub fn for_each_row<F>(data: &mut [u8], row_len: usize, f: F)
where
    F: Fn(usize, &mut [u8]) + Send + Sync,
{
    debug_assert!(row_len > 0, "row length must be > 0");

    #[cfg(feature = "parallel")]
    data.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));

    #[cfg(not(feature = "parallel"))]
    data.chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

/// Maps every row of `data` to a value and collects the results in order.
///
/// Used for reductions such as the histogram, where each row produces a
/// partial result that the caller merges.
pub fn map_rows<T, F>(data: &[u8], row_len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, &[u8]) -> T + Send + Sync,
{
    debug_assert!(row_len > 0, "row length must be > 0");

    #[cfg(feature = "parallel")]
    let out = data
        .par_chunks(row_len)
        .enumerate()
        .map(|(y, row)| f(y, row))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let out = data
        .chunks(row_len)
        .enumerate()
        .map(|(y, row)| f(y, row))
        .collect();

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_disjoint() {
        let mut data = vec![0u8; 16 * 4 * 9];
        for_each_row(&mut data, 16 * 4, |y, row| {
            for v in row.iter_mut() {
                *v = y as u8;
            }
        });
        for (y, row) in data.chunks(16 * 4).enumerate() {
            assert!(row.iter().all(|&v| v == y as u8));
        }
    }

    #[test]
    fn test_map_rows_keeps_order() {
        let data: Vec<u8> = (0..40).collect();
        let firsts = map_rows(&data, 8, |_, row| row[0]);
        assert_eq!(firsts, vec![0, 8, 16, 24, 32]);
    }
}
