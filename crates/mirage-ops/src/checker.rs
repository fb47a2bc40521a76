//! Checkerboard compositing.
//!
//! Interleaves two equally sized layers cell by cell. Every output pixel is
//! an exact copy (all four channels) of the same coordinate in layer A or
//! layer B; nothing is blended.
//!
//! # Example
//!
//! ```rust
//! use mirage_core::{GridSpec, PixelBuffer};
//! use mirage_ops::checker::compose;
//!
//! let a = PixelBuffer::filled(4, 4, [200, 0, 0, 255]).unwrap();
//! let b = PixelBuffer::filled(4, 4, [0, 0, 200, 255]).unwrap();
//! let out = compose(a, &b, &GridSpec::default()).unwrap();
//! assert_eq!(out.pixel(0, 0), [200, 0, 0, 255]);
//! assert_eq!(out.pixel(1, 0), [0, 0, 200, 255]);
//! ```

use mirage_core::{Error, GridSpec, PixelBuffer};
use tracing::debug;

use crate::OpsResult;
use crate::parallel::for_each_row;

/// Composites `layer_b` into `layer_a` on the grid.
///
/// Layer A supplies every pixel whose cell has the grid's parity; the rest
/// come from layer B. `layer_a` is consumed and reused as the output.
///
/// # Errors
///
/// - invalid grid if `grid.cell_size == 0`
/// - dimension mismatch if the layers differ in size
pub fn compose(mut layer_a: PixelBuffer, layer_b: &PixelBuffer, grid: &GridSpec) -> OpsResult<PixelBuffer> {
    grid.validate()?;
    if !layer_a.same_size(layer_b) {
        return Err(Error::dimension_mismatch(layer_a.dimensions(), layer_b.dimensions()).into());
    }

    debug!(
        width = layer_a.width(),
        height = layer_a.height(),
        cell_size = grid.cell_size,
        parity = %grid.parity,
        "compose"
    );

    let row_len = layer_a.row_len();
    let width = layer_a.width();
    let b = layer_b.data();
    for_each_row(layer_a.data_mut(), row_len, |y, row| {
        let src = &b[y * row_len..(y + 1) * row_len];
        let y = y as u32;
        // Walk the row in runs of one cell so each run is a single copy.
        let mut x = 0u32;
        while x < width {
            let run_end = ((x / grid.cell_size + 1).saturating_mul(grid.cell_size)).min(width);
            if !grid.is_layer_a(x, y) {
                let (s, e) = (x as usize * 4, run_end as usize * 4);
                row[s..e].copy_from_slice(&src[s..e]);
            }
            x = run_end;
        }
    });

    Ok(layer_a)
}

/// Composites without consuming either layer.
pub fn composed(layer_a: &PixelBuffer, layer_b: &PixelBuffer, grid: &GridSpec) -> OpsResult<PixelBuffer> {
    compose(layer_a.clone(), layer_b, grid)
}
