//! Background-removal transforms.
//!
//! The column-windowed variants compute into a fresh buffer while reading
//! only the pre-mutation matrix, so columns can be processed in parallel.

use ndarray::parallel::prelude::*;
use ndarray::{s, Array2, Axis};

/// Adaptive background removal with window width `cols / q`.
///
/// Column `i` subtracts the per-row mean of window `[i, i+W)`, falling
/// back to the right-aligned window `[i-(cols-W), cols)` near the end.
/// Degenerate widths (`q` of zero, or larger than the trace count) leave
/// the matrix unchanged.
pub fn adaptive_background_removal(scan: Array2<f32>, q: usize) -> Array2<f32> {
    let (rows, cols) = scan.dim();
    if rows == 0 || cols == 0 || q == 0 {
        return scan;
    }
    let width = cols / q;
    if width == 0 {
        return scan;
    }

    let source = scan.view();
    let mut output = Array2::zeros((rows, cols));
    output
        .axis_iter_mut(Axis(1))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut out_col)| {
            let (start, len) = if i + width <= cols {
                (i, width)
            } else {
                (i - (cols - width), cols - i)
            };
            match source.slice(s![.., start..start + len]).mean_axis(Axis(1)) {
                Some(window_mean) => out_col.assign(&(&source.column(i) - &window_mean)),
                None => out_col.assign(&source.column(i)),
            }
        });
    output
}

/// Dynamic-window background removal restricted to `[row_start, row_end)`.
///
/// The window diameter defaults to `cols / 4` when `dw` is out of range
/// and is forced odd. Interior columns use the window centered on them;
/// edge columns use the nearest `diameter / 2` columns at that edge. Rows
/// outside the range keep their original values.
pub fn dynamic_window_background_removal(
    scan: Array2<f32>,
    dw: i32,
    row_start: i32,
    row_end: i32,
) -> Array2<f32> {
    let (rows, cols) = scan.dim();
    if rows == 0 || cols == 0 {
        return scan;
    }
    let nr = rows as i32;
    let (start_row, end_row) = if row_start < 0
        || row_start >= nr
        || row_end <= 0
        || row_end > nr
        || row_start >= row_end
    {
        (0usize, rows)
    } else {
        (row_start as usize, row_end as usize)
    };

    let quarter = (cols / 4) as i32;
    let dw = if dw <= 0 || dw >= quarter { quarter } else { dw };
    let diameter = if dw % 2 != 0 { dw } else { dw + 1 } as usize;
    let half = diameter / 2;

    let mut output = scan.clone();
    let source = scan.view();
    output
        .axis_iter_mut(Axis(1))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut out_col)| {
            let (window_start, window_end) = if i >= half && i + half < cols {
                (i - half, i + half + 1)
            } else if i < half {
                (0, half)
            } else {
                (cols - half, cols)
            };
            if let Some(window_mean) = source
                .slice(s![start_row..end_row, window_start..window_end])
                .mean_axis(Axis(1))
            {
                let column = source.slice(s![start_row..end_row, i]);
                out_col
                    .slice_mut(s![start_row..end_row])
                    .assign(&(&column - &window_mean));
            }
        });
    output
}

/// Sliding-time background removal across rows: entry (t, i) loses the
/// mean of column `i` over the rows within `window` of `t` (clamped at
/// the edges). The window is forced odd.
pub fn sliding_window_background_removal(scan: Array2<f32>, window_size: usize) -> Array2<f32> {
    let (rows, cols) = scan.dim();
    if rows == 0 || cols == 0 {
        return scan;
    }
    let window = if window_size % 2 == 0 {
        window_size + 1
    } else {
        window_size
    };
    let half = window / 2;

    let mut output = Array2::zeros((rows, cols));
    for t in 0..rows {
        let start = t.saturating_sub(half);
        let end = (t + half).min(rows - 1);
        if let Some(window_mean) = scan.slice(s![start..=end, ..]).mean_axis(Axis(0)) {
            output.row_mut(t).assign(&(&scan.row(t) - &window_mean));
        }
    }
    output
}
