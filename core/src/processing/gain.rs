use ndarray::{Array1, Array2, Axis};

/// Depth-dependent exponential gain.
///
/// Builds `t = linspace(start^(1/exp), end^(1/exp), rows)` and multiplies
/// every entry of row `r` by `scale * t[r]^exp`.
pub fn exponential_gain(
    mut scan: Array2<f32>,
    scale: f64,
    exponent: f64,
    start_time: f64,
    end_time: f64,
) -> Array2<f32> {
    let rows = scan.nrows();
    if rows == 0 {
        return scan;
    }
    let t0 = start_time.powf(1.0 / exponent) as f32;
    let t1 = end_time.powf(1.0 / exponent) as f32;
    let times = Array1::linspace(t0, t1, rows);
    let gains = times.mapv(|t| scale as f32 * t.powf(exponent as f32));
    for (mut row, gain) in scan.axis_iter_mut(Axis(0)).zip(gains.iter()) {
        row *= *gain;
    }
    scan
}

/// Z-scores the whole matrix; an all-equal matrix becomes all zeros.
pub fn standardize_global(mut scan: Array2<f32>) -> Array2<f32> {
    let count = scan.len();
    if count == 0 {
        return scan;
    }
    let mean = scan.sum() / count as f32;
    let variance = scan.iter().map(|&v| (v - mean) * (v - mean)).sum::<f32>() / count as f32;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        scan.fill(0.0);
    } else {
        scan.mapv_inplace(|v| (v - mean) / std_dev);
    }
    scan
}

/// Z-scores each row independently; zero-spread rows become all zeros.
pub fn standardize_by_row(mut scan: Array2<f32>) -> Array2<f32> {
    let cols = scan.ncols();
    if cols == 0 {
        return scan;
    }
    for mut row in scan.axis_iter_mut(Axis(0)) {
        let mean = row.sum() / cols as f32;
        let variance = row.iter().map(|&v| (v - mean) * (v - mean)).sum::<f32>() / cols as f32;
        let std_dev = variance.sqrt();
        if std_dev == 0.0 {
            row.fill(0.0);
        } else {
            row.mapv_inplace(|v| (v - mean) / std_dev);
        }
    }
    scan
}
