use ndarray::{s, Array2, Axis};

/// Subtracts each column's mean from the column, removing the per-trace
/// DC/low-frequency offset.
pub fn dewow(mut scan: Array2<f32>) -> Array2<f32> {
    let column_means = match scan.mean_axis(Axis(0)) {
        Some(means) => means,
        None => return scan,
    };
    scan -= &column_means;
    scan
}

/// Shifts all rows down (`shift > 0`) or up (`shift < 0`) by `|shift|`
/// positions, zero-filling the vacated rows. A shift of zero is a no-op;
/// a shift larger than the matrix leaves nothing but fill.
pub fn start_time_shift(scan: Array2<f32>, shift: i32) -> Array2<f32> {
    if shift == 0 {
        return scan;
    }
    let rows = scan.nrows();
    let magnitude = shift.unsigned_abs() as usize;
    let mut shifted = Array2::zeros(scan.raw_dim());
    if magnitude >= rows {
        return shifted;
    }
    if shift > 0 {
        shifted
            .slice_mut(s![magnitude.., ..])
            .assign(&scan.slice(s![..rows - magnitude, ..]));
    } else {
        shifted
            .slice_mut(s![..rows - magnitude, ..])
            .assign(&scan.slice(s![magnitude.., ..]));
    }
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn dewow_zeroes_every_column_mean() {
        let scan = array![[1.0, 10.0], [3.0, 20.0], [5.0, 60.0]];
        let result = dewow(scan);
        let means = result.mean_axis(Axis(0)).unwrap();
        for mean in means.iter() {
            assert!(mean.abs() < 1e-6);
        }
    }

    #[test]
    fn dewow_leaves_zero_mean_input_unchanged() {
        let scan = array![[1.0, -2.0], [-1.0, 2.0]];
        let result = dewow(scan.clone());
        assert_eq!(result, scan);
    }

    #[test]
    fn positive_shift_moves_rows_down_with_zero_fill() {
        let scan = array![[1.0], [2.0], [3.0], [4.0]];
        let result = start_time_shift(scan, 2);
        assert_eq!(result, array![[0.0], [0.0], [1.0], [2.0]]);
    }

    #[test]
    fn negative_shift_moves_rows_up_with_zero_fill() {
        let scan = array![[1.0], [2.0], [3.0], [4.0]];
        let result = start_time_shift(scan, -1);
        assert_eq!(result, array![[2.0], [3.0], [4.0], [0.0]]);
    }

    #[test]
    fn zero_shift_is_a_no_op() {
        let scan = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(start_time_shift(scan.clone(), 0), scan);
    }

    #[test]
    fn oversized_shift_clears_the_matrix() {
        let scan = array![[1.0], [2.0]];
        let result = start_time_shift(scan, 5);
        assert!(result.iter().all(|&v| v == 0.0));
    }
}
