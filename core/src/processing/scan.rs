use ndarray::Array2;

use crate::processing::pipeline;
use crate::telemetry::log::LogManager;

/// Which axis of the volume was fixed to produce the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    /// Channel fixed: rows = samples, columns = slices.
    BScan,
    /// Depth fixed: rows = channels, columns = slices.
    CScan,
    /// Slice fixed: rows = samples, columns = channels.
    TScan,
}

/// A working 2-D slice of the radar volume.
///
/// The pristine copy is kept untouched; every macro application starts
/// from it, so chains never accumulate state across invocations. Single
/// owner, single writer: callers serialize concurrent applications.
#[derive(Debug, Clone)]
pub struct Scan {
    kind: ScanKind,
    pristine: Array2<f32>,
    current: Array2<f32>,
}

impl Scan {
    pub fn new(matrix: Array2<f32>, kind: ScanKind) -> Self {
        Self {
            kind,
            current: matrix.clone(),
            pristine: matrix,
        }
    }

    pub fn kind(&self) -> ScanKind {
        self.kind
    }

    pub fn matrix(&self) -> &Array2<f32> {
        &self.current
    }

    pub fn pristine(&self) -> &Array2<f32> {
        &self.pristine
    }

    pub fn rows(&self) -> usize {
        self.current.nrows()
    }

    pub fn cols(&self) -> usize {
        self.current.ncols()
    }

    /// Restores the working matrix to the pristine extracted slice.
    pub fn reset(&mut self) {
        self.current = self.pristine.clone();
    }

    /// Resets to the pristine slice, then applies the parsed macro chain
    /// in order, moving the working matrix through each operation.
    pub fn apply_macro(&mut self, text: &str) -> &Array2<f32> {
        self.reset();
        if text.is_empty() {
            return &self.current;
        }
        let ops = pipeline::parse_macro(text);
        for op in &ops {
            let working = std::mem::replace(&mut self.current, Array2::zeros((0, 0)));
            self.current = op.apply(working);
        }
        LogManager::new().record(&format!("applied {} macro operation(s)", ops.len()));
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample_scan() -> Scan {
        Scan::new(
            array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0], [7.0, 8.0]],
            ScanKind::BScan,
        )
    }

    #[test]
    fn empty_macro_restores_the_pristine_slice() {
        let mut scan = sample_scan();
        scan.apply_macro("DW_0/");
        assert_ne!(scan.matrix(), scan.pristine());
        scan.apply_macro("");
        assert_eq!(scan.matrix(), scan.pristine());
    }

    #[test]
    fn identical_macros_yield_bit_identical_results() {
        let mut scan = sample_scan();
        let first = scan.apply_macro("DW_0/EG_2,5/").clone();
        let second = scan.apply_macro("DW_0/EG_2,5/").clone();
        assert_eq!(first, second);
    }

    #[test]
    fn each_application_starts_from_pristine() {
        let mut scan = sample_scan();
        let chained_once = scan.apply_macro("DW_0/").clone();
        // a second application of the same chain must not stack
        let chained_twice = scan.apply_macro("DW_0/").clone();
        assert_eq!(chained_once, chained_twice);
    }

    #[test]
    fn unknown_operations_leave_the_scan_pristine() {
        let mut scan = sample_scan();
        scan.apply_macro("NOPE_1,2/");
        assert_eq!(scan.matrix(), scan.pristine());
    }

    #[test]
    fn kind_is_preserved() {
        assert_eq!(sample_scan().kind(), ScanKind::BScan);
    }
}
