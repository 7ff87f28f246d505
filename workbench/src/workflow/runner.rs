use crate::workflow::config::{ViewKind, WorkflowConfig};
use anyhow::Context;
use ogprcore::math::StatsHelper;
use ogprcore::telemetry::MetricsRecorder;
use ogprcore::{decode_path, Scan, ScanKind};
use std::path::Path;

/// Summary of one decode-extract-process pass.
pub struct WorkflowResult {
    pub kind: ScanKind,
    pub rows: usize,
    pub cols: usize,
    pub mean: f32,
    pub std_dev: f32,
    pub rms: f32,
    pub max_position_m: f32,
    pub max_depth_cm: f32,
    pub channel_count: usize,
    pub geolocation_count: usize,
}

pub struct Runner {
    config: WorkflowConfig,
    metrics: MetricsRecorder,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn execute(&self, path: &Path) -> anyhow::Result<WorkflowResult> {
        let result = self.run(path);
        match &result {
            Ok(_) => self.metrics.record_processed(),
            Err(_) => self.metrics.record_error(),
        }
        result
    }

    fn run(&self, path: &Path) -> anyhow::Result<WorkflowResult> {
        let container = decode_path(path)
            .with_context(|| format!("decoding container {}", path.display()))?;
        let volume = &container.volume;

        let kind = self.config.view.to_scan_kind();
        let matrix = match self.config.view {
            ViewKind::BScan => volume.channel_view(self.config.index),
            ViewKind::CScan => volume.depth_view(self.config.index),
            ViewKind::TScan => volume.along_track_view(self.config.index),
        }
        .context("extracting scan")?;

        let mut scan = Scan::new(matrix, kind);
        let processed = scan.apply_macro(&self.config.macro_text);
        let values: Vec<f32> = processed.iter().copied().collect();

        Ok(WorkflowResult {
            kind,
            rows: processed.nrows(),
            cols: processed.ncols(),
            mean: StatsHelper::mean(&values),
            std_dev: StatsHelper::std_dev(&values),
            rms: StatsHelper::rms(&values),
            max_position_m: volume.max_position_m(),
            max_depth_cm: volume.max_depth_cm(),
            channel_count: volume.channel_count(),
            geolocation_count: container.geolocations.as_ref().map_or(0, |g| g.len()),
        })
    }

    pub fn metrics_snapshot(&self) -> (usize, usize) {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::container::{write_container, GeneratorConfig};
    use tempfile::tempdir;

    #[test]
    fn runner_executes_full_workflow() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("synthetic.ogpr");
        let config = GeneratorConfig {
            samples: 32,
            channels: 2,
            slices: 8,
            ..Default::default()
        };
        write_container(&path, &config).unwrap();

        let runner = Runner::new(WorkflowConfig::from_args(ViewKind::BScan, 0, "DW_0/".into()));
        let result = runner.execute(&path).unwrap();
        assert_eq!(result.kind, ScanKind::BScan);
        assert_eq!((result.rows, result.cols), (32, 8));
        // dewow leaves every trace zero-mean, so the overall mean collapses
        assert!(result.mean.abs() < 1e-3);
        assert_eq!(result.channel_count, 2);
        assert_eq!(result.geolocation_count, 16);
        assert_eq!(runner.metrics_snapshot(), (1, 0));
    }

    #[test]
    fn out_of_range_index_fails_and_counts_as_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("synthetic.ogpr");
        let config = GeneratorConfig {
            samples: 16,
            channels: 2,
            slices: 4,
            ..Default::default()
        };
        write_container(&path, &config).unwrap();

        let runner = Runner::new(WorkflowConfig::from_args(ViewKind::BScan, 9, String::new()));
        assert!(runner.execute(&path).is_err());
        assert_eq!(runner.metrics_snapshot(), (0, 1));
    }
}
