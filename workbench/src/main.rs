use clap::Parser;
use generator::container::GeneratorConfig;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use workflow::config::{ViewKind, WorkflowConfig};
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline OpenGPR container workbench")]
struct Args {
    /// Container file to decode and process
    #[arg(long)]
    file: Option<PathBuf>,
    /// Write a synthetic container here first, then process it
    #[arg(long)]
    generate: Option<PathBuf>,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "bscan")]
    view: ViewKind,
    #[arg(long, default_value_t = 0)]
    index: usize,
    /// Filter macro, e.g. "DW_0/EG_2,5/"
    #[arg(long = "macro", default_value = "")]
    macro_text: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.view, args.index, args.macro_text.clone())
    };

    let input = match (&args.generate, &args.file) {
        (Some(path), _) => {
            generator::container::write_container(path, &GeneratorConfig::default())?;
            path.clone()
        }
        (None, Some(path)) => path.clone(),
        (None, None) => anyhow::bail!("pass --file <container> or --generate <path>"),
    };

    log::info!("processing container {}", input.display());
    let runner = Runner::new(workflow_config);
    let result = runner.execute(&input)?;

    println!(
        "{:?} {}x{} -> mean {:.4}, std {:.4}, rms {:.4}",
        result.kind, result.rows, result.cols, result.mean, result.std_dev, result.rms
    );
    println!(
        "survey: {} channel(s), {:.2} m along track, {:.1} cm depth, {} geolocated trace(s)",
        result.channel_count, result.max_position_m, result.max_depth_cm, result.geolocation_count
    );
    let (processed, errors) = runner.metrics_snapshot();
    println!("workflows processed {}, errors {}", processed, errors);

    let report = format!(
        "file={} view={:?} shape={}x{} rms={:.4}\n",
        input.display(),
        result.kind,
        result.rows,
        result.cols,
        result.rms
    );
    let report_path = PathBuf::from("tools/data/workbench_report.log");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(report_path)?;
    file.write_all(report.as_bytes())?;

    Ok(())
}
