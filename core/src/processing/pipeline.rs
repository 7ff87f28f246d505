use ndarray::Array2;

use crate::processing::background::{
    adaptive_background_removal, dynamic_window_background_removal,
};
use crate::processing::bandpass::bandpass_filter;
use crate::processing::dewow::{dewow, start_time_shift};
use crate::processing::gain::exponential_gain;
use crate::telemetry::log::LogManager;

// Fixed bindings of the macro opcodes. STS applies this shift no matter
// what its parameters say.
const FIXED_START_TIME_SHIFT: i32 = -29;
const GAIN_START_TIME: f64 = 0.0;
const GAIN_END_TIME: f64 = 483.0;
const BACKGROUND_ROW_START: i32 = 0;
const BACKGROUND_ROW_END: i32 = 512;
const BANDPASS_SAMPLING_RATE: f64 = 1500.0;

/// One parsed operation of a macro chain.
#[derive(Debug, Clone, PartialEq)]
pub enum MacroOp {
    Dewow,
    StartTimeShift,
    ExponentialGain { exponent: f64, scale: f64 },
    DynamicBackground { diameter: i32 },
    Bandpass { low_cut: f64, high_cut: f64 },
    AdaptiveBackground { traces: usize },
}

impl MacroOp {
    /// Runs the operation, consuming the working matrix and returning the
    /// transformed one.
    pub fn apply(&self, scan: Array2<f32>) -> Array2<f32> {
        match *self {
            MacroOp::Dewow => dewow(scan),
            MacroOp::StartTimeShift => start_time_shift(scan, FIXED_START_TIME_SHIFT),
            MacroOp::ExponentialGain { exponent, scale } => {
                exponential_gain(scan, scale, exponent, GAIN_START_TIME, GAIN_END_TIME)
            }
            MacroOp::DynamicBackground { diameter } => dynamic_window_background_removal(
                scan,
                diameter,
                BACKGROUND_ROW_START,
                BACKGROUND_ROW_END,
            ),
            MacroOp::Bandpass { low_cut, high_cut } => {
                bandpass_filter(scan, low_cut, high_cut, BANDPASS_SAMPLING_RATE)
            }
            MacroOp::AdaptiveBackground { traces } => adaptive_background_removal(scan, traces),
        }
    }
}

/// Parses a macro string of `/`-separated `NAME_p1,p2,...` segments.
///
/// Unrecognized names are ignored. A recognized name with the wrong
/// parameter count, or a parameter that does not parse as a number, is
/// reported and that segment skipped; the rest of the chain survives.
pub fn parse_macro(text: &str) -> Vec<MacroOp> {
    let logger = LogManager::new();
    let mut ops = Vec::new();
    for segment in text.split('/') {
        if segment.is_empty() {
            continue;
        }
        let (name, params) = match segment.split_once('_') {
            Some((name, rest)) => (name, rest.split(',').collect::<Vec<_>>()),
            None => (segment, Vec::new()),
        };
        match name {
            "DW" => ops.push(MacroOp::Dewow),
            "STS" => ops.push(MacroOp::StartTimeShift),
            "EG" => {
                if let Some([exponent, scale]) = parse_params::<2>(&logger, segment, &params) {
                    ops.push(MacroOp::ExponentialGain { exponent, scale });
                }
            }
            "BR" => {
                if let Some([diameter]) = parse_params::<1>(&logger, segment, &params) {
                    ops.push(MacroOp::DynamicBackground {
                        diameter: diameter as i32,
                    });
                }
            }
            "BF" => {
                // first parameter is the upper cutoff, second the lower
                if let Some([high_cut, low_cut]) = parse_params::<2>(&logger, segment, &params) {
                    ops.push(MacroOp::Bandpass { low_cut, high_cut });
                }
            }
            "ABR" => {
                if let Some([traces]) = parse_params::<1>(&logger, segment, &params) {
                    ops.push(MacroOp::AdaptiveBackground {
                        traces: traces as usize,
                    });
                }
            }
            _ => {}
        }
    }
    ops
}

fn parse_params<const N: usize>(
    logger: &LogManager,
    segment: &str,
    params: &[&str],
) -> Option<[f64; N]> {
    if params.len() != N {
        logger.warn(&format!(
            "macro segment '{}' expects {} parameter(s), found {}; skipping",
            segment,
            N,
            params.len()
        ));
        return None;
    }
    let mut values = [0.0; N];
    for (slot, raw) in values.iter_mut().zip(params) {
        match raw.trim().parse::<f64>() {
            Ok(value) => *slot = value,
            Err(_) => {
                logger.warn(&format!(
                    "macro segment '{}' has non-numeric parameter '{}'; skipping",
                    segment, raw
                ));
                return None;
            }
        }
    }
    Some(values)
}
