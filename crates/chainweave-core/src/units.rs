//! Unit conversion utilities
//!
//! Ring sizes are quoted in mixed units by suppliers: inner diameters as metric
//! decimals or fractional inches ("5/16"), wire as millimeters or as an AWG/SWG
//! gauge. Everything is normalized to millimeters internally.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MM_PER_INCH: f64 = 25.4;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Wire gauge standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireGauge {
    /// American Wire Gauge (used by most US ring suppliers)
    Awg,
    /// Standard Wire Gauge (UK suppliers)
    Swg,
}

/// SWG diameters in inches for gauges 10 through 24.
const SWG_INCHES: [f64; 15] = [
    0.128, 0.116, 0.104, 0.092, 0.080, 0.072, 0.064, 0.056, 0.048, 0.040, 0.036, 0.032, 0.028,
    0.024, 0.022,
];

impl WireGauge {
    /// Wire diameter in millimeters for a gauge number.
    ///
    /// AWG uses the closed-form definition; SWG is tabulated for gauges 10-24,
    /// which covers every wire size used for jewelry rings.
    pub fn diameter_mm(self, gauge: u32) -> Option<f64> {
        match self {
            Self::Awg => {
                if gauge > 40 {
                    return None;
                }
                Some(0.127 * 92f64.powf((36.0 - gauge as f64) / 39.0))
            }
            Self::Swg => {
                let idx = gauge.checked_sub(10)? as usize;
                SWG_INCHES.get(idx).map(|inches| inches * MM_PER_INCH)
            }
        }
    }
}

impl fmt::Display for WireGauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Awg => write!(f, "AWG"),
            Self::Swg => write!(f, "SWG"),
        }
    }
}

/// Format length value for display
///
/// * `value_mm` - Value in millimeters
/// * `system` - Target measurement system
pub fn format_length(value_mm: f64, system: MeasurementSystem) -> String {
    match system {
        MeasurementSystem::Metric => format!("{:.2}mm", value_mm),
        MeasurementSystem::Imperial => format!("{:.4}in", value_mm / MM_PER_INCH),
    }
}

/// Parse length string to millimeters
///
/// Accepts decimals, fractional inches (`"5/16"`, `"1 1/2"`) and an optional
/// unit suffix (`mm`, `in`, `"`) that overrides the assumed system.
///
/// * `input` - String to parse
/// * `system` - Assumed measurement system when no suffix is given
pub fn parse_length(input: &str, system: MeasurementSystem) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty length".to_string());
    }

    let (body, system) = if let Some(rest) = input.strip_suffix("mm") {
        (rest.trim(), MeasurementSystem::Metric)
    } else if let Some(rest) = input.strip_suffix("in") {
        (rest.trim(), MeasurementSystem::Imperial)
    } else if let Some(rest) = input.strip_suffix('"') {
        (rest.trim(), MeasurementSystem::Imperial)
    } else {
        (input, system)
    };

    let value = if body.contains('/') {
        let mut total = 0.0;
        for part in body.split_whitespace() {
            if part.contains('/') {
                let frac_parts: Vec<&str> = part.split('/').collect();
                if frac_parts.len() != 2 {
                    return Err("Invalid fraction format".to_string());
                }
                let num = frac_parts[0]
                    .parse::<f64>()
                    .map_err(|_| "Invalid numerator")?;
                let den = frac_parts[1]
                    .parse::<f64>()
                    .map_err(|_| "Invalid denominator")?;
                if den == 0.0 {
                    return Err("Division by zero".to_string());
                }
                total += num / den;
            } else {
                total += part.parse::<f64>().map_err(|_| "Invalid number part")?;
            }
        }
        total
    } else {
        body.parse::<f64>().map_err(|e| e.to_string())?
    };

    if !value.is_finite() {
        return Err(format!("Length is not finite: {}", input));
    }

    Ok(match system {
        MeasurementSystem::Metric => value,
        MeasurementSystem::Imperial => value * MM_PER_INCH,
    })
}

/// Get the unit label for the given system ("mm" or "in")
pub fn get_unit_label(system: MeasurementSystem) -> &'static str {
    match system {
        MeasurementSystem::Metric => "mm",
        MeasurementSystem::Imperial => "in",
    }
}
