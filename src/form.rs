//! Interactive terminal form collecting the seven vehicle attributes

use crate::metrics::SessionMetrics;
use crate::models::Predictor;
use crate::types::vehicle::{ACCELERATION, CYLINDERS, DISPLACEMENT, HORSEPOWER, MODEL_YEAR, WEIGHT};
use crate::types::{reference_vehicles, FeatureVector, FieldRange, Origin, PredictionResult};
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing::{error, info};

/// Whether a numeric field accepts fractions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Real,
}

/// A numeric prompt with its range and help text
#[derive(Debug, Clone, Copy)]
pub struct NumericField {
    pub label: &'static str,
    pub help: &'static str,
    pub range: FieldRange,
    pub kind: FieldKind,
}

pub const CYLINDERS_FIELD: NumericField = NumericField {
    label: "Number of Cylinders",
    help: "Most cars have 4. Muscle cars & trucks have 6 or 8.",
    range: CYLINDERS,
    kind: FieldKind::Integer,
};

pub const DISPLACEMENT_FIELD: NumericField = NumericField {
    label: "Engine Displacement (cu in)",
    help: "Small car: 70-150 | Medium: 150-300 | Large: 300-455",
    range: DISPLACEMENT,
    kind: FieldKind::Real,
};

pub const HORSEPOWER_FIELD: NumericField = NumericField {
    label: "Horsepower (HP)",
    help: "Normal: 100-160 HP | Sporty/Muscle: 180-250+ HP",
    range: HORSEPOWER,
    kind: FieldKind::Integer,
};

pub const WEIGHT_FIELD: NumericField = NumericField {
    label: "Car Weight (lbs)",
    help: "Light: 2000-2800 | Average: 3000-4000 | Heavy: 4500+",
    range: WEIGHT,
    kind: FieldKind::Integer,
};

pub const ACCELERATION_FIELD: NumericField = NumericField {
    label: "0-60 mph (seconds)",
    help: "Fast: 8-12 sec | Normal: 13-18 sec | Slow: 20+ sec",
    range: ACCELERATION,
    kind: FieldKind::Real,
};

pub const MODEL_YEAR_FIELD: NumericField = NumericField {
    label: "Model Year",
    help: "70 = 1970, 82 = 1982. Newer = slightly better MPG",
    range: MODEL_YEAR,
    kind: FieldKind::Integer,
};

/// Parsed answer to a numeric prompt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Answer {
    /// Empty input, default taken
    Default(f64),
    /// Value inside the range
    Value(f64),
    /// Value was outside the range and got clamped
    Clamped(f64),
}

impl Answer {
    pub fn value(&self) -> f64 {
        match *self {
            Answer::Default(v) | Answer::Value(v) | Answer::Clamped(v) => v,
        }
    }
}

/// Parse one line of input for a numeric field
pub fn parse_numeric(input: &str, field: &NumericField) -> std::result::Result<Answer, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Answer::Default(field.range.default));
    }

    let mut value: f64 = input
        .parse()
        .map_err(|_| format!("'{input}' is not a number"))?;
    if !value.is_finite() {
        return Err(format!("'{input}' is not a finite number"));
    }
    if field.kind == FieldKind::Integer {
        value = value.round();
    }

    if field.range.contains(value) {
        Ok(Answer::Value(value))
    } else {
        Ok(Answer::Clamped(field.range.clamp(value)))
    }
}

/// Line-oriented form over any reader/writer pair
pub struct VehicleForm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> VehicleForm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the form and return its output sink
    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one line, `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Prompt for a numeric field until a usable answer arrives
    pub fn ask_number(&mut self, field: &NumericField) -> io::Result<Option<f64>> {
        loop {
            write!(
                self.output,
                "{} [{}-{}, step {}, default {}]\n  ({})\n> ",
                field.label,
                field.range.min,
                field.range.max,
                field.range.step,
                field.range.default,
                field.help
            )?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse_numeric(&line, field) {
                Ok(Answer::Clamped(v)) => {
                    writeln!(self.output, "  Out of range, using {}", v)?;
                    return Ok(Some(v));
                }
                Ok(answer) => return Ok(Some(answer.value())),
                Err(msg) => writeln!(self.output, "  {}, try again", msg)?,
            }
        }
    }

    /// Prompt for the country of origin
    pub fn ask_origin(&mut self) -> io::Result<Option<Origin>> {
        let default = FeatureVector::default().origin;
        loop {
            write!(
                self.output,
                "Country of Origin [1 = {}, 2 = {}, 3 = {}, default {}]\n  (Japanese cars were usually the most fuel-efficient in the 70s-80s!)\n> ",
                Origin::Usa,
                Origin::Europe,
                Origin::Japan,
                default
            )?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                return Ok(Some(default));
            }
            match line.parse::<Origin>() {
                Ok(origin) => return Ok(Some(origin)),
                Err(msg) => writeln!(self.output, "  {}, try again", msg)?,
            }
        }
    }

    /// Collect one vehicle, `None` if input ends first
    pub fn read_vehicle(&mut self) -> io::Result<Option<FeatureVector>> {
        writeln!(self.output, "\n-- Engine & Power --")?;
        let Some(cylinders) = self.ask_number(&CYLINDERS_FIELD)? else {
            return Ok(None);
        };
        let Some(displacement) = self.ask_number(&DISPLACEMENT_FIELD)? else {
            return Ok(None);
        };
        let Some(horsepower) = self.ask_number(&HORSEPOWER_FIELD)? else {
            return Ok(None);
        };

        writeln!(self.output, "\n-- Weight & Performance --")?;
        let Some(weight) = self.ask_number(&WEIGHT_FIELD)? else {
            return Ok(None);
        };
        let Some(acceleration) = self.ask_number(&ACCELERATION_FIELD)? else {
            return Ok(None);
        };
        let Some(origin) = self.ask_origin()? else {
            return Ok(None);
        };
        let Some(model_year) = self.ask_number(&MODEL_YEAR_FIELD)? else {
            return Ok(None);
        };

        Ok(Some(FeatureVector {
            cylinders: cylinders as u8,
            displacement,
            horsepower: horsepower as u16,
            weight: weight as u16,
            acceleration,
            model_year: model_year as u8,
            origin,
        }))
    }

    /// Print the title and the reference-car panel
    pub fn show_header(&mut self) -> io::Result<()> {
        writeln!(self.output, "Car Fuel Efficiency Predictor")?;
        writeln!(self.output, "1970-1982 Classic Cars\n")?;
        writeln!(self.output, "Real-Life Examples")?;
        for car in reference_vehicles() {
            let fv = &car.features;
            writeln!(
                self.output,
                "  {} -> {} | {} cyl | {} HP | {} lbs | year {} -> ~{} MPG",
                car.name, fv.origin, fv.cylinders, fv.horsepower, fv.weight, fv.model_year, car.expected_mpg
            )?;
        }
        Ok(())
    }

    /// Print a prediction with its feedback band
    pub fn show_result(&mut self, result: &PredictionResult) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "  {:.1} Miles Per Gallon (MPG)", result.mpg)?;
        writeln!(self.output, "  {:.1} Kilometers Per Liter (km/L)", result.km_per_liter)?;
        writeln!(self.output, "  {}", result.band().message())?;
        Ok(())
    }

    /// Ask whether to predict another vehicle. End of input means no.
    pub fn ask_again(&mut self) -> io::Result<bool> {
        loop {
            write!(self.output, "\nPredict another car? [Y/n] ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(false);
            };
            match line.trim().to_ascii_lowercase().as_str() {
                "" | "y" | "yes" => return Ok(true),
                "n" | "no" | "q" | "quit" => return Ok(false),
                _ => writeln!(self.output, "  Please answer y or n")?,
            }
        }
    }

    /// Run the form until the user stops or input ends.
    ///
    /// Returns the number of successful predictions.
    pub fn run(&mut self, predictor: &Predictor, metrics: &SessionMetrics) -> Result<usize> {
        self.show_header().context("Failed to write form header")?;
        let mut completed = 0;

        loop {
            let Some(features) = self.read_vehicle().context("Failed to read vehicle")? else {
                break;
            };

            let start = Instant::now();
            match predictor.predict(&features) {
                Ok(result) => {
                    metrics.record_prediction(start.elapsed(), &result);
                    info!(
                        mpg = result.mpg,
                        km_per_liter = result.km_per_liter,
                        band = %result.band(),
                        "Prediction served"
                    );
                    self.show_result(&result).context("Failed to write result")?;
                    completed += 1;
                }
                Err(e) => {
                    metrics.record_failure();
                    error!(error = %e, features = ?features, "Prediction failed");
                    writeln!(self.output, "\n  Prediction failed: {}", e)?;
                }
            }

            if !self.ask_again().context("Failed to read answer")? {
                break;
            }
        }

        Ok(completed)
    }
}
