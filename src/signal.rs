use crate::error::*;

use regex::Regex;
use rug::Integer;
use std::cmp::Ordering;
use std::sync::OnceLock;
use tracing::{error, warn};

/// Bits of a Verilog-A `integer`, which holds the wave table and the running index.
pub const INTEGER_BITS: u32 = 32;

const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_$]*$";

static IDENTIFIER_REGEX: OnceLock<Regex> = OnceLock::new();

fn identifier_regex() -> &'static Regex {
    IDENTIFIER_REGEX.get_or_init(|| Regex::new(IDENTIFIER_PATTERN).expect("invalid regex pattern"))
}

/// Description of one generated pin.
///
/// * `name` - Pin name, must be a valid identifier
/// * `width` - Bit width; 1 is a scalar pin
/// * `length` - Number of samples in one playback period
/// * `waves` - Sample values played back in order
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSpec {
    pub name: String,
    pub width: u32,
    pub length: usize,
    pub waves: Vec<Integer>,
}

impl SignalSpec {
    pub fn new(name: impl Into<String>, width: u32, length: usize, waves: Vec<Integer>) -> Self {
        Self {
            name: name.into(),
            width,
            length,
            waves,
        }
    }

    /// Like `new`, but with the period taken from the number of samples.
    pub fn from_waves<I>(name: impl Into<String>, width: u32, waves: I) -> Self
        where
            I: IntoIterator,
            I::Item: Into<Integer>,
    {
        let waves: Vec<Integer> = waves.into_iter().map(Into::into).collect();
        let length = waves.len();
        Self::new(name, width, length, waves)
    }
}


pub fn check_identifier(name: &str) -> Result<()> {
    if identifier_regex().is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}

/// Parse a sample literal. Accepts decimal, `0x` hex and `0b` binary, with optional `_`
/// digit separators.
pub fn parse_sample(signal: &str, text: &str) -> Result<Integer> {
    let cleaned: String = text.trim()
        .chars()
        .filter(|c| *c != '_')
        .collect();
    let lower = cleaned.to_lowercase();

    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (bin, 2)
    } else {
        (lower.as_str(), 10)
    };

    let value = Integer::from_str_radix(digits, radix)
        .map_err(|_| Error::InvalidSample(signal.to_string(), text.to_string()))?;

    if value.cmp0() == Ordering::Less {
        Err(Error::InvalidSample(signal.to_string(), text.to_string()))
    } else {
        Ok(value)
    }
}


/// Verilog-A fragments for a single signal.
///
/// All fragments are built once on construction. None of them carries a trailing line
/// break; the aggregation in `SignalSet` appends one per signal.
#[derive(Debug, Clone)]
pub struct SignalCode {
    spec: SignalSpec,
    signal_name: String,
    count_name: String,
    wave_name: String,

    output_declaration: String,
    signal_declaration: String,
    count_declaration: String,
    wavelist_declaration: String,
    signal_initial: String,
    count_initial: String,
    signal_generate: String,
    count_generate: String,
    signal_output: String,
}

impl SignalCode {
    pub fn new(spec: SignalSpec) -> Result<Self> {
        Self::validate(&spec)?;

        let signal_name = format!("signal_{}", spec.name);
        let count_name = format!("count_{}", spec.name);
        let wave_name = format!("wave_{}", spec.name);

        let mut code = Self {
            spec,
            signal_name,
            count_name,
            wave_name,
            output_declaration: String::new(),
            signal_declaration: String::new(),
            count_declaration: String::new(),
            wavelist_declaration: String::new(),
            signal_initial: String::new(),
            count_initial: String::new(),
            signal_generate: String::new(),
            count_generate: String::new(),
            signal_output: String::new(),
        };

        code.output_declaration = code.build_output_declaration();
        code.signal_declaration = format!("    integer {} ;", code.signal_name);
        code.count_declaration = format!("    integer {} ;", code.count_name);
        code.wavelist_declaration = code.build_wavelist_declaration();
        code.signal_initial = format!("            {} = 0 ;", code.signal_name);
        code.count_initial = format!("            {} = 0 ;", code.count_name);
        code.signal_generate = format!("            {} = {}[ {} % {} ] ;",
            code.signal_name, code.wave_name, code.count_name, code.spec.length);
        code.count_generate = format!("            {} = {} + 1 ;",
            code.count_name, code.count_name);
        code.signal_output = code.build_signal_output();

        Ok(code)
    }

    fn validate(spec: &SignalSpec) -> Result<()> {
        check_identifier(&spec.name)?;

        if spec.width < 1 {
            return Err(Error::InvalidWidth(spec.name.clone(), spec.width));
        }

        if spec.waves.is_empty() {
            error!(signal = %spec.name, "the length of the wave list is 0");
            return Err(Error::DegenerateWaveform(spec.name.clone()));
        }

        if spec.length < 1 {
            return Err(Error::InvalidLength(spec.name.clone(), spec.length));
        }

        if spec.waves.len() != spec.length {
            warn!(signal = %spec.name, samples = spec.waves.len(), length = spec.length,
                "number of samples differs from the declared length");
        }

        if let Some(neg) = spec.waves.iter().find(|v| v.cmp0() == Ordering::Less) {
            return Err(Error::InvalidSample(spec.name.clone(), neg.to_string()));
        }

        if let Some(wide) = spec.waves.iter().find(|v| v.significant_bits() > spec.width) {
            warn!(signal = %spec.name, value = %wide, width = spec.width,
                "sample does not fit into the pin width and will be truncated");
        }

        if spec.width > INTEGER_BITS {
            warn!(signal = %spec.name, width = spec.width,
                "pin is wider than a Verilog-A integer, upper bits are driven from a 32 bit index");
        }

        // signed 32 bit table entries
        if let Some(big) = spec.waves.iter().find(|v| v.significant_bits() >= INTEGER_BITS) {
            warn!(signal = %spec.name, value = %big,
                "sample does not fit into a Verilog-A integer");
        }

        Ok(())
    }

    /// `[w-1:0]` for vector pins, empty for scalar pins.
    fn width_range(&self) -> String {
        if self.spec.width > 1 {
            format!("[{}:0] ", self.spec.width - 1)
        } else {
            String::new()
        }
    }

    fn build_output_declaration(&self) -> String {
        let range = self.width_range();
        format!("    output {}{} ;\n    electrical {}{} ;",
            range, self.spec.name, range, self.spec.name)
    }

    fn build_wavelist_declaration(&self) -> String {
        let values: Vec<String> = self.spec.waves.iter()
            .map(|v| v.to_string())
            .collect();

        format!("    integer {} [0:{}] = {{ {} }} ;",
            self.wave_name, self.spec.length - 1, values.join(", "))
    }

    fn build_signal_output(&self) -> String {
        (0..self.spec.width)
            .map(|i| {
                let net = if self.spec.width > 1 {
                    format!("{}[{}]", self.spec.name, i)
                } else {
                    self.spec.name.clone()
                };

                format!("        V( {} ) <+ transition( V(VDD,GND)*(({}&(1<<{}))>>{}), 0, 0 ) ;",
                    net, self.signal_name, i, i)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn spec(&self) -> &SignalSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn signal_name(&self) -> &str {
        &self.signal_name
    }

    pub fn count_name(&self) -> &str {
        &self.count_name
    }

    pub fn wave_name(&self) -> &str {
        &self.wave_name
    }

    pub fn output_declaration(&self) -> &str {
        &self.output_declaration
    }

    pub fn signal_declaration(&self) -> &str {
        &self.signal_declaration
    }

    pub fn count_declaration(&self) -> &str {
        &self.count_declaration
    }

    pub fn wavelist_declaration(&self) -> &str {
        &self.wavelist_declaration
    }

    pub fn signal_initial(&self) -> &str {
        &self.signal_initial
    }

    pub fn count_initial(&self) -> &str {
        &self.count_initial
    }

    pub fn signal_generate(&self) -> &str {
        &self.signal_generate
    }

    pub fn count_generate(&self) -> &str {
        &self.count_generate
    }

    pub fn signal_output(&self) -> &str {
        &self.signal_output
    }
}
