//! Precision types used by layer tensors

use std::fmt;
use std::str::FromStr;

use super::ModelDescriptionError;

/// Rounding mode of an `ap_fixed` type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    Trn,
    TrnZero,
    Rnd,
    RndZero,
    RndInf,
    RndMinInf,
    RndConv,
}

impl RoundingMode {
    pub fn as_cpp(&self) -> &'static str {
        match self {
            RoundingMode::Trn => "AP_TRN",
            RoundingMode::TrnZero => "AP_TRN_ZERO",
            RoundingMode::Rnd => "AP_RND",
            RoundingMode::RndZero => "AP_RND_ZERO",
            RoundingMode::RndInf => "AP_RND_INF",
            RoundingMode::RndMinInf => "AP_RND_MIN_INF",
            RoundingMode::RndConv => "AP_RND_CONV",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        let mode = s.trim().trim_start_matches("AP_");
        match mode {
            "TRN" => Some(RoundingMode::Trn),
            "TRN_ZERO" => Some(RoundingMode::TrnZero),
            "RND" => Some(RoundingMode::Rnd),
            "RND_ZERO" => Some(RoundingMode::RndZero),
            "RND_INF" => Some(RoundingMode::RndInf),
            "RND_MIN_INF" => Some(RoundingMode::RndMinInf),
            "RND_CONV" => Some(RoundingMode::RndConv),
            _ => None,
        }
    }
}

/// Overflow (saturation) mode of an `ap_fixed` type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaturationMode {
    Wrap,
    Sat,
    SatZero,
    SatSym,
}

impl SaturationMode {
    pub fn as_cpp(&self) -> &'static str {
        match self {
            SaturationMode::Wrap => "AP_WRAP",
            SaturationMode::Sat => "AP_SAT",
            SaturationMode::SatZero => "AP_SAT_ZERO",
            SaturationMode::SatSym => "AP_SAT_SYM",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        let mode = s.trim().trim_start_matches("AP_");
        match mode {
            "WRAP" => Some(SaturationMode::Wrap),
            "SAT" => Some(SaturationMode::Sat),
            "SAT_ZERO" => Some(SaturationMode::SatZero),
            "SAT_SYM" => Some(SaturationMode::SatSym),
            _ => None,
        }
    }
}

/// Fixed-point or integer encoding of a tensor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precision {
    /// `ap_fixed<W,I>` / `ap_ufixed<W,I>` with optional quantization modes
    Fixed {
        width: u32,
        integer: i32,
        signed: bool,
        rounding: Option<RoundingMode>,
        saturation: Option<SaturationMode>,
    },
    /// `ap_int<W>` / `ap_uint<W>`
    Integer { width: u32, signed: bool },
}

impl Precision {
    /// Signed fixed-point type with default quantization
    pub fn fixed(width: u32, integer: i32) -> Self {
        Precision::Fixed {
            width,
            integer,
            signed: true,
            rounding: None,
            saturation: None,
        }
    }

    /// Integer type
    pub fn integer(width: u32, signed: bool) -> Self {
        Precision::Integer { width, signed }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Fixed {
                width,
                integer,
                signed,
                rounding,
                saturation,
            } => {
                let base = if *signed { "ap_fixed" } else { "ap_ufixed" };
                write!(f, "{}<{},{}", base, width, integer)?;
                // A saturation mode can only be spelled after a rounding mode
                match (rounding, saturation) {
                    (Some(rnd), Some(sat)) => write!(f, ",{},{}", rnd.as_cpp(), sat.as_cpp())?,
                    (Some(rnd), None) => write!(f, ",{}", rnd.as_cpp())?,
                    (None, Some(sat)) => {
                        write!(f, ",{},{}", RoundingMode::Trn.as_cpp(), sat.as_cpp())?
                    }
                    (None, None) => {}
                }
                write!(f, ">")
            }
            Precision::Integer { width, signed } => {
                let base = if *signed { "ap_int" } else { "ap_uint" };
                write!(f, "{}<{}>", base, width)
            }
        }
    }
}

impl FromStr for Precision {
    type Err = ModelDescriptionError;

    /// Parse the C++ spelling, e.g. `ap_fixed<16,6>` or `ap_uint<8>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ModelDescriptionError::InvalidPrecision {
            spec: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        let (base, rest) = trimmed
            .split_once('<')
            .ok_or_else(|| invalid("missing '<'"))?;
        let args = rest
            .strip_suffix('>')
            .ok_or_else(|| invalid("missing closing '>'"))?;
        let args: Vec<&str> = args.split(',').map(str::trim).collect();

        let width: u32 = args[0]
            .parse()
            .map_err(|_| invalid("width is not an unsigned integer"))?;
        if width == 0 {
            return Err(invalid("width must be positive"));
        }

        match base.trim() {
            "ap_fixed" | "ap_ufixed" => {
                let integer: i32 = args
                    .get(1)
                    .ok_or_else(|| invalid("missing integer bits"))?
                    .parse()
                    .map_err(|_| invalid("integer bits is not an integer"))?;
                let rounding = match args.get(2) {
                    Some(mode) => Some(
                        RoundingMode::parse(mode).ok_or_else(|| invalid("unknown rounding mode"))?,
                    ),
                    None => None,
                };
                let saturation = match args.get(3) {
                    Some(mode) => Some(
                        SaturationMode::parse(mode)
                            .ok_or_else(|| invalid("unknown saturation mode"))?,
                    ),
                    None => None,
                };
                if args.len() > 4 {
                    return Err(invalid("too many arguments"));
                }
                Ok(Precision::Fixed {
                    width,
                    integer,
                    signed: base.trim() == "ap_fixed",
                    rounding,
                    saturation,
                })
            }
            "ap_int" | "ap_uint" => {
                if args.len() != 1 {
                    return Err(invalid("integer types take a single width"));
                }
                Ok(Precision::Integer {
                    width,
                    signed: base.trim() == "ap_int",
                })
            }
            _ => Err(invalid("unknown base type")),
        }
    }
}

/// A named precision type, emitted as a C++ typedef
///
/// The name is the deduplication key across layers: two instances with the
/// same name are expected to render the same definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecisionType {
    name: String,
    precision: Precision,
}

impl PrecisionType {
    pub fn new(name: impl Into<String>, precision: Precision) -> Self {
        Self {
            name: name.into(),
            precision,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn precision(&self) -> &Precision {
        &self.precision
    }

    /// Render the C++ declaration of this type
    pub fn render_definition(&self) -> String {
        format!("typedef {} {};\n", self.precision, self.name)
    }
}
