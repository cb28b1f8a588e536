use std::{
    error::Error, fmt::Display, path::Path, str::FromStr, sync::OnceLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::state::ExcitedState;

pub mod gaussian;
pub mod orca;
pub mod turbomole;


#[derive(Debug, PartialEq)]
pub enum ParseError {
    ReadFile(String, std::io::ErrorKind),
    /// a mandatory section or field never showed up
    NotFound(&'static str),
    /// the per-state groups extracted from the output have different lengths
    CountMismatch(Vec<(&'static str, usize)>),
    InvalidNumber {
        field: &'static str,
        value: String,
    },
    /// excitation energies in eV must be positive
    InvalidEnergy {
        id: usize,
        energy: f64,
    },
    MalformedTransition(String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::ReadFile(file, kind) => {
                write!(f, "failed to read {file}: {kind}")
            }
            ParseError::NotFound(what) => write!(f, "no {what} found"),
            ParseError::CountMismatch(counts) => {
                write!(f, "mismatched number of entries:")?;
                for (name, count) in counts {
                    write!(f, " {name}={count}")?;
                }
                Ok(())
            }
            ParseError::InvalidNumber { field, value } => {
                write!(f, "failed to parse {field} from `{value}`")
            }
            ParseError::InvalidEnergy { id, energy } => {
                write!(f, "state {id} has non-positive energy {energy} eV")
            }
            ParseError::MalformedTransition(line) => {
                write!(f, "malformed MO transition `{line}`")
            }
        }
    }
}

impl Error for ParseError {}

/// the programs whose excited-state output can be read
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Gaussian,
    Orca,
    TurbomoleEscf,
    TurbomoleRicc2,
}

static ORCA_BANNER: OnceLock<Regex> = OnceLock::new();

impl SourceFormat {
    /// TURBOMOLE output is recognized by its conventional file names,
    /// `escf.out` and `ricc2.out`, ORCA by its banner. everything else is
    /// assumed to be a Gaussian log
    pub fn detect(path: impl AsRef<Path>, text: &str) -> Self {
        let name = path.as_ref().to_string_lossy();
        if name.ends_with("escf.out") {
            return SourceFormat::TurbomoleEscf;
        } else if name.ends_with("ricc2.out") {
            return SourceFormat::TurbomoleRicc2;
        }
        let banner = ORCA_BANNER
            .get_or_init(|| Regex::new(r"\* O   R   C   A \*").unwrap());
        if banner.is_match(text) {
            SourceFormat::Orca
        } else {
            SourceFormat::Gaussian
        }
    }

    pub fn parse(&self, text: &str) -> Result<Vec<ExcitedState>, ParseError> {
        let states = match self {
            SourceFormat::Gaussian => gaussian::parse(text),
            SourceFormat::Orca => orca::parse(text),
            SourceFormat::TurbomoleEscf => turbomole::parse_escf(text),
            SourceFormat::TurbomoleRicc2 => turbomole::parse_ricc2(text),
        }?;
        if states.is_empty() {
            return Err(ParseError::NotFound("excited states"));
        }
        for state in &states {
            check_energy(state)?;
        }
        Ok(states)
    }
}

impl Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            SourceFormat::Gaussian => "gaussian",
            SourceFormat::Orca => "orca",
            SourceFormat::TurbomoleEscf => "escf",
            SourceFormat::TurbomoleRicc2 => "ricc2",
        })
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gaussian" | "g16" | "g09" => Ok(SourceFormat::Gaussian),
            "orca" => Ok(SourceFormat::Orca),
            "escf" | "turbomole-escf" => Ok(SourceFormat::TurbomoleEscf),
            "ricc2" | "turbomole-ricc2" => Ok(SourceFormat::TurbomoleRicc2),
            _ => Err(format!(
                "unknown format `{s}`, expected one of gaussian, orca, \
                 escf, ricc2"
            )),
        }
    }
}

/// parse `value` as a `T`, reporting `field` on failure
#[inline]
fn parse_num<T: FromStr>(
    value: &str,
    field: &'static str,
) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_owned(),
    })
}

/// require every group in `counts` to have the same length
fn check_counts(counts: &[(&'static str, usize)]) -> Result<(), ParseError> {
    match counts.first() {
        Some((_, n)) if counts.iter().any(|(_, c)| c != n) => {
            Err(ParseError::CountMismatch(counts.to_vec()))
        }
        _ => Ok(()),
    }
}

fn check_energy(state: &ExcitedState) -> Result<(), ParseError> {
    let energy = state.energy();
    // NaN fails this too
    if energy > 0.0 {
        Ok(())
    } else {
        Err(ParseError::InvalidEnergy {
            id: state.id,
            energy,
        })
    }
}
