//! Parse excited-state listings from Gaussian, ORCA, and TURBOMOLE (escf and
//! ricc2) output into one [ExcitedState] model, post-process them, and build
//! broadened UV/Vis spectra from the result.

pub mod consts;
pub mod irrep;
pub mod mos;
pub mod pipeline;
pub mod program;
pub mod spectrum;
pub mod state;


pub use irrep::Irrep;
pub use mos::MoNames;
pub use pipeline::{Pipeline, SortBy, UsageError, WavelengthRange};
pub use program::{ParseError, SourceFormat};
pub use spectrum::{Spectrum, SpectrumBuilder};
pub use state::{Direction, ExcitedState, LookupError, MoTransition, Spin};

fn read(path: &std::path::Path) -> Result<String, ParseError> {
    std::fs::read_to_string(path).map_err(|e| {
        ParseError::ReadFile(path.display().to_string(), e.kind())
    })
}

/// read `filename`, pick its [SourceFormat] with [SourceFormat::detect], and
/// parse it
pub fn load(
    filename: impl AsRef<std::path::Path>,
) -> Result<(SourceFormat, Vec<ExcitedState>), ParseError> {
    let path = filename.as_ref();
    let text = read(path)?;
    let format = SourceFormat::detect(path, &text);
    log::info!("parsing {} as {format}", path.display());
    let states = format.parse(&text)?;
    Ok((format, states))
}

/// like [load] but skip detection and parse `filename` as `format`
pub fn load_as(
    filename: impl AsRef<std::path::Path>,
    format: SourceFormat,
) -> Result<Vec<ExcitedState>, ParseError> {
    let path = filename.as_ref();
    let text = read(path)?;
    log::info!("parsing {} as {format}", path.display());
    format.parse(&text)
}
