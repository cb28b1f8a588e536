//! broadened UV/Vis spectra built from a list of excited states. every state
//! contributes one Gaussian band of fixed width in wavenumber space

use crate::{
    consts::{E2F, EV2NM, NM2CM, UV_PREFACTOR, UV_SIGMA},
    state::{ExcitedState, LookupError},
};


/// default sampling step in nm
pub const STEP: f64 = 0.5;

/// margin in nm added on both sides of an automatically chosen range
const MARGIN: f64 = 50.0;

/// the molar extinction coefficient at wavelength `l` (nm) of a band
/// centered at `l_i` with oscillator strength `f`
pub fn gauss_uv_band(l: f64, f: f64, l_i: f64) -> f64 {
    let x = (1.0 / l - 1.0 / l_i) / (1.0 / UV_SIGMA);
    UV_PREFACTOR * f / (NM2CM / UV_SIGMA) * (-x * x).exp()
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumBuilder {
    pub start: f64,
    pub end: f64,
    pub step: f64,
    pub normalize: bool,
    pub e2f: bool,
    /// 1-based indices of the states whose impulses are reported separately
    pub highlight: Vec<usize>,
}

impl SpectrumBuilder {
    /// sample `[start, end)` every [STEP] nm with normalization on
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            step: STEP,
            normalize: true,
            e2f: false,
            highlight: Vec::new(),
        }
    }

    /// a builder spanning `states` with 50 nm to spare on either side,
    /// rounded outwards to 10 nm and never starting below [STEP]. `None` if
    /// there are no states
    pub fn auto(states: &[ExcitedState]) -> Option<Self> {
        let (lo, hi) = states.iter().map(ExcitedState::wavelength).fold(
            None,
            |acc: Option<(f64, f64)>, l| match acc {
                Some((lo, hi)) => Some((lo.min(l), hi.max(l))),
                None => Some((l, l)),
            },
        )?;
        let start = (((lo - MARGIN) / 10.0).floor() * 10.0).max(STEP);
        let end = ((hi + MARGIN) / 10.0).ceil() * 10.0;
        Some(Self::new(start, end))
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn e2f(mut self, e2f: bool) -> Self {
        self.e2f = e2f;
        self
    }

    pub fn highlight(mut self, ids: Vec<usize>) -> Self {
        self.highlight = ids;
        self
    }

    /// the wavelengths sampled by this builder. non-positive wavelengths are
    /// skipped
    pub fn grid(&self) -> Vec<f64> {
        if self.step.is_nan() || self.step <= 0.0 || self.end <= self.start {
            return Vec::new();
        }
        let n = ((self.end - self.start) / self.step).ceil() as usize;
        (0..n)
            .map(|i| self.start + i as f64 * self.step)
            .filter(|&l| l > 0.0 && l < self.end)
            .collect()
    }

    pub fn build(
        &self,
        states: &[ExcitedState],
    ) -> Result<Spectrum, LookupError> {
        let impulses: Vec<(f64, f64)> =
            states.iter().map(|s| (s.wavelength(), s.f)).collect();
        let highlighted = self
            .highlight
            .iter()
            .map(|&id| {
                id.checked_sub(1)
                    .and_then(|i| impulses.get(i))
                    .copied()
                    .ok_or(LookupError::ImpulseNotFound(id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let wavelengths = self.grid();
        let mut intensities: Vec<f64> = wavelengths
            .iter()
            .map(|&l| {
                impulses
                    .iter()
                    .map(|&(l_i, f)| gauss_uv_band(l, f, l_i))
                    .sum::<f64>()
            })
            .collect();
        if self.e2f {
            for y in &mut intensities {
                *y /= E2F;
            }
        }
        if self.normalize {
            let max = intensities.iter().copied().fold(0.0, f64::max);
            if max > 0.0 {
                for y in &mut intensities {
                    *y /= max;
                }
            } else {
                log::warn!("spectrum is empty, skipping normalization");
            }
        }
        log::debug!(
            "built spectrum with {} points from {} states",
            wavelengths.len(),
            states.len()
        );

        Ok(Spectrum {
            wavelengths,
            intensities,
            impulses,
            highlighted,
        })
    }
}

/// a sampled spectrum together with the stick spectrum it was built from
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    /// sample points in nm
    pub wavelengths: Vec<f64>,
    pub intensities: Vec<f64>,
    /// `(wavelength, f)` of every state, in input order
    pub impulses: Vec<(f64, f64)>,
    pub highlighted: Vec<(f64, f64)>,
}

impl Spectrum {
    /// `(wavelength in nm, intensity)` pairs
    pub fn nm(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavelengths
            .iter()
            .copied()
            .zip(self.intensities.iter().copied())
    }

    /// `(energy in eV, intensity)` pairs, in the same order as [Self::nm]
    pub fn ev(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.nm().map(|(l, y)| (EV2NM / l, y))
    }

    /// the impulses with their abscissa in eV
    pub fn impulses_ev(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.impulses.iter().map(|&(l, f)| (EV2NM / l, f))
    }

    /// the sample with the highest intensity
    pub fn max(&self) -> Option<(f64, f64)> {
        self.nm().max_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }
}
