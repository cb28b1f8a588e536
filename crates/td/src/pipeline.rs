//! post-processing applied to a freshly parsed list of excited states. the
//! per-state stages run in [Pipeline::prepare], the list-level filters and
//! sorting in [Pipeline::filter]. every filter left at its default is a no-op

use std::{collections::BTreeMap, error::Error, fmt::Display};

use crate::{
    irrep::Irrep,
    state::{DEFAULT_IRREP, ExcitedState, LookupError, mo_order},
};


/// default CI coefficient below which transitions are suppressed
pub const DEFAULT_CI_THRESH: f64 = 0.2;

#[derive(Debug, PartialEq)]
pub enum UsageError {
    /// a wavelength range takes one or two bounds
    RangeArity(usize),
    /// start/final MOs have to come in pairs
    OddMoPairs(usize),
}

impl Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageError::RangeArity(n) => write!(
                f,
                "only 1 or 2 arguments allowed for --range, got {n}"
            ),
            UsageError::OddMoPairs(n) => write!(
                f,
                "need an even number of arguments for --start-final-mos, \
                 got {n}"
            ),
        }
    }
}

impl Error for UsageError {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    /// ascending excitation energy. ids are reassigned 1..=N in the new
    /// order
    #[default]
    Energy,
    /// descending oscillator strength, ids left alone
    Strength,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WavelengthRange {
    /// wavelengths at or above the bound
    Above(f64),
    /// wavelengths within the inclusive bounds
    Between(f64, f64),
}

impl WavelengthRange {
    pub fn from_bounds(bounds: &[f64]) -> Result<Self, UsageError> {
        match *bounds {
            [lo] => Ok(WavelengthRange::Above(lo)),
            [lo, hi] => Ok(WavelengthRange::Between(lo, hi)),
            _ => Err(UsageError::RangeArity(bounds.len())),
        }
    }

    pub fn contains(&self, wavelength: f64) -> bool {
        match *self {
            WavelengthRange::Above(lo) => wavelength >= lo,
            WavelengthRange::Between(lo, hi) => {
                (lo..=hi).contains(&wavelength)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pipeline {
    pub ci_thresh: f64,
    pub nosym: bool,
    pub only_first: Option<usize>,
    pub irrep: Option<String>,
    pub start_mos: Vec<String>,
    pub final_mos: Vec<String>,
    pub mo_pairs: Vec<(String, String)>,
    pub sort: SortBy,
    pub range: Option<WavelengthRange>,
    pub fthresh: Option<f64>,
    pub show: Option<usize>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            ci_thresh: DEFAULT_CI_THRESH,
            nosym: false,
            only_first: None,
            irrep: None,
            start_mos: Vec::new(),
            final_mos: Vec::new(),
            mo_pairs: Vec::new(),
            sort: SortBy::default(),
            range: None,
            fthresh: None,
            show: None,
        }
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ci_thresh(mut self, thresh: f64) -> Self {
        self.ci_thresh = thresh;
        self
    }

    pub fn nosym(mut self, nosym: bool) -> Self {
        self.nosym = nosym;
        self
    }

    pub fn only_first(mut self, n: Option<usize>) -> Self {
        self.only_first = n;
        self
    }

    pub fn irrep(mut self, irrep: Option<String>) -> Self {
        self.irrep = irrep;
        self
    }

    pub fn start_mos(mut self, mos: Vec<String>) -> Self {
        self.start_mos = mos;
        self
    }

    pub fn final_mos(mut self, mos: Vec<String>) -> Self {
        self.final_mos = mos;
        self
    }

    /// `mos` is a flat list of start/final pairs
    pub fn start_final_mos(
        mut self,
        mos: &[String],
    ) -> Result<Self, UsageError> {
        if mos.len() % 2 != 0 {
            return Err(UsageError::OddMoPairs(mos.len()));
        }
        self.mo_pairs = mos
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();
        Ok(self)
    }

    pub fn sort(mut self, sort: SortBy) -> Self {
        self.sort = sort;
        self
    }

    /// `bounds` is empty for no range, otherwise see
    /// [WavelengthRange::from_bounds]
    pub fn range(mut self, bounds: &[f64]) -> Result<Self, UsageError> {
        self.range = if bounds.is_empty() {
            None
        } else {
            Some(WavelengthRange::from_bounds(bounds)?)
        };
        Ok(self)
    }

    pub fn fthresh(mut self, thresh: Option<f64>) -> Self {
        self.fthresh = thresh;
        self
    }

    pub fn show(mut self, n: Option<usize>) -> Self {
        self.show = n;
        self
    }

    /// the per-state stages: contributions and back-excitation correction,
    /// suppression of small CI coefficients, and symmetry relabeling.
    /// `only_first` is applied last
    pub fn prepare(
        &self,
        states: &mut Vec<ExcitedState>,
    ) -> Result<(), LookupError> {
        for state in states.iter_mut() {
            state.correct_backexcitations()?;
            state.suppress_low_ci_coeffs(self.ci_thresh);
            if self.nosym {
                state.symmetry = DEFAULT_IRREP.to_owned();
            }
        }
        if let Some(n) = self.only_first {
            states.truncate(n);
        }
        Ok(())
    }

    /// the list-level stages in order: irrep, start MOs, final MOs, MO
    /// pairs, sorting, wavelength range, oscillator strength threshold, and
    /// truncation
    pub fn filter(&self, mut states: Vec<ExcitedState>) -> Vec<ExcitedState> {
        if let Some(irrep) = &self.irrep {
            states.retain(|s| Irrep::same(&s.symmetry, irrep));
        }
        if !self.start_mos.is_empty() {
            states.retain(|s| {
                let mos = s.start_mos();
                self.start_mos.iter().any(|mo| mos.contains(mo.as_str()))
            });
        }
        if !self.final_mos.is_empty() {
            states.retain(|s| {
                let mos = s.final_mos();
                self.final_mos.iter().any(|mo| mos.contains(mo.as_str()))
            });
        }
        if !self.mo_pairs.is_empty() {
            states.retain(|s| {
                self.mo_pairs
                    .iter()
                    .any(|(start, fin)| s.has_mo_transition(start, fin))
            });
        }

        match self.sort {
            SortBy::Energy => {
                states.sort_by(|a, b| a.energy().total_cmp(&b.energy()));
                for (i, state) in states.iter_mut().enumerate() {
                    state.id = i + 1;
                }
            }
            SortBy::Strength => states.sort_by(|a, b| b.f.total_cmp(&a.f)),
        }

        if let Some(range) = self.range {
            states.retain(|s| range.contains(s.wavelength()));
        }
        if let Some(thresh) = self.fthresh {
            states.retain(|s| s.f >= thresh);
        }
        if let Some(n) = self.show {
            states.truncate(n);
        }
        states
    }
}

/// the state at 1-based position `id` in `states`
pub fn by_id(
    states: &[ExcitedState],
    id: usize,
) -> Result<&ExcitedState, LookupError> {
    id.checked_sub(1)
        .and_then(|i| states.get(i))
        .ok_or(LookupError::StateNotFound(id))
}

/// the lowest and highest MO touched by the visible transitions of `states`
/// for each canonical irrep
pub fn mo_extent(states: &[ExcitedState]) -> BTreeMap<String, (&str, &str)> {
    let mut ret: BTreeMap<String, (&str, &str)> = BTreeMap::new();
    for state in states {
        for (irrep, mos) in state.mos_per_irrep() {
            for mo in mos {
                ret.entry(irrep.clone())
                    .and_modify(|(lo, hi)| {
                        if mo_order(mo) < mo_order(lo) {
                            *lo = mo;
                        }
                        if mo_order(mo) > mo_order(hi) {
                            *hi = mo;
                        }
                    })
                    .or_insert((mo, mo));
            }
        }
    }
    ret
}
