use std::{
    collections::{BTreeMap, BTreeSet},
    error::Error,
    fmt::Display,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    consts::{EV2NM, NM2CM, RR_GAMMA},
    irrep::Irrep,
};

#[cfg(test)]
mod tests;

/// the irrep assumed for orbitals and states when a program doesn't print one
pub const DEFAULT_IRREP: &str = "A";

#[derive(Debug, PartialEq)]
pub enum LookupError {
    /// no excited state at this 1-based position
    StateNotFound(usize),
    /// a back-excitation `start_mo <- final_mo` without the forward
    /// excitation it should be netted against
    MissingForward {
        state: usize,
        start_mo: String,
        final_mo: String,
    },
    /// no impulse at this 1-based position
    ImpulseNotFound(usize),
}

impl Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::StateNotFound(id) => {
                write!(f, "Excited state with id #{id} not found.")
            }
            LookupError::MissingForward {
                state,
                start_mo,
                final_mo,
            } => write!(
                f,
                "state {state}: back-excitation {start_mo} -> {final_mo} has \
                 no matching excitation {final_mo} -> {start_mo}"
            ),
            LookupError::ImpulseNotFound(id) => {
                write!(f, "no excited state #{id} to highlight")
            }
        }
    }
}

impl Error for LookupError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    /// de-excitation component, netted against its forward partner and never
    /// displayed on its own
    Backward,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Direction::Forward => "->",
            Direction::Backward => "<-",
        })
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "->" | "→" => Ok(Direction::Forward),
            "<-" | "←" => Ok(Direction::Backward),
            _ => Err(format!("unrecognized transition arrow `{s}`")),
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum Spin {
    #[default]
    Alpha,
    Beta,
}

impl Spin {
    /// interpret the spin tokens used by the different programs. anything that
    /// isn't recognizably beta, including an empty string for closed-shell
    /// output, is alpha
    pub fn from_token(s: &str) -> Self {
        match s.trim() {
            "b" | "B" | "beta" | "Beta" => Spin::Beta,
            _ => Spin::Alpha,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Spin::Alpha => 'a',
            Spin::Beta => 'b',
        }
    }
}

impl Display for Spin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Spin::Alpha => "alpha",
            Spin::Beta => "beta",
        })
    }
}

/// one orbital-to-orbital component of an excited state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoTransition {
    pub start_mo: String,
    pub final_mo: String,
    pub direction: Direction,
    pub start_spin: Spin,
    pub final_spin: Spin,
    pub start_irrep: String,
    pub final_irrep: String,

    /// signed CI coefficient. 0 when the program only reports the weight
    pub ci_coeff: f64,

    /// fractional weight of the transition in the state. `None` until either
    /// parsed directly or derived by [ExcitedState::calculate_contributions]
    pub contribution: Option<f64>,
}

impl MoTransition {
    pub fn new(
        start_mo: impl Into<String>,
        direction: Direction,
        final_mo: impl Into<String>,
        ci_coeff: f64,
    ) -> Self {
        Self {
            start_mo: start_mo.into(),
            final_mo: final_mo.into(),
            direction,
            start_spin: Spin::Alpha,
            final_spin: Spin::Alpha,
            start_irrep: DEFAULT_IRREP.to_owned(),
            final_irrep: DEFAULT_IRREP.to_owned(),
            ci_coeff,
            contribution: None,
        }
    }

    pub fn spins(mut self, start: Spin, fin: Spin) -> Self {
        self.start_spin = start;
        self.final_spin = fin;
        self
    }

    /// empty labels keep the default irrep
    pub fn irreps(mut self, start: &str, fin: &str) -> Self {
        if !start.is_empty() {
            self.start_irrep = start.to_owned();
        }
        if !fin.is_empty() {
            self.final_irrep = fin.to_owned();
        }
        self
    }

    pub fn contribution(mut self, contribution: f64) -> Self {
        self.contribution = Some(contribution);
        self
    }

    pub fn is_backward(&self) -> bool {
        self.direction == Direction::Backward
    }

    /// key into an MO name table for the starting orbital
    pub fn start_key(&self) -> (&str, &str) {
        (&self.start_mo, &self.start_irrep)
    }

    /// key into an MO name table for the final orbital
    pub fn final_key(&self) -> (&str, &str) {
        (&self.final_mo, &self.final_irrep)
    }
}

impl Display for MoTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let coeff = if self.ci_coeff < 0.0 {
            format!("{:.3}", self.ci_coeff)
        } else {
            format!(" {:.3}", self.ci_coeff)
        };
        let weight = match self.contribution {
            Some(c) => format!("{:.1}%", 100.0 * c),
            None => String::from("?"),
        };
        write!(
            f,
            "\t{:>5}{} {} {} {:>5}{} {}\t{coeff:>5}\t{weight}",
            self.start_mo,
            self.start_irrep,
            self.start_spin.letter(),
            self.direction,
            self.final_mo,
            self.final_irrep,
            self.final_spin.letter(),
        )
    }
}

/// the leading integer of an MO label like `34` or `34A`, if there is one
pub fn mo_number(label: &str) -> Option<usize> {
    let end = label
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(label.len());
    label[..end].parse().ok()
}

/// ordering for MO labels: numerically by [mo_number] where possible, then
/// lexically
pub fn mo_order(label: &str) -> (Option<usize>, &str) {
    (mo_number(label), label)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExcitedState {
    pub id: usize,

    /// multiplicity token as printed: `Singlet`, `triplet`, `1`, or empty
    /// when the program omits it
    pub spin: String,

    /// spatial symmetry of the state as printed by the program
    pub symmetry: String,

    /// excitation energy in eV
    energy: f64,

    /// always `EV2NM / energy`
    wavelength: f64,

    /// oscillator strength
    pub f: f64,

    /// <S**2>, if the program reports it
    pub s2: Option<f64>,

    pub rr_weight: Option<f64>,

    pub mo_transitions: Vec<MoTransition>,
}

impl ExcitedState {
    /// the wavelength is derived from `energy` (in eV) here and nowhere else
    pub fn new(
        id: usize,
        spin: impl Into<String>,
        symmetry: impl Into<String>,
        energy: f64,
        f: f64,
        s2: Option<f64>,
    ) -> Self {
        Self {
            id,
            spin: spin.into(),
            symmetry: symmetry.into(),
            energy,
            wavelength: EV2NM / energy,
            f,
            s2,
            rr_weight: None,
            mo_transitions: Vec::new(),
        }
    }

    /// excitation energy in eV
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// wavelength in nm
    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    pub fn add_mo_transition(&mut self, transition: MoTransition) {
        self.mo_transitions.push(transition);
    }

    /// the transitions to show to a user, skipping back-excitations
    pub fn visible_transitions(&self) -> impl Iterator<Item = &MoTransition> {
        self.mo_transitions.iter().filter(|t| !t.is_backward())
    }

    pub fn start_mos(&self) -> BTreeSet<&str> {
        self.visible_transitions()
            .map(|t| t.start_mo.as_str())
            .collect()
    }

    pub fn final_mos(&self) -> BTreeSet<&str> {
        self.visible_transitions()
            .map(|t| t.final_mo.as_str())
            .collect()
    }

    /// whether a visible transition runs from `start_mo` to `final_mo`
    pub fn has_mo_transition(&self, start_mo: &str, final_mo: &str) -> bool {
        self.visible_transitions()
            .any(|t| t.start_mo == start_mo && t.final_mo == final_mo)
    }

    /// `singlet` in any case, or a bare multiplicity of 1
    pub fn is_singlet(&self) -> bool {
        let spin = self.spin.trim();
        spin.eq_ignore_ascii_case("singlet") || spin == "1"
    }

    /// squared CI coefficients of singlets count both spin components
    pub fn doubling_factor(&self) -> f64 {
        if self.is_singlet() { 2.0 } else { 1.0 }
    }

    /// fill in every missing contribution as `ci_coeff² × doubling_factor`.
    /// contributions that are already set, whether parsed or computed by an
    /// earlier call, are left alone
    pub fn calculate_contributions(&mut self) {
        let factor = self.doubling_factor();
        for t in &mut self.mo_transitions {
            if t.contribution.is_none() {
                t.contribution = Some(t.ci_coeff * t.ci_coeff * factor);
            }
        }
    }

    /// subtract the weight of every back-excitation `A <- B`, stored with
    /// start `B` and final `A`, from its forward partner `A -> B`
    pub fn correct_backexcitations(&mut self) -> Result<(), LookupError> {
        self.calculate_contributions();
        let mut corrections = Vec::new();
        for back in self.mo_transitions.iter().filter(|t| t.is_backward()) {
            let Some(idx) = self.mo_transitions.iter().position(|t| {
                !t.is_backward()
                    && t.start_mo == back.final_mo
                    && t.final_mo == back.start_mo
            }) else {
                return Err(LookupError::MissingForward {
                    state: self.id,
                    start_mo: back.start_mo.clone(),
                    final_mo: back.final_mo.clone(),
                });
            };
            corrections.push((idx, back.contribution.unwrap_or_default()));
        }
        for (idx, amount) in corrections {
            let t = &mut self.mo_transitions[idx];
            t.contribution = Some(t.contribution.unwrap_or_default() - amount);
        }
        Ok(())
    }

    /// drop transitions whose contribution is at most `thresh² ×
    /// doubling_factor`, or whose |CI coefficient| is at most `thresh` when
    /// the contribution is unknown. `thresh` is a CI coefficient, not a
    /// percentage
    pub fn suppress_low_ci_coeffs(&mut self, thresh: f64) {
        let contrib_thresh = thresh * thresh * self.doubling_factor();
        self.mo_transitions.retain(|t| match t.contribution {
            Some(c) => c > contrib_thresh,
            None => t.ci_coeff.abs() > thresh,
        });
    }

    /// resonance Raman weight for an excitation wavelength `exc` in nm:
    /// `f × |iΓ / (Δ - iΓ)|` with Δ the difference between the state and the
    /// excitation in cm-1 and Γ = 1500 cm-1. the result is stored and
    /// returned
    pub fn calc_rr_weight(&mut self, exc: f64) -> f64 {
        let delta = NM2CM / self.wavelength - NM2CM / exc;
        let weight = self.f * RR_GAMMA / delta.hypot(RR_GAMMA);
        self.rr_weight = Some(weight);
        weight
    }

    /// the canonical irreps of every orbital touched by a visible transition
    pub fn irreps(&self) -> BTreeSet<String> {
        self.mos_per_irrep().into_keys().collect()
    }

    /// MO labels of the visible transitions grouped by canonical irrep
    pub fn mos_per_irrep(&self) -> BTreeMap<String, Vec<&str>> {
        let mut ret: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for t in self.visible_transitions() {
            ret.entry(Irrep::canonical(&t.start_irrep))
                .or_default()
                .push(&t.start_mo);
            ret.entry(Irrep::canonical(&t.final_irrep))
                .or_default()
                .push(&t.final_mo);
        }
        ret
    }

    /// the columns of the default table: id, spin, symmetry, energy,
    /// wavelength, f, and <S**2>
    pub fn as_row(&self) -> [String; 7] {
        [
            self.id.to_string(),
            self.spin.clone(),
            self.symmetry.clone(),
            format!("{:.2}", self.energy),
            format!("{:.1}", self.wavelength),
            format!("{:.5}", self.f),
            match self.s2 {
                Some(s2) => format!("{s2:.3}"),
                None => String::from("???"),
            },
        ]
    }
}

impl Display for ExcitedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {:.4} eV f={:.4}", self.id, self.energy, self.f)
    }
}
