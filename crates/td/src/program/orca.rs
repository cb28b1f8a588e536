//! ORCA TD-DFT, TDA, and CIS output. States come from the `EXCITED STATES`
//! blocks
//!
//! ```text
//! STATE  1:  E=   0.154929 au      4.216 eV    34003.3 cm**-1 <S**2> =   0.000000
//!     29a ->  32a  :     0.010853 (c= -0.10417666)
//!     31a ->  32a  :     0.976538 (c=  0.98820933)
//! ```
//!
//! and the oscillator strengths from the electric dipole absorption spectrum
//! table that follows them

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::{
    consts::HARTREE2EV,
    state::{DEFAULT_IRREP, Direction, ExcitedState, MoTransition, Spin},
};

use super::{ParseError, check_counts, parse_num};


static CELL: OnceLock<[Regex; 6]> = OnceLock::new();

pub fn parse(text: &str) -> Result<Vec<ExcitedState>, ParseError> {
    let [header_re, state_re, s2_re, trans_re, spectrum_re, row_re] = CELL
        .get_or_init(|| {
            [
                Regex::new(r"EXCITED STATES(?:\s*\((SINGLETS|TRIPLETS)\))?")
                    .unwrap(),
                Regex::new(r"^\s*STATE\s+(\d+):\s+E=\s*([-\d\.]+)\s+au")
                    .unwrap(),
                Regex::new(r"<S\*\*2>\s*=\s*([-\d\.]+)").unwrap(),
                Regex::new(
                    r"^\s*(\d+)([ab])\s*(->|<-)\s*(\d+)([ab])\s*:\s*([-\d\.]+)(?:\s*\(c=\s*([-\d\.]+)\))?",
                )
                .unwrap(),
                Regex::new(
                    r"ABSORPTION SPECTRUM VIA TRANSITION ELECTRIC DIPOLE MOMENTS",
                )
                .unwrap(),
                Regex::new(r"^\s*(\d+)\s+[-\d\.]+\s+[-\d\.]+\s+([-\d\.]+)")
                    .unwrap(),
            ]
        });

    let mut states: Vec<ExcitedState> = Vec::new();
    let mut oscs: Vec<f64> = Vec::new();
    let mut spin = String::new();
    let mut in_spectrum = false;
    let mut spectrum_done = false;
    for line in text.lines() {
        if in_spectrum {
            if let Some(caps) = row_re.captures(line) {
                oscs.push(parse_num(&caps[2], "oscillator strength")?);
            } else if line.trim().is_empty() && !oscs.is_empty() {
                in_spectrum = false;
                spectrum_done = true;
            }
        } else if let Some(caps) = state_re.captures(line) {
            let energy: f64 = parse_num(&caps[2], "excitation energy")?;
            let s2 = s2_re
                .captures(line)
                .map(|c| parse_num(&c[1], "<S**2>"))
                .transpose()?;
            states.push(ExcitedState::new(
                parse_num(&caps[1], "state number")?,
                spin.as_str(),
                DEFAULT_IRREP,
                energy * HARTREE2EV,
                0.0,
                s2,
            ));
        } else if let Some(caps) = trans_re.captures(line) {
            let Some(state) = states.last_mut() else {
                return Err(ParseError::MalformedTransition(line.to_owned()));
            };
            state.add_mo_transition(transition(&caps)?);
        } else if let Some(caps) = header_re.captures(line) {
            spin = caps
                .get(1)
                .map(|m| m.as_str().trim_end_matches('S').to_lowercase())
                .unwrap_or_default();
        } else if !spectrum_done && spectrum_re.is_match(line) {
            in_spectrum = true;
        }
    }

    // triplets are spin-forbidden and missing from the spectrum table
    let mut bright: Vec<_> =
        states.iter_mut().filter(|s| s.spin != "triplet").collect();
    log::debug!(
        "found {} excited states, {} oscillator strengths",
        bright.len(),
        oscs.len()
    );
    check_counts(&[
        ("non-triplet states", bright.len()),
        ("oscillator strengths", oscs.len()),
    ])?;
    for (state, f) in bright.iter_mut().zip(oscs) {
        state.f = f;
    }

    Ok(states)
}

/// the printed weight is already the contribution. the coefficient is only
/// printed by newer versions and is left at 0 otherwise
fn transition(caps: &Captures) -> Result<MoTransition, ParseError> {
    let direction: Direction = caps[3]
        .parse()
        .map_err(|_| ParseError::MalformedTransition(caps[0].to_owned()))?;
    let (start, start_spin, fin, final_spin) = match direction {
        Direction::Forward => (&caps[1], &caps[2], &caps[4], &caps[5]),
        Direction::Backward => (&caps[4], &caps[5], &caps[1], &caps[2]),
    };
    let ci_coeff = caps
        .get(7)
        .map(|m| parse_num(m.as_str(), "CI coefficient"))
        .transpose()?
        .unwrap_or(0.0);
    Ok(MoTransition::new(start, direction, fin, ci_coeff)
        .spins(Spin::from_token(start_spin), Spin::from_token(final_spin))
        .contribution(parse_num(&caps[6], "transition weight")?))
}
