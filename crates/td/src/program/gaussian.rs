//! Gaussian TD-DFT/CIS/TDA logs. Each state is announced by a line like
//!
//! ```text
//!  Excited State   2:      Singlet-A      4.9523 eV  250.36 nm  f=0.1234  <S**2>=0.000
//!       33 -> 36         0.10211
//!       35 -> 36         0.68911
//!       35 <- 36         0.11000
//! ```
//!
//! followed by its CI coefficients up to the next blank line

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::state::{Direction, ExcitedState, MoTransition, Spin};

use super::{ParseError, parse_num};


static CELL: OnceLock<[Regex; 2]> = OnceLock::new();

pub fn parse(text: &str) -> Result<Vec<ExcitedState>, ParseError> {
    let [state_re, trans_re] = CELL.get_or_init(|| {
        [
            Regex::new(
                r#"^\s*Excited State\s+(\d+):\s+([\w\.]+)-([\?\w'"]+)\s+([-\d\.]+) eV\s+([-\d\.]+) nm\s+f=([-\d\.]+)(?:\s+<S\*\*2>=([-\d\.]+))?"#,
            )
            .unwrap(),
            Regex::new(r"^\s*([\dAB]+)\s*(->|<-)\s*([\dAB]+)\s+([-\d\.]+)")
                .unwrap(),
        ]
    });

    let mut states: Vec<ExcitedState> = Vec::new();
    let mut in_state = false;
    for line in text.lines() {
        if in_state {
            if let Some(caps) = trans_re.captures(line) {
                if let Some(state) = states.last_mut() {
                    state.add_mo_transition(transition(&caps)?);
                }
                continue;
            } else if line.trim().is_empty() {
                in_state = false;
                continue;
            }
        }
        if let Some(caps) = state_re.captures(line) {
            let s2 = caps
                .get(7)
                .map(|m| parse_num(m.as_str(), "<S**2>"))
                .transpose()?;
            states.push(ExcitedState::new(
                parse_num(&caps[1], "state number")?,
                &caps[2],
                &caps[3],
                parse_num(&caps[4], "excitation energy")?,
                parse_num(&caps[6], "oscillator strength")?,
                s2,
            ));
            in_state = true;
        }
    }
    log::debug!("found {} excited states", states.len());

    Ok(states)
}

/// `X -> Y` is a forward excitation from X to Y. `X <- Y` is its
/// back-excitation, stored as running from Y to X
fn transition(caps: &Captures) -> Result<MoTransition, ParseError> {
    let direction: Direction = caps[2]
        .parse()
        .map_err(|_| ParseError::MalformedTransition(caps[0].to_owned()))?;
    let (start, fin) = match direction {
        Direction::Forward => (&caps[1], &caps[3]),
        Direction::Backward => (&caps[3], &caps[1]),
    };
    Ok(
        MoTransition::new(
            start,
            direction,
            fin,
            parse_num(&caps[4], "CI coefficient")?,
        )
        .spins(suffix_spin(start), suffix_spin(fin)),
    )
}

/// unrestricted calculations label orbitals `34A` and `34B`
fn suffix_spin(label: &str) -> Spin {
    if label.ends_with('B') {
        Spin::Beta
    } else {
        Spin::Alpha
    }
}
