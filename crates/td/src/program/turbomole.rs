//! TURBOMOLE `escf` and `ricc2` output. Unlike the Gaussian and ORCA readers,
//! these collect each per-state quantity across the whole file and zip the
//! groups together afterwards, so every group has to come out the same length

use std::sync::OnceLock;

use regex::Regex;

use crate::{
    consts::HARTREE2EV,
    state::{Direction, ExcitedState, MoTransition, Spin},
};

use super::{ParseError, check_counts, parse_num};


static ESCF: OnceLock<[Regex; 5]> = OnceLock::new();
static RICC2: OnceLock<[Regex; 4]> = OnceLock::new();

/// one state's entries from the escf dominant-contribution table: start MO,
/// irrep, and spin, then the same for the final MO, then the weight in percent
type EscfContribution<'a> =
    (&'a str, &'a str, &'a str, &'a str, &'a str, &'a str, &'a str);

pub fn parse_escf(text: &str) -> Result<Vec<ExcitedState>, ParseError> {
    let [sym_re, energy_re, osc_re, block_re, contrib_re] =
        ESCF.get_or_init(|| {
            [
                // open-shell runs drop the multiplicity
                Regex::new(
                    r#"(\d+)\s+(singlet|doublet|triplet|quartet|quintet|sextet)?\s*([\w'"]+)\s+excitation"#,
                )
                .unwrap(),
                Regex::new(r"Excitation energy:\s*([\d\.E\+-]+)").unwrap(),
                Regex::new(r"mixed representation:\s*([\d\.E\+-]+)").unwrap(),
                Regex::new(r"(?s)2\*100(.*?)Change of electron number")
                    .unwrap(),
                Regex::new(
                    r#"(\d+) ([\w'"]+)\s*(beta|alpha)?\s+([-\d\.]+)\s*(\d+) ([\w'"]+)\s*(beta|alpha)?\s+([-\d\.]+)\s*([\d\.]+)"#,
                )
                .unwrap(),
            ]
        });

    let syms: Vec<(&str, &str, &str)> = sym_re
        .captures_iter(text)
        .map(|c| {
            let get = |i| c.get(i).map_or("", |m| m.as_str());
            (get(1), get(2), get(3))
        })
        .collect();
    let energies: Vec<&str> = energy_re
        .captures_iter(text)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .collect();
    let oscs: Vec<&str> = osc_re
        .captures_iter(text)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .collect();
    let blocks: Vec<Vec<EscfContribution>> = block_re
        .captures_iter(text)
        .map(|block| {
            let block = block.get(1).map_or("", |m| m.as_str());
            contrib_re
                .captures_iter(block)
                .map(|c| {
                    let get = |i| c.get(i).map_or("", |m| m.as_str());
                    (get(1), get(2), get(3), get(5), get(6), get(7), get(9))
                })
                .collect()
        })
        .collect();
    log::debug!(
        "escf: {} symmetries, {} energies, {} oscillator strengths, \
         {} contribution blocks",
        syms.len(),
        energies.len(),
        oscs.len(),
        blocks.len()
    );
    check_counts(&[
        ("symmetries", syms.len()),
        ("excitation energies", energies.len()),
        ("oscillator strengths", oscs.len()),
        ("contribution blocks", blocks.len()),
    ])?;

    let mut states = Vec::with_capacity(syms.len());
    for (((id, spin, sym), energy), (osc, block)) in
        syms.into_iter().zip(energies).zip(oscs.into_iter().zip(blocks))
    {
        let energy: f64 = parse_num(energy, "excitation energy")?;
        let mut state = ExcitedState::new(
            parse_num(id, "state number")?,
            spin,
            sym,
            energy * HARTREE2EV,
            parse_num(osc, "oscillator strength")?,
            None,
        );
        for (start, start_irrep, start_spin, fin, final_irrep, final_spin, pct) in block {
            let pct: f64 = parse_num(pct, "contribution")?;
            state.add_mo_transition(
                MoTransition::new(start, Direction::Forward, fin, 0.0)
                    .spins(
                        Spin::from_token(start_spin),
                        Spin::from_token(final_spin),
                    )
                    .irreps(start_irrep, final_irrep)
                    .contribution(pct / 100.0),
            );
        }
        states.push(state);
    }

    Ok(states)
}

pub fn parse_ricc2(text: &str) -> Result<Vec<ExcitedState>, ParseError> {
    let [sym_re, energy_re, osc_re, block_re] = RICC2.get_or_init(|| {
        [
            Regex::new(
                r#"symmetry, multiplicity:\s*(\d+)\s*([\w"']+)\s*(\d+)"#,
            )
            .unwrap(),
            Regex::new(r"frequency\s*:.+?([\d\.]+)\s*e\.V\.").unwrap(),
            Regex::new(r"oscillator strength.+?length gauge\)\s*:\s*([\d\.]+)")
                .unwrap(),
            Regex::new(r"(?s)occ\. orb\..+?%\s*\|(.+?)\s*norm").unwrap(),
        ]
    });

    let mut syms: Vec<(&str, &str, &str)> = sym_re
        .captures_iter(text)
        .map(|c| {
            let get = |i| c.get(i).map_or("", |m| m.as_str());
            (get(1), get(2), get(3))
        })
        .collect();
    let mut energies: Vec<&str> = energy_re
        .captures_iter(text)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .collect();
    let oscs: Vec<&str> = osc_re
        .captures_iter(text)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .collect();
    let blocks = block_re
        .captures_iter(text)
        .map(|c| ricc2_block(c.get(1).map_or("", |m| m.as_str())))
        .collect::<Result<Vec<_>, _>>()?;

    check_counts(&[
        ("symmetries", syms.len()),
        ("excitation energies", energies.len()),
    ])?;
    // excited state property runs list the symmetries and energies a second
    // time, but the oscillator strengths and MO contributions only once. the
    // second half is identical to the first
    if !oscs.is_empty() && syms.len() == 2 * oscs.len() {
        log::debug!("ricc2: dropping repeated listing of {} states", oscs.len());
        syms.truncate(oscs.len());
        energies.truncate(oscs.len());
    }
    check_counts(&[
        ("symmetries", syms.len()),
        ("excitation energies", energies.len()),
        ("oscillator strengths", oscs.len()),
        ("contribution blocks", blocks.len()),
    ])?;

    let mut states = Vec::with_capacity(syms.len());
    for (((id, sym, mult), energy), (osc, block)) in
        syms.into_iter().zip(energies).zip(oscs.into_iter().zip(blocks))
    {
        let mut state = ExcitedState::new(
            parse_num(id, "state number")?,
            mult,
            sym,
            parse_num(energy, "excitation energy")?,
            parse_num(osc, "oscillator strength")?,
            None,
        );
        for t in block {
            state.add_mo_transition(t);
        }
        states.push(state);
    }

    Ok(states)
}

/// parse the body of one ricc2 contribution table. the first and last lines
/// are table rules. rows have 10 fields, `start irrep index spin final irrep
/// index spin coeff percent`, or 8 when closed-shell output omits the spins
fn ricc2_block(block: &str) -> Result<Vec<MoTransition>, ParseError> {
    let lines: Vec<&str> = block.trim().lines().collect();
    if lines.len() < 2 {
        return Ok(Vec::new());
    }
    let mut ret = Vec::new();
    for line in &lines[1..lines.len() - 1] {
        let cleaned = line.replace(['|', '(', ')'], " ");
        let mut fields: Vec<&str> = cleaned.split_whitespace().collect();
        if fields.len() == 8 {
            fields.insert(3, "a");
            fields.insert(7, "a");
        }
        let [
            start,
            start_irrep,
            _,
            start_spin,
            fin,
            final_irrep,
            _,
            final_spin,
            coeff,
            pct,
        ] = fields[..]
        else {
            return Err(ParseError::MalformedTransition(
                line.trim().to_owned(),
            ));
        };
        let pct: f64 = parse_num(pct, "contribution")?;
        ret.push(
            MoTransition::new(
                start,
                Direction::Forward,
                fin,
                parse_num(coeff, "CI coefficient")?,
            )
            .spins(Spin::from_token(start_spin), Spin::from_token(final_spin))
            .irreps(start_irrep, final_irrep)
            .contribution(pct / 100.0),
        );
    }
    Ok(ret)
}
