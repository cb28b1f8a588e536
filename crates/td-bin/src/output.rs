//! the text renderings of a list of excited states

use std::io::{self, Write};

use td::{ExcitedState, MoNames, MoTransition};

#[cfg(test)]
mod tests;

pub const HEADERS: [&str; 7] =
    ["#", "2S+1", "Spat.", "dE in eV", "l in nm", "f", "<S**2>"];

const TIDDLY_HEADERS: [&str; 6] =
    ["State", "λ / nm", "E / eV", "f", "Transition", "Weight"];

fn width(s: &str) -> usize {
    s.chars().count()
}

fn is_numeric(column: &[&str]) -> bool {
    !column.is_empty() && column.iter().all(|s| s.parse::<f64>().is_ok())
}

fn align(cells: &[&str], widths: &[usize], numeric: &[bool]) -> String {
    let cells: Vec<String> = cells
        .iter()
        .zip(widths.iter().zip(numeric))
        .map(|(cell, (&w, &num))| {
            let pad = " ".repeat(w.saturating_sub(width(cell)));
            if num {
                format!("{pad}{cell}")
            } else {
                format!("{cell}{pad}")
            }
        })
        .collect();
    cells.join("  ").trim_end().to_owned()
}

/// write `rows` under `headers` as a plain text table. numeric columns are
/// right-aligned, everything else left-aligned
pub fn table<W: Write>(
    w: &mut W,
    headers: &[&str],
    rows: &[Vec<String>],
) -> io::Result<()> {
    let ncols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
    let mut numeric = Vec::with_capacity(ncols);
    for (i, n) in widths.iter_mut().enumerate() {
        let column: Vec<&str> = rows
            .iter()
            .map(|r| r.get(i).map_or("", String::as_str))
            .collect();
        for cell in &column {
            *n = (*n).max(width(cell));
        }
        numeric.push(is_numeric(&column));
    }

    let line = |cells: Vec<&str>| align(&cells, &widths, &numeric);
    writeln!(w, "{}", line(headers.to_vec()))?;
    let rule: Vec<String> = widths.iter().map(|&n| "-".repeat(n)).collect();
    writeln!(w, "{}", rule.join("  "))?;
    for row in rows {
        writeln!(w, "{}", line(row.iter().map(String::as_str).collect()))?;
    }
    Ok(())
}

/// the default table of states
pub fn state_table<W: Write>(
    w: &mut W,
    states: &[ExcitedState],
) -> io::Result<()> {
    let rows: Vec<Vec<String>> =
        states.iter().map(|s| s.as_row().to_vec()).collect();
    table(w, &HEADERS, &rows)
}

/// the default table split into chunks of `size` states
pub fn chunked<W: Write>(
    w: &mut W,
    states: &[ExcitedState],
    size: usize,
) -> io::Result<()> {
    for (i, chunk) in states.chunks(size.max(1)).enumerate() {
        writeln!(w, "### Chunk {} ###", i + 1)?;
        state_table(w, chunk)?;
        writeln!(w)?;
    }
    Ok(())
}

/// one tab-separated row per state with the columns of the default table.
/// numbers are written unrounded
pub fn raw<W: Write>(w: &mut W, states: &[ExcitedState]) -> io::Result<()> {
    for state in states {
        let s2 = match state.s2 {
            Some(s2) => s2.to_string(),
            None => String::from("???"),
        };
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{s2}",
            state.id,
            state.spin,
            state.symmetry,
            state.energy(),
            state.wavelength(),
            state.f,
        )?;
    }
    Ok(())
}

/// a LaTeX tabular for the booktabs package with the id, symmetry, energy,
/// wavelength, and oscillator strength of each state
pub fn booktabs<W: Write>(
    w: &mut W,
    states: &[ExcitedState],
) -> io::Result<()> {
    let rows: Vec<[String; 5]> = states
        .iter()
        .map(|s| {
            [
                s.id.to_string(),
                s.symmetry.clone(),
                format!("{:.2}", s.energy()),
                format!("{:.1}", s.wavelength()),
                format!("{:.4}", s.f),
            ]
        })
        .collect();
    let mut widths = [0; 5];
    for row in &rows {
        for (n, cell) in widths.iter_mut().zip(row) {
            *n = (*n).max(width(cell));
        }
    }
    writeln!(w, r"\begin{{tabular}}{{rlrrr}}")?;
    writeln!(w, r"\toprule")?;
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, n))| {
                if i == 1 {
                    format!("{cell:<n$}")
                } else {
                    format!("{cell:>n$}")
                }
            })
            .collect();
        writeln!(w, r" {} \\", cells.join(" & "))?;
    }
    writeln!(w, r"\bottomrule")?;
    writeln!(w, r"\end{{tabular}}")?;
    Ok(())
}

/// the visible transitions of `state`, each followed by the names of its
/// orbitals when both are known
pub fn transitions<W: Write>(
    w: &mut W,
    state: &ExcitedState,
    names: Option<&MoNames>,
) -> io::Result<()> {
    for t in state.visible_transitions() {
        writeln!(w, "{t}")?;
        if let Some((start, fin)) = names.and_then(|n| name_pair(n, t)) {
            writeln!(w, "\t\t{start} -> {fin}")?;
        }
    }
    Ok(())
}

fn name_pair<'a>(
    names: &'a MoNames,
    t: &MoTransition,
) -> Option<(&'a str, &'a str)> {
    let (mo, irrep) = t.start_key();
    let start = names.get(mo, irrep)?;
    let (mo, irrep) = t.final_key();
    let fin = names.get(mo, irrep)?;
    Some((start, fin))
}

/// a one-row table per state followed by its transitions
pub fn summary<W: Write>(
    w: &mut W,
    states: &[ExcitedState],
    names: Option<&MoNames>,
) -> io::Result<()> {
    for state in states {
        state_table(w, std::slice::from_ref(state))?;
        transitions(w, state, names)?;
        writeln!(w)?;
    }
    Ok(())
}

/// a TiddlyWiki table listing each state with its transitions and their
/// weights
pub fn tiddly<W: Write>(
    w: &mut W,
    states: &[ExcitedState],
    names: Option<&MoNames>,
) -> io::Result<()> {
    let name = |mo: &str, irrep: &str| {
        names.and_then(|n| n.get(mo, irrep)).unwrap_or("")
    };
    writeln!(w, "|! {} |", TIDDLY_HEADERS.join(" |! "))?;
    for state in states {
        let mut trans = Vec::new();
        let mut weights = Vec::new();
        for t in state.visible_transitions() {
            trans.push(format!(
                "{} ({} {}) → {} ({} {})",
                name(&t.start_mo, &t.start_irrep),
                t.start_mo,
                t.start_irrep,
                name(&t.final_mo, &t.final_irrep),
                t.final_mo,
                t.final_irrep,
            ));
            weights.push(format!(
                "{:.0}%",
                100.0 * t.contribution.unwrap_or_default()
            ));
        }
        let cells = [
            format!("S{}", state.id),
            format!("{:.1}", state.wavelength()),
            format!("{:.2}", state.energy()),
            format!("{:.4}", state.f),
            trans.join("<br>"),
            weights.join("<br>"),
        ];
        writeln!(w, "| {} |", cells.join(" | "))?;
    }
    Ok(())
}

/// the resonance Raman weights of `states` that reach `thresh`
pub fn rr_weights<W: Write>(
    w: &mut W,
    states: &[ExcitedState],
    thresh: f64,
) -> io::Result<()> {
    let rows: Vec<Vec<String>> = states
        .iter()
        .filter_map(|s| {
            let weight = s.rr_weight?;
            (weight >= thresh)
                .then(|| vec![s.id.to_string(), format!("{weight:.6}")])
        })
        .collect();
    table(w, &["#", "RR weight"], &rows)
}

/// the CI threshold and the MO range touched in each irrep
pub fn footer<W: Write>(
    w: &mut W,
    ci_thresh: f64,
    states: &[ExcitedState],
) -> io::Result<()> {
    writeln!(
        w,
        "Only considering transitions with CI-coefficients >= {ci_thresh}:"
    )?;
    for (irrep, (lo, hi)) in td::pipeline::mo_extent(states) {
        writeln!(w, "Irrep {irrep}: MOs {lo} - {hi}")?;
    }
    Ok(())
}
