//! an HTML page pairing the natural transition orbital pictures rendered by
//! THEOdore with the excited states they belong to. the pictures are expected
//! in `./theodore` and named `NTO{state}{irrep}_{pair}{o|v}_{weight}.png`

use std::{collections::BTreeMap, fmt::Write, path::Path, sync::OnceLock};

use anyhow::{Context, bail};
use regex::Regex;
use td::{ExcitedState, Irrep};

#[cfg(test)]
mod tests;

/// the report written by [write_report]
pub const REPORT: &str = "theo_comb.html";

/// pictures of NTO pairs below this weight are left out
const MIN_WEIGHT: f64 = 0.2;

static NTO_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Clone, Debug, PartialEq)]
pub struct Nto {
    pub file: String,
    pub state: usize,
    pub irrep: String,
    pub pair: usize,
    pub occupied: bool,
    pub weight: f64,
}

impl Nto {
    /// `None` if `file` doesn't follow the THEOdore naming scheme
    pub fn from_file_name(file: &str) -> Option<Self> {
        let re = NTO_RE.get_or_init(|| {
            Regex::new(r#"^NTO(\d+)([\w'"]+?)_(\d+)(o|v)_([\d\.]+)\.png$"#)
                .unwrap()
        });
        let caps = re.captures(file)?;
        Some(Self {
            file: file.to_owned(),
            state: caps[1].parse().ok()?,
            irrep: Irrep::canonical(&caps[2]),
            pair: caps[3].parse().ok()?,
            occupied: &caps[4] == "o",
            weight: caps[5].parse().ok()?,
        })
    }
}

/// occupied and virtual pictures of one NTO pair
#[derive(Clone, Debug, PartialEq)]
pub struct NtoPair {
    pub occupied: String,
    pub virt: String,
    pub weight: f64,
}

/// group `ntos` by state and irrep into occupied/virtual pairs, heaviest
/// first, dropping pairs below [MIN_WEIGHT]
pub fn pair_up(
    mut ntos: Vec<Nto>,
) -> anyhow::Result<BTreeMap<(usize, String), Vec<NtoPair>>> {
    ntos.retain(|n| n.weight >= MIN_WEIGHT);
    ntos.sort_by(|a, b| {
        (a.state, &a.irrep)
            .cmp(&(b.state, &b.irrep))
            .then(b.weight.total_cmp(&a.weight))
            .then(a.pair.cmp(&b.pair))
            // o before v
            .then(b.occupied.cmp(&a.occupied))
    });
    let mut ret: BTreeMap<(usize, String), Vec<NtoPair>> = BTreeMap::new();
    let mut iter = ntos.chunks_exact(2);
    for pair in iter.by_ref() {
        let (o, v) = (&pair[0], &pair[1]);
        if !o.occupied
            || v.occupied
            || (o.state, &o.irrep, o.pair) != (v.state, &v.irrep, v.pair)
        {
            bail!("NTO pictures {} and {} don't form a pair", o.file, v.file);
        }
        ret.entry((o.state, o.irrep.clone())).or_default().push(NtoPair {
            occupied: o.file.clone(),
            virt: v.file.clone(),
            weight: o.weight,
        });
    }
    if let [extra] = iter.remainder() {
        bail!("NTO picture {} has no partner", extra.file);
    }
    Ok(ret)
}

/// every NTO picture in `dir`
pub fn find_ntos(dir: impl AsRef<Path>) -> anyhow::Result<Vec<Nto>> {
    let dir = dir.as_ref();
    let mut ret = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read {}", dir.display()))?
    {
        let name = entry?.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(nto) = Nto::from_file_name(name) {
            ret.push(nto);
        } else if name.ends_with(".png") {
            log::warn!("skipping unrecognized picture {name}");
        }
    }
    Ok(ret)
}

/// the HTML page for `states`. states without pictures are skipped
pub fn render(
    states: &[ExcitedState],
    ntos: &BTreeMap<(usize, String), Vec<NtoPair>>,
    pic_dir: &str,
    title: &str,
) -> Result<String, std::fmt::Error> {
    let mut s = String::new();
    writeln!(s, "<!DOCTYPE html>")?;
    writeln!(s, "<html>\n<head>\n<meta charset=\"utf-8\">")?;
    writeln!(s, "<title>{title}</title>\n</head>\n<body>")?;
    writeln!(s, "<h1>{title}</h1>")?;
    for state in states {
        let key = (state.id, Irrep::canonical(&state.symmetry));
        let Some(pairs) = ntos.get(&key) else {
            continue;
        };
        writeln!(
            s,
            "<h2>S{} ({}): {:.2} eV, {:.1} nm, f = {:.4}</h2>",
            state.id,
            key.1,
            state.energy(),
            state.wavelength(),
            state.f
        )?;
        writeln!(s, "<table>")?;
        for pair in pairs {
            writeln!(
                s,
                "<tr><td><img src=\"{pic_dir}/{}\"></td>\
                 <td><img src=\"{pic_dir}/{}\"></td>\
                 <td>{:.0}%</td></tr>",
                pair.occupied,
                pair.virt,
                100.0 * pair.weight
            )?;
        }
        writeln!(s, "</table>")?;
    }
    writeln!(s, "</body>\n</html>")?;
    Ok(s)
}

/// collect the pictures in `dir/theodore` and write the report to
/// `dir/`[REPORT]
pub fn write_report(
    dir: impl AsRef<Path>,
    states: &[ExcitedState],
    infile: &str,
) -> anyhow::Result<()> {
    let dir = dir.as_ref();
    let ntos = pair_up(find_ntos(dir.join("theodore"))?)?;
    log::info!("found NTO pictures for {} states", ntos.len());
    let html = render(states, &ntos, "theodore", infile)?;
    let out = dir.join(REPORT);
    std::fs::write(&out, html)
        .with_context(|| format!("failed to write {}", out.display()))
}
