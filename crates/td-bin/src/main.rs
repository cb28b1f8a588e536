use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use config::Config;
use export::{ExportFormat, ExportInput, Exporters};
use log::{info, warn};
use td::{
    ExcitedState, MoNames, Pipeline, SortBy, SourceFormat, Spectrum,
    SpectrumBuilder,
};

mod config;
mod export;
mod output;
mod theodore;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Gaussian, ORCA, or TURBOMOLE output file
    #[arg(value_parser)]
    infile: String,

    /// parse `infile` as this format instead of detecting it. one of
    /// gaussian, orca, escf, or ricc2
    #[arg(long)]
    format: Option<SourceFormat>,

    /// settings file. defaults to td.toml in the working directory if present
    #[arg(long)]
    config: Option<String>,

    /// JSON or tab-separated file with human-readable MO names
    #[arg(long)]
    mos: Option<PathBuf>,

    /// only show the first N states of the final list
    #[arg(long)]
    show: Option<usize>,

    /// only keep the first N parsed states
    #[arg(long)]
    only_first: Option<usize>,

    /// only show states above one wavelength or between two wavelengths in
    /// nm
    #[arg(long, num_args = 1..)]
    range: Vec<f64>,

    /// sort by oscillator strength instead of energy
    #[arg(long, default_value_t = false)]
    sf: bool,

    /// only show states with transitions from these MOs
    #[arg(long, num_args = 1..)]
    start_mos: Vec<String>,

    /// only show states with transitions to these MOs
    #[arg(long, num_args = 1..)]
    final_mos: Vec<String>,

    /// only show states with these start/final MO pairs
    #[arg(long, num_args = 1..)]
    start_final_mos: Vec<String>,

    /// tab-separated output for further processing
    #[arg(long, default_value_t = false)]
    raw: bool,

    /// show the state at this 1-based position of the parsed list and its
    /// transitions, then exit
    #[arg(long)]
    by_id: Option<usize>,

    /// print every state followed by its transitions
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// drop MO transitions with CI coefficients below this value
    #[arg(long)]
    ci_coeff: Option<f64>,

    /// write broadened spectra, optionally between START and END in nm
    #[arg(long, num_args = 0..=2, value_names = ["START", "END"])]
    spectrum: Option<Vec<f64>>,

    /// convert the spectrum from extinction coefficients to oscillator
    /// strengths
    #[arg(long, default_value_t = false)]
    e2f: bool,

    /// 1-based indices of impulses to write to hi_nm.spec
    #[arg(long, num_args = 1..)]
    hi: Vec<usize>,

    /// don't normalize the spectrum
    #[arg(long, default_value_t = false)]
    nnorm: bool,

    /// only show states of this irrep
    #[arg(long)]
    irrep: Option<String>,

    /// print a LaTeX table for the booktabs package
    #[arg(long, default_value_t = false)]
    booktabs: bool,

    /// excitation wavelength in nm for resonance Raman weights
    #[arg(long)]
    exc: Option<f64>,

    /// smallest resonance Raman weight to report
    #[arg(long)]
    rrthresh: Option<f64>,

    /// only show states with an oscillator strength of at least this value
    #[arg(long)]
    fthresh: Option<f64>,

    /// print the table in chunks of N states
    #[arg(long)]
    chunks: Option<usize>,

    /// write a docx table
    #[arg(long, default_value_t = false)]
    docx: bool,

    /// print a TiddlyWiki table
    #[arg(long, default_value_t = false)]
    tiddly: bool,

    /// combine the NTO pictures in ./theodore with the states into an HTML
    /// report
    #[arg(long, default_value_t = false)]
    theodore: bool,

    /// treat every state as belonging to irrep A
    #[arg(long, default_value_t = false)]
    nosym: bool,

    /// plot the spectrum against excitation energy to spectrum_eV.svg
    #[arg(long, default_value_t = false)]
    plot: bool,
}

/// the MO names given on the command line, else the configured file, else
/// `<stem>_mos.csv` next to `infile`
fn mo_names(
    explicit: Option<&Path>,
    config: &Config,
    infile: &Path,
) -> anyhow::Result<Option<MoNames>> {
    if let Some(path) = explicit {
        let names = MoNames::load(path).with_context(|| {
            format!("failed to load MO names from {}", path.display())
        })?;
        return Ok(Some(names));
    }
    let stem = infile
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let candidates = [
        PathBuf::from(&config.mo_names),
        infile.with_file_name(format!("{stem}_mos.csv")),
    ];
    let Some(path) = candidates.iter().find(|p| p.exists()) else {
        warn!("no MO names found, tried {}", config.mo_names);
        return Ok(None);
    };
    match MoNames::load(path) {
        Ok(names) => {
            info!("using MO names from {}", path.display());
            Ok(Some(names))
        }
        Err(e) => {
            warn!("ignoring {}: {e}", path.display());
            Ok(None)
        }
    }
}

fn write_columns(
    path: impl AsRef<Path>,
    data: impl Iterator<Item = (f64, f64)>,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let mut s = String::new();
    for (x, y) in data {
        s.push_str(&format!("{x:.6} {y:.8}\n"));
    }
    std::fs::write(path, s)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// write the broadened spectrum and the impulses, in nm and eV, to `dir`
fn write_spectrum(dir: &Path, spectrum: &Spectrum) -> anyhow::Result<()> {
    write_columns(dir.join("nm.spec"), spectrum.nm())?;
    write_columns(dir.join("osc_nm.spec"), spectrum.impulses.iter().copied())?;
    write_columns(dir.join("eV.spec"), spectrum.ev())?;
    write_columns(dir.join("osc_eV.spec"), spectrum.impulses_ev())?;
    if !spectrum.highlighted.is_empty() {
        write_columns(
            dir.join("hi_nm.spec"),
            spectrum.highlighted.iter().copied(),
        )?;
    }
    if let Some((l, y)) = spectrum.max() {
        info!("spectrum maximum of {y:.4} at {l:.1} nm");
    }
    Ok(())
}

fn build_spectrum(
    args: &Args,
    config: &Config,
    states: &[ExcitedState],
) -> anyhow::Result<Option<Spectrum>> {
    let bounds: &[f64] = match &args.spectrum {
        Some(bounds) => bounds.as_slice(),
        None if args.plot => &[],
        None => return Ok(None),
    };
    let builder = match (bounds, config.spectrum_range.as_ref()) {
        ([start, end], _) | ([], Some([start, end])) => {
            SpectrumBuilder::new(*start, *end)
        }
        ([], None) => match SpectrumBuilder::auto(states) {
            Some(b) => b,
            None => return Ok(None),
        },
        _ => anyhow::bail!(
            "--spectrum takes either no bounds or START and END, got {}",
            bounds.len()
        ),
    };
    let spectrum = builder
        .normalize(config.normalize && !args.nnorm)
        .e2f(args.e2f)
        .highlight(args.hi.clone())
        .build(states)?;
    Ok(Some(spectrum))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = Config::find(args.config.as_deref(), ".")?;

    let sort = if args.sf {
        SortBy::Strength
    } else {
        SortBy::Energy
    };
    let pipeline = Pipeline::new()
        .ci_thresh(args.ci_coeff.unwrap_or(config.ci_coeff))
        .nosym(args.nosym)
        .only_first(args.only_first)
        .irrep(args.irrep.clone())
        .start_mos(args.start_mos.clone())
        .final_mos(args.final_mos.clone())
        .start_final_mos(&args.start_final_mos)?
        .sort(sort)
        .range(&args.range)?
        .fthresh(args.fthresh)
        .show(args.show);

    let infile = Path::new(&args.infile);
    let mut states = match args.format {
        Some(format) => td::load_as(infile, format)?,
        None => td::load(infile)?.1,
    };
    info!("parsed {} excited states", states.len());
    let names = mo_names(args.mos.as_deref(), &config, infile)?;
    pipeline.prepare(&mut states)?;

    let exporters = Exporters::available();
    let dir = Path::new(".");
    let spectrum = build_spectrum(&args, &config, &states)?;
    if let (Some(spectrum), Some(_)) = (&spectrum, &args.spectrum) {
        write_spectrum(dir, spectrum)?;
    }
    if args.plot {
        exporters.export(
            ExportFormat::Plot,
            &ExportInput {
                states: &states,
                spectrum: spectrum.as_ref(),
                dir,
            },
        )?;
    }

    let mut out = std::io::stdout().lock();
    if let Some(id) = args.by_id {
        match td::pipeline::by_id(&states, id) {
            Ok(state) => output::summary(
                &mut out,
                std::slice::from_ref(state),
                names.as_ref(),
            )?,
            Err(e) => writeln!(out, "{e}")?,
        }
        return Ok(());
    }

    let mut states = pipeline.filter(states);
    if let Some(exc) = args.exc {
        for state in &mut states {
            state.calc_rr_weight(exc);
        }
    }

    // machine-readable and document formats stand alone
    if args.booktabs {
        output::booktabs(&mut out, &states)?;
        return Ok(());
    }
    if args.raw {
        output::raw(&mut out, &states)?;
        return Ok(());
    }
    if args.docx {
        return exporters.export(
            ExportFormat::Docx,
            &ExportInput {
                states: &states,
                spectrum: spectrum.as_ref(),
                dir,
            },
        );
    }
    if args.tiddly {
        output::tiddly(&mut out, &states, names.as_ref())?;
        return Ok(());
    }

    if args.theodore {
        theodore::write_report(dir, &states, &args.infile)?;
        info!("wrote {}", theodore::REPORT);
    } else if args.summary {
        output::summary(&mut out, &states, names.as_ref())?;
    } else {
        match args.chunks.unwrap_or(config.chunks) {
            0 => output::state_table(&mut out, &states)?,
            n => output::chunked(&mut out, &states, n)?,
        }
    }

    if args.exc.is_some() {
        writeln!(out)?;
        output::rr_weights(
            &mut out,
            &states,
            args.rrthresh.unwrap_or(config.rr_thresh),
        )?;
    }
    writeln!(out)?;
    output::footer(&mut out, pipeline.ci_thresh, &states)?;
    Ok(())
}
