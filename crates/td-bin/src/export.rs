//! exporters for output formats that need support this build may not have.
//! the binary asks an [Exporters] registry for the exporter it needs instead
//! of assuming it exists

use std::{collections::HashMap, error::Error, fmt::Display, path::Path};

use anyhow::bail;
use plotters::prelude::*;
use plotters_svg::SVGBackend;
use td::{ExcitedState, Spectrum};


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// a word-processor table of the states
    Docx,
    /// an interactive plot of the spectrum
    Plot,
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            ExportFormat::Docx => "docx",
            ExportFormat::Plot => "plot",
        })
    }
}

#[derive(Debug, PartialEq)]
pub struct MissingCapability(pub ExportFormat);

impl Display for MissingCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} output is not supported by this build of td", self.0)
    }
}

impl Error for MissingCapability {}

/// what an exporter gets to work with
pub struct ExportInput<'a> {
    pub states: &'a [ExcitedState],
    pub spectrum: Option<&'a Spectrum>,
    pub dir: &'a Path,
}

pub trait Exporter {
    fn export(&self, input: &ExportInput) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct Exporters {
    registry: HashMap<ExportFormat, Box<dyn Exporter>>,
}

impl Exporters {
    /// the exporters compiled into this binary
    pub fn available() -> Self {
        let mut ret = Self::default();
        ret.register(ExportFormat::Plot, SvgPlot);
        ret
    }

    pub fn register(
        &mut self,
        format: ExportFormat,
        exporter: impl Exporter + 'static,
    ) {
        self.registry.insert(format, Box::new(exporter));
    }

    pub fn get(
        &self,
        format: ExportFormat,
    ) -> Result<&dyn Exporter, MissingCapability> {
        self.registry
            .get(&format)
            .map(|e| e.as_ref())
            .ok_or(MissingCapability(format))
    }

    /// run the exporter for `format`
    pub fn export(
        &self,
        format: ExportFormat,
        input: &ExportInput,
    ) -> anyhow::Result<()> {
        log::debug!("exporting {format}");
        self.get(format)?.export(input)
    }
}

/// the file written by [SvgPlot]
pub const PLOT_FILE: &str = "spectrum_eV.svg";

/// plots the broadened spectrum against excitation energy, with the impulses
/// scaled to the height of the curve
pub struct SvgPlot;

impl Exporter for SvgPlot {
    fn export(&self, input: &ExportInput) -> anyhow::Result<()> {
        let Some(spectrum) = input.spectrum.filter(|s| s.len() > 1) else {
            bail!("no spectrum to plot");
        };
        let curve: Vec<(f64, f64)> = spectrum.ev().collect();
        let (lo, hi) = curve.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), &(e, _)| (lo.min(e), hi.max(e)),
        );
        let ymax = curve.iter().map(|p| p.1).fold(0.0, f64::max);
        let fmax = spectrum.impulses.iter().map(|p| p.1).fold(0.0, f64::max);
        let scale = if ymax > 0.0 && fmax > 0.0 {
            ymax / fmax
        } else {
            1.0
        };
        let top = if ymax > 0.0 { 1.1 * ymax } else { 1.0 };

        let path = input.dir.join(PLOT_FILE);
        let root = SVGBackend::new(&path, (800, 500)).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("{} excited states", input.states.len()),
                ("sans-serif", 20),
            )
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(lo..hi, 0.0..top)?;
        chart
            .configure_mesh()
            .x_desc("E / eV")
            .y_desc("intensity")
            .draw()?;
        chart.draw_series(LineSeries::new(curve, &BLUE))?;
        chart.draw_series(
            spectrum
                .impulses_ev()
                .filter(|&(e, _)| (lo..=hi).contains(&e))
                .map(|(e, f)| {
                    PathElement::new(vec![(e, 0.0), (e, f * scale)], RED)
                }),
        )?;
        root.present()?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}
