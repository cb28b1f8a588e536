/// nm·eV, converts an excitation energy in eV to a wavelength in nm and back
pub const EV2NM: f64 = 1239.84193;

/// eV per Hartree
pub const HARTREE2EV: f64 = 27.211386;

/// nm per cm-1 reciprocal, `1e7 / nm` gives wavenumbers
pub const NM2CM: f64 = 1e7;

/// imaginary half-width in cm-1 of the Lorentzian used for resonance Raman
/// weights
pub const RR_GAMMA: f64 = 1500.0;

/// band width in cm-1 of the Gaussian UV band, corresponding to a FWHM of
/// 0.4 eV
pub const UV_SIGMA: f64 = 3099.6;

/// prefactor of the Gaussian UV band giving molar extinction coefficients
pub const UV_PREFACTOR: f64 = 1.3062974e8;

/// divides a molar extinction coefficient into an oscillator strength
pub const E2F: f64 = 40490.05867167;
