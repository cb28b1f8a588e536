use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};


/// the irreducible representations that show up as state and orbital labels
/// in the supported programs. the vendors disagree on case and on how to
/// write primes, so labels are parsed into this enum and written back out in
/// one canonical spelling
#[derive(
    Debug, Deserialize, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Serialize,
)]
pub enum Irrep {
    // C1
    A,
    // C2
    B,
    // Cs - p = prime
    Ap,
    App,
    // C2v
    A1,
    A2,
    B1,
    B2,
    // D2
    B3,
    // Ci, C2h, D2h
    Ag,
    Au,
    Bg,
    Bu,
    B1g,
    B2g,
    B3g,
    B1u,
    B2u,
    B3u,
    // D3h
    A1p,
    A2p,
    Ep,
    A1pp,
    A2pp,
    Epp,
    // generic E
    E,
}

impl Irrep {
    /// the canonical spelling of `label` if it names a known irrep, otherwise
    /// `label` itself. Gaussian's `?Sym` for example passes through untouched
    pub fn canonical(label: &str) -> String {
        match label.parse::<Irrep>() {
            Ok(irrep) => irrep.to_string(),
            Err(_) => label.to_owned(),
        }
    }

    /// whether `a` and `b` name the same irrep after canonicalization
    pub fn same(a: &str, b: &str) -> bool {
        Self::canonical(a) == Self::canonical(b)
    }
}

impl Display for Irrep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Irrep::A => "A",
            Irrep::B => "B",
            Irrep::Ap => "A'",
            Irrep::App => "A''",
            Irrep::A1 => "A1",
            Irrep::A2 => "A2",
            Irrep::B1 => "B1",
            Irrep::B2 => "B2",
            Irrep::B3 => "B3",
            Irrep::Ag => "Ag",
            Irrep::Au => "Au",
            Irrep::Bg => "Bg",
            Irrep::Bu => "Bu",
            Irrep::B1g => "B1g",
            Irrep::B2g => "B2g",
            Irrep::B3g => "B3g",
            Irrep::B1u => "B1u",
            Irrep::B2u => "B2u",
            Irrep::B3u => "B3u",
            Irrep::A1p => "A1'",
            Irrep::A2p => "A2'",
            Irrep::Ep => "E'",
            Irrep::A1pp => "A1''",
            Irrep::A2pp => "A2''",
            Irrep::Epp => "E''",
            Irrep::E => "E",
        })
    }
}

impl FromStr for Irrep {
    type Err = String;

    /// case-insensitive. a double quote is accepted in place of two single
    /// quotes since TURBOMOLE writes `a"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('"', "''");
        Ok(match norm.as_str() {
            "a" => Irrep::A,
            "b" => Irrep::B,
            "a'" => Irrep::Ap,
            "a''" => Irrep::App,
            "a1" => Irrep::A1,
            "a2" => Irrep::A2,
            "b1" => Irrep::B1,
            "b2" => Irrep::B2,
            "b3" => Irrep::B3,
            "ag" => Irrep::Ag,
            "au" => Irrep::Au,
            "bg" => Irrep::Bg,
            "bu" => Irrep::Bu,
            "b1g" => Irrep::B1g,
            "b2g" => Irrep::B2g,
            "b3g" => Irrep::B3g,
            "b1u" => Irrep::B1u,
            "b2u" => Irrep::B2u,
            "b3u" => Irrep::B3u,
            "a1'" => Irrep::A1p,
            "a2'" => Irrep::A2p,
            "e'" => Irrep::Ep,
            "a1''" => Irrep::A1pp,
            "a2''" => Irrep::A2pp,
            "e''" => Irrep::Epp,
            "e" => Irrep::E,
            _ => return Err(format!("unrecognized irrep `{s}`")),
        })
    }
}
