//! human-readable names for molecular orbitals, read from a side file and
//! used to decorate transition listings. two layouts are understood: a JSON
//! object keyed by `"<mo> <irrep>"`
//!
//! ```json
//! {"34 a": "pi(C=O)", "36 a": "pi*(C=O)"}
//! ```
//!
//! and a tab-separated table with either `mo<TAB>name` or
//! `mo<TAB>irrep<TAB>name` rows

use std::{
    collections::{BTreeMap, HashMap},
    error::Error,
    fmt::Display,
    path::Path,
};

use crate::{irrep::Irrep, state::DEFAULT_IRREP};

#[cfg(test)]
mod tests;

#[derive(Debug)]
pub enum MoNamesError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    /// a JSON key or table row that doesn't name an MO
    MalformedKey(String),
}

impl Display for MoNamesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoNamesError::Io(e) => write!(f, "failed to read MO names: {e}"),
            MoNamesError::Json(e) => {
                write!(f, "failed to parse MO names as JSON: {e}")
            }
            MoNamesError::Csv(e) => {
                write!(f, "failed to parse MO name table: {e}")
            }
            MoNamesError::MalformedKey(key) => {
                write!(f, "malformed MO name entry `{key}`")
            }
        }
    }
}

impl Error for MoNamesError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MoNamesError::Io(e) => Some(e),
            MoNamesError::Json(e) => Some(e),
            MoNamesError::Csv(e) => Some(e),
            MoNamesError::MalformedKey(_) => None,
        }
    }
}

impl From<std::io::Error> for MoNamesError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for MoNamesError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<csv::Error> for MoNamesError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// orbital names keyed by MO label and canonical irrep
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoNames(HashMap<(String, String), String>);

impl MoNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        mo: impl Into<String>,
        irrep: &str,
        name: impl Into<String>,
    ) {
        self.0
            .insert((mo.into(), Irrep::canonical(irrep)), name.into());
    }

    /// the name of `mo` in `irrep`, if one was given
    pub fn get(&self, mo: &str, irrep: &str) -> Option<&str> {
        self.0
            .get(&(mo.to_owned(), Irrep::canonical(irrep)))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, MoNamesError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)?;
        let mut ret = Self::new();
        for (key, name) in raw {
            let mut fields = key.split_whitespace();
            let (Some(mo), Some(irrep), None) =
                (fields.next(), fields.next(), fields.next())
            else {
                return Err(MoNamesError::MalformedKey(key));
            };
            ret.insert(mo, irrep, name);
        }
        Ok(ret)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, MoNamesError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// read a headerless tab-separated table. rows without an irrep column
    /// are assigned the default irrep
    pub fn from_tsv(
        reader: impl std::io::Read,
    ) -> Result<Self, MoNamesError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(reader);
        let mut ret = Self::new();
        for record in reader.records() {
            let record = record?;
            let fields: Vec<&str> = record.iter().map(str::trim).collect();
            match fields[..] {
                [mo, name] => ret.insert(mo, DEFAULT_IRREP, name),
                [mo, irrep, name] => ret.insert(mo, irrep, name),
                _ => {
                    return Err(MoNamesError::MalformedKey(fields.join("\t")));
                }
            }
        }
        Ok(ret)
    }

    pub fn load_tsv(path: impl AsRef<Path>) -> Result<Self, MoNamesError> {
        let file = std::fs::File::open(path)?;
        Self::from_tsv(file)
    }

    /// pick the loader by extension: `.json` files are read as JSON,
    /// anything else as a tab-separated table
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MoNamesError> {
        let path = path.as_ref();
        let ret = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::load_json(path)?,
            _ => Self::load_tsv(path)?,
        };
        log::debug!("read {} MO names from {}", ret.len(), path.display());
        Ok(ret)
    }
}
