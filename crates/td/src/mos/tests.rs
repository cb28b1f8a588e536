use super::*;

#[test]
fn json() {
    let got = MoNames::load("testfiles/mos/mos.json").unwrap();
    assert_eq!(got.len(), 4);
    assert_eq!(got.get("34", "A"), Some("pi(C=O)"));
    assert_eq!(got.get("12", "B1"), Some("n(O)"));
    assert_eq!(got.get("13", "A''"), Some("pi*(ring)"));
    assert_eq!(got.get("34", "B1"), None);
}

#[test]
fn json_bad_key() {
    let got = MoNames::from_json(r#"{"34": "pi"}"#);
    assert!(matches!(got, Err(MoNamesError::MalformedKey(k)) if k == "34"));
    assert!(matches!(
        MoNames::from_json("[1, 2]"),
        Err(MoNamesError::Json(_))
    ));
}

#[test]
fn tsv() {
    let got = MoNames::load("testfiles/mos/td_mos.csv").unwrap();
    assert_eq!(got.len(), 3);
    assert_eq!(got.get("36", "a"), Some("pi*(C=O)"));
    assert_eq!(got.get("12", "b1"), Some("n(O)"));
}

#[test]
fn tsv_bad_row() {
    let got = MoNames::load("testfiles/mos/bad_mos.csv");
    assert!(matches!(got, Err(MoNamesError::MalformedKey(k)) if k == "34"));
}

#[test]
fn missing_file() {
    let got = MoNames::load("testfiles/mos/nope.json");
    assert!(matches!(got, Err(MoNamesError::Io(_))));
}
