use std::{fs::read_to_string, path::Path, process::Output};

use assert_cmd::Command;
use insta::assert_snapshot;
use tempfile::{TempDir, tempdir};
use test_case::test_case;

/// copy `files` from testfiles into a fresh directory
fn setup(files: &[&str]) -> std::io::Result<TempDir> {
    let dir = tempdir()?;
    for file in files {
        std::fs::copy(
            Path::new("testfiles").join(file),
            dir.path().join(file),
        )?;
    }
    Ok(dir)
}

fn td(dir: &TempDir, args: &[&str]) -> Output {
    Command::cargo_bin("td")
        .unwrap()
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test_case("0.05", true; "kept")]
#[test_case("0.2", false; "removed")]
fn fthresh(thresh: &str, kept: bool) -> std::io::Result<()> {
    let dir = setup(&["single.log"])?;
    let got = stdout(&td(&dir, &["single.log", "--fthresh", thresh]));
    assert_eq!(got.contains("248.0"), kept, "{got}");
    Ok(())
}

#[test]
fn booktabs() -> std::io::Result<()> {
    let dir = setup(&["single.log"])?;
    let got = stdout(&td(&dir, &["single.log", "--booktabs"]));
    assert_snapshot!(got, @r"
    \begin{tabular}{rlrrr}
    \toprule
     1 & A & 5.00 & 248.0 & 0.1000 \\
    \bottomrule
    \end{tabular}
    ");
    Ok(())
}

#[test]
fn odd_mo_pairs() -> std::io::Result<()> {
    let dir = setup(&["td.log"])?;
    let output = td(&dir, &["td.log", "--start-final-mos", "34", "36", "35"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("even number"), "{stderr}");
    Ok(())
}

#[test]
fn range_arity() -> std::io::Result<()> {
    let dir = setup(&["td.log"])?;
    let output = td(&dir, &["td.log", "--range", "200", "300", "400"]);
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn mo_pairs() -> std::io::Result<()> {
    let dir = setup(&["td.log"])?;
    let got = stdout(&td(
        &dir,
        &["td.log", "--raw", "--start-final-mos", "34", "36"],
    ));
    let rows: Vec<Vec<&str>> =
        got.lines().map(|l| l.split('\t').collect()).collect();
    assert_eq!(rows.len(), 1, "{got}");
    assert_eq!(rows[0][..4], ["1", "Singlet", "A", "4.1181"]);
    assert_eq!(rows[0][5..], ["0.0023", "0"]);
    Ok(())
}

#[test]
fn raw_is_only_rows() -> std::io::Result<()> {
    let dir = setup(&["single.log"])?;
    let got = stdout(&td(&dir, &["single.log", "--raw", "--exc", "250"]));
    let fields: Vec<&str> = got.trim_end().split('\t').collect();
    assert_eq!(fields[..4], ["1", "Singlet", "A", "5"]);
    let wavelength: f64 = fields[4].parse().unwrap();
    assert!((wavelength - 247.968386).abs() < 1e-6, "{got}");
    assert_eq!(fields[5..], ["0.1", "0"]);
    assert!(!got.contains("Only considering"), "{got}");
    assert!(!got.contains("RR weight"), "{got}");
    Ok(())
}

#[test_case("5", "Excited state with id #5 not found.\n"; "missing")]
#[test_case("0", "Excited state with id #0 not found.\n"; "zero")]
fn by_id_missing(id: &str, want: &str) -> std::io::Result<()> {
    let dir = setup(&["td.log"])?;
    let got = stdout(&td(&dir, &["td.log", "--by-id", id]));
    assert_eq!(got, want);
    Ok(())
}

#[test]
fn by_id() -> std::io::Result<()> {
    let dir = setup(&["td.log"])?;
    let got = stdout(&td(&dir, &["td.log", "--by-id", "2"]));
    assert!(got.contains("4.95"), "{got}");
    assert!(got.contains("35"), "{got}");
    assert!(!got.contains("Only considering"), "{got}");
    Ok(())
}

#[test]
fn spectrum() -> std::io::Result<()> {
    let dir = setup(&["td.log"])?;
    stdout(&td(&dir, &["td.log", "--spectrum", "200", "300", "--hi", "2"]));
    let nm = read_to_string(dir.path().join("nm.spec"))?;
    assert_eq!(nm.lines().count(), 200);
    assert!(nm.starts_with("200.000000 "), "{nm}");
    let osc = read_to_string(dir.path().join("osc_nm.spec"))?;
    assert_eq!(osc.lines().count(), 3);
    let hi = read_to_string(dir.path().join("hi_nm.spec"))?;
    assert!(hi.starts_with("250.356"), "{hi}");
    for file in ["eV.spec", "osc_eV.spec"] {
        assert!(dir.path().join(file).exists(), "missing {file}");
    }
    Ok(())
}

#[test]
fn highlight_out_of_range() -> std::io::Result<()> {
    let dir = setup(&["td.log"])?;
    let output = td(&dir, &["td.log", "--spectrum", "--hi", "4"]);
    assert!(!output.status.success());
    assert!(!dir.path().join("nm.spec").exists());
    Ok(())
}

#[test]
fn docx_missing() -> std::io::Result<()> {
    let dir = setup(&["td.log"])?;
    let output = td(&dir, &["td.log", "--docx"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not supported by this build"), "{stderr}");
    Ok(())
}

#[test]
fn plot() -> std::io::Result<()> {
    let dir = setup(&["td.log"])?;
    stdout(&td(&dir, &["td.log", "--plot"]));
    let svg = read_to_string(dir.path().join("spectrum_eV.svg"))?;
    assert!(svg.contains("<svg"));
    // the spectrum files are only written with --spectrum
    assert!(!dir.path().join("nm.spec").exists());
    Ok(())
}

#[test]
fn config_file() -> std::io::Result<()> {
    let dir = setup(&["td.log", "td.toml"])?;
    let got = stdout(&td(&dir, &["td.log", "--spectrum"]));
    assert!(got.starts_with("### Chunk 1 ###\n"), "{got}");
    assert!(!got.contains("### Chunk 2 ###"), "{got}");
    assert!(got.contains(">= 0.1:"), "{got}");
    let nm = read_to_string(dir.path().join("nm.spec"))?;
    assert_eq!(nm.lines().count(), 600);
    Ok(())
}

#[test]
fn format_forced() -> std::io::Result<()> {
    let dir = setup(&["td.log"])?;
    let output = td(&dir, &["td.log", "--format", "orca"]);
    assert!(!output.status.success());
    Ok(())
}
