use insta::assert_snapshot;
use td::{Direction, MoTransition};

use super::*;

fn states() -> Vec<ExcitedState> {
    let mut s1 = ExcitedState::new(1, "Singlet", "A", 4.1181, 0.0023, Some(0.0));
    s1.add_mo_transition(MoTransition::new(
        "34",
        Direction::Forward,
        "36",
        0.69798,
    ));
    s1.calculate_contributions();
    let mut s2 = ExcitedState::new(2, "Singlet", "A", 4.9523, 0.1234, None);
    s2.add_mo_transition(
        MoTransition::new("35", Direction::Forward, "36", 0.5).contribution(0.5),
    );
    s2.add_mo_transition(
        MoTransition::new("36", Direction::Backward, "35", 0.1)
            .contribution(0.02),
    );
    vec![s1, s2]
}

fn render(
    f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>,
) -> String {
    let mut buf = Vec::new();
    f(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn default_table() {
    let got = render(|w| state_table(w, &states()));
    assert_snapshot!(got, @r"
    #  2S+1     Spat.  dE in eV  l in nm        f  <S**2>
    -  -------  -----  --------  -------  -------  ------
    1  Singlet  A          4.12    301.1  0.00230  0.000
    2  Singlet  A          4.95    250.4  0.12340  ???
    ");
}

#[test]
fn chunks() {
    let got = render(|w| chunked(w, &states(), 1));
    assert_eq!(got.matches("### Chunk").count(), 2);
    assert!(got.starts_with("### Chunk 1 ###\n#  2S+1"));
    assert!(got.contains("### Chunk 2 ###\n"));
}

#[test]
fn raw_rows() {
    let states = states();
    let got = render(|w| raw(w, &states));
    let rows: Vec<Vec<&str>> =
        got.lines().map(|l| l.split('\t').collect()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][..3], ["1", "Singlet", "A"]);
    assert_eq!(rows[0][3], "4.1181");
    assert_eq!(rows[0][5], "0.0023");
    assert_eq!(rows[0][6], "0");
    assert_eq!(rows[1][6], "???");
    for (row, state) in rows.iter().zip(&states) {
        let wavelength: f64 = row[4].parse().unwrap();
        assert_eq!(wavelength, state.wavelength());
    }
}

#[test]
fn latex() {
    let got = render(|w| booktabs(w, &states()));
    assert_snapshot!(got, @r"
    \begin{tabular}{rlrrr}
    \toprule
     1 & A & 4.12 & 301.1 & 0.0023 \\
     2 & A & 4.95 & 250.4 & 0.1234 \\
    \bottomrule
    \end{tabular}
    ");
}

#[test]
fn transitions_hide_backward() {
    let states = states();
    let got = render(|w| transitions(w, &states[1], None));
    assert_eq!(got, "\t   35A a ->    36A a\t 0.500\t50.0%\n");
}

#[test]
fn transitions_with_names() {
    let mut names = MoNames::new();
    names.insert("34", "a", "pi");
    names.insert("36", "a", "pi*");
    let states = states();
    let got = render(|w| transitions(w, &states[0], Some(&names)));
    assert_eq!(
        got,
        "\t   34A a ->    36A a\t 0.698\t97.4%\n\t\tpi -> pi*\n"
    );
}

#[test]
fn tiddlywiki() {
    let mut names = MoNames::new();
    names.insert("35", "A", "n");
    let got = render(|w| tiddly(w, &states()[1..], Some(&names)));
    assert_eq!(
        got,
        "|! State |! λ / nm |! E / eV |! f |! Transition |! Weight |\n\
         | S2 | 250.4 | 4.95 | 0.1234 | n (35 A) →  (36 A) | 50% |\n"
    );
}

#[test]
fn summary_lists_each_state() {
    let got = render(|w| summary(w, &states(), None));
    assert_eq!(got.matches("dE in eV").count(), 2);
    assert!(got.contains("\t   35A a ->    36A a\t 0.500\t50.0%\n"));
    assert!(!got.contains("<-"));
}

#[test]
fn resonance_raman() {
    let mut states = states();
    let exc = states[1].wavelength();
    for s in &mut states {
        s.calc_rr_weight(exc);
    }
    let got = render(|w| rr_weights(w, &states, 0.01));
    assert_snapshot!(got, @r"
    #  RR weight
    -  ---------
    2   0.123400
    ");
}

#[test]
fn irrep_footer() {
    let got = render(|w| footer(w, 0.2, &states()));
    assert_snapshot!(got, @r"
    Only considering transitions with CI-coefficients >= 0.2:
    Irrep A: MOs 34 - 36
    ");
}
