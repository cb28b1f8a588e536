use approx::assert_abs_diff_eq;
use test_case::test_case;

use super::*;

fn forward(start: &str, fin: &str, coeff: f64) -> MoTransition {
    MoTransition::new(start, Direction::Forward, fin, coeff)
}

fn backward(start: &str, fin: &str, coeff: f64) -> MoTransition {
    MoTransition::new(start, Direction::Backward, fin, coeff)
}

fn singlet() -> ExcitedState {
    let mut state = ExcitedState::new(1, "Singlet", "A", 4.1181, 0.0023, None);
    state.add_mo_transition(forward("34", "36", 0.69798));
    state.add_mo_transition(forward("33", "36", -0.10211));
    state.add_mo_transition(forward("35", "37", 0.05));
    state
}

#[test]
fn wavelength_from_energy() {
    let state = ExcitedState::new(1, "Singlet", "A", 5.0, 0.1, None);
    assert_eq!(state.wavelength(), EV2NM / 5.0);
    assert_abs_diff_eq!(state.wavelength(), 247.97, epsilon = 1e-2);
}

#[test_case("Singlet", true)]
#[test_case("singlet", true)]
#[test_case("1", true)]
#[test_case("Triplet", false)]
#[test_case("3", false)]
#[test_case("", false)]
fn is_singlet(spin: &str, want: bool) {
    let state = ExcitedState::new(1, spin, "A", 3.0, 0.0, None);
    assert_eq!(state.is_singlet(), want);
}

#[test]
fn calculate_contributions() {
    let mut state = singlet();
    state.calculate_contributions();
    let got: Vec<_> = state
        .mo_transitions
        .iter()
        .map(|t| t.contribution.unwrap())
        .collect();
    let want = [
        2.0 * 0.69798 * 0.69798,
        2.0 * 0.10211 * 0.10211,
        2.0 * 0.05 * 0.05,
    ];
    for (g, w) in got.iter().zip(want) {
        assert_abs_diff_eq!(*g, w, epsilon = 1e-12);
    }
}

#[test]
fn calculate_contributions_idempotent() {
    let mut once = singlet();
    once.calculate_contributions();
    let mut twice = once.clone();
    twice.calculate_contributions();
    assert_eq!(once, twice);
}

#[test]
fn preset_contribution_kept() {
    let mut state = ExcitedState::new(1, "singlet", "a", 4.0, 0.1, None);
    state.add_mo_transition(forward("21", "22", 0.0).contribution(0.985));
    state.calculate_contributions();
    assert_eq!(state.mo_transitions[0].contribution, Some(0.985));
}

#[test]
fn triplet_not_doubled() {
    let mut state = ExcitedState::new(1, "Triplet", "A", 3.0, 0.0, None);
    state.add_mo_transition(forward("10", "11", 0.5));
    state.calculate_contributions();
    assert_abs_diff_eq!(
        state.mo_transitions[0].contribution.unwrap(),
        0.25,
        epsilon = 1e-12
    );
}

#[test]
fn correct_backexcitations() {
    let mut state = ExcitedState::new(2, "Singlet", "A", 4.9, 0.12, None);
    state.add_mo_transition(forward("35", "36", 0.0).contribution(0.30));
    state.add_mo_transition(backward("36", "35", 0.0).contribution(0.05));
    state.correct_backexcitations().unwrap();

    assert_abs_diff_eq!(
        state.mo_transitions[0].contribution.unwrap(),
        0.25,
        epsilon = 1e-12
    );
    let visible: Vec<_> = state.visible_transitions().collect();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].start_mo, "35");
    assert_eq!(visible[0].final_mo, "36");
}

#[test]
fn missing_forward() {
    let mut state = ExcitedState::new(3, "Singlet", "A", 4.9, 0.12, None);
    state.add_mo_transition(forward("34", "36", 0.6));
    state.add_mo_transition(backward("36", "35", 0.1));
    let got = state.correct_backexcitations();
    assert_eq!(
        got,
        Err(LookupError::MissingForward {
            state: 3,
            start_mo: "36".to_owned(),
            final_mo: "35".to_owned(),
        })
    );
}

#[test]
fn suppress_low_ci_coeffs() {
    let mut state = singlet();
    state.calculate_contributions();
    let before: f64 = state
        .visible_transitions()
        .filter_map(|t| t.contribution)
        .sum();
    state.suppress_low_ci_coeffs(0.2);
    let after: f64 = state
        .visible_transitions()
        .filter_map(|t| t.contribution)
        .sum();
    assert!(after <= before);
    assert_eq!(state.mo_transitions.len(), 1);
    assert_eq!(state.mo_transitions[0].start_mo, "34");
}

#[test]
fn suppress_without_contributions() {
    let mut state = singlet();
    state.suppress_low_ci_coeffs(0.1);
    let got: Vec<_> =
        state.mo_transitions.iter().map(|t| &t.start_mo).collect();
    assert_eq!(got, ["34", "33"]);
}

#[test]
fn suppress_keeps_parsed_weights() {
    // escf-style: no coefficient, only the weight
    let mut state = ExcitedState::new(1, "singlet", "a", 4.0, 0.1, None);
    state.add_mo_transition(forward("21", "22", 0.0).contribution(0.90));
    state.add_mo_transition(forward("20", "22", 0.0).contribution(0.05));
    state.suppress_low_ci_coeffs(0.2);
    assert_eq!(state.mo_transitions.len(), 1);
    assert_eq!(state.mo_transitions[0].start_mo, "21");
}

#[test]
fn rr_weight() {
    let mut state = ExcitedState::new(1, "Singlet", "A", 4.0, 0.3, None);
    let at_resonance = state.calc_rr_weight(state.wavelength());
    assert_abs_diff_eq!(at_resonance, 0.3, epsilon = 1e-12);

    // 1500 cm-1 detuned => 1 / sqrt(2)
    let exc = NM2CM / (NM2CM / state.wavelength() - 1500.0);
    let got = state.calc_rr_weight(exc);
    assert_abs_diff_eq!(got, 0.3 / 2f64.sqrt(), epsilon = 1e-9);
    assert_eq!(state.rr_weight, Some(got));
}

#[test]
fn mos_per_irrep() {
    let mut state = ExcitedState::new(1, "singlet", "b1", 4.0, 0.1, None);
    state.add_mo_transition(
        forward("5", "7", 0.0).irreps("a1", "b1").contribution(0.6),
    );
    state.add_mo_transition(
        forward("2", "7", 0.0).irreps("b2", "a2").contribution(0.3),
    );
    state.add_mo_transition(backward("7", "5", 0.0).irreps("b1", "a1"));
    let got = state.mos_per_irrep();
    assert_eq!(got["A1"], ["5"]);
    assert_eq!(got["B1"], ["7"]);
    assert_eq!(got["B2"], ["2"]);
    assert_eq!(got["A2"], ["7"]);
    assert_eq!(
        state.irreps().into_iter().collect::<Vec<_>>(),
        ["A1", "A2", "B1", "B2"]
    );
}

#[test]
fn mo_numbers() {
    assert_eq!(mo_number("34"), Some(34));
    assert_eq!(mo_number("34A"), Some(34));
    assert_eq!(mo_number("HOMO"), None);
    let mut mos = vec!["9", "10", "100B", "2"];
    mos.sort_by(|a, b| mo_order(a).cmp(&mo_order(b)));
    assert_eq!(mos, ["2", "9", "10", "100B"]);
}

#[test]
fn display_transition() {
    let mut state = singlet();
    state.calculate_contributions();
    assert_eq!(
        state.mo_transitions[0].to_string(),
        "\t   34A a ->    36A a\t 0.698\t97.4%"
    );
    assert_eq!(
        state.mo_transitions[1].to_string(),
        "\t   33A a ->    36A a\t-0.102\t2.1%"
    );
}
