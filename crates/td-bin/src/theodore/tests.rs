use std::fs::File;

use super::*;

#[test]
fn file_names() {
    let got = Nto::from_file_name("NTO2b1_1o_0.85.png").unwrap();
    assert_eq!(
        got,
        Nto {
            file: String::from("NTO2b1_1o_0.85.png"),
            state: 2,
            irrep: String::from("B1"),
            pair: 1,
            occupied: true,
            weight: 0.85,
        }
    );
    assert!(Nto::from_file_name("NTO2b1_1x_0.85.png").is_none());
    assert!(Nto::from_file_name("orbital.png").is_none());
}

fn write_pictures(dir: &Path, names: &[&str]) {
    let pics = dir.join("theodore");
    std::fs::create_dir(&pics).unwrap();
    for name in names {
        File::create(pics.join(name)).unwrap();
    }
}

#[test]
fn pairs() {
    let dir = tempfile::tempdir().unwrap();
    write_pictures(
        dir.path(),
        &[
            "NTO1a_2v_0.30.png",
            "NTO1a_1o_0.65.png",
            "NTO1a_2o_0.30.png",
            "NTO1a_1v_0.65.png",
            "NTO1a_3o_0.05.png",
            "NTO1a_3v_0.05.png",
            "NTO2a_1o_0.90.png",
            "NTO2a_1v_0.90.png",
        ],
    );
    let got = pair_up(find_ntos(dir.path().join("theodore")).unwrap()).unwrap();
    assert_eq!(got.len(), 2);
    let first = &got[&(1, String::from("A"))];
    assert_eq!(
        first,
        &[
            NtoPair {
                occupied: String::from("NTO1a_1o_0.65.png"),
                virt: String::from("NTO1a_1v_0.65.png"),
                weight: 0.65,
            },
            NtoPair {
                occupied: String::from("NTO1a_2o_0.30.png"),
                virt: String::from("NTO1a_2v_0.30.png"),
                weight: 0.3,
            },
        ]
    );
}

#[test]
fn unpaired() {
    let dir = tempfile::tempdir().unwrap();
    write_pictures(dir.path(), &["NTO1a_1o_0.65.png"]);
    let ntos = find_ntos(dir.path().join("theodore")).unwrap();
    assert!(pair_up(ntos).is_err());
}

#[test]
fn report() {
    let dir = tempfile::tempdir().unwrap();
    write_pictures(dir.path(), &["NTO1a_1o_0.65.png", "NTO1a_1v_0.65.png"]);
    let states = [
        ExcitedState::new(1, "Singlet", "A", 4.1181, 0.0023, None),
        ExcitedState::new(2, "Singlet", "A", 4.9523, 0.1234, None),
    ];
    write_report(dir.path(), &states, "td.log").unwrap();
    let got = std::fs::read_to_string(dir.path().join(REPORT)).unwrap();
    assert!(got.contains("<h2>S1 (A): 4.12 eV, 301.1 nm, f = 0.0023</h2>"));
    assert!(!got.contains("<h2>S2"));
    assert!(got.contains(
        "<tr><td><img src=\"theodore/NTO1a_1o_0.65.png\"></td>\
         <td><img src=\"theodore/NTO1a_1v_0.65.png\"></td>\
         <td>65%</td></tr>"
    ));
}
