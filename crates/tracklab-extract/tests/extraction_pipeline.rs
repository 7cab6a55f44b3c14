//! End-to-end extraction: table -> group -> canonical order -> geometry.

use std::io::Write;

use proptest::prelude::*;
use tracklab_core::{Error, Marker, MarkerGroup, QuadIndices};
use tracklab_extract::{
    canonicalize_order, extract_group, DlcCsvSource, GroupSpec, TabularSource, WideTable,
    PUPIL_SIDES,
};

/// top=(0,1), bottom=(0,-1), left=(-1,0), right=(1,0)
fn unit_pupil_table(frames: usize) -> WideTable {
    let corners = [
        ("pupil_top_r", 0.0, 1.0),
        ("pupil_bottom_r", 0.0, -1.0),
        ("pupil_left_r", -1.0, 0.0),
        ("pupil_right_r", 1.0, 0.0),
    ];

    let mut table = WideTable::new("DLC_eye");
    for (label, x, y) in corners {
        table
            .insert_marker(label, vec![x; frames], vec![y; frames], vec![0.99; frames])
            .unwrap();
    }
    table
}

#[test]
fn unit_square_pupil_area() {
    let table = unit_pupil_table(10);
    let group = GroupSpec::pupil().load(&table, true).unwrap();
    let area = group.quadrilateral_area(QuadIndices::default()).unwrap();

    assert_eq!(area.len(), 10);
    for a in area.iter() {
        assert!((a - 2.0).abs() < 1e-12);
    }
}

#[test]
fn shuffled_labels_give_same_area_after_canonicalization() {
    let ordered = unit_pupil_table(5);

    let mut shuffled = WideTable::new("DLC_eye");
    for label in ["pupil_right_r", "pupil_top_r", "pupil_left_r", "pupil_bottom_r"] {
        let m = ordered.read_marker(label).unwrap();
        shuffled
            .insert_marker(label, m.x().to_vec(), m.y().to_vec(), m.confidence().to_vec())
            .unwrap();
    }

    let a = GroupSpec::pupil()
        .load(&ordered, true)
        .unwrap()
        .quadrilateral_area(QuadIndices::default())
        .unwrap();
    let b = GroupSpec::pupil()
        .load(&shuffled, true)
        .unwrap()
        .quadrilateral_area(QuadIndices::default())
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn three_matches_fail_four_role_canonicalization() {
    let mut table = unit_pupil_table(3);
    table
        .insert_marker("nose", vec![0.0; 3], vec![0.0; 3], vec![1.0; 3])
        .unwrap();
    let known: Vec<String> = table
        .labels()
        .into_iter()
        .filter(|l| l != "pupil_right_r")
        .collect();

    let group = extract_group(&table, "pupil", &known).unwrap();
    assert_eq!(group.n_markers(), 3);
    assert_eq!(
        canonicalize_order(&group, 4, &PUPIL_SIDES),
        Err(Error::Cardinality {
            expected: 4,
            actual: 3
        })
    );
}

#[test]
fn csv_file_to_paw_group() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "scorer,net,net,net,net,net,net,net,net,net\n\
         bodyparts,pinky_r,pinky_r,pinky_r,thumb_l,thumb_l,thumb_l,ring_finger_r,ring_finger_r,ring_finger_r\n\
         coords,x,y,likelihood,x,y,likelihood,x,y,likelihood\n\
         0,1,2,0.9,3,4,0.8,5,6,0.7\n\
         1,1.5,2.5,0.95,3.5,4.5,0.85,5.5,6.5,0.75\n"
    )
    .unwrap();

    let source = DlcCsvSource::from_path(file.path()).unwrap();
    let group = GroupSpec::right_paw().load(&source, false).unwrap();

    assert_eq!(group.names(), vec!["pinky_r", "ring_finger_r"]);
    assert_eq!(group.dims(), (2, 2));
    assert_eq!(group.x()[[1, 1]], 5.5);
    assert_eq!(group.confidence()[[0, 0]], 0.9);
}

fn group_from_names(names: &[String]) -> MarkerGroup {
    let members = names
        .iter()
        .enumerate()
        .map(|(i, n)| Marker::from_vecs(n.clone(), vec![i as f64; 2], vec![0.0; 2], vec![1.0; 2]).unwrap())
        .collect();
    MarkerGroup::new(members).unwrap()
}

proptest! {
    #[test]
    fn canonicalization_is_an_idempotent_permutation(
        order in Just(vec![0usize, 1, 2, 3]).prop_shuffle(),
        prefix in "[a-z]{1,6}",
        suffix in "_[lr]",
    ) {
        let names: Vec<String> = order
            .iter()
            .map(|&i| format!("{}_{}{}", prefix, PUPIL_SIDES[i], suffix))
            .collect();
        // the generated prefix must not itself contain a side token
        prop_assume!(PUPIL_SIDES.iter().all(|side| !prefix.contains(side)));

        let group = group_from_names(&names);
        let once = canonicalize_order(&group, 4, &PUPIL_SIDES).unwrap();

        let mut before = group.names();
        let mut after = once.names();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);

        for (name, side) in once.names().iter().zip(PUPIL_SIDES) {
            prop_assert!(name.contains(side));
        }

        let twice = canonicalize_order(&once, 4, &PUPIL_SIDES).unwrap();
        prop_assert_eq!(once, twice);
    }
}
