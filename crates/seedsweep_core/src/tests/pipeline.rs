//! End-to-end tests from argument text to rendered journals

use std::path::Path;

use crate::batch::BuildPlan;
use crate::error::ArgumentError;
use crate::mesh::{CORNER_NODESETS, ELEMENT_BLOCK, MeshTemplate};
use crate::sweep::{GLOBAL_SEED, build_schema};
use crate::validate::validate_positive_float;

fn parse_all(args: &[&str]) -> Result<Vec<f64>, ArgumentError> {
    args.iter().map(|a| validate_positive_float(a)).collect()
}

#[test]
fn validated_arguments_become_a_schema() {
    let seeds = parse_all(&["2.0", "1.0"]).unwrap();
    let schema = build_schema(&seeds);
    assert_eq!(schema.to_json().unwrap(), "{\n  \"global_seed\": [\n    2.0,\n    1.0\n  ]\n}");
}

#[test]
fn one_bad_argument_rejects_the_batch() {
    let err = parse_all(&["1.0", "-0.5", "0.25"]).unwrap_err();
    assert_eq!(err.to_string(), "invalid positive float: '-0.5'");
    let err = parse_all(&["1.0", "fine"]).unwrap_err();
    assert_eq!(err.to_string(), "invalid float value: 'fine'");
}

#[test]
fn zero_seed_flows_through_unchanged() {
    let seeds = parse_all(&["0.0"]).unwrap();
    let plan = BuildPlan::new(
        &build_schema(&seeds),
        &MeshTemplate::default(),
        Path::new("decks"),
        "plate",
    )
    .unwrap();
    assert_eq!(plan.builds()[0].set.get(GLOBAL_SEED), Some(&0.0));
    assert!(plan.builds()[0].request.journal.contains("surface 1 size 0\n"));
}

#[test]
fn every_journal_defines_the_full_deck() {
    let schema = build_schema(&parse_all(&["1", "0.5", "0.25", "0.125"]).unwrap());
    let plan = BuildPlan::new(&schema, &MeshTemplate::default(), Path::new("decks"), "plate").unwrap();

    for build in plan.builds() {
        let journal = &build.request.journal;
        for name in CORNER_NODESETS {
            assert!(journal.contains(&format!("name \"{name}\"")), "{name} missing");
        }
        assert!(journal.contains(&format!("block 1 name \"{ELEMENT_BLOCK}\"")));
        assert!(journal.contains("element type QUAD\n"));
        assert!(journal.contains("dimension 2 block 1 partial overwrite"));
        assert!(journal.contains("set duplicate block elements off"));
    }
}

#[test]
fn identical_sets_request_identical_artifacts() {
    let schema = build_schema(&[0.5, 0.25]);
    let template = MeshTemplate::default();
    let first = BuildPlan::new(&schema, &template, Path::new("d"), "p").unwrap();
    let second = BuildPlan::new(&schema, &template, Path::new("d"), "p").unwrap();

    for (a, b) in first.builds().iter().zip(second.builds()) {
        assert_eq!(a.request, b.request);
    }
}
