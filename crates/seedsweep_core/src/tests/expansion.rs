//! Tests for schema expansion
//!
//! Order, completeness, uniqueness and restartability of the product.

use crate::error::SchemaError;
use crate::sweep::{GLOBAL_SEED, ParameterSet, Schema, build_default_schema, build_schema};

fn assignments<T: Clone>(set: &ParameterSet<T>) -> Vec<(String, T)> {
    set.iter().map(|(n, v)| (n.to_string(), v.clone())).collect()
}

#[test]
fn two_parameters_expand_in_odometer_order() {
    let schema = Schema::new().parameter("a", &[1, 2]).parameter("b", &[10, 20]);

    let sets: Vec<_> = schema.expand().unwrap().map(|s| assignments(&s)).collect();

    let pair = |a, b| vec![("a".to_string(), a), ("b".to_string(), b)];
    assert_eq!(
        sets,
        vec![pair(1, 10), pair(1, 20), pair(2, 10), pair(2, 20)]
    );
}

#[test]
fn single_parameter_yields_singletons() {
    let schema = build_default_schema();
    let sets: Vec<_> = schema.expand().unwrap().collect();

    assert_eq!(sets.len(), 4);
    for (set, expected) in sets.iter().zip([1.0, 0.5, 0.25, 0.125]) {
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(GLOBAL_SEED), Some(&expected));
    }
}

#[test]
fn product_size_matches_shape() {
    let schema = Schema::new()
        .parameter("a", &[1, 2, 3])
        .parameter("b", &[1, 2])
        .parameter("c", &[1, 2, 3, 4, 5]);

    assert_eq!(schema.total_points(), 30);
    assert_eq!(schema.expand().unwrap().len(), 30);
    assert_eq!(schema.expand().unwrap().count(), 30);
}

#[test]
fn every_combination_appears_exactly_once() {
    let schema = Schema::new()
        .parameter("x", &[0, 1, 2])
        .parameter("y", &[0, 1, 2, 3]);

    let sets: Vec<_> = schema.expand().unwrap().collect();
    for x in 0..3 {
        for y in 0..4 {
            let hits = sets
                .iter()
                .filter(|s| s.get("x") == Some(&x) && s.get("y") == Some(&y))
                .count();
            assert_eq!(hits, 1, "x={x} y={y}");
        }
    }
    for (i, a) in sets.iter().enumerate() {
        for b in &sets[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn repeated_expansion_is_identical() {
    let schema = Schema::new()
        .parameter(GLOBAL_SEED, &[1.0, 0.5])
        .parameter("thickness", &[2.0, 3.0, 4.0]);

    let first: Vec<_> = schema.expand().unwrap().collect();
    let second: Vec<_> = schema.expand().unwrap().collect();
    assert_eq!(first, second);

    let iter = schema.expand().unwrap();
    let restarted = iter.clone();
    assert_eq!(iter.collect::<Vec<_>>(), restarted.collect::<Vec<_>>());
}

#[test]
fn independent_consumers_do_not_interfere() {
    let schema = build_schema(&[1.0, 0.5, 0.25]);
    let mut left = schema.expand().unwrap();
    let mut right = schema.expand().unwrap();

    left.next();
    left.next();
    assert_eq!(right.next().unwrap().get(GLOBAL_SEED), Some(&1.0));
    assert_eq!(left.next().unwrap().get(GLOBAL_SEED), Some(&0.25));
}

#[test]
fn reordered_schemas_cover_the_same_sets() {
    let forward = build_schema(&[1.0, 0.5]);
    let backward = build_schema(&[0.5, 1.0]);
    assert_ne!(forward, backward);

    let f: Vec<_> = forward.expand().unwrap().collect();
    let mut b: Vec<_> = backward.expand().unwrap().collect();
    b.reverse();
    assert_eq!(f, b);
}

#[test]
fn indices_address_the_grid_cell() {
    let schema = Schema::new().parameter("a", &[5, 6]).parameter("b", &[7, 8, 9]);
    let indices: Vec<_> = schema
        .expand()
        .unwrap()
        .map(|s| s.indices().to_vec())
        .collect();
    assert_eq!(indices[0], vec![0, 0]);
    assert_eq!(indices[2], vec![0, 2]);
    assert_eq!(indices[3], vec![1, 0]);
    assert_eq!(indices[5], vec![1, 2]);
}

#[test]
fn empty_domain_is_rejected_before_expansion() {
    let schema = Schema::new().parameter("a", &[1, 2]).parameter("b", &[]);
    assert_eq!(
        schema.expand().unwrap_err(),
        SchemaError::EmptyDomain("b".to_string())
    );
}

#[test]
fn empty_schema_is_rejected() {
    assert_eq!(
        Schema::<f64>::new().expand().unwrap_err(),
        SchemaError::EmptySchema
    );
}
