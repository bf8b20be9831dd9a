use super::*;
use crate::table::TypeTableBuilder;

fn observe(builder: &mut TypeTableBuilder, owner: &str, field: &str, ty: &str) {
    builder.observe(owner, field, ty, &[]).unwrap();
}

fn repr(table: &TypeTable, name: &str) -> String {
    let id = table.lookup(name).unwrap();
    canonical_representation(table, id, MAX_NODES_IN_CANONICAL_REPR).unwrap()
}

/// `object(1) -> object(2) -> ... -> object(len)`, each via field `next`.
fn chain(builder: &mut TypeTableBuilder, first: usize, len: usize) {
    for i in first..first + len {
        observe(
            builder,
            &format!("object({i})"),
            "next",
            &format!("object({})", i + 1),
        );
    }
}

#[test]
fn test_primitive_representation() {
    let table = TypeTable::builder().build().unwrap();
    assert_eq!(
        canonical_representation(&table, TypeId::NUMBER, 100).unwrap(),
        r#"{"id":0,"kind":"number","fields":[]}"#
    );
    assert_eq!(
        canonical_representation(&table, TypeId::NULL, 100).unwrap(),
        r#"{"id":0,"kind":"null","fields":[]}"#
    );
}

#[test]
fn test_self_reference_terminates_with_back_reference() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "next", "object(1)");
    let table = builder.build().unwrap();

    assert_eq!(
        repr(&table, "object(1)"),
        r#"{"id":0,"kind":"object","fields":[["next",0]]}"#
    );
}

#[test]
fn test_renamed_self_references_are_identical() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "next", "object(1)");
    observe(&mut builder, "object(2)", "next", "object(2)");
    let table = builder.build().unwrap();

    assert_eq!(repr(&table, "object(1)"), repr(&table, "object(2)"));
}

#[test]
fn test_mutual_recursion_is_identical_up_to_renaming() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "child", "object(2)");
    observe(&mut builder, "object(2)", "parent", "object(1)");
    observe(&mut builder, "object(7)", "child", "object(8)");
    observe(&mut builder, "object(8)", "parent", "object(7)");
    let table = builder.build().unwrap();

    let first = repr(&table, "object(1)");
    assert_eq!(first, repr(&table, "object(7)"));
    assert_eq!(
        first,
        r#"{"id":0,"kind":"object","fields":[["child",{"id":1,"kind":"object","fields":[["parent",0]]}]]}"#
    );
}

#[test]
fn test_field_order_does_not_matter() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "a", "number");
    observe(&mut builder, "object(1)", "b", "string");
    observe(&mut builder, "object(2)", "b", "string");
    observe(&mut builder, "object(2)", "a", "number");
    let table = builder.build().unwrap();

    assert_eq!(repr(&table, "object(1)"), repr(&table, "object(2)"));
}

#[test]
fn test_different_field_types_differ() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "a", "number");
    observe(&mut builder, "object(2)", "a", "string");
    let table = builder.build().unwrap();

    assert_ne!(repr(&table, "object(1)"), repr(&table, "object(2)"));
}

#[test]
fn test_kind_is_part_of_the_shape() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "length", "number");
    observe(&mut builder, "array(2)", "length", "number");
    let table = builder.build().unwrap();

    assert_ne!(repr(&table, "object(1)"), repr(&table, "array(2)"));
}

#[test]
fn test_alternatives_fork_into_separate_paths() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "x", "number");
    observe(&mut builder, "object(1)", "x", "string");
    let table = builder.build().unwrap();

    let paths: Vec<String> = repr(&table, "object(1)")
        .split(" -- ")
        .map(str::to_string)
        .collect();
    assert_eq!(paths.len(), 2);
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);
    // Both contexts list both alternatives under `x`.
    for path in &paths {
        assert!(path.contains(r#""kind":"number""#));
        assert!(path.contains(r#""kind":"string""#));
    }
}

#[test]
fn test_alternative_order_is_irrelevant() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "x", "number");
    observe(&mut builder, "object(1)", "x", "string");
    observe(&mut builder, "object(2)", "x", "string");
    observe(&mut builder, "object(2)", "x", "number");
    let table = builder.build().unwrap();

    assert_eq!(repr(&table, "object(1)"), repr(&table, "object(2)"));
}

#[test]
fn test_renamed_object_alternatives_are_identical() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "f", "object(3)");
    observe(&mut builder, "object(1)", "f", "object(4)");
    observe(&mut builder, "object(3)", "a", "number");
    observe(&mut builder, "object(4)", "b", "number");
    // Same structure, but the name order of the alternatives is flipped.
    observe(&mut builder, "object(2)", "f", "object(5)");
    observe(&mut builder, "object(2)", "f", "object(6)");
    observe(&mut builder, "object(5)", "b", "number");
    observe(&mut builder, "object(6)", "a", "number");
    let table = builder.build().unwrap();

    assert_eq!(repr(&table, "object(1)"), repr(&table, "object(2)"));
}

#[test]
fn test_renamed_nested_alternatives_are_identical() {
    let mut builder = TypeTable::builder();
    for (owner, first, second, leaf_a, leaf_b) in [
        ("object(1)", "object(10)", "object(11)", "object(12)", "object(13)"),
        ("object(2)", "object(21)", "object(20)", "object(23)", "object(22)"),
    ] {
        observe(&mut builder, owner, "f", first);
        observe(&mut builder, owner, "f", second);
        observe(&mut builder, first, "g", leaf_a);
        observe(&mut builder, second, "g", leaf_b);
        observe(&mut builder, leaf_a, "x", "string");
        observe(&mut builder, leaf_b, "x", "boolean");
    }
    let table = builder.build().unwrap();

    assert_eq!(repr(&table, "object(1)"), repr(&table, "object(2)"));
}

#[test]
fn test_forked_alternative_is_explored_in_its_own_path() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "x", "number");
    observe(&mut builder, "object(1)", "x", "object(2)");
    observe(&mut builder, "object(2)", "y", "boolean");
    let table = builder.build().unwrap();

    let full = repr(&table, "object(1)");
    let paths: Vec<&str> = full.split(" -- ").collect();
    assert_eq!(paths.len(), 2);
    // Exactly one context expands object(2)'s field.
    let expanded = paths.iter().filter(|p| p.contains(r#""y""#)).count();
    assert_eq!(expanded, 1);
}

#[test]
fn test_representation_is_stable() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "a", "object(2)");
    observe(&mut builder, "object(1)", "a", "object(3)");
    observe(&mut builder, "object(2)", "b", "object(1)");
    observe(&mut builder, "object(3)", "c", "number");
    let table = builder.build().unwrap();

    let first = repr(&table, "object(1)");
    for _ in 0..5 {
        assert_eq!(repr(&table, "object(1)"), first);
    }
}

#[test]
fn test_long_chain_exceeds_node_budget() {
    let mut builder = TypeTable::builder();
    chain(&mut builder, 1, 150);
    let table = builder.build().unwrap();

    let head = table.lookup("object(1)").unwrap();
    assert!(canonical_representation(&table, head, MAX_NODES_IN_CANONICAL_REPR).is_none());
    // A short suffix of the chain still fits.
    let tail = table.lookup("object(140)").unwrap();
    assert!(canonical_representation(&table, tail, MAX_NODES_IN_CANONICAL_REPR).is_some());
}

/// Binary tree where every inner node's `f` holds both children.
fn polymorphic_tree(builder: &mut TypeTableBuilder, next: &mut usize, depth: usize) -> String {
    let name = format!("object({next})");
    *next += 1;
    if depth == 0 {
        observe(builder, &name, "v", "number");
    } else {
        let left = polymorphic_tree(builder, next, depth - 1);
        let right = polymorphic_tree(builder, next, depth - 1);
        observe(builder, &name, "f", &left);
        observe(builder, &name, "f", &right);
    }
    name
}

#[test]
fn test_many_small_paths_stay_within_budget() {
    let mut builder = TypeTable::builder();
    let mut next = 1;
    let first = polymorphic_tree(&mut builder, &mut next, 7);
    let mut next = 10_000;
    let second = polymorphic_tree(&mut builder, &mut next, 7);
    let table = builder.build().unwrap();

    let a = repr(&table, &first);
    assert_eq!(a.split(" -- ").count(), 128);
    assert_eq!(a, repr(&table, &second));
}

#[test]
fn test_path_budget_bounds_polymorphic_types() {
    let mut builder = TypeTable::builder();
    let mut next = 1;
    let root = polymorphic_tree(&mut builder, &mut next, 13);
    let table = builder.build().unwrap();

    let root = table.lookup(&root).unwrap();
    assert!(canonical_representation(&table, root, MAX_NODES_IN_CANONICAL_REPR).is_none());
}

#[test]
fn test_wide_field_exceeds_budget() {
    let mut builder = TypeTable::builder();
    for i in 0..120 {
        observe(&mut builder, "object(1)", "x", &format!("function({i})"));
    }
    let table = builder.build().unwrap();
    let head = table.lookup("object(1)").unwrap();
    assert!(canonical_representation(&table, head, MAX_NODES_IN_CANONICAL_REPR).is_none());
}

#[test]
fn test_overflow_placeholders_never_match() {
    let mut builder = TypeTable::builder();
    chain(&mut builder, 1, 150);
    chain(&mut builder, 1001, 150);
    let table = builder.build().unwrap();

    let mut canonicalizer = Canonicalizer::new(&table);
    let a = canonicalizer.canonicalize(table.lookup("object(1)").unwrap());
    let b = canonicalizer.canonicalize(table.lookup("object(1001)").unwrap());
    assert!(is_overflow_placeholder(&a));
    assert!(is_overflow_placeholder(&b));
    assert_ne!(a, b);
    assert_eq!(canonicalizer.stats().overflows, 2);
}

#[test]
fn test_canonicalizer_caches_results() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "next", "object(1)");
    let table = builder.build().unwrap();
    let id = table.lookup("object(1)").unwrap();

    let mut canonicalizer = Canonicalizer::new(&table);
    let first = canonicalizer.canonicalize(id);
    let second = canonicalizer.canonicalize(id);
    assert_eq!(first, second);
    assert_eq!(
        canonicalizer.stats(),
        CanonicalStats {
            computed: 1,
            cache_hits: 1,
            overflows: 0,
        }
    );
}

#[test]
fn test_custom_budget() {
    let mut builder = TypeTable::builder();
    chain(&mut builder, 1, 5);
    let table = builder.build().unwrap();
    let head = table.lookup("object(1)").unwrap();

    assert!(canonical_representation(&table, head, 3).is_none());
    assert!(canonical_representation(&table, head, 10).is_some());
}
