use super::*;
use crate::canonicalize::canonical_representation;
use crate::table::TypeTableBuilder;
use proptest::prelude::*;

fn observe(builder: &mut TypeTableBuilder, owner: &str, field: &str, ty: &str) {
    builder.observe(owner, field, ty, &[]).unwrap();
}

fn id(table: &TypeTable, name: &str) -> TypeId {
    table.lookup(name).unwrap()
}

#[test]
fn test_renamed_self_references_merge() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(2)", "next", "object(2)");
    observe(&mut builder, "object(1)", "next", "object(1)");
    let table = builder.build().unwrap();

    let equivalence = compute_equivalence(&table);
    let o1 = id(&table, "object(1)");
    let o2 = id(&table, "object(2)");
    assert_eq!(equivalence.find(o2), o1);
    assert_eq!(equivalence.find(o1), o1);
    assert_eq!(equivalence.roots().len(), 1);
}

#[test]
fn test_renamed_alternatives_merge() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "f", "object(3)");
    observe(&mut builder, "object(1)", "f", "object(4)");
    observe(&mut builder, "object(3)", "a", "number");
    observe(&mut builder, "object(4)", "b", "number");
    observe(&mut builder, "object(2)", "f", "object(5)");
    observe(&mut builder, "object(2)", "f", "object(6)");
    observe(&mut builder, "object(5)", "b", "number");
    observe(&mut builder, "object(6)", "a", "number");
    let table = builder.build().unwrap();

    let equivalence = compute_equivalence(&table);
    assert!(equivalence.same_class(id(&table, "object(1)"), id(&table, "object(2)")));
    assert!(equivalence.same_class(id(&table, "object(3)"), id(&table, "object(6)")));
    assert!(equivalence.same_class(id(&table, "object(4)"), id(&table, "object(5)")));
    assert!(!equivalence.same_class(id(&table, "object(3)"), id(&table, "object(4)")));
}

#[test]
fn test_extra_field_prevents_merge() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "a", "number");
    observe(&mut builder, "object(2)", "a", "number");
    observe(&mut builder, "object(2)", "b", "string");
    let table = builder.build().unwrap();

    let equivalence = compute_equivalence(&table);
    assert!(!equivalence.same_class(id(&table, "object(1)"), id(&table, "object(2)")));
}

#[test]
fn test_equivalence_is_transitive() {
    let mut builder = TypeTable::builder();
    for owner in ["object(30)", "object(10)", "object(20)"] {
        observe(&mut builder, owner, "x", "number");
        observe(&mut builder, owner, "y", "boolean");
    }
    let table = builder.build().unwrap();

    let equivalence = compute_equivalence(&table);
    let root = equivalence.find(id(&table, "object(30)"));
    assert_eq!(table.resolve(root), "object(10)");
    for owner in ["object(10)", "object(20)", "object(30)"] {
        let ty = id(&table, owner);
        assert_eq!(equivalence.find(ty), root);
        assert!(equivalence.same_class(root, ty));
        assert!(equivalence.same_class(ty, root));
    }
}

#[test]
fn test_nested_renamed_types_merge() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "point", "object(3)");
    observe(&mut builder, "object(2)", "point", "object(4)");
    observe(&mut builder, "object(3)", "x", "number");
    observe(&mut builder, "object(4)", "x", "number");
    let table = builder.build().unwrap();

    let equivalence = compute_equivalence(&table);
    assert!(equivalence.same_class(id(&table, "object(1)"), id(&table, "object(2)")));
    assert!(equivalence.same_class(id(&table, "object(3)"), id(&table, "object(4)")));
    assert!(!equivalence.same_class(id(&table, "object(1)"), id(&table, "object(3)")));
}

#[test]
fn test_kinds_never_merge() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "length", "number");
    observe(&mut builder, "array(1)", "length", "number");
    let table = builder.build().unwrap();

    let equivalence = compute_equivalence(&table);
    assert!(!equivalence.same_class(id(&table, "object(1)"), id(&table, "array(1)")));
}

#[test]
fn test_primitives_are_never_merged() {
    let mut builder = TypeTable::builder();
    builder.declare("object(1)").unwrap();
    builder.declare("object(2)").unwrap();
    let table = builder.build().unwrap();

    let equivalence = compute_equivalence(&table);
    for primitive in [
        TypeId::NUMBER,
        TypeId::BOOLEAN,
        TypeId::STRING,
        TypeId::UNDEFINED,
        TypeId::NULL,
    ] {
        assert!(equivalence.is_root(primitive));
    }
    // Two empty objects are structurally equal.
    assert!(equivalence.same_class(id(&table, "object(1)"), id(&table, "object(2)")));
}

#[test]
fn test_oversized_types_are_not_merged() {
    let mut builder = TypeTable::builder();
    for base in [0usize, 1000] {
        for i in 0..150 {
            observe(
                &mut builder,
                &format!("object({})", base + i),
                "next",
                &format!("object({})", base + i + 1),
            );
        }
    }
    let table = builder.build().unwrap();

    let mut solver = EquivalenceSolver::new(&table);
    let equivalence = solver.solve();
    assert!(!equivalence.same_class(id(&table, "object(0)"), id(&table, "object(1000)")));
    assert!(solver.stats().canonical.overflows > 0);
    // Short suffixes of the two chains are identical and do merge.
    assert!(equivalence.same_class(id(&table, "object(149)"), id(&table, "object(1149)")));
}

#[test]
fn test_result_does_not_depend_on_insertion_order() {
    let owners = ["object(5)", "object(3)", "object(9)", "object(1)"];
    let build = |order: &[&str]| {
        let mut builder = TypeTable::builder();
        for owner in order {
            observe(&mut builder, owner, "v", "string");
        }
        builder.build().unwrap()
    };
    let forward = build(&owners);
    let mut reversed_owners = owners;
    reversed_owners.reverse();
    let reversed = build(&reversed_owners);

    for table in [&forward, &reversed] {
        let equivalence = compute_equivalence(table);
        for owner in owners {
            let root = equivalence.find(id(table, owner));
            assert_eq!(table.resolve(root), "object(1)");
        }
    }
}

#[test]
fn test_quick_compare_rejections_are_counted() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "a", "number");
    observe(&mut builder, "object(2)", "b", "number");
    observe(&mut builder, "object(3)", "c", "number");
    let table = builder.build().unwrap();

    let mut solver = EquivalenceSolver::new(&table);
    solver.solve();
    let stats = solver.stats();
    assert_eq!(stats.passes, 1);
    assert_eq!(stats.merges, 0);
    assert_eq!(stats.quick_rejections, 3);
    assert_eq!(stats.canonical.computed, 0);
}

#[test]
fn test_quick_compare_basic_cases() {
    let mut builder = TypeTable::builder();
    observe(&mut builder, "object(1)", "a", "number");
    observe(&mut builder, "object(1)", "b", "number");
    observe(&mut builder, "object(2)", "b", "string");
    observe(&mut builder, "object(2)", "a", "string");
    observe(&mut builder, "object(3)", "a", "number");
    builder.declare("object(4)").unwrap();
    builder.intern("object(5)").unwrap();
    let table = builder.build().unwrap();

    let o = |n: &str| id(&table, n);
    assert!(quick_compare(&table, o("object(1)"), o("object(2)")));
    assert!(!quick_compare(&table, o("object(1)"), o("object(3)")));
    assert!(!quick_compare(&table, o("object(3)"), o("object(4)")));
    // Empty shape and no shape both mean "no fields".
    assert!(quick_compare(&table, o("object(4)"), o("object(5)")));
    assert!(!quick_compare(&table, TypeId::NUMBER, TypeId::STRING));
}

const FIELD_NAMES: [&str; 3] = ["a", "b", "c"];
const MAX_TYPES: usize = 6;

fn target_name(index: usize) -> String {
    match index {
        0 => "number".to_string(),
        1 => "string".to_string(),
        n => format!("object({})", n - 2),
    }
}

fn arbitrary_table() -> impl Strategy<Value = TypeTable> {
    let field = (
        0..FIELD_NAMES.len(),
        prop::collection::vec(0..MAX_TYPES + 2, 1..3),
    );
    let shape = prop::collection::vec(field, 0..4);
    prop::collection::vec(shape, 1..MAX_TYPES).prop_map(|shapes| {
        let mut builder = TypeTable::builder();
        for (owner, fields) in shapes.iter().enumerate() {
            let owner = format!("object({owner})");
            builder.declare(&owner).unwrap();
            for (field, targets) in fields {
                for target in targets {
                    builder
                        .observe(&owner, FIELD_NAMES[*field], &target_name(*target), &[])
                        .unwrap();
                }
            }
        }
        builder.build().unwrap()
    })
}

proptest! {
    #[test]
    fn quick_compare_rejection_implies_different_canonical_forms(table in arbitrary_table()) {
        let ids: Vec<TypeId> = table.interner().ids().collect();
        let repr = |ty: TypeId| {
            canonical_representation(&table, ty, MAX_NODES_IN_CANONICAL_REPR)
                .unwrap_or_else(|| crate::canonicalize::overflow_placeholder(&table, ty))
        };
        for &a in &ids {
            for &b in &ids {
                if !quick_compare(&table, a, b) {
                    prop_assert_ne!(repr(a), repr(b));
                }
            }
        }
    }

    #[test]
    fn merged_types_share_canonical_forms(table in arbitrary_table()) {
        let equivalence = compute_equivalence(&table);
        for ty in table.type_ids() {
            let root = equivalence.find(ty);
            prop_assert!(equivalence.is_root(root));
            prop_assert!(table.resolve(root) <= table.resolve(ty));
            prop_assert_eq!(
                canonical_representation(&table, ty, MAX_NODES_IN_CANONICAL_REPR),
                canonical_representation(&table, root, MAX_NODES_IN_CANONICAL_REPR)
            );
        }
    }
}
