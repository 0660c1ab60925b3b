//! Tree literal conversion in both directions.

use rstest::rstest;
use serde_json::{json, Value};

use nodetree::util::testing;
use nodetree::{NodeArena, TreeError, TreeRecord};

type JsonArena = NodeArena<String, Value>;

fn leaf(name: &str, data: Value) -> TreeRecord<String, Value> {
    TreeRecord::new(name.to_string(), Some(data))
}

// ============================================================
// to_record
// ============================================================

#[rstest]
fn given_root_with_child_when_converting_then_mirrors_structure() {
    testing::init_test_setup();
    let mut arena: NodeArena<String, String> = NodeArena::new();
    let root = arena.create_node("Root".into(), Some("Root Data".into()));
    arena
        .create_child(root, "Child".into(), Some("Child Data".into()))
        .unwrap();

    let record = arena.to_record(root).unwrap();

    assert_eq!(
        record,
        TreeRecord::new("Root".to_string(), Some("Root Data".to_string())).with_children([
            TreeRecord::new("Child".to_string(), Some("Child Data".to_string()))
        ])
    );
}

#[rstest]
fn given_subtree_when_converting_then_only_covers_subtree() {
    let mut arena = JsonArena::new();
    let root = arena.create_node("root".into(), None);
    let dir = arena.create_child(root, "dir".into(), None).unwrap();
    arena.create_child(dir, "file".into(), Some(json!(1))).unwrap();
    arena.create_child(root, "other".into(), None).unwrap();

    let record = arena.to_record(dir).unwrap();

    assert_eq!(record.name, "dir");
    assert_eq!(record.size(), 2);
    assert_eq!(record.children[0].data, Some(json!(1)));
}

#[rstest]
fn given_record_when_serialized_then_omits_absent_data() {
    let record: TreeRecord<String, Value> =
        TreeRecord::new("Root".to_string(), None).with_children([leaf("Child", json!("x"))]);

    let text = serde_json::to_value(&record).unwrap();

    assert_eq!(
        text,
        json!({
            "name": "Root",
            "children": [ { "name": "Child", "data": "x", "children": [] } ]
        })
    );
}

#[rstest]
fn given_stale_id_when_converting_then_reports_unknown_node() {
    let mut arena = JsonArena::new();
    let id = arena.create_node("gone".into(), None);
    arena.discard(id).unwrap();

    assert!(matches!(arena.to_record(id), Err(TreeError::UnknownNode(_))));
}

// ============================================================
// from_record
// ============================================================

#[rstest]
fn given_literal_when_building_then_children_keep_array_order() {
    let record = TreeRecord::new("root".to_string(), None).with_children([
        leaf("b", json!(2)),
        leaf("a", json!(1)),
        leaf("c", json!(3)),
    ]);
    let mut arena = JsonArena::new();

    let root = arena.from_record(record);

    let names: Vec<&String> = arena
        .children(root)
        .filter_map(|id| arena.name(id))
        .collect();
    assert_eq!(names, ["b", "a", "c"]);
    assert!(arena.get(root).unwrap().is_root());
    assert_eq!(arena.data(arena.child(root, "a").unwrap()), Some(&json!(1)));
}

#[rstest]
fn given_duplicate_sibling_names_when_building_then_last_one_wins() {
    let record = TreeRecord::new("root".to_string(), None)
        .with_children([leaf("x", json!("first")), leaf("x", json!("second"))]);
    let mut arena = JsonArena::new();

    let root = arena.from_record(record);

    assert_eq!(arena.children(root).count(), 1);
    assert_eq!(
        arena.data(arena.child(root, "x").unwrap()),
        Some(&json!("second"))
    );
}

#[rstest]
fn given_json_without_data_or_children_when_parsing_then_uses_defaults() {
    let record: TreeRecord<String, Value> =
        serde_json::from_str(r#"{ "name": "Root", "children": [ { "name": "Child" } ] }"#).unwrap();

    assert_eq!(record.data, None);
    assert_eq!(record.children.len(), 1);
    assert!(record.children[0].children.is_empty());
    assert_eq!(record.size(), 2);
}

#[rstest]
fn given_deep_mixed_tree_when_round_tripping_then_record_is_unchanged() {
    let original: TreeRecord<String, Value> = serde_json::from_value(json!({
        "name": "root",
        "data": { "kind": "dir" },
        "children": [
            {
                "name": "src",
                "children": [
                    { "name": "main.rs", "data": 42, "children": [] },
                    { "name": "lib.rs", "data": [1, 2, 3], "children": [] }
                ]
            },
            { "name": "README", "data": "hello", "children": [] },
            { "name": "empty", "data": null, "children": [] }
        ]
    }))
    .unwrap();
    let mut arena = JsonArena::new();

    let root = arena.from_record(original.clone());
    let rebuilt = arena.to_record(root).unwrap();

    assert_eq!(rebuilt, original);
    assert_eq!(arena.len(), original.size());
    let main = arena.get_node_by_path(root, ["src", "main.rs"]).unwrap();
    assert_eq!(arena.path(main).unwrap(), ["root", "src", "main.rs"]);
}
