use super::*;

#[test]
fn blank_input_is_ignored() {
    let mut collection = Collection::new();
    assert!(!collection.add(""));
    assert!(!collection.add("   "));
    assert!(!collection.add("\t\n"));
    assert_eq!(collection.size(), 0);
}

#[test]
fn add_trims_and_appends_last() {
    let mut collection = Collection::from_lines("Eat\nSleep");
    assert!(collection.add("  X  "));
    assert_eq!(collection.size(), 3);
    assert_eq!(collection.items().last().expect("last"), "X");
}

#[test]
fn add_lines_skips_blank_lines_and_keeps_order() {
    let mut collection = Collection::new();
    let added = collection.add_lines("Eat\r\n\n  Sleep \n   \nCode\n");
    assert_eq!(added, 3);
    assert_eq!(collection.to_strings(), vec!["Eat", "Sleep", "Code"]);
}

#[test]
fn replace_lines_discards_previous_items() {
    let mut collection = Collection::from_lines("a\nb");
    assert_eq!(collection.replace_lines("c"), 1);
    assert_eq!(collection.to_strings(), vec!["c"]);
}

#[test]
fn remove_at_reports_invalid_index_without_mutating() {
    let mut collection = Collection::from_lines("a\nb");
    let err = collection.remove_at(2).expect_err("out of range");
    assert_eq!(err, PickError::IndexOutOfRange { index: 2, len: 2 });
    assert_eq!(collection.size(), 2);

    let removed = collection.remove_at(0).expect("remove");
    assert_eq!(removed, "a");
    assert_eq!(collection.to_strings(), vec!["b"]);
}

#[test]
fn remove_value_drops_only_first_duplicate() {
    let mut collection = Collection::from_lines("x\ny\nx");
    assert!(collection.remove_value("x"));
    assert_eq!(collection.to_strings(), vec!["y", "x"]);
    assert!(!collection.remove_value("missing"));
    assert_eq!(collection.size(), 2);
}

#[test]
fn clear_empties_collection() {
    let mut collection = Collection::from_lines("a\nb\nc");
    collection.clear();
    assert!(collection.is_empty());
}
