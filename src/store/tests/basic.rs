//! Basic mutation tests for WidgetStore.

use super::{id_set, store_with, table, WidgetStore};
use crate::store::{ChartType, WidgetPatch, DEFAULT_WIDGET_SIZE};
use crate::{Size, SizeState, WidgetKind};

#[test]
fn test_in_memory_store_starts_with_default_widgets() {
    let store = WidgetStore::in_memory("user1");
    assert_eq!(store.user_id(), "user1");
    assert_eq!(
        store.ids(),
        vec!["widget1", "widget2", "widget3", "widget4", "widget5"]
    );
}

#[test]
fn test_add_chart_widget_defaults() {
    let mut store = WidgetStore::in_memory("user1");
    let before = store.len();

    let id = store
        .add_widget(WidgetKind::Chart, "Test")
        .expect("title is valid");

    assert_eq!(store.len(), before + 1);
    let record = store.get(&id).expect("added widget");
    assert_eq!(record.kind, WidgetKind::Chart);
    assert_eq!(record.title, "Test");
    assert!(record.visible);
    assert_eq!(record.size(), DEFAULT_WIDGET_SIZE);
    assert_eq!((record.min_w, record.min_h), (2, 2));
    assert_eq!(record.x, 0);
    assert!(record.unplaced);
    assert_eq!(record.chart_type(), ChartType::Bar);
    assert_eq!(record.size_state, SizeState::Normal);

    let others = store.widgets().iter().filter(|w| w.id == id).count();
    assert_eq!(others, 1);
}

#[test]
fn test_add_widget_ids_are_unique() {
    let mut store = WidgetStore::in_memory("user1");
    let a = store.add_widget(WidgetKind::Table, "A").expect("valid");
    let b = store.add_widget(WidgetKind::Table, "B").expect("valid");
    assert_ne!(a, b);
    assert_eq!(a, "widget6");
    assert_eq!(b, "widget7");
}

#[test]
fn test_add_widget_never_reuses_sequence_numbers() {
    let mut store = WidgetStore::in_memory("user1");
    let a = store.add_widget(WidgetKind::Stats, "A").expect("valid");
    store.remove_widget(&a);
    let b = store.add_widget(WidgetKind::Stats, "B").expect("valid");
    assert_ne!(a, b);
}

#[test]
fn test_add_widget_skips_ids_taken_by_foreign_records() {
    let mut store = store_with(vec![table("widget1", 0, 0, 6, 2), table("widget3", 6, 0, 6, 2)]);
    let id = store.add_widget(WidgetKind::Table, "Next").expect("valid");
    assert_eq!(id, "widget4");
}

#[test]
fn test_add_widget_rejects_blank_title() {
    let mut store = WidgetStore::in_memory("user1");
    let before = store.widgets().to_vec();

    assert!(store.add_widget(WidgetKind::Table, "").is_none());
    assert!(store.add_widget(WidgetKind::Table, "   \t").is_none());
    assert_eq!(store.widgets(), before.as_slice());
}

#[test]
fn test_add_then_remove_leaves_id_set_unchanged() {
    let mut store = WidgetStore::in_memory("user1");
    let before = id_set(&store);

    let id = store.add_widget(WidgetKind::Table, "Orders").expect("valid");
    store.remove_widget(&id);

    assert_eq!(id_set(&store), before);
}

#[test]
fn test_remove_missing_is_no_op() {
    let mut store = store_with(vec![table("a", 0, 0, 6, 2)]);
    assert!(store.remove_widget("missing").is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_remove_then_toggle_same_id_is_no_op() {
    let mut store = store_with(vec![table("a", 0, 0, 6, 2), table("b", 6, 0, 6, 2)]);
    let removed = store.remove_widget("a").expect("a exists");
    assert_eq!(removed.id, "a");
    let after_remove = store.widgets().to_vec();

    assert!(store.toggle_visibility("a").is_none());
    assert_eq!(store.widgets(), after_remove.as_slice());
    assert!(!store.contains("a"));
}

#[test]
fn test_toggle_visibility_flips() {
    let mut store = store_with(vec![table("a", 0, 0, 6, 2)]);
    assert_eq!(store.toggle_visibility("a"), Some(false));
    assert!(!store.get("a").expect("a").visible);
    assert_eq!(store.toggle_visibility("a"), Some(true));
}

#[test]
fn test_update_fields_merges_patch() {
    let mut store = store_with(vec![table("a", 0, 0, 6, 2)]);
    let patch = WidgetPatch::title("Renamed").with_size_state(SizeState::Expanded {
        original: Size::new(6, 2),
    });

    assert!(store.update_widget_fields("a", patch));

    let a = store.get("a").expect("a");
    assert_eq!(a.title, "Renamed");
    assert!(a.size_state.is_expanded());
    assert_eq!((a.x, a.y, a.w, a.h), (0, 0, 6, 2));
}

#[test]
fn test_update_fields_missing_id_returns_false() {
    let mut store = store_with(vec![table("a", 0, 0, 6, 2)]);
    assert!(!store.update_widget_fields("ghost", WidgetPatch::title("x")));
}

#[test]
fn test_size_writes_are_clamped_to_minimums() {
    let mut store = store_with(vec![table("a", 0, 0, 6, 2).with_min(2, 2)]);
    store.update_widget_fields("a", WidgetPatch::size(Size::new(1, 1)));
    assert_eq!(store.get("a").expect("a").size(), Size::new(2, 2));
}

#[test]
fn test_apply_patches_skips_missing_ids() {
    let mut store = store_with(vec![table("a", 0, 0, 6, 2), table("b", 6, 0, 6, 2)]);
    let applied = store.apply_patches(vec![
        ("a".to_string(), WidgetPatch::row(3)),
        ("ghost".to_string(), WidgetPatch::row(9)),
        ("b".to_string(), WidgetPatch::position(0, 5)),
    ]);
    assert_eq!(applied, 2);
    assert_eq!(store.get("a").expect("a").y, 3);
    assert_eq!(store.get("b").expect("b").x, 0);
}
