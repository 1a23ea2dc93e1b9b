//! Layout replacement and pending placement tests for WidgetStore.

use super::{store_with, table, WidgetStore};
use crate::layout::{to_layout, LayoutEntry};
use crate::WidgetKind;

#[test]
fn test_replace_layout_updates_matching_records() {
    let mut store = store_with(vec![table("a", 0, 0, 6, 2), table("b", 6, 0, 6, 2)]);
    store.replace_layout(&[LayoutEntry::new("b", 0, 2, 4, 3)]);

    let b = store.get("b").expect("b");
    assert_eq!((b.x, b.y, b.w, b.h), (0, 2, 4, 3));
    let a = store.get("a").expect("a");
    assert_eq!((a.x, a.y, a.w, a.h), (0, 0, 6, 2));
}

#[test]
fn test_replace_layout_ignores_unknown_entries() {
    let mut store = store_with(vec![table("a", 0, 0, 6, 2)]);
    store.replace_layout(&[LayoutEntry::new("ghost", 0, 0, 2, 2)]);
    assert_eq!(store.ids(), vec!["a"]);
}

#[test]
fn test_replace_layout_round_trips_through_projection() {
    let mut store = WidgetStore::in_memory("user1");
    let entries = vec![
        LayoutEntry::new("widget2", 0, 0, 12, 2),
        LayoutEntry::new("widget1", 0, 2, 6, 3),
    ];
    store.replace_layout(&entries);

    let projected = to_layout(store.widgets());
    for entry in &entries {
        let back = projected
            .iter()
            .find(|e| e.id == entry.id)
            .expect("entry survives");
        assert_eq!((back.x, back.y, back.w, back.h), (entry.x, entry.y, entry.w, entry.h));
    }
}

#[test]
fn test_place_pending_appends_below_existing_rows() {
    let mut store = store_with(vec![table("a", 0, 0, 6, 2), table("b", 6, 0, 6, 4)]);
    let first = store.add_widget(WidgetKind::Table, "First").expect("valid");
    let second = store.add_widget(WidgetKind::Chart, "Second").expect("valid");

    assert_eq!(store.place_pending(), 2);
    assert_eq!(store.get(&first).expect("first").y, 4);
    assert_eq!(store.get(&second).expect("second").y, 6);
    assert_eq!(store.place_pending(), 0);
}

#[test]
fn test_pending_widget_is_projected_where_it_will_be_placed() {
    let mut store = store_with(vec![table("a", 0, 0, 6, 3)]);
    let id = store.add_widget(WidgetKind::Stats, "KPIs").expect("valid");

    let projected = to_layout(store.widgets());
    let entry = projected.iter().find(|e| e.id == id).expect("projected");
    assert_eq!(entry.y, 3);

    store.place_pending();
    assert_eq!(store.get(&id).expect("placed").y, 3);
}

#[test]
fn test_hidden_widgets_are_not_projected() {
    let mut store = store_with(vec![table("a", 0, 0, 6, 2), table("b", 6, 0, 6, 2)]);
    store.toggle_visibility("a");
    let ids: Vec<String> = to_layout(store.widgets()).into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["b".to_string()]);
}
