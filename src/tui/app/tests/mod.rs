pub(crate) use super::*;
pub(crate) use crate::store::{ChartType, WidgetRecord};
pub(crate) use crate::tui::event::Action;
pub(crate) use crate::tui::test_utils::{make_app, make_default_app};
pub(crate) use crate::WidgetKind;


/// Record at `(x, y)` with size `w x h`.
pub(crate) fn placed(id: &str, kind: WidgetKind, x: u32, y: u32, w: u32, h: u32) -> WidgetRecord {
    WidgetRecord::new(id, kind, id).at(x, y, w, h)
}

/// Position and size of `id` in the store.
pub(crate) fn rect_of(app: &App, id: &str) -> (u32, u32, u32, u32) {
    let r = app.store().get(id).expect("widget exists");
    (r.x, r.y, r.w, r.h)
}
