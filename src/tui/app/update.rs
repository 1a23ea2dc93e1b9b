use super::*;
use crate::data::dataset_for;
use crate::grid::Handle;
use crate::notify::{Notification, Notifier};
use crate::resize::ResizeCoordinator;
use crate::store::{TypeConfig, WidgetPatch};
use crate::tui::event::Action;
use crate::tui::views::table::next_sort;
use crate::WidgetKind;

/// Widget exists and is shown.
fn shown(store: &WidgetStore, id: &str) -> bool {
    store.get(id).is_some_and(|r| r.visible)
}

impl App {
    /// Applies an action produced by key handling.
    pub(crate) fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => return,
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::SubmitForm => self.submit_form(),
            Action::Remove(id) => {
                if let Some(record) = self.session.store_mut().remove_widget(&id) {
                    self.notifications
                        .show(Notification::info(format!("Removed \"{}\"", record.title)));
                }
            }
            Action::ToggleVisibility(id) => {
                if let Some(visible) = self.session.store_mut().toggle_visibility(&id) {
                    tracing::debug!("widget {} visible: {}", id, visible);
                }
            }
            Action::Expand(id) => {
                ResizeCoordinator::new(self.session.store_mut(), &mut self.notifications)
                    .expand(&id);
            }
            Action::Fullscreen(id) => {
                ResizeCoordinator::new(self.session.store_mut(), &mut self.notifications)
                    .enter_fullscreen(&mut self.overlay, &id);
            }
            Action::ExitFullscreen => {
                ResizeCoordinator::new(self.session.store_mut(), &mut self.notifications)
                    .exit_fullscreen(&mut self.overlay);
            }
            Action::Restore(id) => {
                ResizeCoordinator::new(self.session.store_mut(), &mut self.notifications)
                    .request_restore(&id);
            }
            Action::CycleChartType(id) => self.cycle_chart_type(&id),
            Action::CycleSort(id) => self.cycle_sort(&id),
            Action::Refresh(id) => {
                self.data.remove(&id);
            }
            Action::Move { id, dx, dy } => self.move_widget(&id, dx, dy),
            Action::Resize { id, dw, dh } => self.resize_widget(&id, dw, dh),
            Action::SwitchUser(id) => self.switch_user(&id),
        }
        self.sync();
    }

    /// Settles the layout and drops state that points at hidden or
    /// removed widgets.
    pub(crate) fn sync(&mut self) {
        self.adapter.reconcile(self.session.store_mut());

        let store = self.session.store();
        self.data.retain(|id, _| shown(store, id));
        if let Some(id) = self.overlay.widget().map(str::to_string) {
            if !shown(store, &id) {
                self.overlay.forget(&id);
            }
        }
        if let Some(id) = self.focused.as_deref() {
            if !shown(store, id) {
                self.focused = None;
            }
        }
    }

    /// Handles a periodic tick.
    pub(crate) fn tick(&mut self, now: Instant) {
        self.tick_count += 1;
        self.notifications.expire(now);
    }

    /// Fetches the event loop should start: one per shown widget whose
    /// data is missing or belongs to another dataset.
    ///
    /// The widgets are marked loading so the same fetch is not started twice.
    pub fn pending_fetches(&mut self) -> Vec<FetchJob> {
        let mut jobs = Vec::new();
        for record in self.session.store().widgets().iter().filter(|r| r.visible) {
            let dataset = dataset_for(record);
            let fresh = self
                .data
                .get(&record.id)
                .is_some_and(|d| d.dataset() == dataset);
            if !fresh {
                self.data
                    .insert(record.id.clone(), WidgetData::Loading(dataset));
                jobs.push(FetchJob {
                    widget: record.id.clone(),
                    dataset,
                });
            }
        }
        jobs
    }

    /// Stores a finished fetch.
    ///
    /// Results for widgets that were removed, hidden or switched to another
    /// dataset meanwhile are discarded.
    pub fn apply_fetch(&mut self, fetched: FetchResult) {
        let awaited = matches!(
            self.data.get(&fetched.widget),
            Some(WidgetData::Loading(dataset)) if *dataset == fetched.dataset
        );
        if !awaited || !shown(self.store(), &fetched.widget) {
            tracing::debug!(
                "discarding {} data for widget {}",
                fetched.dataset,
                fetched.widget
            );
            return;
        }
        let state = match fetched.result {
            Ok(records) => WidgetData::Ready(fetched.dataset, records),
            Err(e) => {
                tracing::warn!("fetch for widget {} failed: {}", fetched.widget, e);
                WidgetData::Failed(fetched.dataset)
            }
        };
        self.data.insert(fetched.widget, state);
    }

    fn submit_form(&mut self) {
        let Mode::AddWidget(form) = &self.mode else {
            return;
        };
        let kind = form.kind;
        let Some(id) = form.submit(self.session.store_mut()) else {
            return;
        };
        let title = self
            .store()
            .get(&id)
            .map(|r| r.title.clone())
            .unwrap_or_default();
        self.notifications
            .show(Notification::success(format!("Added {} \"{}\"", kind, title)));
        self.mode = Mode::Dashboard;
        self.focused = Some(id);
    }

    fn cycle_chart_type(&mut self, id: &str) {
        let Some(record) = self.store().get(id) else {
            return;
        };
        if record.kind != WidgetKind::Chart {
            return;
        }
        let current = record.chart_type();
        let next = current.next();
        let config = TypeConfig {
            chart_type: Some(next),
            ..record.type_config
        };
        self.session
            .store_mut()
            .update_widget_fields(id, WidgetPatch::type_config(config));
        tracing::debug!("widget {} chart type {:?} -> {:?}", id, current, next);
    }

    fn cycle_sort(&mut self, id: &str) {
        let Some(record) = self.store().get(id) else {
            return;
        };
        let config = TypeConfig {
            sort: next_sort(record.type_config.sort),
            ..record.type_config
        };
        self.session
            .store_mut()
            .update_widget_fields(id, WidgetPatch::type_config(config));
    }

    /// Moves a widget through the grid adapter, the same way a drag does.
    fn move_widget(&mut self, id: &str, dx: i32, dy: i32) {
        let layout = self.adapter.display_layout(self.store());
        let Some(entry) = layout.iter().find(|e| e.id == id) else {
            return;
        };
        let x = (i64::from(entry.x) + i64::from(dx)).max(0) as u32;
        let y = (i64::from(entry.y) + i64::from(dy)).max(0) as u32;
        if self.adapter.drag_start(self.session.store(), id, Handle::DragBar) {
            self.adapter.drag_move(x, y);
            self.adapter.drag_stop(self.session.store_mut());
        }
    }

    /// Resizes a widget through the grid adapter, the same way the resize
    /// handle does.
    fn resize_widget(&mut self, id: &str, dw: i32, dh: i32) {
        let layout = self.adapter.display_layout(self.store());
        let Some(entry) = layout.iter().find(|e| e.id == id) else {
            return;
        };
        let w = (i64::from(entry.w) + i64::from(dw)).max(1) as u32;
        let h = (i64::from(entry.h) + i64::from(dh)).max(1) as u32;
        if self.adapter.resize_start(self.session.store(), id) {
            self.adapter.resize(self.session.store_mut(), w, h);
            self.adapter.resize_stop(self.session.store_mut());
        }
    }

    fn switch_user(&mut self, id: &str) {
        if !self.session.switch_user(id) {
            self.notifications
                .show(Notification::error(format!("Unknown user {}", id)));
            return;
        }
        self.adapter.cancel();
        self.pointer = None;
        self.overlay = FullscreenOverlay::default();
        self.focused = None;
        self.data.clear();
        self.scroll = 0;
        self.mode = Mode::Dashboard;
        let name = self.session.user_info().map_or(id, |u| u.name);
        self.notifications
            .show(Notification::success(format!("Switched to {}", name)));
    }
}
