use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::AppSettings;
use crate::io::{FileStorage, KeyValueStorage};
use crate::model::{TimelineRange, TimelineZoom, WorkOrder};
use crate::store::{ScheduleError, ScheduleStore};
use crate::ui;
use crate::ui::timeline_chart::{ChartAction, ChartView};
use crate::ui::work_order_panel::{PanelAction, PanelMode, WorkOrderPanel};

/// Screen state that does not depend on egui: the store, the current
/// snapshot, zoom and the open form. Generic over storage so it can be
/// driven without a window.
pub struct Board<S: KeyValueStorage> {
    pub store: ScheduleStore<S>,
    /// Snapshot re-read after every mutation.
    pub work_orders: Vec<WorkOrder>,
    pub zoom: TimelineZoom,
    pub range: TimelineRange,
    pub today: NaiveDate,
    pub panel: Option<WorkOrderPanel>,
    pub status_message: String,
}

impl<S: KeyValueStorage> Board<S> {
    pub fn new(store: ScheduleStore<S>, zoom: TimelineZoom, today: NaiveDate) -> Self {
        let work_orders = store.work_orders();
        Self {
            store,
            work_orders,
            zoom,
            range: TimelineRange::for_zoom(zoom, today),
            today,
            panel: None,
            status_message: "Ready".to_string(),
        }
    }

    pub fn set_zoom(&mut self, zoom: TimelineZoom) {
        self.zoom = zoom;
        self.range = TimelineRange::for_zoom(zoom, self.today);
    }

    /// Move "today" forward, e.g. after the window stayed open past midnight.
    pub fn set_today(&mut self, today: NaiveDate) {
        if today != self.today {
            info!(%today, "date changed, recomputing timeline range");
            self.today = today;
        }
        self.range = TimelineRange::for_zoom(self.zoom, today);
    }

    /// Open a create form. Without a work center the first one is preselected.
    pub fn open_create(&mut self, work_center_id: Option<String>, start: NaiveDate) {
        let center = work_center_id
            .or_else(|| self.store.work_centers().first().map(|c| c.id.clone()))
            .unwrap_or_default();
        self.panel = Some(WorkOrderPanel::create(center, start));
    }

    pub fn open_edit(&mut self, id: &str) {
        match self.store.work_order(id) {
            Some(order) => self.panel = Some(WorkOrderPanel::edit(&order)),
            None => self.status_message = format!("Work order '{}' no longer exists", id),
        }
    }

    pub fn close_panel(&mut self) {
        self.panel = None;
    }

    /// Send the open form to the store. On rejection the form stays open
    /// with the reason; otherwise it closes.
    pub fn submit_panel(&mut self) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        let data = panel.data();
        let result = match &panel.mode {
            PanelMode::Create => self
                .store
                .create_work_order(data)
                .map(|order| format!("Created '{}'", order.data.name)),
            PanelMode::Edit(id) => {
                let name = data.name.clone();
                self.store
                    .save_work_order(id, data)
                    .map(|()| format!("Saved '{}'", name))
            }
        };
        match result {
            Ok(message) => {
                self.status_message = message;
                self.panel = None;
                self.refresh();
            }
            Err(e) if e.is_form_error() => panel.error = Some(e.to_string()),
            Err(e) => {
                warn!(error = %e, "work order submit failed");
                self.status_message = e.to_string();
                self.panel = None;
                self.refresh();
            }
        }
    }

    pub fn delete(&mut self, id: &str) {
        match self.store.delete_work_order(id) {
            Ok(()) => self.status_message = "Work order deleted".to_string(),
            Err(e) => {
                warn!(error = %e, "delete failed");
                self.status_message = e.to_string();
            }
        }
        if matches!(&self.panel, Some(p) if p.mode == PanelMode::Edit(id.to_string())) {
            self.panel = None;
        }
        self.refresh();
    }

    pub fn reset_to_sample(&mut self) {
        self.store.reset_to_sample(self.today);
        self.panel = None;
        self.refresh();
        self.status_message = "Sample schedule restored".to_string();
    }

    pub fn handle_chart_action(&mut self, action: ChartAction) {
        match action {
            ChartAction::None => {}
            ChartAction::CreateAt { work_center_id, date } => {
                self.open_create(Some(work_center_id), date);
            }
            ChartAction::Edit(id) => self.open_edit(&id),
            ChartAction::Delete(id) => self.delete(&id),
        }
    }

    fn refresh(&mut self) {
        self.work_orders = self.store.work_orders();
    }

    fn selected_id(&self) -> Option<&str> {
        match self.panel.as_ref().map(|p| &p.mode) {
            Some(PanelMode::Edit(id)) => Some(id.as_str()),
            _ => None,
        }
    }
}

/// Main application state.
pub struct TimelineApp {
    pub board: Board<FileStorage>,
    pub settings: AppSettings,
    pub scroll_to_today: bool,

    // Dialog state
    pub show_about: bool,
    pub show_confirm_reset: bool,
}

impl TimelineApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: AppSettings,
        store: ScheduleStore<FileStorage>,
        today: NaiveDate,
    ) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let zoom = settings.default_zoom;
        Self {
            board: Board::new(store, zoom, today),
            settings,
            scroll_to_today: true,
            show_about: false,
            show_confirm_reset: false,
        }
    }

    pub fn set_zoom(&mut self, zoom: TimelineZoom) {
        self.board.set_zoom(zoom);
        self.jump_to_today();
    }

    /// Re-read the local date and scroll the timeline to the marker.
    pub fn jump_to_today(&mut self) {
        self.board.set_today(chrono::Local::now().date_naive());
        self.scroll_to_today = true;
    }

    pub fn open_create_panel(&mut self, work_center_id: Option<String>) {
        let today = self.board.today;
        self.board.open_create(work_center_id, today);
    }

    pub fn export_csv(&mut self) {
        if self.board.work_orders.is_empty() {
            self.board.status_message = "Nothing to export, there are no work orders".to_string();
            return;
        }
        let path = self.board.store_dir().join("work-orders.csv");
        if let Err(e) = std::fs::create_dir_all(self.board.store_dir()) {
            self.board.status_message = format!("CSV export failed: {}", e);
            return;
        }
        match crate::io::csv_export::export_csv(
            &self.board.work_orders,
            self.board.store.work_centers(),
            &path,
        ) {
            Ok(count) => {
                info!(count, path = %path.display(), "exported work orders");
                self.board.status_message =
                    format!("Exported {} work orders to {}", count, path.display());
            }
            Err(e) => {
                warn!(error = %e, "CSV export failed");
                self.board.status_message = format!("CSV export failed: {}", e);
            }
        }
    }

    pub fn open_data_folder(&mut self) {
        let dir = self.board.store_dir().to_path_buf();
        if let Err(e) = open::that(&dir) {
            warn!(error = %e, dir = %dir.display(), "failed to open data folder");
            self.board.status_message = format!("Could not open {}", dir.display());
        }
    }

    pub fn reset_sample_data(&mut self) {
        self.show_confirm_reset = true;
    }

    pub fn confirm_reset_sample_data(&mut self) {
        self.board.reset_to_sample();
        self.show_confirm_reset = false;
    }
}

impl Board<FileStorage> {
    fn store_dir(&self) -> &std::path::Path {
        self.store.storage().dir()
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.board.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Work orders: {}",
                                self.board.work_orders.len()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Right panel: work order form
        let mut panel_action = PanelAction::None;
        if let Some(panel) = self.board.panel.as_mut() {
            egui::SidePanel::right("work_order_panel")
                .exact_width(ui::theme::PANEL_WIDTH)
                .resizable(false)
                .frame(
                    egui::Frame::default()
                        .fill(ui::theme::BG_PANEL)
                        .inner_margin(egui::Margin::same(12.0))
                        .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
                )
                .show(ctx, |ui| {
                    panel_action = ui::work_order_panel::show_work_order_panel(
                        panel,
                        self.board.store.work_centers(),
                        ui,
                    );
                });
        }
        match panel_action {
            PanelAction::None => {}
            PanelAction::Submit => self.board.submit_panel(),
            PanelAction::Cancel => self.board.close_panel(),
            PanelAction::Delete(id) => self.board.delete(&id),
        }

        // Central panel: timeline
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let mut chart_action = ChartAction::None;
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let view = ChartView {
                centers: self.board.store.work_centers(),
                orders: &self.board.work_orders,
                zoom: self.board.zoom,
                range: self.board.range,
                today: self.board.today,
                body_width: self.settings.timeline_width_px,
                selected: self.board.selected_id(),
            };
            chart_action = ui::timeline_chart::show_timeline_chart(&view, &mut self.scroll_to_today, ui);
        });
        self.board.handle_chart_action(chart_action);

        // Dialogs
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
        if self.show_confirm_reset {
            ui::dialogs::show_confirm_reset_dialog(self, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryStorage;
    use crate::model::WorkOrderStatus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn board() -> Board<MemoryStorage> {
        Board::new(
            ScheduleStore::open(MemoryStorage::new(), today()),
            TimelineZoom::Day,
            today(),
        )
    }

    #[test]
    fn zoom_change_recomputes_range() {
        let mut board = board();
        board.set_zoom(TimelineZoom::Month);
        assert_eq!(board.range, TimelineRange::for_zoom(TimelineZoom::Month, today()));
    }

    #[test]
    fn new_day_moves_range_and_create_default() {
        let mut board = board();
        board.set_zoom(TimelineZoom::Week);
        let tomorrow = today() + chrono::Duration::days(1);
        board.set_today(tomorrow);
        assert_eq!(board.today, tomorrow);
        assert_eq!(board.zoom, TimelineZoom::Week);
        assert_eq!(board.range, TimelineRange::for_zoom(TimelineZoom::Week, tomorrow));

        board.open_create(None, board.today);
        let panel = board.panel.as_ref().unwrap();
        assert_eq!(panel.start_date, tomorrow);
        assert_eq!(panel.work_center_id, "wc-1");
    }

    #[test]
    fn click_on_empty_row_opens_prefilled_create() {
        let mut board = board();
        board.handle_chart_action(ChartAction::CreateAt {
            work_center_id: "wc-2".into(),
            date: today(),
        });
        let panel = board.panel.as_ref().unwrap();
        assert_eq!(panel.mode, PanelMode::Create);
        assert_eq!(panel.work_center_id, "wc-2");
        assert_eq!(panel.start_date, today());
        assert_eq!(panel.end_date, today() + chrono::Duration::days(7));
    }

    #[test]
    fn overlapping_create_keeps_panel_open_with_message() {
        let mut board = board();
        let wo1 = board.store.work_order("wo-1").unwrap();
        board.open_create(Some("wc-1".into()), wo1.data.start_date);
        let panel = board.panel.as_mut().unwrap();
        panel.name = "Clash".into();
        panel.end_date = wo1.data.end_date;

        board.submit_panel();
        let panel = board.panel.as_ref().unwrap();
        assert_eq!(
            panel.error.as_deref(),
            Some("This work order overlaps with an existing order on the same work center.")
        );
        assert_eq!(board.work_orders.len(), 8);

        board.delete("wo-1");
        board.open_create(Some("wc-1".into()), wo1.data.start_date);
        let panel = board.panel.as_mut().unwrap();
        panel.name = "Clash".into();
        panel.end_date = wo1.data.end_date;
        board.submit_panel();
        assert!(board.panel.is_none());
        assert_eq!(board.work_orders.len(), 8);
        assert!(board.work_orders.iter().any(|o| o.data.name == "Clash"));
    }

    #[test]
    fn edit_save_refreshes_snapshot() {
        let mut board = board();
        board.handle_chart_action(ChartAction::Edit("wo-6".into()));
        assert_eq!(board.selected_id(), Some("wo-6"));
        board.panel.as_mut().unwrap().status = WorkOrderStatus::Complete;
        board.submit_panel();
        assert!(board.panel.is_none());
        let saved = board.work_orders.iter().find(|o| o.id == "wo-6").unwrap();
        assert_eq!(saved.data.status, WorkOrderStatus::Complete);
    }

    #[test]
    fn deleting_edited_order_closes_panel() {
        let mut board = board();
        board.open_edit("wo-3");
        board.handle_chart_action(ChartAction::Delete("wo-3".into()));
        assert!(board.panel.is_none());
        assert_eq!(board.work_orders.len(), 7);
    }

    #[test]
    fn edit_of_missing_order_reports_status() {
        let mut board = board();
        board.open_edit("wo-404");
        assert!(board.panel.is_none());
        assert!(board.status_message.contains("wo-404"));
    }
}
