use crate::model::{WorkCenter, WorkOrder, WorkOrderData, WorkOrderStatus};
use crate::ui::theme;
use chrono::{Duration, NaiveDate};
use egui::{Color32, RichText, Ui};

/// Days between the default start and end of a new order.
const DEFAULT_SPAN_DAYS: i64 = 7;

/// Whether the panel creates a new order or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelMode {
    Create,
    Edit(String),
}

/// Actions the panel can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    None,
    Submit,
    Cancel,
    Delete(String),
}

/// Editable state of the work order form.
#[derive(Debug, Clone)]
pub struct WorkOrderPanel {
    pub mode: PanelMode,
    pub name: String,
    pub work_center_id: String,
    pub status: WorkOrderStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Form-level message, e.g. an overlap rejection from the store.
    pub error: Option<String>,
    /// Set after the first submit attempt so field errors only show then.
    pub touched: bool,
}

impl WorkOrderPanel {
    /// A blank create form for `work_center_id`, one week starting at `start`.
    pub fn create(work_center_id: impl Into<String>, start: NaiveDate) -> Self {
        Self {
            mode: PanelMode::Create,
            name: String::new(),
            work_center_id: work_center_id.into(),
            status: WorkOrderStatus::Open,
            start_date: start,
            end_date: start + Duration::days(DEFAULT_SPAN_DAYS),
            error: None,
            touched: false,
        }
    }

    /// An edit form prefilled from `order`.
    pub fn edit(order: &WorkOrder) -> Self {
        let d = &order.data;
        Self {
            mode: PanelMode::Edit(order.id.clone()),
            name: d.name.clone(),
            work_center_id: d.work_center_id.clone(),
            status: d.status,
            start_date: d.start_date,
            end_date: d.end_date,
            error: None,
            touched: false,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, PanelMode::Edit(_))
    }

    pub fn title(&self) -> &'static str {
        if self.is_edit() {
            "Work Order Details"
        } else {
            "New Work Order"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit() {
            "Save"
        } else {
            "Create"
        }
    }

    /// In create mode, keep the end date a week after a start that overtook it.
    pub fn on_start_date_changed(&mut self) {
        if self.mode == PanelMode::Create && self.end_date < self.start_date {
            self.end_date = self.start_date + Duration::days(DEFAULT_SPAN_DAYS);
        }
    }

    pub fn name_missing(&self) -> bool {
        self.name.trim().is_empty()
    }

    pub fn end_before_start(&self) -> bool {
        self.end_date < self.start_date
    }

    /// Client-side checks that do not need the schedule.
    pub fn is_valid(&self) -> bool {
        !self.name_missing() && !self.work_center_id.is_empty() && !self.end_before_start()
    }

    pub fn data(&self) -> WorkOrderData {
        WorkOrderData {
            name: self.name.trim().to_string(),
            work_center_id: self.work_center_id.clone(),
            status: self.status,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

fn field_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_DIM).strong());
}

fn field_error(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.5).color(theme::TEXT_ERROR));
}

/// Render the create/edit form into the side panel.
pub fn show_work_order_panel(
    panel: &mut WorkOrderPanel,
    centers: &[WorkCenter],
    ui: &mut Ui,
) -> PanelAction {
    let mut action = PanelAction::None;

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(panel.title())
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .button(RichText::new(egui_phosphor::regular::X).size(13.0))
                .on_hover_text("Close")
                .clicked()
            {
                action = PanelAction::Cancel;
            }
        });
    });
    ui.add_space(6.0);
    ui.separator();
    ui.add_space(4.0);

    ui.spacing_mut().item_spacing.y = 6.0;
    ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;

    // ── Name ────────────────────────────────────────────────────────────
    field_label(ui, "Work Order Name");
    ui.add_sized(
        [ui.available_width(), 24.0],
        egui::TextEdit::singleline(&mut panel.name)
            .hint_text("Acme Inc.")
            .font(egui::FontId::proportional(12.0))
            .text_color(theme::TEXT_PRIMARY),
    );
    if panel.touched && panel.name_missing() {
        field_error(ui, "Name is required.");
    }

    // ── Work center ─────────────────────────────────────────────────────
    field_label(ui, "Work Center");
    let center_label = centers
        .iter()
        .find(|c| c.id == panel.work_center_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "Select a work center".to_string());
    egui::ComboBox::from_id_salt("work_center_combo")
        .selected_text(RichText::new(center_label).size(11.5))
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for center in centers {
                ui.selectable_value(&mut panel.work_center_id, center.id.clone(), center.name.as_str());
            }
        });
    if panel.touched && panel.work_center_id.is_empty() {
        field_error(ui, "Work center is required.");
    }

    // ── Status ──────────────────────────────────────────────────────────
    field_label(ui, "Status");
    egui::ComboBox::from_id_salt("status_combo")
        .selected_text(
            RichText::new(panel.status.label())
                .size(11.5)
                .color(theme::status_color(panel.status)),
        )
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for status in WorkOrderStatus::all() {
                ui.selectable_value(
                    &mut panel.status,
                    *status,
                    RichText::new(status.label()).color(theme::status_color(*status)),
                );
            }
        });

    // ── Dates ───────────────────────────────────────────────────────────
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            field_label(ui, "Start Date");
            let resp = ui.add(
                egui_extras::DatePickerButton::new(&mut panel.start_date).id_salt("wo_dp_start"),
            );
            if resp.changed() {
                panel.on_start_date_changed();
            }
        });
        ui.add_space(8.0);
        ui.vertical(|ui| {
            field_label(ui, "End Date");
            ui.add(egui_extras::DatePickerButton::new(&mut panel.end_date).id_salt("wo_dp_end"));
        });
    });
    if panel.end_before_start() {
        field_error(ui, "End date must not be before start date.");
    }

    if let Some(error) = &panel.error {
        ui.add_space(4.0);
        egui::Frame::none()
            .fill(Color32::from_rgba_premultiplied(90, 30, 30, 120))
            .rounding(egui::Rounding::same(4.0))
            .inner_margin(egui::Margin::same(6.0))
            .show(ui, |ui| {
                ui.label(RichText::new(error).size(11.0).color(theme::TEXT_ERROR));
            });
    }

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        let submit = egui::Button::new(RichText::new(panel.submit_label()).color(Color32::WHITE))
            .fill(theme::ACCENT)
            .rounding(egui::Rounding::same(4.0));
        if ui.add_sized([80.0, 28.0], submit).clicked() {
            panel.touched = true;
            if panel.is_valid() {
                action = PanelAction::Submit;
            }
        }
        if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
            action = PanelAction::Cancel;
        }
        if let PanelMode::Edit(id) = &panel.mode {
            let delete = egui::Button::new(
                RichText::new(format!("{}  Delete", egui_phosphor::regular::TRASH))
                    .color(theme::TEXT_ERROR),
            );
            if ui.add_sized([90.0, 28.0], delete).clicked() {
                action = PanelAction::Delete(id.clone());
            }
        }
    });

    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        action = PanelAction::Cancel;
    }

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn create_defaults_to_one_week_open() {
        let panel = WorkOrderPanel::create("wc-2", date(2025, 5, 1));
        assert_eq!(panel.mode, PanelMode::Create);
        assert_eq!(panel.end_date, date(2025, 5, 8));
        assert_eq!(panel.status, WorkOrderStatus::Open);
        assert_eq!(panel.submit_label(), "Create");
        assert!(!panel.is_valid());
    }

    #[test]
    fn edit_prefills_from_order() {
        let order = WorkOrder::new(
            "wo-9",
            WorkOrderData {
                name: "Lot 9".into(),
                work_center_id: "wc-3".into(),
                status: WorkOrderStatus::Blocked,
                start_date: date(2025, 5, 1),
                end_date: date(2025, 5, 4),
            },
        );
        let panel = WorkOrderPanel::edit(&order);
        assert_eq!(panel.mode, PanelMode::Edit("wo-9".into()));
        assert_eq!(panel.submit_label(), "Save");
        assert_eq!(panel.data(), order.data);
    }

    #[test]
    fn start_past_end_moves_end_in_create_mode() {
        let mut panel = WorkOrderPanel::create("wc-1", date(2025, 5, 1));
        panel.start_date = date(2025, 5, 20);
        panel.on_start_date_changed();
        assert_eq!(panel.end_date, date(2025, 5, 27));

        panel.start_date = date(2025, 5, 21);
        panel.on_start_date_changed();
        assert_eq!(panel.end_date, date(2025, 5, 27));
    }

    #[test]
    fn start_past_end_is_flagged_in_edit_mode() {
        let mut panel = WorkOrderPanel::create("wc-1", date(2025, 5, 1));
        panel.name = "Lot".into();
        panel.mode = PanelMode::Edit("wo-1".into());
        panel.start_date = date(2025, 5, 20);
        panel.on_start_date_changed();
        assert!(panel.end_before_start());
        assert!(!panel.is_valid());
    }

    #[test]
    fn data_trims_name() {
        let mut panel = WorkOrderPanel::create("wc-1", date(2025, 5, 1));
        panel.name = "  Lot 4 ".into();
        assert!(panel.is_valid());
        assert_eq!(panel.data().name, "Lot 4");
    }
}
