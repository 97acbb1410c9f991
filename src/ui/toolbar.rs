use crate::app::TimelineApp;
use crate::model::TimelineZoom;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  New Work Order").clicked() {
                app.open_create_panel(None);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Export CSV").clicked() {
                app.export_csv();
                ui.close_menu();
            }
            if ui.button("  Open Data Folder").clicked() {
                app.open_data_folder();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Reset Sample Data").clicked() {
                app.reset_sample_data();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.add_space(16.0);
        ui.label(RichText::new("Timescale").size(11.0).color(theme::TEXT_DIM));
        let mut zoom = app.board.zoom;
        for option in TimelineZoom::all() {
            ui.selectable_value(&mut zoom, *option, option.label());
        }
        if zoom != app.board.zoom {
            app.set_zoom(zoom);
        }

        ui.add_space(8.0);
        if ui
            .button(format!("{}  Today", egui_phosphor::regular::CALENDAR_BLANK))
            .on_hover_text("Scroll to the current date")
            .clicked()
        {
            app.jump_to_today();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new("Work Orders").size(11.0).weak());
        });
    });
}
