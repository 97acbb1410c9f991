use crate::model::timeline::{bar_position, header_columns, today_marker_px};
use crate::model::{BarPosition, TimelineRange, TimelineZoom, WorkCenter, WorkOrder};
use crate::ui::theme;
use chrono::NaiveDate;
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const MIN_BAR_WIDTH: f32 = 4.0;

/// What the user asked for by interacting with the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartAction {
    None,
    /// Click on empty row space: open a create form there.
    CreateAt {
        work_center_id: String,
        date: NaiveDate,
    },
    Edit(String),
    Delete(String),
}

/// Read-only inputs for one frame of the chart.
pub struct ChartView<'a> {
    pub centers: &'a [WorkCenter],
    pub orders: &'a [WorkOrder],
    pub zoom: TimelineZoom,
    pub range: TimelineRange,
    pub today: NaiveDate,
    /// Width of the scrollable timeline body.
    pub body_width: f32,
    pub selected: Option<&'a str>,
}

/// Row index under a y offset measured from the top of the chart.
fn row_at(y: f32, rows: usize) -> Option<usize> {
    let y = y - HEADER_HEIGHT;
    if y < 0.0 {
        return None;
    }
    let row = (y / ROW_HEIGHT) as usize;
    (row < rows).then_some(row)
}

/// Position of an order's bar, or `None` when it lies wholly outside the range.
/// Same-day orders come back with zero width and are drawn at the minimum width.
fn visible_bar(start: NaiveDate, end: NaiveDate, range: &TimelineRange) -> Option<BarPosition> {
    if end < range.start || start > range.end {
        return None;
    }
    Some(bar_position(start, end, range))
}

/// Render the work center column and the scrollable timeline body.
pub fn show_timeline_chart(view: &ChartView<'_>, scroll_to_today: &mut bool, ui: &mut Ui) -> ChartAction {
    let mut action = ChartAction::None;
    let rows = view.centers.len();
    let chart_height = (HEADER_HEIGHT + rows as f32 * ROW_HEIGHT).max(ui.available_height());
    let hover_pos = ui.input(|i| i.pointer.hover_pos());

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_top(|ui| {
                ui.spacing_mut().item_spacing = Vec2::ZERO;

                let hovered_row = draw_name_column(view, chart_height, hover_pos, ui);

                let visible_width = ui.available_width();
                let body_width = view.body_width.max(visible_width);
                let marker = today_marker_px(&view.range, view.today, body_width);

                let mut scroll = egui::ScrollArea::horizontal()
                    .id_salt("timeline_body")
                    .auto_shrink([false, false]);
                if *scroll_to_today {
                    let offset = marker.map(|x| x - visible_width / 2.0).unwrap_or(0.0);
                    scroll = scroll.horizontal_scroll_offset(offset.max(0.0));
                    *scroll_to_today = false;
                }

                scroll.show(ui, |ui| {
                    action = draw_body(view, body_width, chart_height, marker, hovered_row, ui);
                });
            });
        });

    action
}

/// Work center names, pinned left. Returns the row under the pointer.
fn draw_name_column(
    view: &ChartView<'_>,
    height: f32,
    hover_pos: Option<Pos2>,
    ui: &mut Ui,
) -> Option<usize> {
    let (response, painter) =
        ui.allocate_painter(Vec2::new(theme::NAME_COLUMN_WIDTH, height), Sense::hover());
    let origin = response.rect.min;

    painter.rect_filled(response.rect, 0.0, theme::BG_PANEL);
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(theme::NAME_COLUMN_WIDTH, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.text(
        Pos2::new(origin.x + 14.0, origin.y + HEADER_HEIGHT / 2.0),
        egui::Align2::LEFT_CENTER,
        "Work Center",
        theme::font_header(),
        theme::TEXT_SECONDARY,
    );

    // Rows are shared with the body, so hovering either side highlights both.
    let clip = ui.clip_rect();
    let hovered_row = hover_pos
        .filter(|p| clip.contains(*p) && p.y >= origin.y)
        .and_then(|p| row_at(p.y - origin.y, view.centers.len()));

    for (i, center) in view.centers.iter().enumerate() {
        let y = origin.y + HEADER_HEIGHT + i as f32 * ROW_HEIGHT;
        let row_rect = Rect::from_min_size(
            Pos2::new(origin.x, y),
            Vec2::new(theme::NAME_COLUMN_WIDTH, ROW_HEIGHT),
        );
        if hovered_row == Some(i) {
            painter.rect_filled(row_rect, 0.0, theme::BG_ROW_HOVER);
        }
        painter.text(
            Pos2::new(origin.x + 14.0, row_rect.center().y),
            egui::Align2::LEFT_CENTER,
            &center.name,
            theme::font_row(),
            theme::TEXT_PRIMARY,
        );
        painter.line_segment(
            [row_rect.left_bottom(), row_rect.right_bottom()],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }

    // Divider between names and timeline
    painter.line_segment(
        [response.rect.right_top(), response.rect.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    hovered_row
}

fn draw_body(
    view: &ChartView<'_>,
    width: f32,
    height: f32,
    marker: Option<f32>,
    hovered_row: Option<usize>,
    ui: &mut Ui,
) -> ChartAction {
    let mut action = ChartAction::None;
    let (response, painter) = ui.allocate_painter(Vec2::new(width, height), Sense::click());
    let origin = response.rect.min;
    let mut consumed_click = false;

    painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

    draw_header(&painter, origin, view, width, height);

    for i in 0..view.centers.len() {
        let y = origin.y + HEADER_HEIGHT + i as f32 * ROW_HEIGHT;
        let row_rect = Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, ROW_HEIGHT));
        if hovered_row == Some(i) {
            painter.rect_filled(row_rect, 0.0, theme::BG_ROW_HOVER);
        }
        painter.line_segment(
            [row_rect.left_bottom(), row_rect.right_bottom()],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }

    if let Some(x) = marker {
        draw_today_marker(&painter, origin, x, height, view.zoom);
    }

    for (row, center) in view.centers.iter().enumerate() {
        let y = origin.y + HEADER_HEIGHT + row as f32 * ROW_HEIGHT;
        for order in view.orders.iter().filter(|o| o.data.work_center_id == center.id) {
            let Some(pos) = visible_bar(order.data.start_date, order.data.end_date, &view.range) else {
                continue;
            };
            let bar_width = (pos.width_pct / 100.0 * width).max(MIN_BAR_WIDTH);
            let x = origin.x + (pos.left_pct / 100.0 * width).min(width - bar_width);
            let bar_rect = Rect::from_min_size(
                Pos2::new(x, y + theme::BAR_INSET),
                Vec2::new(bar_width, ROW_HEIGHT - theme::BAR_INSET * 2.0),
            );
            let is_selected = view.selected == Some(order.id.as_str());
            draw_order_bar(&painter, bar_rect, order, is_selected);

            let bar_response = ui.interact(
                bar_rect,
                ui.make_persistent_id(("order-bar", &order.id)),
                Sense::click(),
            );
            if bar_response.clicked() {
                action = ChartAction::Edit(order.id.clone());
                consumed_click = true;
            }
            if bar_response.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                egui::show_tooltip_at_pointer(
                    ui.ctx(),
                    ui.layer_id(),
                    egui::Id::new(("order-tip", &order.id)),
                    |ui| {
                        ui.strong(&order.data.name);
                        ui.label(format!(
                            "{} → {}",
                            order.data.start_date.format("%Y-%m-%d"),
                            order.data.end_date.format("%Y-%m-%d"),
                        ));
                        ui.label(
                            egui::RichText::new(order.data.status.label())
                                .color(theme::status_color(order.data.status)),
                        );
                    },
                );
            }
            bar_response.context_menu(|ui| {
                if ui.button(format!("{}  Edit", egui_phosphor::regular::PENCIL_SIMPLE)).clicked() {
                    action = ChartAction::Edit(order.id.clone());
                    ui.close_menu();
                }
                if ui.button(format!("{}  Delete", egui_phosphor::regular::TRASH)).clicked() {
                    action = ChartAction::Delete(order.id.clone());
                    ui.close_menu();
                }
            });
        }
    }

    // Empty click on a row opens a create form at that date
    if response.clicked() && !consumed_click {
        if let Some(pos) = response.interact_pointer_pos() {
            let local = pos - origin;
            if let Some(row) = row_at(local.y, view.centers.len()) {
                let date = view.range.date_at_fraction(local.x / width);
                action = ChartAction::CreateAt {
                    work_center_id: view.centers[row].id.clone(),
                    date,
                };
            }
        }
    }

    action
}

fn draw_header(painter: &egui::Painter, origin: Pos2, view: &ChartView<'_>, width: f32, height: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    for column in header_columns(&view.range, view.zoom, width) {
        let x = origin.x + column.left_px;
        painter.line_segment(
            [Pos2::new(x, origin.y), Pos2::new(x, origin.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        let cell = Rect::from_min_size(
            Pos2::new(x, origin.y),
            Vec2::new(column.width_px, HEADER_HEIGHT),
        );
        painter.with_clip_rect(cell).text(
            cell.center(),
            egui::Align2::CENTER_CENTER,
            column.label,
            theme::font_header(),
            theme::TEXT_SECONDARY,
        );
    }
}

fn draw_today_marker(painter: &egui::Painter, origin: Pos2, x: f32, height: f32, zoom: TimelineZoom) {
    let x = origin.x + x;
    painter.line_segment(
        [
            Pos2::new(x, origin.y + HEADER_HEIGHT),
            Pos2::new(x, origin.y + height),
        ],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let galley = painter.layout_no_wrap(
        zoom.current_period_label().to_string(),
        theme::font_small(),
        Color32::WHITE,
    );
    let badge_w = galley.size().x + 12.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.galley(
        badge_rect.center() - galley.size() / 2.0,
        galley,
        Color32::WHITE,
    );
}

fn draw_order_bar(painter: &egui::Painter, bar_rect: Rect, order: &WorkOrder, is_selected: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let color = theme::status_color(order.data.status);

    // Soft shadow
    painter.rect_filled(
        bar_rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    painter.rect_filled(bar_rect, rounding, color.gamma_multiply(0.35));
    painter.rect_stroke(bar_rect, rounding, Stroke::new(1.0, color));

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar_rect.width() <= 30.0 {
        return;
    }
    let clipped = painter.with_clip_rect(bar_rect.shrink(2.0));
    clipped.text(
        Pos2::new(bar_rect.left() + 8.0, bar_rect.center().y),
        egui::Align2::LEFT_CENTER,
        &order.data.name,
        theme::font_bar(),
        theme::TEXT_ON_BAR,
    );

    // Status pill on the right when there is room for both
    let pill = painter.layout_no_wrap(order.data.status.label().to_string(), theme::font_small(), color);
    let name_width = painter
        .layout_no_wrap(order.data.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR)
        .size()
        .x;
    if name_width + pill.size().x + 40.0 < bar_rect.width() {
        let pill_rect = Rect::from_min_size(
            Pos2::new(
                bar_rect.right() - pill.size().x - 16.0,
                bar_rect.center().y - pill.size().y / 2.0 - 2.0,
            ),
            pill.size() + Vec2::new(8.0, 4.0),
        );
        painter.rect_filled(pill_rect, Rounding::same(pill_rect.height() / 2.0), theme::BG_DARK);
        painter.galley(pill_rect.min + Vec2::new(4.0, 2.0), pill, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_at_skips_header() {
        assert_eq!(row_at(HEADER_HEIGHT - 1.0, 5), None);
        assert_eq!(row_at(HEADER_HEIGHT + 1.0, 5), Some(0));
        assert_eq!(row_at(HEADER_HEIGHT + ROW_HEIGHT * 2.5, 5), Some(2));
    }

    #[test]
    fn row_at_stops_after_last_row() {
        assert_eq!(row_at(HEADER_HEIGHT + ROW_HEIGHT * 5.0, 5), None);
        assert_eq!(row_at(HEADER_HEIGHT + 1.0, 0), None);
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_day_order_still_gets_a_bar() {
        let today = date(2025, 3, 10);
        let range = TimelineRange::for_zoom(TimelineZoom::Day, today);
        let pos = visible_bar(today, today, &range).expect("same-day order is visible");
        assert_eq!(pos.left_pct, 50.0);
        assert_eq!(pos.width_pct, 0.0);
    }

    #[test]
    fn orders_outside_the_range_are_skipped() {
        let range = TimelineRange::new(date(2025, 3, 1), date(2025, 3, 31));
        assert!(visible_bar(date(2025, 2, 1), date(2025, 2, 28), &range).is_none());
        assert!(visible_bar(date(2025, 4, 1), date(2025, 4, 5), &range).is_none());
        assert!(visible_bar(date(2025, 2, 20), date(2025, 3, 1), &range).is_some());
        assert!(visible_bar(date(2025, 3, 31), date(2025, 3, 31), &range).is_some());
    }
}
