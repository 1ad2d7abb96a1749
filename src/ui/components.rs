//! Reusable UI components

use crate::theme;
use eframe::egui;

/// Painter-drawn button with hover/press feedback. Returns true on click.
pub fn action_button(
    ui: &mut egui::Ui,
    size: egui::Vec2,
    fill: egui::Color32,
    text_color: egui::Color32,
    label: &str,
) -> bool {
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    if ui.is_rect_visible(rect) {
        let (fill, draw_rect) = theme::button_visual(&response, fill, rect);
        ui.painter().rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);
        ui.painter().text(
            draw_rect.center(),
            egui::Align2::CENTER_CENTER,
            label,
            egui::FontId::proportional(14.0),
            text_color,
        );
    }
    response.clicked()
}

/// Centered icon + text line, used for the status and error rows
pub fn icon_line(ui: &mut egui::Ui, icon: &str, text: &str, color: egui::Color32) {
    ui.vertical_centered(|ui| {
        ui.add(
            egui::Label::new(
                egui::RichText::new(format!("{}  {}", icon, text))
                    .size(14.0)
                    .color(color),
            )
            .selectable(false),
        );
    });
}
