//! Shared UI components.

use eframe::egui::{self, Color32, RichText, Ui};

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
}

/// Render a stat card with title, value, and subtitle.
pub fn stat_card(ui: &mut Ui, title: &str, value: &str, subtitle: &str) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(egui::Margin::same(15))
        .outer_margin(egui::Margin::same(5))
        .corner_radius(egui::CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_min_width(150.0);

            ui.vertical(|ui| {
                ui.label(RichText::new(title).small());
                ui.label(RichText::new(value).heading().strong());
                ui.label(RichText::new(subtitle).small().weak());
            });
        });
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui, label: &str) -> bool {
    ui.button(RichText::new(format!("< {label}")).size(14.0)).clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

/// Render an API health indicator dot with message.
pub fn health_indicator(ui: &mut Ui, health: Option<&(bool, String)>) {
    match health {
        Some((true, message)) => {
            ui.colored_label(colors::SUCCESS, format!("API: {message}"));
        }
        Some((false, message)) => {
            ui.colored_label(colors::ERROR, format!("API: {message}"));
        }
        None => {
            ui.colored_label(colors::NEUTRAL, "API: checking...");
        }
    }
}
