//! Login panel.

use eframe::egui::{self, RichText, Ui};

use super::app::App;
use super::components::colors;

/// Show the login panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        ui.label(RichText::new(&app.config.ui.page_title).size(28.0).strong());
        ui.add_space(30.0);

        egui::Grid::new("login_grid")
            .num_columns(2)
            .spacing([20.0, 12.0])
            .show(ui, |ui| {
                ui.label("Username:");
                ui.add(
                    egui::TextEdit::singleline(&mut app.login_form.username)
                        .hint_text("Enter your username")
                        .desired_width(220.0),
                );
                ui.end_row();

                ui.label("Password:");
                ui.add(
                    egui::TextEdit::singleline(&mut app.login_form.password)
                        .hint_text("Enter your password")
                        .password(true)
                        .desired_width(220.0),
                );
                ui.end_row();
            });

        ui.add_space(20.0);

        if app.login_form.in_flight {
            ui.spinner();
            ui.label("Authenticating...");
        } else if ui.button(RichText::new("Log In").size(16.0)).clicked() {
            app.start_login();
        }

        ui.add_space(15.0);

        if let Some(error) = &app.login_form.error {
            ui.colored_label(colors::ERROR, error);
        }
        if let Some(warning) = &app.login_form.warning {
            ui.colored_label(colors::WARNING, warning);
        }
    });
}
