//! Dashboard panel with metric cards, period filter, and booking list.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::ARROWS_CLOCKWISE;

use crate::format;
use crate::models::booking::total_revenue;

use super::app::App;
use super::components::{panel_header, stat_card};

const PERIOD_CHOICES: [u32; 3] = [7, 30, 90];
const UPCOMING_CHOICES: [u32; 4] = [12, 24, 48, 72];

/// Show the dashboard panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Dashboard");

    // Filter row
    ui.horizontal(|ui| {
        ui.label("Period:");
        for days in PERIOD_CHOICES {
            if ui
                .selectable_label(app.period_days == days, format!("{days} days"))
                .clicked()
                && app.period_days != days
            {
                app.period_days = days;
                app.load_period_bookings();
                app.load_stats();
            }
        }

        ui.add_space(20.0);

        ui.label("Upcoming window:");
        egui::ComboBox::from_id_salt("upcoming_hours")
            .selected_text(format!("{}h", app.upcoming_hours))
            .show_ui(ui, |ui| {
                for hours in UPCOMING_CHOICES {
                    if ui
                        .selectable_label(app.upcoming_hours == hours, format!("{hours}h"))
                        .clicked()
                        && app.upcoming_hours != hours
                    {
                        app.upcoming_hours = hours;
                        app.load_upcoming();
                    }
                }
            });

        ui.add_space(20.0);

        if ui.button(format!("{ARROWS_CLOCKWISE} Refresh")).clicked() {
            app.load_dashboard();
        }
    });

    ui.add_space(20.0);

    // Stat cards row
    let booking_count = app
        .stats
        .as_ref()
        .map(|s| s.total_bookings)
        .unwrap_or(app.bookings.len() as u64);
    let revenue = total_revenue(&app.bookings);

    ui.horizontal(|ui| {
        stat_card(
            ui,
            "Total Bookings",
            &booking_count.to_string(),
            &format!("Last {} days", app.period_days),
        );
        stat_card(
            ui,
            "Total Revenue",
            &format::currency(revenue),
            &format!("Last {} days", app.period_days),
        );
        stat_card(
            ui,
            "Upcoming",
            &app.upcoming.len().to_string(),
            &format!("Next {} hours", app.upcoming_hours),
        );
    });

    ui.add_space(20.0);

    // Booking list
    ui.label(RichText::new("Bookings").strong());
    ui.add_space(5.0);

    if app.bookings.is_empty() {
        if app.bookings_loaded {
            ui.label(RichText::new("No bookings data available").weak());
        } else {
            ui.label(RichText::new("Loading bookings...").weak());
        }
        return;
    }

    ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("bookings_grid")
            .num_columns(5)
            .striped(true)
            .spacing([25.0, 6.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Date").strong());
                ui.label(RichText::new("Time").strong());
                ui.label(RichText::new("Service").strong());
                ui.label(RichText::new("Status").strong());
                ui.label(RichText::new("Amount").strong());
                ui.end_row();

                for booking in &app.bookings {
                    let service_name = booking
                        .primary_service()
                        .map(|s| s.service_name.as_str())
                        .unwrap_or("-");

                    ui.label(format::booking_date(booking.date));
                    ui.label(&booking.time);
                    ui.label(service_name);
                    ui.label(booking.display_status());
                    ui.label(format::currency(booking.amount));
                    ui.end_row();
                }
            });
    });
}
