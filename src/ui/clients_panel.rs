//! Clients panel: customer search, list, and detail view with booking
//! history and admin-note editing.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{MAGNIFYING_GLASS, PENCIL};

use crate::format;

use super::app::App;
use super::components::{back_button, panel_header};

/// Show the clients panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    if app.selected_customer.is_some() {
        show_detail(app, ui);
    } else {
        show_list(app, ui);
    }
}

/// Customer search and list.
fn show_list(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Clients");

    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut app.customer_search)
                .hint_text("Search by name, email, or phone")
                .desired_width(280.0),
        );
        if ui.button(format!("{MAGNIFYING_GLASS} Search")).clicked() {
            app.load_customers();
        }
    });

    ui.add_space(15.0);

    if app.customers.is_empty() {
        if app.customers_loaded {
            ui.label(RichText::new("No customers found").weak());
        } else {
            ui.label(RichText::new("Loading customers...").weak());
        }
        return;
    }

    let mut clicked = None;
    ScrollArea::vertical().show(ui, |ui| {
        for customer in &app.customers {
            let label = format!("{} (ID: {})", customer.full_name(), customer.id);
            if ui.selectable_label(false, label).clicked() {
                clicked = Some(customer.clone());
            }
        }
    });

    if let Some(customer) = clicked {
        let id = customer.id;
        app.selected_customer = Some(customer);
        app.customer_bookings.clear();
        app.customer_bookings_loaded = false;
        app.load_customer_bookings(id);
        if app.services.is_empty() {
            app.load_services();
        }
    }
}

/// Per-customer detail view.
fn show_detail(app: &mut App, ui: &mut Ui) {
    if back_button(ui, "Back to Clients") {
        app.selected_customer = None;
        app.customer_bookings.clear();
        app.customer_bookings_loaded = false;
        return;
    }

    let Some(customer) = app.selected_customer.clone() else { return };

    ui.add_space(10.0);
    ui.heading(customer.full_name());
    ui.add_space(15.0);

    // Contact info and notes side by side
    let column_width = (ui.available_width() - 40.0) / 2.0;
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.set_width(column_width);
            ui.label(RichText::new("Contact Information").strong());
            ui.add_space(5.0);
            ui.label(format!("Email: {}", customer.email));
            ui.label(format!("Phone: {}", customer.phone));
            ui.label(format!("Address: {}", customer.address));
        });

        ui.add_space(20.0);

        ui.vertical(|ui| {
            ui.set_width(column_width);
            ui.label(RichText::new("Notes").strong());
            ui.add_space(5.0);
            let mut note = customer.note.clone();
            ui.add_enabled(
                false,
                egui::TextEdit::multiline(&mut note).desired_rows(4).desired_width(column_width),
            );
        });
    });

    ui.add_space(20.0);
    ui.separator();
    ui.add_space(10.0);
    ui.label(RichText::new("Booking History").size(18.0).strong());
    ui.add_space(10.0);

    if app.customer_bookings.is_empty() {
        if app.customer_bookings_loaded {
            ui.label(RichText::new("No booking history found").weak());
        } else {
            ui.spinner();
        }
        return;
    }

    let mut edit_note_for = None;
    ScrollArea::vertical().show(ui, |ui| {
        for booking in &app.customer_bookings {
            let service_name = booking
                .primary_service()
                .map(|s| s.service_name.as_str())
                .unwrap_or("Unknown Service");
            let title = format!(
                "{} - {} ({})",
                format::booking_date(booking.date),
                service_name,
                booking.display_status()
            );

            egui::CollapsingHeader::new(title)
                .id_salt(booking.id)
                .show(ui, |ui| {
                    let inner_width = (ui.available_width() - 40.0) / 2.0;
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.set_width(inner_width);
                            ui.label(RichText::new("Service Details").strong());
                            let start_at = booking
                                .primary_service()
                                .and_then(|s| s.start_at.as_deref())
                                .unwrap_or("N/A");
                            ui.label(format!("Time: {start_at}"));
                            ui.label(format!("Duration: {}", booking.duration.as_deref().unwrap_or("N/A")));
                        });

                        ui.vertical(|ui| {
                            ui.set_width(inner_width);
                            ui.label(RichText::new("Payment Details").strong());
                            let price = booking.primary_service().map(|s| s.service_price).unwrap_or(0.0);
                            ui.label(format!("Cost: {}", format::currency(price)));
                            ui.label(format!("Total Amount: {}", format::currency(booking.amount)));
                        });
                    });

                    ui.add_space(8.0);
                    ui.label(RichText::new("Admin Notes").strong());
                    if let Some(note) = booking.admin_note.as_deref().filter(|n| !n.is_empty()) {
                        ui.label(note);
                    } else {
                        ui.label(RichText::new("No admin note").weak());
                    }

                    ui.add_space(5.0);
                    if ui.button(format!("{PENCIL} Edit Note")).clicked() {
                        edit_note_for = Some(booking.clone());
                    }
                });
        }
    });

    if let Some(booking) = edit_note_for {
        app.open_note_dialog(booking);
    }
}
