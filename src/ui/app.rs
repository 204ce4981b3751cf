//! Main application state and message plumbing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use eframe::egui;
use tokio::sync::mpsc;

use crate::api::{BookingQuery, ClientRegistry, CustomerQuery};
use crate::config::AppConfig;
use crate::models::booking::{Booking, BookingStats};
use crate::models::customer::Customer;
use crate::session::Session;

use super::components::{colors, health_indicator};
use super::{clients_panel, dashboard, login_panel};

/// How long a success toast stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Current panel being displayed (login is implied by the session state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Dashboard,
    Clients,
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Login
    LoginSucceeded(String),
    LoginFailed(String),

    // Data loading
    CustomersLoaded(Vec<Customer>),
    PeriodBookingsLoaded(Vec<Booking>),
    UpcomingLoaded(Vec<Booking>),
    StatsLoaded(BookingStats),
    ServicesLoaded(HashMap<i64, String>),
    CustomerBookingsLoaded { customer_id: i64, bookings: Vec<Booking> },
    HealthChecked(bool, String),

    /// A read path failed; the panel degrades to an empty state.
    LoadFailed { what: &'static str, message: String },

    // Note editing
    NoteSaved { booking_id: i64 },
    NoteSaveFailed(String),
}

/// Login form state.
#[derive(Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub in_flight: bool,
    pub error: Option<String>,
    pub warning: Option<String>,
}

impl LoginForm {
    /// Reset the form after a successful login.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// State of the admin-note edit dialog.
pub struct NoteDialog {
    pub booking: Booking,
    pub text: String,
    pub saving: bool,
    pub error: Option<String>,
}

/// Main application state.
pub struct App {
    // Runtime and API access
    pub rt: tokio::runtime::Runtime,
    pub config: AppConfig,
    pub registry: Arc<ClientRegistry>,
    pub session: Session,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Navigation
    pub panel: Panel,
    pub login_form: LoginForm,

    // Dashboard state
    pub period_days: u32,
    pub upcoming_hours: u32,
    pub bookings: Vec<Booking>,
    pub bookings_loaded: bool,
    pub upcoming: Vec<Booking>,
    pub stats: Option<BookingStats>,
    pub health: Option<(bool, String)>,

    // Clients state
    pub customer_search: String,
    pub customers: Vec<Customer>,
    pub customers_loaded: bool,
    pub selected_customer: Option<Customer>,
    pub customer_bookings: Vec<Booking>,
    pub customer_bookings_loaded: bool,
    pub services: HashMap<i64, String>,

    // Dialogs and notices
    pub note_dialog: Option<NoteDialog>,
    pub toast: Option<(String, Instant)>,
    pub status_message: Option<String>,

    // In-flight request counter for the status-bar spinner
    pub in_flight: u32,
}

impl App {
    pub fn new(config: AppConfig, rt: tokio::runtime::Runtime) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let registry = Arc::new(ClientRegistry::new(config.clone()));
        let period_days = config.ui.default_period_days;
        let upcoming_hours = config.ui.upcoming_hours;

        Self {
            rt,
            config,
            registry,
            session: Session::new(),
            tx,
            rx,
            panel: Panel::default(),
            login_form: LoginForm::default(),
            period_days,
            upcoming_hours,
            bookings: Vec::new(),
            bookings_loaded: false,
            upcoming: Vec::new(),
            stats: None,
            health: None,
            customer_search: String::new(),
            customers: Vec::new(),
            customers_loaded: false,
            selected_customer: None,
            customer_bookings: Vec::new(),
            customer_bookings_loaded: false,
            services: HashMap::new(),
            note_dialog: None,
            toast: None,
            status_message: None,
            in_flight: 0,
        }
    }

    /// Client for the current session token, if logged in.
    fn client(&self) -> Option<Arc<crate::api::ApiClient>> {
        self.session.token().map(|token| self.registry.client_for(token))
    }

    /// Kick off the async login flow.
    pub fn start_login(&mut self) {
        self.login_form.error = None;
        self.login_form.warning = None;

        if self.login_form.username.is_empty() || self.login_form.password.is_empty() {
            self.login_form.warning = Some("Please enter both username and password.".to_string());
            return;
        }

        self.login_form.in_flight = true;
        let config = self.config.clone();
        let username = self.login_form.username.clone();
        let password = self.login_form.password.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match crate::api::login(&config, &username, &password).await {
                Ok(token) => {
                    let _ = tx.send(UiMessage::LoginSucceeded(token));
                }
                Err(e) => {
                    tracing::warn!("Login failed: {e}");
                    let _ = tx.send(UiMessage::LoginFailed(e.to_string()));
                }
            }
        });
    }

    /// Clear the session and every cached view of it.
    pub fn logout(&mut self) {
        if let Some(token) = self.session.token() {
            self.registry.evict(token);
        }
        self.session.clear();

        self.panel = Panel::default();
        self.bookings.clear();
        self.bookings_loaded = false;
        self.upcoming.clear();
        self.stats = None;
        self.health = None;
        self.customers.clear();
        self.customers_loaded = false;
        self.selected_customer = None;
        self.customer_bookings.clear();
        self.customer_bookings_loaded = false;
        self.services.clear();
        self.note_dialog = None;
        self.status_message = None;
        tracing::info!("Logged out");
    }

    /// Load everything the dashboard shows.
    pub fn load_dashboard(&mut self) {
        self.load_period_bookings();
        self.load_upcoming();
        self.load_stats();
        self.check_health();
    }

    /// Load bookings for the selected period.
    pub fn load_period_bookings(&mut self) {
        let Some(client) = self.client() else { return };
        let tx = self.tx.clone();
        let days = self.period_days;
        self.in_flight += 1;

        self.rt.spawn(async move {
            let end = Local::now().date_naive();
            let start = end - chrono::Duration::days(days as i64);
            match client.get_bookings(&BookingQuery::range(start, end)).await {
                Ok(bookings) => {
                    let _ = tx.send(UiMessage::PeriodBookingsLoaded(bookings));
                }
                Err(e) => {
                    tracing::warn!("Failed to load bookings: {e}");
                    let _ = tx.send(UiMessage::LoadFailed {
                        what: "bookings",
                        message: e.to_string(),
                    });
                }
            }
        });
    }

    /// Load bookings starting within the upcoming-hours window.
    pub fn load_upcoming(&mut self) {
        let Some(client) = self.client() else { return };
        let tx = self.tx.clone();
        let hours = self.upcoming_hours;
        self.in_flight += 1;

        self.rt.spawn(async move {
            match client.get_upcoming_bookings(hours).await {
                Ok(bookings) => {
                    let _ = tx.send(UiMessage::UpcomingLoaded(bookings));
                }
                Err(e) => {
                    tracing::warn!("Failed to load upcoming bookings: {e}");
                    let _ = tx.send(UiMessage::LoadFailed {
                        what: "upcoming bookings",
                        message: e.to_string(),
                    });
                }
            }
        });
    }

    /// Load aggregate stats for the selected period.
    pub fn load_stats(&mut self) {
        let Some(client) = self.client() else { return };
        let tx = self.tx.clone();
        let days = self.period_days;
        self.in_flight += 1;

        self.rt.spawn(async move {
            let end = Local::now().date_naive();
            let start = end - chrono::Duration::days(days as i64);
            match client.get_booking_stats(start, end).await {
                Ok(stats) => {
                    let _ = tx.send(UiMessage::StatsLoaded(stats));
                }
                Err(e) => {
                    tracing::warn!("Failed to load booking stats: {e}");
                    let _ = tx.send(UiMessage::LoadFailed {
                        what: "stats",
                        message: e.to_string(),
                    });
                }
            }
        });
    }

    /// Run the API health check.
    pub fn check_health(&mut self) {
        let Some(client) = self.client() else { return };
        let tx = self.tx.clone();
        self.in_flight += 1;

        self.rt.spawn(async move {
            let (healthy, message) = client.get_api_health().await;
            let _ = tx.send(UiMessage::HealthChecked(healthy, message));
        });
    }

    /// Search customers server-side with the current search term.
    pub fn load_customers(&mut self) {
        let Some(client) = self.client() else { return };
        let tx = self.tx.clone();
        let query = CustomerQuery::search(self.customer_search.clone());
        self.in_flight += 1;

        self.rt.spawn(async move {
            match client.get_customers(&query).await {
                Ok(customers) => {
                    let _ = tx.send(UiMessage::CustomersLoaded(customers));
                }
                Err(e) => {
                    tracing::warn!("Failed to load customers: {e}");
                    let _ = tx.send(UiMessage::LoadFailed {
                        what: "customers",
                        message: e.to_string(),
                    });
                }
            }
        });
    }

    /// Load the trailing-year booking history for a customer.
    pub fn load_customer_bookings(&mut self, customer_id: i64) {
        let Some(client) = self.client() else { return };
        let tx = self.tx.clone();
        self.in_flight += 1;

        self.rt.spawn(async move {
            let end = Local::now().date_naive();
            let start = end - chrono::Duration::days(365);
            let query = BookingQuery::range(start, end).for_customer(customer_id);
            match client.get_bookings(&query).await {
                Ok(bookings) => {
                    let _ = tx.send(UiMessage::CustomerBookingsLoaded { customer_id, bookings });
                }
                Err(e) => {
                    tracing::warn!("Failed to load customer bookings: {e}");
                    let _ = tx.send(UiMessage::LoadFailed {
                        what: "booking history",
                        message: e.to_string(),
                    });
                }
            }
        });
    }

    /// Load the service catalog.
    pub fn load_services(&mut self) {
        let Some(client) = self.client() else { return };
        let tx = self.tx.clone();
        self.in_flight += 1;

        self.rt.spawn(async move {
            match client.get_services().await {
                Ok(services) => {
                    let _ = tx.send(UiMessage::ServicesLoaded(services));
                }
                Err(e) => {
                    tracing::warn!("Failed to load services: {e}");
                    let _ = tx.send(UiMessage::LoadFailed {
                        what: "services",
                        message: e.to_string(),
                    });
                }
            }
        });
    }

    /// Open the edit dialog for a booking's admin note.
    pub fn open_note_dialog(&mut self, booking: Booking) {
        let text = booking.admin_note.clone().unwrap_or_default();
        self.note_dialog = Some(NoteDialog {
            booking,
            text,
            saving: false,
            error: None,
        });
    }

    /// PUT the edited admin note.
    pub fn save_note(&mut self) {
        let Some(client) = self.client() else { return };
        let Some(dialog) = self.note_dialog.as_mut() else { return };

        dialog.saving = true;
        dialog.error = None;

        let update = dialog.booking.note_update(dialog.text.clone());
        let booking_id = dialog.booking.id;
        let tx = self.tx.clone();
        self.in_flight += 1;

        self.rt.spawn(async move {
            match client.update_booking(booking_id, &update).await {
                Ok(true) => {
                    let _ = tx.send(UiMessage::NoteSaved { booking_id });
                }
                Ok(false) => {
                    let _ = tx.send(UiMessage::NoteSaveFailed("Failed to update note".to_string()));
                }
                Err(e) => {
                    tracing::warn!("Failed to update booking {booking_id}: {e}");
                    let _ = tx.send(UiMessage::NoteSaveFailed(e.to_string()));
                }
            }
        });
    }

    /// Apply one message from the async side.
    pub fn handle_message(&mut self, msg: UiMessage) {
        match msg {
            UiMessage::LoginSucceeded(token) => {
                self.session.set_token(token);
                self.login_form.reset();
                self.panel = Panel::Dashboard;
                self.load_dashboard();
                self.load_services();
            }
            UiMessage::LoginFailed(message) => {
                self.login_form.in_flight = false;
                self.login_form.error = Some(message);
            }
            UiMessage::CustomersLoaded(customers) => {
                self.customers = customers;
                self.customers_loaded = true;
                self.status_message = None;
                self.in_flight = self.in_flight.saturating_sub(1);
            }
            UiMessage::PeriodBookingsLoaded(bookings) => {
                self.bookings = bookings;
                self.bookings_loaded = true;
                self.status_message = None;
                self.in_flight = self.in_flight.saturating_sub(1);
            }
            UiMessage::UpcomingLoaded(bookings) => {
                self.upcoming = bookings;
                self.in_flight = self.in_flight.saturating_sub(1);
            }
            UiMessage::StatsLoaded(stats) => {
                self.stats = Some(stats);
                self.in_flight = self.in_flight.saturating_sub(1);
            }
            UiMessage::ServicesLoaded(services) => {
                self.services = services;
                self.in_flight = self.in_flight.saturating_sub(1);
            }
            UiMessage::CustomerBookingsLoaded { customer_id, bookings } => {
                // Ignore stale responses after the selection changed.
                if self.selected_customer.as_ref().is_some_and(|c| c.id == customer_id) {
                    self.customer_bookings = bookings;
                    self.customer_bookings_loaded = true;
                }
                self.in_flight = self.in_flight.saturating_sub(1);
            }
            UiMessage::HealthChecked(healthy, message) => {
                self.health = Some((healthy, message));
                self.in_flight = self.in_flight.saturating_sub(1);
            }
            UiMessage::LoadFailed { what, message } => {
                // Degrade to an empty state; the failure itself is in the log.
                match what {
                    "bookings" => {
                        self.bookings.clear();
                        self.bookings_loaded = true;
                    }
                    "upcoming bookings" => self.upcoming.clear(),
                    "customers" => {
                        self.customers.clear();
                        self.customers_loaded = true;
                    }
                    "booking history" => {
                        self.customer_bookings.clear();
                        self.customer_bookings_loaded = true;
                    }
                    "stats" => self.stats = None,
                    "services" => self.services.clear(),
                    _ => {}
                }
                self.status_message = Some(format!("No {what} data available"));
                tracing::debug!("Degraded {what} to empty state: {message}");
                self.in_flight = self.in_flight.saturating_sub(1);
            }
            UiMessage::NoteSaved { booking_id } => {
                self.note_dialog = None;
                self.toast = Some(("Note updated successfully!".to_string(), Instant::now()));
                self.in_flight = self.in_flight.saturating_sub(1);
                tracing::info!("Admin note updated for booking {booking_id}");

                let selected = self.selected_customer.as_ref().map(|c| c.id);
                if let Some(id) = selected {
                    self.load_customer_bookings(id);
                }
            }
            UiMessage::NoteSaveFailed(message) => {
                if let Some(dialog) = self.note_dialog.as_mut() {
                    dialog.saving = false;
                    dialog.error = Some(message);
                }
                self.in_flight = self.in_flight.saturating_sub(1);
            }
        }
    }

    /// Drain the message channel.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.handle_message(msg);
        }
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("Pages", |ui| {
                    if ui.button("Dashboard").clicked() {
                        self.panel = Panel::Dashboard;
                        self.load_dashboard();
                        ui.close();
                    }
                    if ui.button("Clients").clicked() {
                        self.panel = Panel::Clients;
                        if !self.customers_loaded {
                            self.load_customers();
                        }
                        ui.close();
                    }
                });
                ui.menu_button("Account", |ui| {
                    if ui.button("Log out").clicked() {
                        self.logout();
                        ui.close();
                    }
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").min_height(28.0).show(ctx, |ui| {
            ui.disable();
            ui.horizontal(|ui| {
                health_indicator(ui, self.health.as_ref());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.in_flight > 0 {
                        ui.spinner();
                        ui.label("Loading...");
                    } else if let Some(message) = &self.status_message {
                        ui.colored_label(colors::WARNING, message);
                    }
                });
            });
        });
    }

    /// Render the admin-note edit dialog.
    fn show_note_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.note_dialog.as_mut() else { return };

        let mut open = true;
        let mut save_clicked = false;
        let mut cancel_clicked = false;

        egui::Window::new("Edit Admin Note")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.add_space(10.0);

                ui.add(
                    egui::TextEdit::multiline(&mut dialog.text)
                        .desired_rows(10)
                        .desired_width(400.0)
                        .hint_text("Enter admin note here..."),
                );

                ui.add_space(10.0);

                if let Some(error) = &dialog.error {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(5.0);
                }

                ui.horizontal(|ui| {
                    if dialog.saving {
                        ui.spinner();
                        ui.label("Updating note...");
                    } else {
                        if ui.button("Save").clicked() {
                            save_clicked = true;
                        }
                        if ui.button("Cancel").clicked() {
                            cancel_clicked = true;
                        }
                    }
                });
            });

        if save_clicked {
            self.save_note();
        }
        if cancel_clicked || !open {
            self.note_dialog = None;
        }
    }

    /// Render the success toast, dismissing it after a few seconds.
    fn show_toast(&mut self, ctx: &egui::Context) {
        let expired = self.toast.as_ref().is_some_and(|(_, shown_at)| shown_at.elapsed() > TOAST_DURATION);
        if expired {
            self.toast = None;
            return;
        }
        let Some((message, _)) = &self.toast else { return };

        egui::Window::new("toast")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_BOTTOM, [-15.0, -40.0])
            .show(ctx, |ui| {
                ui.colored_label(colors::SUCCESS, message);
            });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_async_results();

        // Request repaint while async work is pending
        if self.in_flight > 0 || self.login_form.in_flight || self.toast.is_some() {
            ctx.request_repaint();
        }

        if !self.session.is_logged_in() {
            egui::CentralPanel::default().show(ctx, |ui| {
                login_panel::show(self, ui);
            });
            return;
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);
        self.show_note_dialog(ctx);
        self.show_toast(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match self.panel {
            Panel::Dashboard => dashboard::show(self, ui),
            Panel::Clients => clients_panel::show(self, ui),
        });
    }
}
