// Reusable UI components
// Alert banner, buttons and the form widgets of the file screens

use crate::state::{track_user_by_id, Alert, Severity};
use chrono::{DateTime, Local, Utc};
use eframe::egui;
use file_manager_backend::models::{UserDto, UserId};

/// Render on-screen alerts; returns the index of a dismissed alert
pub fn alert_banner(ui: &mut egui::Ui, alerts: &[Alert]) -> Option<usize> {
    let mut dismissed = None;
    for (index, alert) in alerts.iter().enumerate() {
        let (fill, text_color) = match alert.severity {
            Severity::Success => (
                egui::Color32::from_rgb(220, 245, 220),
                egui::Color32::from_rgb(0, 110, 0),
            ),
            Severity::Error => (
                egui::Color32::from_rgb(250, 225, 225),
                egui::Color32::from_rgb(170, 0, 0),
            ),
        };

        let mut frame = egui::Frame::none().fill(fill).inner_margin(egui::Margin::same(6.0));
        frame.rounding = egui::Rounding::same(4.0);
        frame.show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(text_color, &alert.message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✖").clicked() {
                        dismissed = Some(index);
                    }
                });
            });
        });
        ui.add_space(4.0);
    }
    dismissed
}

/// Render a primary action button
pub fn primary_button(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    ui.add_enabled(enabled, egui::Button::new(egui::RichText::new(text).strong()))
}

/// Render a secondary button
pub fn secondary_button(ui: &mut egui::Ui, text: &str) -> egui::Response {
    ui.button(text)
}

/// Render a delete button (red)
pub fn danger_button(ui: &mut egui::Ui, text: &str) -> egui::Response {
    ui.button(egui::RichText::new(text).color(egui::Color32::from_rgb(220, 0, 0)))
}

/// Creation date as shown in the list (local time)
pub fn display_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.with_timezone(&Local).format("%d %b %Y %H:%M").to_string())
        .unwrap_or_default()
}

/// Owner selection list
pub fn user_select(ui: &mut egui::Ui, selected: &mut Option<UserId>, users: &[UserDto]) {
    let selected_text = selected
        .and_then(|id| users.iter().find(|user| user.id == id))
        .map(|user| user.display_name().to_string())
        .unwrap_or_default();

    egui::ComboBox::from_id_source("file_owner_select")
        .selected_text(selected_text)
        .width(240.0)
        .show_ui(ui, |ui| {
            for (index, user) in users.iter().enumerate() {
                ui.push_id(track_user_by_id(index, user), |ui| {
                    ui.selectable_value(selected, Some(user.id), user.display_name());
                });
            }
        });
}

/// Labelled row of a form grid
pub fn form_label(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).strong());
}
