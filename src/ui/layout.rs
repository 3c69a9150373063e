// Main application layout
// Handles the menu bar, alert area and the list/form screens

use crate::state::app_state::{FileEditor, UiAction, UiState};
use crate::state::{AppState, FileListState, Route};
use crate::ui::components::*;
use eframe::egui;
use std::path::PathBuf;

/// Render the main application layout
/// Returns the actions the user triggered this frame
pub fn render_app_layout(ctx: &egui::Context, state: &mut AppState) -> Vec<UiAction> {
    let mut actions = Vec::new();

    render_menu_bar(ctx, &mut actions);

    if !state.visible_alerts.is_empty() {
        egui::TopBottomPanel::top("alerts").show(ctx, |ui| {
            ui.add_space(4.0);
            if let Some(index) = alert_banner(ui, &state.visible_alerts) {
                state.dismiss_alert(index);
            }
        });
    }

    let route = state.current_route();
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_space(8.0);
        match (route, state.editor.as_mut()) {
            (Route::FileList, _) | (_, None) => {
                render_file_list(ui, &state.list, &mut state.ui_state, &mut actions)
            }
            (_, Some(editor)) => {
                render_file_form(ui, editor, &mut state.ui_state, &mut actions);
            }
        }
    });

    // Files dropped on the window are attached to a new upload
    if route == Route::NewFile {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        actions.extend(dropped.into_iter().map(UiAction::Attach));
    }

    actions
}

/// Render the top menu bar
fn render_menu_bar(ctx: &egui::Context, actions: &mut Vec<UiAction>) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New File").clicked() {
                    actions.push(UiAction::Open(Route::NewFile));
                    ui.close_menu();
                }
                if ui.button("Refresh").clicked() {
                    actions.push(UiAction::Refresh);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let mut dark_mode = ctx.style().visuals.dark_mode;
                if ui.checkbox(&mut dark_mode, "Dark Mode").changed() {
                    let visuals = if dark_mode {
                        egui::Visuals::dark()
                    } else {
                        egui::Visuals::light()
                    };
                    ctx.set_visuals(visuals);
                }
            });
        });
    });
}

/// Render the paged file table
fn render_file_list(
    ui: &mut egui::Ui,
    list: &FileListState,
    ui_state: &mut UiState,
    actions: &mut Vec<UiAction>,
) {
    ui.horizontal(|ui| {
        ui.heading("Files");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if primary_button(ui, "+ Create a new File", true).clicked() {
                actions.push(UiAction::Open(Route::NewFile));
            }
            if secondary_button(ui, "⟳ Refresh").clicked() {
                actions.push(UiAction::Refresh);
            }
        });
    });
    ui.add_space(4.0);
    ui.separator();
    ui.add_space(8.0);

    if list.files.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(egui::RichText::new("No Files found").italics().weak().size(14.0));
        });
        if list.total_items > 0 {
            render_pager(ui, list, actions);
        }
        return;
    }

    egui::ScrollArea::vertical()
        .id_source("file_list_scroll")
        .auto_shrink([false, true])
        .max_height(ui.available_height() - 40.0)
        .show(ui, |ui| {
            egui::Grid::new("file_table")
                .striped(true)
                .num_columns(6)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    for header in ["ID", "Title", "Description", "Creation Date", "User", ""] {
                        ui.label(egui::RichText::new(header).strong());
                    }
                    ui.end_row();

                    for file in &list.files {
                        let Some(id) = file.id else { continue };
                        ui.label(egui::RichText::new(id.to_string()).monospace());
                        ui.label(&file.title);
                        ui.label(&file.description);
                        ui.label(display_date(file.creation_date));
                        ui.label(file.user_name.as_deref().unwrap_or_default());
                        ui.horizontal(|ui| {
                            if secondary_button(ui, "Edit").clicked() {
                                actions.push(UiAction::Open(Route::EditFile(id)));
                            }
                            if secondary_button(ui, "Download").clicked() {
                                actions.push(UiAction::Download(file.clone()));
                            }
                            if ui_state.confirm_delete == Some(id) {
                                if danger_button(ui, "Confirm delete").clicked() {
                                    actions.push(UiAction::Delete(id));
                                }
                                if ui.button("Cancel").clicked() {
                                    ui_state.confirm_delete = None;
                                }
                            } else if danger_button(ui, "Delete").clicked() {
                                ui_state.confirm_delete = Some(id);
                            }
                        });
                        ui.end_row();
                    }
                });
        });

    render_pager(ui, list, actions);
}

/// Render the page controls under the file table
fn render_pager(ui: &mut egui::Ui, list: &FileListState, actions: &mut Vec<UiAction>) {
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let pages = list.total_pages().max(1);
        if ui
            .add_enabled(list.page > 0, egui::Button::new("« Previous"))
            .clicked()
        {
            actions.push(UiAction::GoToPage(list.page - 1));
        }
        ui.label(format!("Page {} of {}", list.page + 1, pages));
        if ui
            .add_enabled(list.page + 1 < pages, egui::Button::new("Next »"))
            .clicked()
        {
            actions.push(UiAction::GoToPage(list.page + 1));
        }
        ui.add_space(16.0);
        ui.label(egui::RichText::new(format!("{} items", list.total_items)).weak());
    });
}

/// Render the create/edit form
fn render_file_form(
    ui: &mut egui::Ui,
    editor: &mut FileEditor,
    ui_state: &mut UiState,
    actions: &mut Vec<UiAction>,
) {
    ui.heading("Create or edit a File");
    ui.add_space(4.0);
    ui.separator();
    ui.add_space(12.0);

    ui.group(|ui| {
        egui::Grid::new("file_form")
            .num_columns(2)
            .spacing([24.0, 12.0])
            .show(ui, |ui| {
                if let Some(id) = editor.file.id {
                    form_label(ui, "ID");
                    ui.label(egui::RichText::new(id.to_string()).monospace().weak());
                    ui.end_row();

                    form_label(ui, "Title");
                    ui.text_edit_singleline(&mut editor.file.title);
                    ui.end_row();
                }

                form_label(ui, "Description");
                ui.add(
                    egui::TextEdit::multiline(&mut editor.file.description)
                        .desired_rows(3)
                        .desired_width(320.0),
                );
                ui.end_row();

                form_label(ui, "Creation Date");
                ui.add(
                    egui::TextEdit::singleline(&mut editor.creation_date)
                        .hint_text("YYYY-MM-DDTHH:MM"),
                );
                ui.end_row();

                form_label(ui, "User");
                user_select(ui, &mut editor.file.user_id, &editor.users);
                ui.end_row();
            });

        if !editor.is_edit() {
            ui.add_space(12.0);
            render_attachments(ui, editor, ui_state, actions);
        }
    });

    ui.add_space(16.0);
    ui.horizontal(|ui| {
        if secondary_button(ui, "🚫 Cancel").clicked() {
            actions.push(UiAction::Back);
        }
        ui.add_space(8.0);
        let label = if editor.is_saving { "Saving…" } else { "💾 Save" };
        if primary_button(ui, label, editor.can_save()).clicked() {
            actions.push(UiAction::Save);
        }
    });
}

/// Render the queued uploads and the controls to add more
fn render_attachments(
    ui: &mut egui::Ui,
    editor: &mut FileEditor,
    ui_state: &mut UiState,
    actions: &mut Vec<UiAction>,
) {
    form_label(ui, "Files");
    ui.add_space(4.0);

    let mut removed = None;
    for (index, upload) in editor.attachments.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(&upload.file_name);
            ui.label(egui::RichText::new(format!("{} bytes", upload.bytes.len())).weak());
            if ui.small_button("✖").clicked() {
                removed = Some(index);
            }
        });
    }
    if let Some(index) = removed {
        editor.remove_attachment(index);
    }

    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut ui_state.attach_path)
                .hint_text("Path to a local file")
                .desired_width(320.0),
        );
        let path = ui_state.attach_path.trim();
        if ui
            .add_enabled(!path.is_empty(), egui::Button::new("Attach"))
            .clicked()
        {
            actions.push(UiAction::Attach(PathBuf::from(path)));
        }
    });
    ui.label(
        egui::RichText::new("or drop files onto the window")
            .weak()
            .small()
            .italics(),
    );
}
