use chrono::Duration;
use egui::{Color32, Context, RichText, Window};

use crate::app::PulseApp;
use crate::model::TaskStatus;
use crate::ui::theme;

const DIALOG_WIDTH: f32 = 340.0;

fn dialog(title: &str) -> Window<'static> {
    Window::new(RichText::new(title).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([DIALOG_WIDTH, 0.0])
}

fn primary_button(text: &str) -> egui::Button<'static> {
    egui::Button::new(RichText::new(text).color(Color32::WHITE))
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(4.0))
}

/// Render the "Add Task" dialog.
pub fn show_add_task_dialog(app: &mut PulseApp, ctx: &Context) {
    let mut should_close = false;
    dialog("Add Task").show(ctx, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("add_task_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                let draft = &mut app.draft;

                ui.label(RichText::new("Title").color(theme::TEXT_SECONDARY));
                ui.add_sized(
                    [220.0, 24.0],
                    egui::TextEdit::singleline(&mut draft.title).hint_text("Task title..."),
                );
                ui.end_row();

                ui.label(RichText::new("Status").color(theme::TEXT_SECONDARY));
                egui::ComboBox::from_id_salt("dlg_status")
                    .selected_text(draft.status.label())
                    .show_ui(ui, |ui| {
                        for s in TaskStatus::ALL {
                            ui.selectable_value(&mut draft.status, s, s.label());
                        }
                    });
                ui.end_row();

                ui.label("");
                ui.checkbox(&mut draft.scheduled, "Scheduled");
                ui.end_row();

                if draft.scheduled {
                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut draft.start).id_salt("dlg_dp_start"));
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut draft.end).id_salt("dlg_dp_end"));
                    ui.end_row();
                }
            });

        ui.add_space(6.0);
        ui.separator();
        ui.horizontal(|ui| {
            if ui.add_sized([80.0, 28.0], primary_button("Create")).clicked() {
                app.create_task_from_draft();
                should_close = true;
            }
            if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                should_close = true;
            }
        });
    });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_add_task = false;
    }
}

/// Render the project dialog: name, description and optional bounds.
pub fn show_project_dialog(app: &mut PulseApp, ctx: &Context) {
    let mut should_close = false;
    let mut bounds_changed = false;
    let today = app.today();

    dialog("Project").show(ctx, |ui| {
        let project = &mut app.project;
        egui::Grid::new("project_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                ui.add_sized([220.0, 24.0], egui::TextEdit::singleline(&mut project.name));
                ui.end_row();

                ui.label(RichText::new("Description").color(theme::TEXT_SECONDARY));
                ui.add_sized(
                    [220.0, 48.0],
                    egui::TextEdit::multiline(&mut project.description),
                );
                ui.end_row();

                for (label, date, salt, fallback) in [
                    ("Starts", &mut project.start_date, "dlg_proj_start", today),
                    ("Ends", &mut project.end_date, "dlg_proj_end", today + Duration::days(30)),
                ] {
                    ui.label(RichText::new(label).color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        let mut set = date.is_some();
                        if ui.checkbox(&mut set, "").changed() {
                            *date = set.then_some(date.unwrap_or(fallback));
                            bounds_changed = true;
                        }
                        if let Some(d) = date.as_mut() {
                            bounds_changed |= ui
                                .add(egui_extras::DatePickerButton::new(d).id_salt(salt))
                                .changed();
                        }
                    });
                    ui.end_row();
                }
            });

        ui.add_space(6.0);
        ui.label(
            RichText::new("Project dates widen the Gantt window even without scheduled tasks.")
                .size(10.5)
                .color(theme::TEXT_DIM),
        );
        ui.separator();
        if ui.add_sized([80.0, 28.0], primary_button("Done")).clicked() {
            should_close = true;
        }
    });

    if bounds_changed {
        app.mark_changed("Project dates updated");
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.project.touch();
        app.show_project = false;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut PulseApp, ctx: &Context) {
    let mut should_close = false;
    dialog("About").show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(12.0);
            ui.heading(RichText::new("Pulse Board").strong());
            ui.label(
                RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                    .color(theme::TEXT_SECONDARY),
            );
            ui.add_space(10.0);
            ui.label("Kanban and Gantt views of one project,");
            ui.label("built with Rust and egui.");
            ui.add_space(14.0);
            if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
        });
    });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
