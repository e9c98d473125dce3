use chrono::{Duration, NaiveDate};
use egui::{Color32, Id, RichText, Ui};
use egui_phosphor::regular as icons;

use crate::model::{request_status_change, StatusChange, Task, TaskId, TaskStatus};
use crate::ui::theme;

/// Actions the editor can request.
pub enum EditorAction {
    None,
    Changed,
    Move(StatusChange),
    Delete(TaskId),
}

fn field_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_DIM).strong());
}

/// Render an inline editor for the selected task.
///
/// Status edits are not written to the task; they come back as a
/// [`StatusChange`] so the project store applies them like a board move.
pub fn show_task_editor(task: &mut Task, today: NaiveDate, ui: &mut Ui) -> EditorAction {
    let mut action = EditorAction::None;
    let mut changed = false;

    ui.add_space(6.0);
    ui.label(
        RichText::new("Edit Task")
            .strong()
            .size(13.0)
            .color(theme::TEXT_PRIMARY),
    );
    ui.add_space(4.0);

    let frame = egui::Frame::default()
        .fill(theme::BG_DARK)
        .rounding(5.0)
        .inner_margin(egui::Margin::same(8.0))
        .stroke(egui::Stroke::new(1.0, theme::BORDER_SUBTLE));

    frame.show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = 6.0;

        field_label(ui, "TITLE");
        changed |= ui
            .add_sized(
                [ui.available_width(), 24.0],
                egui::TextEdit::singleline(&mut task.title),
            )
            .changed();

        field_label(ui, "STATUS");
        let mut status = task.status;
        egui::ComboBox::from_id_salt(("editor-status", task.id.as_str()))
            .selected_text(status.label())
            .show_ui(ui, |ui| {
                for s in TaskStatus::ALL {
                    ui.selectable_value(&mut status, s, s.label());
                }
            });
        if status != task.status {
            action = EditorAction::Move(request_status_change(task.id.clone(), status));
        }

        field_label(ui, "SCHEDULE");
        let mut scheduled = task.is_schedulable();
        if ui.checkbox(&mut scheduled, "Has start and end dates").changed() {
            if scheduled {
                let start = task.start_date.unwrap_or(today);
                task.start_date = Some(start);
                task.end_date = Some(task.end_date.unwrap_or(start + Duration::days(7)));
            } else {
                task.start_date = None;
                task.end_date = None;
            }
            changed = true;
        }
        if let (Some(start), Some(end)) = (task.start_date.as_mut(), task.end_date.as_mut()) {
            egui::Grid::new(("editor-dates", task.id.as_str()))
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Start");
                    changed |= ui
                        .add(egui_extras::DatePickerButton::new(start).id_salt("editor_dp_start"))
                        .changed();
                    ui.end_row();
                    ui.label("End");
                    changed |= ui
                        .add(egui_extras::DatePickerButton::new(end).id_salt("editor_dp_end"))
                        .changed();
                    ui.end_row();
                });
            if *end < *start {
                ui.label(
                    RichText::new("End is before start; the chart shows one day.")
                        .size(10.0)
                        .color(theme::TODAY_LINE),
                );
            }
        }

        field_label(ui, "BUDGET");
        ui.horizontal(|ui| {
            let mut has_budget = task.budget.is_some();
            if ui.checkbox(&mut has_budget, "").changed() {
                task.budget = has_budget.then_some(0.0);
                changed = true;
            }
            if let Some(budget) = task.budget.as_mut() {
                changed |= ui
                    .add(
                        egui::DragValue::new(budget)
                            .speed(10.0)
                            .range(0.0..=f64::MAX)
                            .prefix(format!("{} ", icons::CURRENCY_DOLLAR)),
                    )
                    .changed();
            }
        });

        field_label(ui, "PARTICIPANTS");
        changed |= participants_editor(task, ui);

        field_label(ui, "DESCRIPTION");
        changed |= ui
            .add_sized(
                [ui.available_width(), 60.0],
                egui::TextEdit::multiline(&mut task.description),
            )
            .changed();

        ui.add_space(4.0);
        let delete = egui::Button::new(
            RichText::new(format!("{} Delete task", icons::TRASH)).color(Color32::WHITE),
        )
        .fill(Color32::from_rgb(150, 50, 50));
        if ui.add(delete).clicked() {
            action = EditorAction::Delete(task.id.clone());
        }
    });

    if changed && matches!(action, EditorAction::None) {
        action = EditorAction::Changed;
    }
    action
}

/// Removable chips plus an entry field; the pending name lives in egui memory.
fn participants_editor(task: &mut Task, ui: &mut Ui) -> bool {
    let mut changed = false;
    let mut remove = None;

    ui.horizontal_wrapped(|ui| {
        for (i, name) in task.participants.iter().enumerate() {
            if ui
                .small_button(format!("{name} ✕"))
                .on_hover_text("Remove")
                .clicked()
            {
                remove = Some(i);
            }
        }
    });
    if let Some(i) = remove {
        task.participants.remove(i);
        changed = true;
    }

    let buf_id = Id::new(("participant-entry", task.id.as_str()));
    let mut entry = ui.data_mut(|d| d.get_temp::<String>(buf_id).unwrap_or_default());
    ui.horizontal(|ui| {
        let edit = ui.add(egui::TextEdit::singleline(&mut entry).hint_text("Add person…"));
        let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (ui.small_button(icons::PLUS).clicked() || submitted) && !entry.trim().is_empty() {
            task.participants.push(entry.trim().to_string());
            entry.clear();
            changed = true;
        }
    });
    ui.data_mut(|d| d.insert_temp(buf_id, entry));

    changed
}
