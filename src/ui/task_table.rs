use egui::{Color32, RichText, Sense, Shape, Ui};

use crate::model::{Task, TaskId};
use crate::ui::theme;

/// Actions that the task table can request.
pub enum TaskTableAction {
    None,
    Select(TaskId),
    Add,
}

/// Render the left-side task list.
pub fn show_task_table(tasks: &[Task], selected_task: Option<&TaskId>, ui: &mut Ui) -> TaskTableAction {
    let mut action = TaskTableAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Tasks")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", tasks.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    let btn = egui::Button::new(
        RichText::new(format!("{}  Add Task", egui_phosphor::regular::PLUS))
            .color(Color32::WHITE)
            .size(12.0),
    )
    .fill(theme::ACCENT)
    .rounding(egui::Rounding::same(5.0));
    if ui.add_sized([ui.available_width(), 30.0], btn).clicked() {
        action = TaskTableAction::Add;
    }

    ui.add_space(6.0);
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for task in tasks {
                let is_selected = selected_task == Some(&task.id);
                let dates = match task.date_range() {
                    Some((start, end)) => format!("{} – {}", start.format("%d/%m"), end.format("%d/%m")),
                    None => "—".to_string(),
                };

                // Reserved now, filled once the row's size is known
                let background = ui.painter().add(Shape::Noop);
                let row = ui
                    .horizontal(|ui| {
                        ui.label(RichText::new("●").color(theme::status_color(task.status)));
                        ui.label(
                            RichText::new(&task.title)
                                .size(12.0)
                                .color(if is_selected {
                                    theme::TEXT_PRIMARY
                                } else {
                                    theme::TEXT_SECONDARY
                                }),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(RichText::new(dates).size(10.5).color(theme::TEXT_DIM));
                        });
                    })
                    .response;

                let row = ui.interact(
                    row.rect,
                    ui.make_persistent_id(("task-row", task.id.as_str())),
                    Sense::click(),
                );
                let fill = if is_selected {
                    Some(theme::BG_SELECTED)
                } else if row.hovered() {
                    Some(Color32::from_white_alpha(8))
                } else {
                    None
                };
                if let Some(fill) = fill {
                    ui.painter()
                        .set(background, Shape::rect_filled(row.rect, 3.0, fill));
                }
                if row.clicked() {
                    action = TaskTableAction::Select(task.id.clone());
                }
            }
        });

    action
}
