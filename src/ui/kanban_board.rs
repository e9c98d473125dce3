use egui::{Frame, Id, Margin, RichText, Sense, Stroke, Ui};
use egui_phosphor::regular as icons;

use crate::model::board::StatusColumn;
use crate::model::{
    partition_by_status, request_status_change, DragPayload, StatusChange, Task, TaskId,
    TaskStatus,
};
use crate::ui::theme;

/// Actions that the board can request.
pub enum BoardAction {
    None,
    Select(TaskId),
    Move(StatusChange),
    Delete(TaskId),
}

/// Render one column per status. Cards can be dragged between columns or
/// moved through their context menu; both produce a [`StatusChange`].
pub fn show_kanban_board(tasks: &[Task], selected: Option<&TaskId>, ui: &mut Ui) -> BoardAction {
    let mut action = BoardAction::None;
    let columns = partition_by_status(tasks, &TaskStatus::ALL);

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.add_space(8.0);
            ui.horizontal_top(|ui| {
                ui.add_space(8.0);
                for column in columns.iter() {
                    if let Some(a) = show_column(column, selected, ui) {
                        action = a;
                    }
                    ui.add_space(4.0);
                }
            });
        });

    action
}

fn show_column(
    column: &StatusColumn<'_>,
    selected: Option<&TaskId>,
    ui: &mut Ui,
) -> Option<BoardAction> {
    let mut action = None;
    let dragging = egui::DragAndDrop::has_payload_of_type::<DragPayload>(ui.ctx());
    let frame = Frame::default()
        .fill(if dragging { theme::DROP_HINT } else { theme::BG_DARK })
        .rounding(6.0)
        .inner_margin(Margin::same(8.0))
        .stroke(Stroke::new(1.0, theme::BORDER_SUBTLE));

    let (_, dropped) = ui.dnd_drop_zone::<DragPayload, ()>(frame, |ui| {
        ui.set_width(theme::COLUMN_WIDTH);
        ui.set_min_height(320.0);

        ui.horizontal(|ui| {
            ui.label(RichText::new("●").color(theme::status_color(column.status)));
            ui.label(
                RichText::new(column.status.label())
                    .strong()
                    .size(13.0)
                    .color(theme::TEXT_PRIMARY),
            );
            ui.label(
                RichText::new(format!("({})", column.tasks.len()))
                    .size(11.0)
                    .color(theme::TEXT_DIM),
            );
        });
        ui.add_space(4.0);

        if column.tasks.is_empty() {
            ui.label(
                RichText::new("Drop tasks here")
                    .italics()
                    .size(11.0)
                    .color(theme::TEXT_DIM),
            );
        }
        for task in &column.tasks {
            if let Some(a) = show_card(task, selected, ui) {
                action = Some(a);
            }
            ui.add_space(2.0);
        }
    });

    if let Some(payload) = dropped {
        action = Some(BoardAction::Move(payload.drop_onto(column.status)));
    }
    action
}

fn show_card(task: &Task, selected: Option<&TaskId>, ui: &mut Ui) -> Option<BoardAction> {
    let mut action = None;
    let is_selected = selected == Some(&task.id);
    let drag_id = Id::new(("board-card", task.id.as_str()));
    let stroke_color = if is_selected {
        theme::BORDER_ACCENT
    } else {
        theme::BORDER_SUBTLE
    };

    ui.dnd_drag_source(drag_id, DragPayload::new(task.id.clone()), |ui| {
        Frame::default()
            .fill(theme::BG_CARD)
            .rounding(5.0)
            .inner_margin(Margin::same(8.0))
            .stroke(Stroke::new(1.0, stroke_color))
            .show(ui, |ui| {
                ui.set_width(theme::COLUMN_WIDTH - 16.0);

                let title = ui
                    .add(
                        egui::Label::new(
                            RichText::new(&task.title)
                                .strong()
                                .color(theme::TEXT_PRIMARY),
                        )
                        .sense(Sense::click()),
                    )
                    .on_hover_text("Click to edit · drag to move · right-click for options");
                if title.clicked() {
                    action = Some(BoardAction::Select(task.id.clone()));
                }
                title.context_menu(|ui| {
                    ui.label(RichText::new("Move to").small().weak());
                    for status in TaskStatus::ALL {
                        let marker = if status == task.status { "✔" } else { " " };
                        if ui.button(format!("{marker} {}", status.label())).clicked() {
                            action = Some(BoardAction::Move(request_status_change(
                                task.id.clone(),
                                status,
                            )));
                            ui.close_menu();
                        }
                    }
                    ui.separator();
                    if ui.button(format!("{} Delete", icons::TRASH)).clicked() {
                        action = Some(BoardAction::Delete(task.id.clone()));
                        ui.close_menu();
                    }
                });

                card_meta(task, ui);
            });
    });

    action
}

fn card_meta(task: &Task, ui: &mut Ui) {
    let dim = |text: String| RichText::new(text).size(10.5).color(theme::TEXT_SECONDARY);

    match task.date_range() {
        Some((start, end)) => {
            ui.label(dim(format!(
                "{} {} → {}",
                icons::CALENDAR_BLANK,
                start.format("%d %b"),
                end.format("%d %b %Y")
            )));
        }
        None => {
            ui.label(dim(format!("{} unscheduled", icons::CALENDAR_BLANK)));
        }
    }

    if task.budget.is_some() || !task.participants.is_empty() {
        ui.horizontal(|ui| {
            if let Some(budget) = task.budget {
                ui.label(dim(format!("{} {budget:.0}", icons::CURRENCY_DOLLAR)));
            }
            if !task.participants.is_empty() {
                ui.label(dim(format!("{} {}", icons::USERS, task.participants.len())))
                    .on_hover_text(task.participants.join(", "));
            }
        });
    }
}
