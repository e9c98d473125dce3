use egui::{Align2, Color32, Painter, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use crate::model::{Task, TaskId, TaskSpan, Timeline, TimelineZoom};
use crate::ui::theme;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::MONTH_BAND_HEIGHT + theme::DAY_BAND_HEIGHT;

/// Render the Gantt chart for `tasks` on a precomputed `timeline`.
///
/// `None` renders the empty-state placeholder. Clicking a bar selects its task.
pub fn show_gantt_chart(
    tasks: &[Task],
    timeline: Option<&Timeline>,
    zoom: &mut TimelineZoom,
    selected_task: &mut Option<TaskId>,
    ui: &mut Ui,
) {
    let Some(timeline) = timeline else {
        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new(
                    "Nothing to chart yet.\nGive a task both a start and an end date, \
                     or set a project start date.",
                )
                .color(theme::TEXT_DIM),
            );
        });
        return;
    };

    // Handle zoom with scroll wheel
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        if scroll_delta.y > 0.0 {
            zoom.zoom_in();
        } else if scroll_delta.y < 0.0 {
            zoom.zoom_out();
        }
    }

    let available = ui.available_size();
    let chart_width = (timeline.day_count() as f32 * zoom.pixels_per_day).max(available.x);
    let chart_height = HEADER_HEIGHT + tasks.len() as f32 * (ROW_HEIGHT + ROW_PADDING) + 40.0;

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::click(),
            );
            let origin = response.rect.min;
            let body_bottom = response.rect.bottom();
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            draw_day_columns(&painter, origin, timeline, zoom, body_bottom);

            // Alternating row backgrounds
            for i in 0..tasks.len() {
                let y = row_top(origin, i);
                if i % 2 == 0 {
                    painter.rect_filled(
                        Rect::from_min_size(
                            Pos2::new(origin.x, y),
                            Vec2::new(chart_width, ROW_HEIGHT + ROW_PADDING),
                        ),
                        0.0,
                        Color32::from_white_alpha(4),
                    );
                }
                painter.line_segment(
                    [
                        Pos2::new(origin.x, y + ROW_HEIGHT + ROW_PADDING),
                        Pos2::new(origin.x + chart_width, y + ROW_HEIGHT + ROW_PADDING),
                    ],
                    Stroke::new(0.5, theme::BORDER_SUBTLE),
                );
            }

            draw_header(&painter, origin, timeline, zoom, chart_width);
            draw_today_line(&painter, origin, timeline, zoom, body_bottom);

            for (i, task) in tasks.iter().enumerate() {
                let y = row_top(origin, i) + ROW_PADDING;
                let is_selected = selected_task.as_ref() == Some(&task.id);

                let Some(span) = timeline.span_of(task) else {
                    painter.text(
                        Pos2::new(origin.x + 8.0, y + ROW_HEIGHT / 2.0),
                        Align2::LEFT_CENTER,
                        format!("{}  (unscheduled)", task.title),
                        theme::font_bar(),
                        theme::TEXT_DIM,
                    );
                    continue;
                };

                let bar_rect = draw_task_bar(&painter, origin, zoom, task, span, y, is_selected);
                let bar_response = ui
                    .interact(
                        bar_rect,
                        ui.make_persistent_id(("task-bar", task.id.as_str())),
                        Sense::click(),
                    )
                    .on_hover_ui(|ui| {
                        ui.strong(&task.title);
                        if let Some((start, end)) = task.date_range() {
                            ui.label(format!(
                                "{} → {}  ({} d)",
                                start.format("%d/%m/%Y"),
                                end.format("%d/%m/%Y"),
                                span.duration
                            ));
                        }
                        ui.label(task.status.label());
                    });

                if bar_response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if bar_response.clicked() {
                    *selected_task = Some(task.id.clone());
                    consumed_click = true;
                }
            }

            // Empty click on background clears selection
            if response.clicked() && !consumed_click {
                *selected_task = None;
            }
        });
}

fn row_top(origin: Pos2, index: usize) -> f32 {
    origin.y + HEADER_HEIGHT + index as f32 * (ROW_HEIGHT + ROW_PADDING)
}

fn day_x(origin: Pos2, zoom: &TimelineZoom, index: usize) -> f32 {
    origin.x + zoom.offset_to_x(index as i64)
}

/// Weekend shading and day grid lines behind the rows.
fn draw_day_columns(
    painter: &Painter,
    origin: Pos2,
    timeline: &Timeline,
    zoom: &TimelineZoom,
    bottom: f32,
) {
    for (i, day) in timeline.days().iter().enumerate() {
        let x = day_x(origin, zoom, i);
        if day.is_weekend() {
            painter.rect_filled(
                Rect::from_min_max(
                    Pos2::new(x, origin.y + HEADER_HEIGHT),
                    Pos2::new(x + zoom.pixels_per_day, bottom),
                ),
                0.0,
                theme::BG_WEEKEND,
            );
        }
        if zoom.pixels_per_day >= 10.0 {
            painter.line_segment(
                [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, bottom)],
                Stroke::new(0.5, theme::GRID_LINE),
            );
        }
    }
}

/// Month band on top, one cell per day below it.
fn draw_header(
    painter: &Painter,
    origin: Pos2,
    timeline: &Timeline,
    zoom: &TimelineZoom,
    width: f32,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );

    let band_y = origin.y + theme::MONTH_BAND_HEIGHT;
    for segment in timeline.months() {
        let x = day_x(origin, zoom, segment.first_day);
        let rect = Rect::from_min_size(
            Pos2::new(x, origin.y),
            Vec2::new(segment.day_count as f32 * zoom.pixels_per_day, theme::MONTH_BAND_HEIGHT),
        );
        painter.line_segment(
            [rect.left_top(), Pos2::new(x, origin.y + HEADER_HEIGHT)],
            Stroke::new(1.0, theme::BORDER_SUBTLE),
        );
        painter.with_clip_rect(rect).text(
            Pos2::new(x + 6.0, rect.center().y),
            Align2::LEFT_CENTER,
            &segment.label,
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );
    }
    painter.line_segment(
        [Pos2::new(origin.x, band_y), Pos2::new(origin.x + width, band_y)],
        Stroke::new(0.5, theme::BORDER_SUBTLE),
    );

    for (i, day) in timeline.days().iter().enumerate() {
        let x = day_x(origin, zoom, i);
        let cell = Rect::from_min_size(
            Pos2::new(x, band_y),
            Vec2::new(zoom.pixels_per_day, theme::DAY_BAND_HEIGHT),
        );
        if day.is_today {
            painter.rect_filled(cell.shrink(1.0), Rounding::same(3.0), theme::TODAY_LINE);
        }
        let color = if day.is_today {
            Color32::WHITE
        } else if day.is_weekend() {
            theme::TEXT_DIM
        } else {
            theme::TEXT_SECONDARY
        };
        if zoom.pixels_per_day >= 16.0 {
            painter.text(
                Pos2::new(cell.center().x, cell.top() + 10.0),
                Align2::CENTER_CENTER,
                day.day_of_month().to_string(),
                theme::font_sub(),
                color,
            );
        }
        if zoom.pixels_per_day >= 24.0 {
            let weekday = day.weekday_label();
            painter.text(
                Pos2::new(cell.center().x, cell.top() + 22.0),
                Align2::CENTER_CENTER,
                weekday.chars().next().map(String::from).unwrap_or_default(),
                theme::font_small(),
                color,
            );
        }
    }

    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_today_line(
    painter: &Painter,
    origin: Pos2,
    timeline: &Timeline,
    zoom: &TimelineZoom,
    bottom: f32,
) {
    let Some(index) = timeline.today_index() else {
        return;
    };
    let x = day_x(origin, zoom, index) + zoom.pixels_per_day / 2.0;
    painter.line_segment(
        [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, bottom)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );
}

fn draw_task_bar(
    painter: &Painter,
    origin: Pos2,
    zoom: &TimelineZoom,
    task: &Task,
    span: TaskSpan,
    y: f32,
    is_selected: bool,
) -> Rect {
    let x_start = origin.x + zoom.offset_to_x(span.offset);
    let bar_width = zoom.offset_to_x(span.duration).max(6.0);
    let inset = theme::BAR_INSET;

    let bar_rect = Rect::from_min_size(
        Pos2::new(x_start, y + inset),
        Vec2::new(bar_width, ROW_HEIGHT - inset * 2.0),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    // Soft shadow
    painter.rect_filled(
        bar_rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    painter.rect_filled(bar_rect, rounding, theme::status_color(task.status));

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    // Name on the bar when it fits, otherwise just after it
    let galley = painter.layout_no_wrap(task.title.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
    let text_y = bar_rect.center().y - galley.size().y / 2.0;
    if galley.size().x + 12.0 <= bar_width {
        painter.galley(
            Pos2::new(bar_rect.left() + 6.0, text_y),
            galley,
            Color32::TRANSPARENT,
        );
    } else {
        painter.text(
            Pos2::new(bar_rect.right() + 6.0, bar_rect.center().y),
            Align2::LEFT_CENTER,
            &task.title,
            theme::font_bar(),
            theme::TEXT_SECONDARY,
        );
    }

    bar_rect
}
