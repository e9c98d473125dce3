use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};

use crate::config::{Settings, SettingsStore, View};
use crate::model::{
    build_timeline_with, Project, StatusChange, Task, TaskId, TaskStatus, Timeline, TimelineZoom,
};
use crate::ui;
use crate::ui::kanban_board::BoardAction;
use crate::ui::task_editor::EditorAction;
use crate::ui::task_table::TaskTableAction;

const ZOOM_SAVE_DELAY_SECS: f64 = 0.75;

/// Fields of the "Add Task" dialog.
pub struct TaskDraft {
    pub title: String,
    pub status: TaskStatus,
    pub scheduled: bool,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TaskDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            status: TaskStatus::Planning,
            scheduled: true,
            start: today,
            end: today + Duration::days(7),
        }
    }
}

/// Holds off a settings write until a burst of changes has been quiet for
/// `delay` seconds.
#[derive(Debug, Clone, Copy)]
pub struct SettleTimer {
    delay: f64,
    since: Option<f64>,
}

impl SettleTimer {
    pub fn new(delay: f64) -> Self {
        Self { delay, since: None }
    }

    /// Feed the current state; returns true once when the pending change is due.
    pub fn poll(&mut self, pending: bool, now: f64) -> bool {
        if !pending {
            self.since = None;
            return false;
        }
        let since = *self.since.get_or_insert(now);
        if now - since >= self.delay {
            self.since = None;
            return true;
        }
        false
    }

    /// Seconds left before the pending change is due.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.since.map(|since| (self.delay - (now - since)).max(0.0))
    }
}

/// Main application state.
pub struct PulseApp {
    pub project: Project,
    pub file_path: Option<PathBuf>,
    pub view: View,
    pub zoom: TimelineZoom,
    pub selected_task: Option<TaskId>,

    // Dialog state
    pub show_add_task: bool,
    pub show_project: bool,
    pub show_about: bool,
    pub draft: TaskDraft,

    pub status_message: String,

    settings_store: SettingsStore,
    settings: Settings,
    zoom_save: SettleTimer,

    // Gantt layout, rebuilt only when tasks change or the day rolls over
    timeline: Option<Timeline>,
    timeline_dirty: bool,
    today: NaiveDate,
}

impl PulseApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings_store: SettingsStore, settings: Settings) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let today = chrono::Local::now().date_naive();
        let mut app = Self {
            project: Project::sample(today),
            file_path: None,
            view: settings.default_view,
            zoom: TimelineZoom::new(settings.pixels_per_day),
            selected_task: None,
            show_add_task: false,
            show_project: false,
            show_about: false,
            draft: TaskDraft::new(today),
            status_message: "Ready".to_string(),
            settings_store,
            settings,
            zoom_save: SettleTimer::new(ZOOM_SAVE_DELAY_SECS),
            timeline: None,
            timeline_dirty: true,
            today,
        };

        if let Some(path) = app.settings.last_project.clone() {
            match crate::io::load_project(&path) {
                Ok(project) => {
                    app.status_message = format!("Reopened '{}'", project.name);
                    app.project = project;
                    app.file_path = Some(path);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "could not reopen last project, showing sample");
                    app.status_message = format!("Could not reopen last project: {e}");
                }
            }
        }
        app
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Record an edit: touch the project, invalidate the layout and report it.
    pub fn mark_changed(&mut self, message: impl Into<String>) {
        self.project.touch();
        self.timeline_dirty = true;
        self.status_message = message.into();
    }

    fn refresh_timeline(&mut self) {
        let today = chrono::Local::now().date_naive();
        if !self.timeline_dirty && today == self.today {
            return;
        }
        self.today = today;
        self.timeline = build_timeline_with(
            &self.project.tasks,
            self.project.start_date,
            self.project.end_date,
            today,
            self.settings.padding,
        );
        self.timeline_dirty = false;
    }

    fn replace_project(&mut self, project: Project, path: Option<PathBuf>) {
        self.project = project;
        self.file_path = path;
        self.selected_task = None;
        self.timeline_dirty = true;
    }

    // --- Settings ---

    fn persist_settings(&mut self) {
        self.settings.pixels_per_day = self.zoom.pixels_per_day;
        if let Err(e) = self.settings_store.save(&self.settings) {
            tracing::warn!(error = %e, "failed to save settings");
        }
    }

    fn remember_project(&mut self, path: &Path) {
        self.settings.last_project = Some(path.to_path_buf());
        self.persist_settings();
    }

    /// Write the zoom level once Ctrl+scroll has settled.
    fn persist_zoom_when_settled(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        let pending = self.zoom.pixels_per_day != self.settings.pixels_per_day;
        if self.zoom_save.poll(pending, now) {
            tracing::debug!(pixels_per_day = self.zoom.pixels_per_day, "saving zoom level");
            self.persist_settings();
        } else if let Some(wait) = self.zoom_save.remaining(now) {
            ctx.request_repaint_after(std::time::Duration::from_secs_f64(wait));
        }
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
        self.settings.default_view = view;
        self.persist_settings();
    }

    pub fn open_settings_folder(&mut self) {
        let dir = self.settings_store.dir().to_path_buf();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!(error = %e, dir = %dir.display(), "cannot create settings folder");
        }
        if let Err(e) = open::that(&dir) {
            self.status_message = format!("Cannot open {}: {e}", dir.display());
        }
    }

    // --- File operations ---

    pub fn new_project(&mut self) {
        self.replace_project(Project::default(), None);
        self.status_message = "New project created".to_string();
    }

    pub fn open_project(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Pulse Board Project", &["json"])
            .pick_file()
        {
            match crate::io::load_project(&path) {
                Ok(project) => {
                    self.replace_project(project, Some(path.clone()));
                    self.remember_project(&path);
                    self.status_message = "Project loaded".to_string();
                }
                Err(e) => {
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_project(&mut self) {
        if let Some(path) = self.file_path.clone() {
            self.write_project(&path);
        } else {
            self.save_project_as();
        }
    }

    pub fn save_project_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Pulse Board Project", &["json"])
            .set_file_name(format!("{}.json", self.project.name))
            .save_file()
        {
            self.file_path = Some(path.clone());
            self.write_project(&path);
        }
    }

    fn write_project(&mut self, path: &Path) {
        self.project.touch();
        match crate::io::save_project(&self.project, path) {
            Ok(()) => {
                self.remember_project(path);
                self.status_message = "Project saved".to_string();
            }
            Err(e) => self.status_message = format!("Error saving: {}", e),
        }
    }

    pub fn import_csv(&mut self) {
        // Guard: if current project has tasks, confirm before replacing
        if !self.project.tasks.is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import CSV")
                .set_description("This will replace the current project. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match crate::io::import_csv(&path) {
                Ok((tasks, skipped)) => {
                    let name = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("Imported Project")
                        .to_string();
                    let count = tasks.len();
                    let mut project = Project::new(name);
                    project.tasks = tasks;
                    self.replace_project(project, None);

                    self.status_message = if skipped > 0 {
                        format!("Imported {} tasks ({} rows skipped)", count, skipped)
                    } else {
                        format!("Imported {} tasks", count)
                    };
                }
                Err(e) => {
                    self.status_message = format!("CSV import failed: {}", e);
                }
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.project.tasks.is_empty() {
            self.status_message = "Nothing to export: project has no tasks".to_string();
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(format!("{}.csv", self.project.name))
            .save_file()
        {
            match crate::io::export_csv(&self.project.tasks, &path) {
                Ok(count) => self.status_message = format!("Exported {} tasks to CSV", count),
                Err(e) => self.status_message = format!("CSV export failed: {}", e),
            }
        }
    }

    // --- Task operations ---

    /// Apply a status-change intent from the board or the editor.
    pub fn apply_change(&mut self, change: StatusChange) {
        match self.project.apply_status_change(&change) {
            Ok(true) => {
                let title = self
                    .project
                    .task(&change.task_id)
                    .map(|t| t.title.clone())
                    .unwrap_or_default();
                self.status_message = format!("Moved '{}' to {}", title, change.status.label());
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "status change rejected");
                self.status_message = e.to_string();
            }
        }
    }

    pub fn delete_task(&mut self, id: &TaskId) {
        if let Some(task) = self.project.remove_task(id) {
            if self.selected_task.as_ref() == Some(id) {
                self.selected_task = None;
            }
            self.timeline_dirty = true;
            self.status_message = format!("Deleted '{}'", task.title);
        }
    }

    pub fn open_add_task(&mut self) {
        self.draft = TaskDraft::new(self.today);
        self.show_add_task = true;
    }

    pub fn create_task_from_draft(&mut self) {
        let title = match self.draft.title.trim() {
            "" => "New Task".to_string(),
            t => t.to_string(),
        };
        let mut task = Task::new(title).with_status(self.draft.status);
        if self.draft.scheduled {
            let start = self.draft.start;
            let end = if self.draft.end >= start {
                self.draft.end
            } else {
                start + Duration::days(7)
            };
            task = task.with_dates(start, end);
        }

        let id = self.project.add_task(task);
        self.selected_task = Some(id);
        self.draft = TaskDraft::new(self.today);
        self.timeline_dirty = true;
        self.status_message = "Task added".to_string();
    }

    fn show_side_panel(&mut self, ctx: &egui::Context) {
        let mut editor_action = EditorAction::None;
        let mut table_action = TaskTableAction::None;
        let today = self.today;

        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(220.0)
            .max_width(ui::theme::SIDE_PANEL_WIDTH * 2.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                if let Some(id) = self.selected_task.clone() {
                    match self.project.task_mut(&id) {
                        Some(task) => {
                            editor_action = ui::task_editor::show_task_editor(task, today, ui);
                            ui.add_space(4.0);
                            ui.separator();
                            ui.add_space(2.0);
                        }
                        None => self.selected_task = None,
                    }
                }

                table_action = ui::task_table::show_task_table(
                    &self.project.tasks,
                    self.selected_task.as_ref(),
                    ui,
                );
            });

        match editor_action {
            EditorAction::Changed => self.mark_changed("Task updated"),
            EditorAction::Move(change) => self.apply_change(change),
            EditorAction::Delete(id) => self.delete_task(&id),
            EditorAction::None => {}
        }
        match table_action {
            TaskTableAction::Select(id) => self.selected_task = Some(id),
            TaskTableAction::Add => self.open_add_task(),
            TaskTableAction::None => {}
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let dim = |text: String| {
                            egui::RichText::new(text).size(10.5).color(ui::theme::TEXT_DIM)
                        };
                        ui.label(dim(format!("Tasks: {}", self.project.tasks.len())));
                        ui.label(dim(" · ".to_string()));
                        ui.label(dim(format!(
                            "Zoom: {:.0}%",
                            self.zoom.pixels_per_day / TimelineZoom::default().pixels_per_day * 100.0
                        )));
                    });
                });
            });
    }
}

impl eframe::App for PulseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        // Handle keyboard shortcuts outside closures to avoid borrow issues
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.save_project();
        }

        self.refresh_timeline();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });
        self.show_status_bar(ctx);
        self.show_side_panel(ctx);

        let mut board_action = BoardAction::None;
        let mut requested_view = self.view;
        let central_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(central_frame).show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.add_space(8.0);
                ui.selectable_value(
                    &mut requested_view,
                    View::Board,
                    format!("{} Board", egui_phosphor::regular::KANBAN),
                );
                ui.selectable_value(
                    &mut requested_view,
                    View::Gantt,
                    format!("{} Gantt", egui_phosphor::regular::CHART_BAR_HORIZONTAL),
                );
            });
            ui.separator();

            match self.view {
                View::Board => {
                    board_action = ui::kanban_board::show_kanban_board(
                        &self.project.tasks,
                        self.selected_task.as_ref(),
                        ui,
                    );
                }
                View::Gantt => {
                    ui::gantt_chart::show_gantt_chart(
                        &self.project.tasks,
                        self.timeline.as_ref(),
                        &mut self.zoom,
                        &mut self.selected_task,
                        ui,
                    );
                }
            }
        });

        match board_action {
            BoardAction::Select(id) => self.selected_task = Some(id),
            BoardAction::Move(change) => self.apply_change(change),
            BoardAction::Delete(id) => self.delete_task(&id),
            BoardAction::None => {}
        }
        if requested_view != self.view {
            self.set_view(requested_view);
        }
        self.persist_zoom_when_settled(ctx);

        // Dialogs
        if self.show_add_task {
            ui::dialogs::show_add_task_dialog(self, ctx);
        }
        if self.show_project {
            ui::dialogs::show_project_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
