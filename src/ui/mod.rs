pub mod dialogs;
pub mod gantt_chart;
pub mod kanban_board;
pub mod task_editor;
pub mod task_table;
pub mod theme;
pub mod toolbar;
