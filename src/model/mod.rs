pub mod board;
pub mod project;
pub mod task;
pub mod timeline;

pub use board::{partition_by_status, request_status_change, DragPayload, StatusChange};
pub use project::Project;
pub use task::{Task, TaskId, TaskStatus};
pub use timeline::{
    build_timeline, build_timeline_with, DayCell, MonthSegment, TaskSpan, Timeline,
    TimelinePadding, TimelineZoom,
};
