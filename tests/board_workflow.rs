use chrono::NaiveDate;
use rstest::{fixture, rstest};

use pulse_board::io::{export_csv, import_csv, load_project, save_project};
use pulse_board::model::{
    build_timeline, partition_by_status, request_status_change, DragPayload, Project, Task,
    TaskStatus,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[fixture]
fn project() -> Project {
    let mut project = Project::new("Launch");
    project.tasks = vec![
        Task::new("Brief")
            .with_id("t1")
            .with_dates(date("2024-01-10"), date("2024-01-12")),
        Task::new("Review")
            .with_id("t2")
            .with_status(TaskStatus::Execution)
            .with_dates(date("2024-01-20"), date("2024-01-20")),
        Task::new("Backlog idea").with_id("t3"),
        Task::new("Retro")
            .with_id("t4")
            .with_status(TaskStatus::Completed),
    ];
    project
}

#[rstest]
fn drag_to_completed_moves_the_card_and_keeps_the_timeline(mut project: Project) {
    let today = date("2024-01-15");
    let before = build_timeline(&project.tasks, None, None, today).unwrap();

    let change = DragPayload::new("t1").drop_onto(TaskStatus::Completed);
    assert!(project.apply_status_change(&change).unwrap());

    let columns = partition_by_status(&project.tasks, &TaskStatus::ALL);
    let completed: Vec<_> = columns
        .get(TaskStatus::Completed)
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(completed, ["t1", "t4"]);
    assert!(columns.get(TaskStatus::Planning).iter().all(|t| t.id.as_str() == "t3"));

    // Status does not influence layout.
    let after = build_timeline(&project.tasks, None, None, today).unwrap();
    assert_eq!(before, after);
}

#[rstest]
fn repeated_drop_on_the_same_column_is_a_no_op(mut project: Project) {
    let change = request_status_change("t4", TaskStatus::Completed);
    assert!(!project.apply_status_change(&change).unwrap());
    let change = request_status_change("t4", TaskStatus::Completed);
    assert!(!project.apply_status_change(&change).unwrap());
    assert_eq!(project.tasks[3].status, TaskStatus::Completed);
}

#[rstest]
fn saved_project_lays_out_the_same_after_reload(project: Project) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("launch.json");
    save_project(&project, &path).unwrap();
    let loaded = load_project(&path).unwrap();

    let today = date("2024-01-15");
    let timeline = build_timeline(&loaded.tasks, None, None, today).unwrap();
    assert_eq!(timeline.start(), date("2024-01-08"));
    assert_eq!(timeline.end(), date("2024-01-30"));
    assert_eq!(timeline.day_count(), 23);
    assert_eq!(timeline.today_index(), Some(7));

    let spans: Vec<_> = loaded
        .tasks
        .iter()
        .map(|t| timeline.span_of(t).map(|s| (s.offset, s.duration)))
        .collect();
    assert_eq!(spans, [Some((2, 3)), Some((12, 1)), None, None]);
}

#[rstest]
fn project_bounds_alone_produce_a_window() {
    let mut project = Project::new("Empty");
    project.start_date = Some(date("2024-02-27"));
    project.end_date = Some(date("2024-03-02"));

    let timeline = build_timeline(
        &project.tasks,
        project.start_date,
        project.end_date,
        date("2024-02-28"),
    )
    .unwrap();

    let months: Vec<_> = timeline
        .months()
        .iter()
        .map(|m| (m.label.as_str(), m.day_count))
        .collect();
    assert_eq!(months, [("February 2024", 5), ("March 2024", 12)]);
    assert_eq!(
        months.iter().map(|(_, n)| n).sum::<usize>(),
        timeline.day_count()
    );
}

#[rstest]
fn csv_round_trip_keeps_board_columns(project: Project) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.csv");
    assert_eq!(export_csv(&project.tasks, &path).unwrap(), 4);

    let (tasks, skipped) = import_csv(&path).unwrap();
    assert_eq!(skipped, 0);

    let titles = |tasks: &[Task], status| -> Vec<String> {
        partition_by_status(tasks, &TaskStatus::ALL)
            .get(status)
            .iter()
            .map(|t| t.title.clone())
            .collect()
    };
    for status in TaskStatus::ALL {
        assert_eq!(titles(&tasks, status), titles(&project.tasks, status));
    }
}
