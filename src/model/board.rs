use super::task::{Task, TaskId, TaskStatus};

/// A requested status move, handed to the project store for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub task_id: TaskId,
    pub status: TaskStatus,
}

/// Build a status-change intent.
///
/// Does not check that the task exists or that the status differs; the store
/// decides whether the change is a no-op.
pub fn request_status_change(task_id: impl Into<TaskId>, status: TaskStatus) -> StatusChange {
    StatusChange {
        task_id: task_id.into(),
        status,
    }
}

/// What a board card carries while it is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub task_id: TaskId,
}

impl DragPayload {
    pub fn new(task_id: impl Into<TaskId>) -> Self {
        Self {
            task_id: task_id.into(),
        }
    }

    /// The intent produced by dropping onto the column for `target`.
    pub fn drop_onto(&self, target: TaskStatus) -> StatusChange {
        request_status_change(self.task_id.clone(), target)
    }
}

/// Tasks of one status, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusColumn<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

/// Board columns produced by [`partition_by_status`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatusColumns<'a> {
    columns: Vec<StatusColumn<'a>>,
}

impl<'a> StatusColumns<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &StatusColumn<'a>> {
        self.columns.iter()
    }

    pub fn get(&self, status: TaskStatus) -> &[&'a Task] {
        self.columns
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.tasks.as_slice())
            .unwrap_or_default()
    }

    pub fn statuses(&self) -> Vec<TaskStatus> {
        self.columns.iter().map(|c| c.status).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<'a> IntoIterator for StatusColumns<'a> {
    type Item = StatusColumn<'a>;
    type IntoIter = std::vec::IntoIter<StatusColumn<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

/// Group tasks into one column per status, keeping input order.
///
/// Columns follow the order of `statuses` (duplicates collapse to the first).
/// Tasks whose status was not requested land in extra columns appended in
/// enum order, so every task is placed exactly once.
pub fn partition_by_status<'a>(tasks: &'a [Task], statuses: &[TaskStatus]) -> StatusColumns<'a> {
    let mut columns: Vec<StatusColumn<'a>> = Vec::with_capacity(TaskStatus::ALL.len());
    for &status in statuses {
        if !columns.iter().any(|c| c.status == status) {
            columns.push(StatusColumn {
                status,
                tasks: Vec::new(),
            });
        }
    }
    let requested = columns.len();

    for task in tasks {
        match columns.iter_mut().find(|c| c.status == task.status) {
            Some(column) => column.tasks.push(task),
            None => columns.push(StatusColumn {
                status: task.status,
                tasks: vec![task],
            }),
        }
    }
    columns[requested..].sort_by_key(|c| c.status);

    StatusColumns { columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn task(id: &str, status: TaskStatus) -> Task {
        Task::new(id).with_id(id).with_status(status)
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.to_string()).collect()
    }

    #[fixture]
    fn mixed() -> Vec<Task> {
        vec![
            task("t1", TaskStatus::Execution),
            task("t2", TaskStatus::Planning),
            task("t3", TaskStatus::Execution),
            task("t4", TaskStatus::Completed),
            task("t5", TaskStatus::Planning),
            task("t6", TaskStatus::Execution),
        ]
    }

    #[rstest]
    fn keeps_input_order_within_columns(mixed: Vec<Task>) {
        let board = partition_by_status(&mixed, &TaskStatus::ALL);
        assert_eq!(board.statuses(), TaskStatus::ALL.to_vec());
        assert_eq!(ids(board.get(TaskStatus::Planning)), ["t2", "t5"]);
        assert_eq!(ids(board.get(TaskStatus::Execution)), ["t1", "t3", "t6"]);
        assert_eq!(ids(board.get(TaskStatus::Completed)), ["t4"]);
        assert!(board.get(TaskStatus::Cancelled).is_empty());
    }

    #[rstest]
    fn every_task_lands_in_exactly_one_column(mixed: Vec<Task>) {
        let board = partition_by_status(&mixed, &TaskStatus::ALL);
        let mut placed: Vec<String> = board.iter().flat_map(|c| ids(&c.tasks)).collect();
        placed.sort();
        assert_eq!(placed, ["t1", "t2", "t3", "t4", "t5", "t6"]);
    }

    #[rstest]
    fn unrequested_statuses_get_trailing_columns(mixed: Vec<Task>) {
        let board = partition_by_status(&mixed, &[TaskStatus::Completed]);
        assert_eq!(
            board.statuses(),
            [
                TaskStatus::Completed,
                TaskStatus::Planning,
                TaskStatus::Execution
            ]
        );
        let total: usize = board.iter().map(|c| c.tasks.len()).sum();
        assert_eq!(total, mixed.len());
    }

    #[test]
    fn empty_input_still_yields_requested_columns() {
        let board = partition_by_status(&[], &TaskStatus::ALL);
        assert_eq!(board.len(), 4);
        assert!(board.iter().all(|c| c.tasks.is_empty()));
    }

    #[test]
    fn same_status_request_is_a_plain_intent() {
        let change = request_status_change("t1", TaskStatus::Completed);
        assert_eq!(change.task_id.as_str(), "t1");
        assert_eq!(change.status, TaskStatus::Completed);
    }

    #[rstest]
    #[case(TaskStatus::Completed, TaskStatus::Planning)]
    #[case(TaskStatus::Cancelled, TaskStatus::Execution)]
    #[case(TaskStatus::Planning, TaskStatus::Cancelled)]
    fn drop_targets_any_column(#[case] from: TaskStatus, #[case] to: TaskStatus) {
        let source = task("card", from);
        let payload = DragPayload::new(source.id.clone());
        assert_eq!(
            payload.drop_onto(to),
            StatusChange {
                task_id: TaskId::new("card"),
                status: to
            }
        );
    }
}
