use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::board::StatusChange;
use super::task::{Task, TaskId, TaskStatus};
use crate::error::StoreError;

/// A project with its tasks and optional scheduling bounds.
///
/// Acts as the data store behind both board views: views read `tasks`, and
/// status moves come back through [`Project::apply_status_change`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "crate::model::task::lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "crate::model::task::lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Untitled Project".to_string(),
            description: String::new(),
            start_date: None,
            end_date: None,
            tasks: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    pub fn add_task(&mut self, task: Task) -> TaskId {
        let id = task.id.clone();
        tracing::info!(task = %id, title = %task.title, "task added");
        self.tasks.push(task);
        self.touch();
        id
    }

    /// Remove a task, returning it if it was present.
    pub fn remove_task(&mut self, id: &TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| &t.id == id)?;
        let task = self.tasks.remove(pos);
        tracing::info!(task = %id, "task removed");
        self.touch();
        Some(task)
    }

    /// Execute a status-change intent.
    ///
    /// Returns `Ok(false)` when the task already had the requested status.
    pub fn apply_status_change(&mut self, change: &StatusChange) -> Result<bool, StoreError> {
        let task = self
            .task_mut(&change.task_id)
            .ok_or_else(|| StoreError::TaskNotFound(change.task_id.clone()))?;
        if task.status == change.status {
            tracing::debug!(task = %change.task_id, status = change.status.as_str(), "status unchanged");
            return Ok(false);
        }
        let previous = std::mem::replace(&mut task.status, change.status);
        tracing::info!(
            task = %change.task_id,
            from = previous.as_str(),
            to = change.status.as_str(),
            "status changed"
        );
        self.touch();
        Ok(true)
    }

    /// Demo project shown on first launch, dated around `today`.
    pub fn sample(today: NaiveDate) -> Self {
        let day = |n: i64| today + Duration::days(n);
        let mut project = Project::new("Community Garden");
        project.description = "Plan, build and open the neighbourhood garden.".to_string();
        project.start_date = Some(day(-6));
        project.end_date = Some(day(40));

        let mut survey = Task::new("Site survey")
            .with_status(TaskStatus::Completed)
            .with_dates(day(-6), day(-3));
        survey.participants = vec!["Ana".into(), "Tomás".into()];

        let mut budget = Task::new("Budget approval")
            .with_status(TaskStatus::Execution)
            .with_dates(day(-2), day(4));
        budget.budget = Some(12_500.0);

        let mut beds = Task::new("Build raised beds")
            .with_status(TaskStatus::Planning)
            .with_dates(day(5), day(19));
        beds.participants = vec!["Volunteers".into()];
        beds.budget = Some(4_200.0);

        let irrigation = Task::new("Irrigation install")
            .with_status(TaskStatus::Planning)
            .with_dates(day(14), day(24));

        let fountain = Task::new("Fountain")
            .with_status(TaskStatus::Cancelled)
            .with_dates(day(10), day(12));

        let mut opening = Task::new("Opening day").with_dates(day(35), day(35));
        opening.description = "Invite local press.".to_string();

        let signage = Task::new("Signage design");

        project.tasks = vec![survey, budget, beds, irrigation, fountain, opening, signage];
        project
    }
}
