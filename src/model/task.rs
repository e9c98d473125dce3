use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ParseStatusError;

/// Opaque task identifier as handed out by the project store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier for a newly created task.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Lifecycle stage of a task; one board column per value.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Planning,
    Execution,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Planning,
        TaskStatus::Execution,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    /// Canonical storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Execution => "execution",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable column title.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Execution => "Execution",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "planning" | "planned" | "todo" | "to do" | "new" | "not started" => Ok(Self::Planning),
            "execution" | "in progress" | "in-progress" | "active" | "started" => {
                Ok(Self::Execution)
            }
            "completed" | "complete" | "done" | "finished" => Ok(Self::Completed),
            "cancelled" | "canceled" | "abandoned" | "dropped" => Ok(Self::Cancelled),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

/// A single task on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Task {
    /// Create an unscheduled task in the planning column.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TaskId::generate(),
            title: title.into(),
            status: TaskStatus::Planning,
            start_date: None,
            end_date: None,
            budget: None,
            participants: Vec::new(),
            description: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<TaskId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Both dates present.
    pub fn is_schedulable(&self) -> bool {
        self.date_range().is_some()
    }

    /// `(start, end)` as stored, not reordered when inverted.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start_date.zip(self.end_date)
    }
}

/// Serde helper for optional `YYYY-MM-DD` dates.
///
/// A value that does not parse is logged and read back as `None`, leaving the
/// task unscheduled instead of failing the whole project file.
pub(crate) mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_some(&d.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match NaiveDate::parse_from_str(trimmed, FORMAT) {
                Ok(d) => Some(d),
                Err(err) => {
                    tracing::warn!(value = %trimmed, error = %err, "ignoring malformed date");
                    None
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("planning", TaskStatus::Planning)]
    #[case("  Execution ", TaskStatus::Execution)]
    #[case("in progress", TaskStatus::Execution)]
    #[case("DONE", TaskStatus::Completed)]
    #[case("canceled", TaskStatus::Cancelled)]
    fn parses_status_names(#[case] raw: &str, #[case] expected: TaskStatus) {
        assert_eq!(TaskStatus::try_from(raw), Ok(expected));
    }

    #[test]
    fn rejects_unknown_status() {
        let err = TaskStatus::try_from("blocked").unwrap_err();
        assert_eq!(err.to_string(), "unknown task status: blocked");
    }

    #[test]
    fn storage_form_parses_back() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::try_from(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn schedulable_needs_both_dates() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let mut task = Task::new("Write report");
        assert!(!task.is_schedulable());
        task.start_date = Some(d);
        assert!(!task.is_schedulable());
        task.end_date = Some(d);
        assert_eq!(task.date_range(), Some((d, d)));
    }

    #[test]
    fn malformed_dates_deserialize_as_unscheduled() {
        let json = r#"{
            "id": "t1",
            "title": "Survey",
            "status": "execution",
            "start_date": "2024-13-45",
            "end_date": "2024-02-01"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id.as_str(), "t1");
        assert_eq!(task.status, TaskStatus::Execution);
        assert_eq!(task.start_date, None);
        assert_eq!(task.end_date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert!(!task.is_schedulable());
    }

    #[test]
    fn dates_serialize_as_iso_strings() {
        let task = Task::new("Kickoff").with_id("k").with_dates(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
        );
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["start_date"], "2024-03-05");
        assert_eq!(value["end_date"], "2024-03-06");
        assert_eq!(value["status"], "planning");
    }
}
