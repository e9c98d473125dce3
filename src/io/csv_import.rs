use std::path::Path;

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::model::{Task, TaskStatus};

/// Columns we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Title,
    Status,
    Start,
    End,
    Budget,
    Participants,
    Description,
}

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

/// Map a header to a known column, ignoring case, spaces, dashes and underscores.
fn header_to_column(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    match normalized.as_str() {
        "title" | "name" | "task" | "taskname" | "tasklabel" | "label" => Some(Column::Title),
        "status" | "state" | "stage" | "column" => Some(Column::Status),
        "start" | "startdate" | "from" | "begin" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "due" | "duedate" => Some(Column::End),
        "budget" | "cost" | "amount" => Some(Column::Budget),
        "participants" | "assignees" | "people" | "team" | "owner" => Some(Column::Participants),
        "description" | "notes" | "note" | "details" | "comment" => Some(Column::Description),
        _ => None,
    }
}

/// Read an optional date cell; bad values leave the task unscheduled.
fn date_cell(raw: Option<&str>, row: usize, what: &str) -> Option<NaiveDate> {
    let raw = raw.filter(|s| !s.is_empty())?;
    let parsed = parse_date(raw);
    if parsed.is_none() {
        tracing::warn!(row, value = raw, "ignoring invalid {what} date");
    }
    parsed
}

/// Names are `|`-separated so a name may itself contain a comma.
fn split_participants(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Import tasks from a CSV file.
///
/// Auto-detects the delimiter and matches headers flexibly. Only a title
/// column is required. Returns `(tasks, skipped_rows)`.
pub fn import_csv(path: &Path) -> Result<(Vec<Task>, usize), StoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (tasks, skipped) = parse_tasks(&content)?;
    tracing::info!(path = %path.display(), imported = tasks.len(), skipped, "CSV imported");
    Ok((tasks, skipped))
}

fn parse_tasks(content: &str) -> Result<(Vec<Task>, usize), StoreError> {
    let delimiter = detect_delimiter(content.lines().next().unwrap_or(""));
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(header_to_column).collect();
    if !columns.contains(&Some(Column::Title)) {
        return Err(StoreError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut tasks = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        // header is line 1
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(row, error = %err, "skipping unreadable CSV row");
                skipped += 1;
                continue;
            }
        };
        let cell = |wanted: Column| {
            columns
                .iter()
                .position(|c| *c == Some(wanted))
                .and_then(|idx| record.get(idx))
        };

        let title = match cell(Column::Title) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => {
                tracing::warn!(row, "skipping CSV row without a title");
                skipped += 1;
                continue;
            }
        };

        let mut task = Task::new(title);
        if let Some(raw) = cell(Column::Status).filter(|s| !s.is_empty()) {
            task.status = TaskStatus::try_from(raw).unwrap_or_else(|err| {
                tracing::warn!(row, error = %err, "defaulting to planning");
                TaskStatus::Planning
            });
        }
        task.start_date = date_cell(cell(Column::Start), row, "start");
        task.end_date = date_cell(cell(Column::End), row, "end");
        task.budget = cell(Column::Budget)
            .map(|s| s.replace([',', '$', '€', ' '], ""))
            .and_then(|s| s.parse::<f64>().ok());
        task.participants = cell(Column::Participants)
            .map(split_participants)
            .unwrap_or_default();
        task.description = cell(Column::Description).unwrap_or_default().to_string();
        tasks.push(task);
    }

    if tasks.is_empty() {
        return Err(StoreError::NoRows { skipped });
    }
    Ok((tasks, skipped))
}
