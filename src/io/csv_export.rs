use std::path::Path;

use crate::error::StoreError;
use crate::model::Task;

const HEADER: [&str; 7] = [
    "Title",
    "Status",
    "Start Date",
    "End Date",
    "Budget",
    "Participants",
    "Description",
];

/// Export tasks to a semicolon-delimited CSV file readable by [`super::import_csv`].
///
/// Dates are written as YYYY-MM-DD; missing values are left empty.
/// Returns the number of tasks written.
pub fn export_csv(tasks: &[Task], path: &Path) -> Result<usize, StoreError> {
    let file = std::fs::File::create(path).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let count = write_tasks(tasks, file)?;
    tracing::info!(path = %path.display(), count, "CSV exported");
    Ok(count)
}

fn write_tasks<W: std::io::Write>(tasks: &[Task], out: W) -> Result<usize, StoreError> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(out);
    wtr.write_record(HEADER)?;

    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };
    for task in tasks {
        wtr.write_record([
            task.title.clone(),
            task.status.as_str().to_string(),
            date(task.start_date),
            date(task.end_date),
            task.budget.map(|b| b.to_string()).unwrap_or_default(),
            task.participants.join(" | "),
            task.description.clone(),
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(tasks.len())
}
