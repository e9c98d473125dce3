use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use super::task::Task;

/// Breathing room added around the dated range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelinePadding {
    /// Days shown before the earliest date.
    pub lead_in_days: i64,
    /// Days shown after the latest date.
    pub lead_out_days: i64,
}

impl TimelinePadding {
    /// Upper bound for either side; about ten years of day cells.
    pub const MAX_DAYS: i64 = 3650;

    /// Both sides limited to `0..=MAX_DAYS`.
    pub fn clamped(self) -> Self {
        Self {
            lead_in_days: self.lead_in_days.clamp(0, Self::MAX_DAYS),
            lead_out_days: self.lead_out_days.clamp(0, Self::MAX_DAYS),
        }
    }
}

impl Default for TimelinePadding {
    fn default() -> Self {
        Self {
            lead_in_days: 2,
            lead_out_days: 10,
        }
    }
}

/// One column of the day grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_today: bool,
}

impl DayCell {
    /// Short weekday name, e.g. "Mon".
    pub fn weekday_label(&self) -> String {
        self.date.format("%a").to_string()
    }

    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// A run of consecutive days in the same calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSegment {
    pub year: i32,
    pub month: u32,
    pub label: String,
    /// Index of the segment's first day within the window.
    pub first_day: usize,
    pub day_count: usize,
}

impl MonthSegment {
    fn starting_at(date: NaiveDate, first_day: usize) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            label: date.format("%B %Y").to_string(),
            first_day,
            day_count: 1,
        }
    }

    fn contains_month_of(&self, date: NaiveDate) -> bool {
        self.year == date.year() && self.month == date.month()
    }
}

/// Bar placement of a task, in whole days from the window start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpan {
    pub offset: i64,
    pub duration: i64,
}

impl TaskSpan {
    /// Inclusive day count, never less than one even for inverted ranges.
    pub fn duration_between(start: NaiveDate, end: NaiveDate) -> i64 {
        ((end - start).num_days() + 1).max(1)
    }
}

/// Render-ready day grid for the Gantt view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    start: NaiveDate,
    end: NaiveDate,
    days: Vec<DayCell>,
    months: Vec<MonthSegment>,
}

/// Build the display window with the default padding.
///
/// Returns `None` when nothing is schedulable and no project start is given.
pub fn build_timeline(
    tasks: &[Task],
    project_start: Option<NaiveDate>,
    project_end: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<Timeline> {
    build_timeline_with(
        tasks,
        project_start,
        project_end,
        today,
        TimelinePadding::default(),
    )
}

pub fn build_timeline_with(
    tasks: &[Task],
    project_start: Option<NaiveDate>,
    project_end: Option<NaiveDate>,
    today: NaiveDate,
    padding: TimelinePadding,
) -> Option<Timeline> {
    let mut scheduled = tasks.iter().filter_map(Task::date_range).peekable();
    if scheduled.peek().is_none() && project_start.is_none() {
        return None;
    }

    let dates = scheduled
        .flat_map(|(start, end)| [start, end])
        .chain(project_start)
        .chain(project_end);
    let (min, max) = dates.fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| match acc {
        None => Some((d, d)),
        Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
    })?;

    let padding = padding.clamped();
    let (Some(start), Some(end)) = (
        min.checked_sub_signed(Duration::days(padding.lead_in_days)),
        max.checked_add_signed(Duration::days(padding.lead_out_days)),
    ) else {
        tracing::warn!(%min, %max, "timeline window out of calendar range");
        return None;
    };
    let timeline = Timeline::spanning(start, end, today);
    tracing::debug!(
        %start,
        %end,
        days = timeline.days.len(),
        months = timeline.months.len(),
        "timeline rebuilt"
    );
    Some(timeline)
}

impl Timeline {
    /// Day grid from `start` to `end` inclusive.
    pub fn spanning(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        let days: Vec<DayCell> = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| DayCell {
                date,
                is_today: date == today,
            })
            .collect();
        let months = group_months(&days);
        Self {
            start,
            end,
            days,
            months,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> &[DayCell] {
        &self.days
    }

    pub fn months(&self) -> &[MonthSegment] {
        &self.months
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Whole days from the window start, clamped to zero.
    pub fn day_offset(&self, date: NaiveDate) -> i64 {
        (date - self.start).num_days().max(0)
    }

    /// Offset of the calendar day containing `at`; the time of day is ignored.
    pub fn datetime_offset(&self, at: NaiveDateTime) -> i64 {
        self.day_offset(at.date())
    }

    /// Index of the cell flagged as today, if it falls inside the window.
    pub fn today_index(&self) -> Option<usize> {
        self.days.iter().position(|d| d.is_today)
    }

    /// Placement of a schedulable task's bar.
    pub fn span_of(&self, task: &Task) -> Option<TaskSpan> {
        task.date_range().map(|(start, end)| TaskSpan {
            offset: self.day_offset(start),
            duration: TaskSpan::duration_between(start, end),
        })
    }
}

fn group_months(days: &[DayCell]) -> Vec<MonthSegment> {
    days.iter()
        .enumerate()
        .fold(Vec::new(), |mut segments: Vec<MonthSegment>, (i, cell)| {
            match segments.last_mut() {
                Some(current) if current.contains_month_of(cell.date) => current.day_count += 1,
                _ => segments.push(MonthSegment::starting_at(cell.date, i)),
            }
            segments
        })
}

/// Horizontal zoom of the Gantt view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineZoom {
    pub pixels_per_day: f32,
}

impl TimelineZoom {
    pub const MIN_PIXELS_PER_DAY: f32 = 4.0;
    pub const MAX_PIXELS_PER_DAY: f32 = 80.0;

    pub fn new(pixels_per_day: f32) -> Self {
        Self {
            pixels_per_day: pixels_per_day
                .clamp(Self::MIN_PIXELS_PER_DAY, Self::MAX_PIXELS_PER_DAY),
        }
    }

    /// Convert a day offset to an x-pixel offset from the window start.
    pub fn offset_to_x(&self, offset: i64) -> f32 {
        offset as f32 * self.pixels_per_day
    }

    pub fn zoom_in(&mut self) {
        self.pixels_per_day = (self.pixels_per_day * 1.2).min(Self::MAX_PIXELS_PER_DAY);
    }

    pub fn zoom_out(&mut self) {
        self.pixels_per_day = (self.pixels_per_day / 1.2).max(Self::MIN_PIXELS_PER_DAY);
    }
}

impl Default for TimelineZoom {
    fn default() -> Self {
        Self::new(24.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskStatus;
    use rstest::{fixture, rstest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dated(id: &str, start: NaiveDate, end: NaiveDate) -> Task {
        Task::new(id).with_id(id).with_dates(start, end)
    }

    #[fixture]
    fn today() -> NaiveDate {
        date(2024, 1, 15)
    }

    #[fixture]
    fn january_tasks() -> Vec<Task> {
        vec![
            dated("a", date(2024, 1, 10), date(2024, 1, 12)),
            dated("b", date(2024, 1, 20), date(2024, 1, 20)),
        ]
    }

    #[rstest]
    fn pads_window_around_task_dates(january_tasks: Vec<Task>, today: NaiveDate) {
        let timeline = build_timeline(&january_tasks, None, None, today).unwrap();
        assert_eq!(timeline.start(), date(2024, 1, 8));
        assert_eq!(timeline.end(), date(2024, 1, 30));
        assert_eq!((timeline.end() - timeline.start()).num_days(), 22);
        assert_eq!(timeline.day_count(), 23);
    }

    #[rstest]
    fn places_bars_by_offset_and_duration(january_tasks: Vec<Task>, today: NaiveDate) {
        let timeline = build_timeline(&january_tasks, None, None, today).unwrap();
        assert_eq!(
            timeline.span_of(&january_tasks[0]),
            Some(TaskSpan {
                offset: 2,
                duration: 3
            })
        );
        assert_eq!(
            timeline.span_of(&january_tasks[1]),
            Some(TaskSpan {
                offset: 12,
                duration: 1
            })
        );
    }

    #[rstest]
    fn inverted_range_renders_one_day(today: NaiveDate) {
        let task = dated("x", date(2024, 3, 5), date(2024, 3, 1));
        let timeline = build_timeline(std::slice::from_ref(&task), None, None, today).unwrap();
        let span = timeline.span_of(&task).unwrap();
        assert_eq!(span.duration, 1);
        assert_eq!(timeline.start(), date(2024, 2, 28));
    }

    #[rstest]
    fn nothing_to_render_without_dates_or_project_start(today: NaiveDate) {
        let tasks = vec![
            Task::new("undated"),
            Task {
                start_date: Some(date(2024, 1, 1)),
                ..Task::new("half dated")
            },
        ];
        assert_eq!(build_timeline(&tasks, None, None, today), None);
        assert_eq!(build_timeline(&tasks, None, Some(date(2024, 2, 1)), today), None);
    }

    #[rstest]
    fn project_start_alone_yields_a_window(today: NaiveDate) {
        let timeline = build_timeline(&[], Some(date(2024, 5, 1)), None, today).unwrap();
        assert_eq!(timeline.start(), date(2024, 4, 29));
        assert_eq!(timeline.end(), date(2024, 5, 11));
    }

    #[rstest]
    fn project_bounds_widen_the_window(january_tasks: Vec<Task>, today: NaiveDate) {
        let timeline = build_timeline(
            &january_tasks,
            Some(date(2024, 1, 1)),
            Some(date(2024, 2, 15)),
            today,
        )
        .unwrap();
        assert_eq!(timeline.start(), date(2023, 12, 30));
        assert_eq!(timeline.end(), date(2024, 2, 25));
    }

    #[rstest]
    fn unscheduled_tasks_are_ignored(january_tasks: Vec<Task>, today: NaiveDate) {
        let mut tasks = january_tasks.clone();
        tasks.push(Task::new("later").with_status(TaskStatus::Execution));
        assert_eq!(
            build_timeline(&tasks, None, None, today),
            build_timeline(&january_tasks, None, None, today)
        );
    }

    #[rstest]
    fn months_split_at_calendar_boundaries(today: NaiveDate) {
        let tasks = vec![dated("a", date(2024, 1, 25), date(2024, 2, 20))];
        let timeline = build_timeline(&tasks, None, None, today).unwrap();
        let months: Vec<(&str, usize, usize)> = timeline
            .months()
            .iter()
            .map(|m| (m.label.as_str(), m.first_day, m.day_count))
            .collect();
        assert_eq!(
            months,
            vec![("January 2024", 0, 9), ("February 2024", 9, 29), ("March 2024", 38, 1)]
        );
    }

    #[rstest]
    fn month_counts_cover_every_day(january_tasks: Vec<Task>, today: NaiveDate) {
        let timeline = build_timeline(&january_tasks, None, None, today).unwrap();
        let total: usize = timeline.months().iter().map(|m| m.day_count).sum();
        assert_eq!(total, timeline.day_count());
    }

    #[rstest]
    fn year_boundary_starts_new_segment(today: NaiveDate) {
        let tasks = vec![dated("nye", date(2023, 12, 31), date(2024, 1, 1))];
        let timeline = build_timeline(&tasks, None, None, today).unwrap();
        let labels: Vec<&str> = timeline.months().iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["December 2023", "January 2024"]);
    }

    #[rstest]
    #[case(date(2024, 1, 8), 0)]
    #[case(date(2024, 1, 1), 0)]
    #[case(date(2024, 1, 9), 1)]
    #[case(date(2024, 1, 30), 22)]
    fn day_offset_is_clamped(
        january_tasks: Vec<Task>,
        today: NaiveDate,
        #[case] at: NaiveDate,
        #[case] expected: i64,
    ) {
        let timeline = build_timeline(&january_tasks, None, None, today).unwrap();
        assert_eq!(timeline.day_offset(at), expected);
    }

    #[rstest]
    fn time_of_day_does_not_shift_offset(january_tasks: Vec<Task>, today: NaiveDate) {
        let timeline = build_timeline(&january_tasks, None, None, today).unwrap();
        let late = date(2024, 1, 10).and_hms_opt(23, 59, 59).unwrap();
        let early = date(2024, 1, 10).and_hms_opt(0, 0, 1).unwrap();
        assert_eq!(timeline.datetime_offset(late), 2);
        assert_eq!(timeline.datetime_offset(early), 2);
    }

    #[rstest]
    fn flags_today_and_weekends(january_tasks: Vec<Task>, today: NaiveDate) {
        let timeline = build_timeline(&january_tasks, None, None, today).unwrap();
        assert_eq!(timeline.today_index(), Some(7));
        let first = &timeline.days()[0];
        assert_eq!(first.weekday_label(), "Mon");
        assert!(!first.is_weekend());
        assert!(timeline.days()[5].is_weekend());
        assert_eq!(timeline.days()[5].day_of_month(), 13);
    }

    #[rstest]
    fn today_outside_window_is_not_flagged(january_tasks: Vec<Task>) {
        let timeline = build_timeline(&january_tasks, None, None, date(2030, 1, 1)).unwrap();
        assert_eq!(timeline.today_index(), None);
    }

    #[rstest]
    fn custom_padding_is_respected(january_tasks: Vec<Task>, today: NaiveDate) {
        let padding = TimelinePadding {
            lead_in_days: 0,
            lead_out_days: 1,
        };
        let timeline =
            build_timeline_with(&january_tasks, None, None, today, padding).unwrap();
        assert_eq!(timeline.start(), date(2024, 1, 10));
        assert_eq!(timeline.end(), date(2024, 1, 21));
    }

    #[rstest]
    fn oversized_padding_is_clamped(january_tasks: Vec<Task>, today: NaiveDate) {
        let padding = TimelinePadding {
            lead_in_days: -4,
            lead_out_days: 9_000_000_000_000,
        };
        let timeline =
            build_timeline_with(&january_tasks, None, None, today, padding).unwrap();
        assert_eq!(timeline.start(), date(2024, 1, 10));
        assert_eq!(
            timeline.end(),
            date(2024, 1, 20) + Duration::days(TimelinePadding::MAX_DAYS)
        );
    }

    #[rstest]
    fn window_past_the_calendar_end_is_none(today: NaiveDate) {
        let task = dated("edge", NaiveDate::MAX, NaiveDate::MAX);
        assert_eq!(build_timeline(&[task], None, None, today), None);
    }

    #[rstest]
    fn every_day_in_window_is_consecutive_and_offsets_rise(
        january_tasks: Vec<Task>,
        today: NaiveDate,
    ) {
        let timeline =
            build_timeline(&january_tasks, None, Some(date(2024, 3, 3)), today).unwrap();
        let days = timeline.days();
        assert_eq!(days.first().map(|d| d.date), Some(timeline.start()));
        assert_eq!(days.last().map(|d| d.date), Some(timeline.end()));
        for pair in days.windows(2) {
            assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }

        let sweep = (timeline.start() - Duration::days(5))
            .iter_days()
            .take_while(|d| *d <= timeline.end() + Duration::days(5));
        let mut previous = 0;
        for d in sweep {
            let offset = timeline.day_offset(d);
            assert!(offset >= previous, "offset fell at {d}");
            if let Some(i) = days.iter().position(|cell| cell.date == d) {
                assert_eq!(offset, i as i64);
            }
            previous = offset;
        }
    }

    #[test]
    fn zoom_stays_within_bounds() {
        let mut zoom = TimelineZoom::new(500.0);
        assert_eq!(zoom.pixels_per_day, TimelineZoom::MAX_PIXELS_PER_DAY);
        zoom.zoom_in();
        assert_eq!(zoom.pixels_per_day, TimelineZoom::MAX_PIXELS_PER_DAY);
        for _ in 0..50 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.pixels_per_day, TimelineZoom::MIN_PIXELS_PER_DAY);
        assert_eq!(zoom.offset_to_x(3), 12.0);
    }
}
