use crate::error::AppError;
use crate::model::HabitSeries;
use crate::series::sample_series;
use time::{Date, Duration, OffsetDateTime};

pub const TIMELINE_HOURS: usize = 24;

/// What the widget host should do once the last entry has been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Request a fresh timeline after the final entry (hourly poll, no push).
    AfterLast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub as_of: OffsetDateTime,
    pub series: HabitSeries,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetTimeline {
    pub entries: Vec<TimelineEntry>,
    pub refresh: RefreshPolicy,
}

/// 24 hourly snapshots sharing one series. The series never changes inside
/// the window; only the "as of" stamp differs. With no cached series the
/// deterministic sample fills in.
pub fn build_timeline(
    now: OffsetDateTime,
    today: Date,
    cached: Option<HabitSeries>,
) -> Result<WidgetTimeline, AppError> {
    let series = match cached {
        Some(series) => series,
        None => sample_series(today)?,
    };

    let entries = (0..TIMELINE_HOURS)
        .map(|hour| TimelineEntry {
            as_of: now + Duration::hours(hour as i64),
            series: series.clone(),
        })
        .collect();

    Ok(WidgetTimeline {
        entries,
        refresh: RefreshPolicy::AfterLast,
    })
}
