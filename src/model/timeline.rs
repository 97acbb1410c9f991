use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Display granularity of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineZoom {
    #[default]
    Day,
    Week,
    Month,
}

impl TimelineZoom {
    pub fn all() -> &'static [TimelineZoom] {
        &[TimelineZoom::Day, TimelineZoom::Week, TimelineZoom::Month]
    }

    pub fn label(self) -> &'static str {
        match self {
            TimelineZoom::Day => "Day",
            TimelineZoom::Week => "Week",
            TimelineZoom::Month => "Month",
        }
    }

    /// Caption for the today marker.
    pub fn current_period_label(self) -> &'static str {
        match self {
            TimelineZoom::Day => "Current day",
            TimelineZoom::Week => "Current week",
            TimelineZoom::Month => "Current month",
        }
    }
}

/// The visible window of the timeline. Derived from zoom and today, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One labelled column of the timeline header.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderColumn {
    pub label: String,
    pub left_px: f32,
    pub width_px: f32,
}

/// Horizontal placement of an order bar, in percent of the timeline width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPosition {
    pub left_pct: f32,
    pub width_pct: f32,
}

impl TimelineRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The range shown for `zoom`: ±14 days, ±2 months or ±6 months around `today`.
    pub fn for_zoom(zoom: TimelineZoom, today: NaiveDate) -> Self {
        match zoom {
            TimelineZoom::Day => Self::new(
                today - Duration::days(14),
                today + Duration::days(14),
            ),
            TimelineZoom::Week => Self::months_around(today, 2),
            TimelineZoom::Month => Self::months_around(today, 6),
        }
    }

    fn months_around(today: NaiveDate, months: u32) -> Self {
        let span = Months::new(months);
        Self::new(
            today.checked_sub_months(span).unwrap_or(NaiveDate::MIN),
            today.checked_add_months(span).unwrap_or(NaiveDate::MAX),
        )
    }

    pub fn duration_ms(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Position of `date` as a fraction of the range (unclamped).
    fn fraction_of(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_milliseconds() as f64 / self.duration_ms()
    }

    /// Inverse of the bar mapping: the date under `fraction` of the width.
    pub fn date_at_fraction(&self, fraction: f32) -> NaiveDate {
        let fraction = f64::from(fraction.clamp(0.0, 1.0));
        let days = (self.duration_ms() * fraction / MS_PER_DAY).floor() as i64;
        self.start + Duration::days(days)
    }
}

/// Partition `range` into equal-width header columns for `zoom`.
pub fn header_columns(range: &TimelineRange, zoom: TimelineZoom, pixel_width: f32) -> Vec<HeaderColumn> {
    let starts: Vec<(NaiveDate, String)> = match zoom {
        TimelineZoom::Day => {
            let total = (range.end - range.start).num_days().max(0);
            (0..total)
                .map(|i| range.start + Duration::days(i))
                .map(|d| (d, d.format("%b %-d").to_string()))
                .collect()
        }
        TimelineZoom::Week => {
            let snapped = range.start
                - Duration::days(i64::from(range.start.weekday().num_days_from_sunday()));
            let days = (range.end - snapped).num_days();
            let total = ((days + 6) / 7).max(1);
            (0..total)
                .map(|i| snapped + Duration::weeks(i))
                .map(|d| {
                    let nth = (d.day() + 6) / 7;
                    (d, format!("W{} {}", nth, d.format("%b")))
                })
                .collect()
        }
        TimelineZoom::Month => {
            let total = (range.end.year() - range.start.year()) * 12
                + (range.end.month() as i32 - range.start.month() as i32)
                + 1;
            let first = range.start.with_day(1).unwrap_or(range.start);
            (0..total.max(0) as u32)
                .filter_map(|i| first.checked_add_months(Months::new(i)))
                .map(|d| (d, d.format("%b %y").to_string()))
                .collect()
        }
    };

    if starts.is_empty() {
        return Vec::new();
    }
    let width = pixel_width / starts.len() as f32;
    starts
        .into_iter()
        .enumerate()
        .map(|(i, (_, label))| HeaderColumn {
            label,
            left_px: i as f32 * width,
            width_px: width,
        })
        .collect()
}

/// Pixel offset of the today marker, or `None` when today is not visible.
pub fn today_marker_px(range: &TimelineRange, today: NaiveDate, pixel_width: f32) -> Option<f32> {
    if range.duration_ms() <= 0.0 || !range.contains(today) {
        return None;
    }
    Some((range.fraction_of(today) * f64::from(pixel_width)) as f32)
}

/// Map `[start, end)` onto `[0, 100]` relative to `range`, clipping at both edges.
pub fn bar_position(start: NaiveDate, end: NaiveDate, range: &TimelineRange) -> BarPosition {
    if range.duration_ms() <= 0.0 {
        return BarPosition {
            left_pct: 0.0,
            width_pct: 0.0,
        };
    }
    let left = (range.fraction_of(start) * 100.0).clamp(0.0, 100.0);
    let right = (range.fraction_of(end) * 100.0).clamp(0.0, 100.0);
    BarPosition {
        left_pct: left as f32,
        width_pct: (right - left).max(0.0) as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_brackets_today_for_every_zoom() {
        for today in [date(2025, 3, 31), date(2024, 2, 29), date(2025, 12, 31), date(2025, 1, 1)] {
            for zoom in TimelineZoom::all() {
                let range = TimelineRange::for_zoom(*zoom, today);
                assert!(range.start <= today && today <= range.end, "{zoom:?} {today}");
            }
        }
    }

    #[test]
    fn range_buffers_per_zoom() {
        let today = date(2025, 4, 15);
        let day = TimelineRange::for_zoom(TimelineZoom::Day, today);
        assert_eq!(day.start, date(2025, 4, 1));
        assert_eq!(day.end, date(2025, 4, 29));

        let week = TimelineRange::for_zoom(TimelineZoom::Week, today);
        assert_eq!(week.start, date(2025, 2, 15));
        assert_eq!(week.end, date(2025, 6, 15));

        let month = TimelineRange::for_zoom(TimelineZoom::Month, today);
        assert_eq!(month.start, date(2024, 10, 15));
        assert_eq!(month.end, date(2025, 10, 15));
    }

    #[test]
    fn day_columns_one_per_day() {
        let range = TimelineRange::for_zoom(TimelineZoom::Day, date(2025, 4, 15));
        let cols = header_columns(&range, TimelineZoom::Day, 2800.0);
        assert_eq!(cols.len(), 28);
        assert_eq!(cols[0].label, "Apr 1");
        assert_eq!(cols[27].label, "Apr 28");
        assert!((cols[1].left_px - 100.0).abs() < 1e-3);
        assert!(cols.iter().all(|c| (c.width_px - 100.0).abs() < 1e-3));
    }

    #[test]
    fn week_columns_start_on_sunday() {
        // 2025-02-15 is a Saturday; snaps back to Sunday 2025-02-09.
        let range = TimelineRange::new(date(2025, 2, 15), date(2025, 6, 15));
        let cols = header_columns(&range, TimelineZoom::Week, 1800.0);
        // 126 days from Feb 9 to Jun 15 -> 18 weeks.
        assert_eq!(cols.len(), 18);
        assert_eq!(cols[0].label, "W2 Feb");
        assert_eq!(cols[1].label, "W3 Feb");
        assert_eq!(cols[3].label, "W1 Mar");
        assert!((cols[0].width_px - 100.0).abs() < 1e-3);
    }

    #[test]
    fn week_columns_never_empty() {
        let sunday = date(2025, 6, 1);
        let range = TimelineRange::new(sunday, sunday);
        assert_eq!(header_columns(&range, TimelineZoom::Week, 500.0).len(), 1);
    }

    #[test]
    fn month_columns_follow_calendar_count() {
        let range = TimelineRange::new(date(2025, 1, 20), date(2025, 7, 3));
        let cols = header_columns(&range, TimelineZoom::Month, 700.0);
        assert_eq!(cols.len(), 7);
        assert_eq!(cols[0].label, "Jan 25");
        assert_eq!(cols[6].label, "Jul 25");

        let range = TimelineRange::for_zoom(TimelineZoom::Month, date(2025, 4, 15));
        let cols = header_columns(&range, TimelineZoom::Month, 1300.0);
        assert_eq!(cols.len(), 13);
        assert_eq!(cols[0].label, "Oct 24");
        assert_eq!(cols[12].label, "Oct 25");
        assert!((cols[12].left_px - 1200.0).abs() < 1e-3);
    }

    #[test]
    fn today_marker_interpolates() {
        let today = date(2025, 4, 15);
        let range = TimelineRange::for_zoom(TimelineZoom::Day, today);
        let px = today_marker_px(&range, today, 2800.0).unwrap();
        assert!((px - 1400.0).abs() < 1e-3);
    }

    #[test]
    fn today_marker_hidden_outside_range() {
        let range = TimelineRange::new(date(2025, 1, 1), date(2025, 1, 31));
        assert_eq!(today_marker_px(&range, date(2025, 2, 1), 1000.0), None);
        assert_eq!(today_marker_px(&range, date(2024, 12, 31), 1000.0), None);
        assert_eq!(today_marker_px(&range, date(2025, 1, 31), 1000.0), Some(1000.0));
    }

    #[test]
    fn bar_inside_range() {
        let range = TimelineRange::new(date(2025, 1, 1), date(2025, 1, 11));
        let pos = bar_position(date(2025, 1, 3), date(2025, 1, 6), &range);
        assert!((pos.left_pct - 20.0).abs() < 1e-4);
        assert!((pos.width_pct - 30.0).abs() < 1e-4);
    }

    #[test]
    fn bar_position_is_idempotent() {
        let range = TimelineRange::new(date(2025, 1, 1), date(2025, 3, 1));
        let a = bar_position(date(2025, 1, 17), date(2025, 2, 2), &range);
        let b = bar_position(date(2025, 1, 17), date(2025, 2, 2), &range);
        assert_eq!(a, b);
    }

    #[test]
    fn bar_clips_to_range() {
        let range = TimelineRange::new(date(2025, 1, 1), date(2025, 1, 11));
        let cases = [
            (date(2024, 12, 1), date(2025, 1, 6)),   // starts before
            (date(2025, 1, 6), date(2025, 3, 1)),    // ends after
            (date(2024, 12, 1), date(2025, 3, 1)),   // spans
            (date(2024, 11, 1), date(2024, 12, 1)),  // entirely before
            (date(2025, 2, 1), date(2025, 3, 1)),    // entirely after
            (date(2025, 1, 8), date(2025, 1, 4)),    // end before start
        ];
        for (start, end) in cases {
            let pos = bar_position(start, end, &range);
            assert!(pos.left_pct >= 0.0 && pos.width_pct >= 0.0, "{start}..{end}");
            assert!(pos.left_pct + pos.width_pct <= 100.0 + 1e-4, "{start}..{end}");
        }

        let left_clipped = bar_position(date(2024, 12, 1), date(2025, 1, 6), &range);
        assert_eq!(left_clipped.left_pct, 0.0);
        assert!((left_clipped.width_pct - 50.0).abs() < 1e-4);

        let before = bar_position(date(2024, 11, 1), date(2024, 12, 1), &range);
        assert_eq!(before.width_pct, 0.0);
    }

    #[test]
    fn zero_duration_range_is_total() {
        let d = date(2025, 1, 1);
        let range = TimelineRange::new(d, d);
        assert_eq!(today_marker_px(&range, d, 100.0), None);
        let pos = bar_position(d, d + Duration::days(3), &range);
        assert_eq!(pos, BarPosition { left_pct: 0.0, width_pct: 0.0 });
    }

    #[test]
    fn date_at_fraction_inverts_mapping() {
        let range = TimelineRange::new(date(2025, 1, 1), date(2025, 1, 11));
        assert_eq!(range.date_at_fraction(0.0), date(2025, 1, 1));
        assert_eq!(range.date_at_fraction(0.5), date(2025, 1, 6));
        assert_eq!(range.date_at_fraction(2.0), date(2025, 1, 11));
    }
}
