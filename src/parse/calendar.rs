//! Calendar month grid extraction.
//!
//! Each day cell carries a day-number label and zero or more event markers.
//! Days from the neighbouring months are drawn in a muted color and skipped.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::timezone::portal_local_date;
use super::{first_anchor, text_of};
use crate::error_handling::StructureError;
use crate::models::CalendarEvent;
use crate::utils::{capture_i64, parse_regex_unsafe, parse_selector_unsafe};

const CALENDAR_TABLE_SELECTOR_STR: &str = "table.cal_table";

/// Style fragment of the label of a day outside the displayed month.
pub const MUTED_DAY_MARKER: &str = "#888888";

/// Index of the day cell used to read the displayed month.
///
/// The 16th cell of a month grid always belongs to the displayed month.
const BASELINE_CELL_INDEX: usize = 15;

static CALENDAR_TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(CALENDAR_TABLE_SELECTOR_STR, "CALENDAR_TABLE_SELECTOR")
});
static DAY_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("td.cal_td", "DAY_CELL_SELECTOR"));
static DAY_LABEL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("span", "DAY_LABEL_SELECTOR"));
static EVENT_MARKER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(
        r#"div[style="font-size: 10px; font-weight: bold;"]"#,
        "EVENT_MARKER_SELECTOR",
    )
});
static COURSE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("b", "COURSE_SELECTOR"));

static DAY_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| parse_regex_unsafe(r"day_id=(\d+)", "DAY_ID_RE"));

/// Extracts the events of the displayed month.
///
/// `utc_offset` is the portal's standard-time offset, used to turn the grid's
/// `day_id` identifiers into local dates.
///
/// # Errors
///
/// Fails if the grid, the baseline day link, a day number, or an event link's
/// `id` is missing or malformed.
pub fn extract_events(
    document: &Html,
    utc_offset: i32,
) -> Result<Vec<CalendarEvent>, StructureError> {
    let table = document
        .select(&CALENDAR_TABLE_SELECTOR)
        .next()
        .ok_or(StructureError::MissingElement(CALENDAR_TABLE_SELECTOR_STR))?;
    let cells: Vec<ElementRef<'_>> = table.select(&DAY_CELL_SELECTOR).collect();
    let baseline = displayed_month(&cells, utc_offset)?;

    let mut events = Vec::new();
    for cell in cells {
        let Some(day) = day_number(cell)? else {
            continue;
        };
        let date = baseline
            .with_day(day)
            .ok_or_else(|| StructureError::InvalidValue {
                field: "calendar day",
                value: day.to_string(),
            })?;

        for marker in cell.select(&EVENT_MARKER_SELECTOR) {
            if let Some(event) = event_from_marker(marker, date)? {
                events.push(event);
            }
        }
    }
    log::debug!(
        "Extracted {} events for {}-{:02}",
        events.len(),
        baseline.year(),
        baseline.month()
    );
    Ok(events)
}

/// First day of the displayed month, read from the baseline cell's `day_id` link.
pub fn displayed_month(
    cells: &[ElementRef<'_>],
    utc_offset: i32,
) -> Result<NaiveDate, StructureError> {
    let cell = cells
        .get(BASELINE_CELL_INDEX)
        .copied()
        .ok_or(StructureError::MissingCell {
            row: 0,
            index: BASELINE_CELL_INDEX,
        })?;
    let href = first_anchor(cell)
        .and_then(|a| a.value().attr("href"))
        .ok_or(StructureError::MissingElement("calendar day link"))?;
    let day_id = capture_i64(&DAY_ID_RE, href).ok_or_else(|| StructureError::InvalidValue {
        field: "day_id link",
        value: href.to_string(),
    })?;

    portal_local_date(day_id, utc_offset)
        .and_then(|date| date.with_day(1))
        .ok_or_else(|| StructureError::InvalidValue {
            field: "day_id",
            value: day_id.to_string(),
        })
}

/// Whether a day label is drawn muted (a day of the neighbouring month).
pub fn is_muted_label(label: ElementRef<'_>) -> bool {
    label
        .value()
        .attr("style")
        .is_some_and(|style| style.contains(MUTED_DAY_MARKER))
}

/// Day of the month shown in a cell.
///
/// Returns `Ok(None)` for cells with no label or a muted label.
pub fn day_number(cell: ElementRef<'_>) -> Result<Option<u32>, StructureError> {
    let Some(label) = cell.select(&DAY_LABEL_SELECTOR).next() else {
        return Ok(None);
    };
    if is_muted_label(label) {
        return Ok(None);
    }
    let text = text_of(label);
    text.parse()
        .map(Some)
        .map_err(|_| StructureError::InvalidValue {
            field: "calendar day",
            value: text,
        })
}

/// Reads one event marker; markers without an event link are skipped.
pub fn event_from_marker(
    marker: ElementRef<'_>,
    date: NaiveDate,
) -> Result<Option<CalendarEvent>, StructureError> {
    let Some(anchor) = first_anchor(marker) else {
        return Ok(None);
    };
    let event_id = anchor
        .value()
        .id()
        .ok_or(StructureError::MissingAttribute {
            element: "a",
            attribute: "id",
        })?
        .to_string();
    let course = marker
        .select(&COURSE_SELECTOR)
        .next()
        .map(text_of)
        .filter(|course| !course.is_empty());

    Ok(Some(CalendarEvent {
        date,
        event_id,
        course,
        description: text_of(anchor),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2012-10-01T07:00:00Z, local midnight in US Pacific daylight time
    const OCT_1_2012: i64 = 1_349_074_800_000;
    const DAY_MS: i64 = 86_400_000;
    const MARKER: &str = r#"style="font-size: 10px; font-weight: bold;""#;

    /// A five-week grid for October 2012 (starts Sunday Sep 30).
    fn october_grid(events: &[(u32, &str)]) -> Html {
        let mut cells = String::new();
        // Sunday Sep 30 is from the previous month
        cells.push_str(&format!(
            r#"<td class="cal_td"><span style="color: #888888;">30</span><a href="/calendar/day?day_id={}">+</a></td>"#,
            OCT_1_2012 - DAY_MS
        ));
        for day in 1..=31u32 {
            let day_id = OCT_1_2012 + i64::from(day - 1) * DAY_MS;
            let body: String = events
                .iter()
                .filter(|(d, _)| *d == day)
                .map(|(_, html)| html.to_string())
                .collect();
            cells.push_str(&format!(
                r#"<td class="cal_td"><a href="/calendar/day?day_id={day_id}">+</a><span style="color: #000000;">{day}</span>{body}</td>"#
            ));
        }
        for day in 1..=3 {
            cells.push_str(&format!(
                r#"<td class="cal_td"><span style="color: #888888;">{day}</span></td>"#
            ));
        }
        Html::parse_document(&format!(
            r#"<html><body><table class="cal_table"><tr>{cells}</tr></table></body></html>"#
        ))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extracts_course_event() {
        let marker = format!(
            r#"<div {MARKER}><b>Biology</b> <a id="event_4411" href="/calendar/event?id=4411">Lab 3 due</a></div>"#
        );
        let document = october_grid(&[(15, &marker)]);
        let events = extract_events(&document, -8).unwrap();
        assert_eq!(
            events,
            vec![CalendarEvent {
                date: date(2012, 10, 15),
                event_id: "event_4411".to_string(),
                course: Some("Biology".to_string()),
                description: "Lab 3 due".to_string(),
            }]
        );
    }

    #[test]
    fn test_event_without_course() {
        let marker = format!(r#"<div {MARKER}><a id="e1" href="/e?id=1">No School</a></div>"#);
        let document = october_grid(&[(8, &marker)]);
        let events = extract_events(&document, -8).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].course, None);
        assert_eq!(events[0].date, date(2012, 10, 8));
    }

    #[test]
    fn test_marker_without_link_is_skipped() {
        let empty = format!(r#"<div {MARKER}>Holiday</div>"#);
        let real = format!(r#"<div {MARKER}><a id="e2" href="/e?id=2">Quiz</a></div>"#);
        let document = october_grid(&[(3, &empty), (3, &real)]);
        let events = extract_events(&document, -8).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_id, "e2");
    }

    #[test]
    fn test_other_styles_are_not_events() {
        let other = r#"<div style="font-size: 10px;"><a id="e3" href="/e?id=3">Note</a></div>"#;
        let document = october_grid(&[(4, other)]);
        assert!(extract_events(&document, -8).unwrap().is_empty());
    }

    #[test]
    fn test_muted_days_are_skipped() {
        let document = Html::parse_fragment(
            r#"<table><tr><td class="cal_td"><span style="color: #888888;">30</span></td></tr></table>"#,
        );
        let cell = document.select(&DAY_CELL_SELECTOR).next().unwrap();
        assert_eq!(day_number(cell), Ok(None));
    }

    #[test]
    fn test_cell_without_label_is_skipped() {
        let document = Html::parse_fragment(
            r#"<table><tr><td class="cal_td"><a href="/x">+</a></td></tr></table>"#,
        );
        let cell = document.select(&DAY_CELL_SELECTOR).next().unwrap();
        assert_eq!(day_number(cell), Ok(None));
    }

    #[test]
    fn test_event_link_without_id_is_fatal() {
        let marker = format!(r#"<div {MARKER}><a href="/e?id=4">Quiz</a></div>"#);
        let document = october_grid(&[(5, &marker)]);
        assert_eq!(
            extract_events(&document, -8),
            Err(StructureError::MissingAttribute {
                element: "a",
                attribute: "id"
            })
        );
    }

    #[test]
    fn test_displayed_month_from_baseline_cell() {
        let document = october_grid(&[]);
        let cells: Vec<_> = document.select(&DAY_CELL_SELECTOR).collect();
        assert_eq!(displayed_month(&cells, -8), Ok(date(2012, 10, 1)));
    }

    #[test]
    fn test_missing_grid_is_fatal() {
        let document = Html::parse_document("<html><body></body></html>");
        assert_eq!(
            extract_events(&document, -8),
            Err(StructureError::MissingElement("table.cal_table"))
        );
    }

    #[test]
    fn test_short_grid_is_fatal() {
        let document = Html::parse_document(
            r#"<table class="cal_table"><tr><td class="cal_td"><span>1</span></td></tr></table>"#,
        );
        assert_eq!(
            extract_events(&document, -8),
            Err(StructureError::MissingCell { row: 0, index: 15 })
        );
    }
}
