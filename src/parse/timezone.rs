//! Portal timezone inference.
//!
//! Calendar identifiers (`month_id`, `day_id`) are millisecond epochs of
//! portal-local midnight, and the portal never states its timezone. The
//! previous/next month links on a calendar page average out to roughly the
//! displayed month's first local midnight, so the UTC hour of that average
//! gives the offset. US daylight-saving rules then recover the standard
//! offset. Only portals west of UTC are handled.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Weekday};
use regex::Regex;
use scraper::{Html, Selector};

use crate::error_handling::StructureError;
use crate::utils::{capture_i64, parse_regex_unsafe, parse_selector_unsafe};

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("a[href]", "LINK_SELECTOR"));
static MONTH_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| parse_regex_unsafe(r"month_id=(\d+)", "MONTH_ID_RE"));

/// Standard-time UTC offset of the portal, in hours, inferred from a calendar page.
///
/// # Errors
///
/// Fails if the page carries no non-zero `month_id` links.
pub fn infer_utc_offset(document: &Html) -> Result<i32, StructureError> {
    let ids = month_ids(document);
    log::debug!("Inferring portal timezone from {} month links", ids.len());
    offset_from_month_ids(&ids)
}

/// Every non-zero `month_id` referenced by an anchor on the page.
pub fn month_ids(document: &Html) -> Vec<i64> {
    document
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| capture_i64(&MONTH_ID_RE, href))
        .filter(|&id| id != 0)
        .collect()
}

/// Standard-time UTC offset from a set of month identifiers.
///
/// The identifiers are averaged (integer mean), read as a UTC instant, and the
/// negated hour-of-day is the offset. If that instant falls under daylight
/// saving, one more hour is subtracted.
pub fn offset_from_month_ids(ids: &[i64]) -> Result<i32, StructureError> {
    if ids.is_empty() {
        return Err(StructureError::MissingElement("calendar month_id links"));
    }
    // Widened so large identifiers cannot overflow the sum
    let mean = ids.iter().map(|&id| i128::from(id)).sum::<i128>() / ids.len() as i128;
    let sampled = i64::try_from(mean)
        .ok()
        .and_then(|mean| DateTime::from_timestamp(mean.div_euclid(1000), 0))
        .ok_or_else(|| StructureError::InvalidValue {
            field: "month_id",
            value: mean.to_string(),
        })?;

    let dst = is_daylight_saving(sampled.date_naive());
    let offset = -(sampled.hour() as i32) - i32::from(dst);
    log::debug!(
        "Sampled {} (DST: {}); portal UTC offset is {} hours",
        sampled,
        dst,
        offset
    );
    Ok(offset)
}

/// Whether US daylight saving is in effect on `date`.
///
/// DST starts after the second Sunday of March and runs through the first
/// Sunday of November.
pub fn is_daylight_saving(date: NaiveDate) -> bool {
    match date.month() {
        3 => nth_sunday(date.year(), 3, 2).is_some_and(|sunday| date.day() > sunday.day()),
        11 => nth_sunday(date.year(), 11, 1).is_some_and(|sunday| date.day() <= sunday.day()),
        4..=10 => true,
        _ => false,
    }
}

fn nth_sunday(year: i32, month: u32, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Sun, n)
}

/// `month_id` of the first of `month`, for a portal at standard offset `utc_offset`.
///
/// Months April through November are treated as daylight-saving months.
pub fn month_id(year: i32, month: u32, utc_offset: i32) -> Option<i64> {
    let mut hour = -utc_offset;
    if month > 3 && month <= 11 {
        hour -= 1;
    }
    let midnight = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
    let utc = midnight.checked_add_signed(Duration::hours(i64::from(hour)))?;
    Some(utc.and_utc().timestamp_millis())
}

/// Portal-local calendar date of a local-midnight identifier.
///
/// The instant is shifted to local noon before truncating so the result does
/// not depend on whether that day observed daylight saving.
pub fn portal_local_date(epoch_ms: i64, utc_offset: i32) -> Option<NaiveDate> {
    let local_noon = DateTime::from_timestamp_millis(epoch_ms)?
        .checked_add_signed(Duration::hours(12 + i64::from(utc_offset)))?;
    Some(local_noon.date_naive())
}
