//! Current assignments extraction from the student home page.

use std::sync::LazyLock;

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use super::{first_anchor, link_of, text_of};
use crate::error_handling::StructureError;
use crate::models::{AssignmentRecord, AssignmentStatus, Link};
use crate::utils::parse_selector_unsafe;

/// Heading text that precedes the assignments table.
pub const ASSIGNMENTS_HEADING: &str = "Current Assignments";

/// Due dates are printed as `month/day/2-digit-year`.
pub const DUE_DATE_FORMAT: &str = "%m/%d/%y";

/// Class labels read "<class name> Period <n>".
const PERIOD_MARKER: &str = "Period";

/// Original indices of the spacer cells in an assignment row.
const FILLER_CELLS: [usize; 2] = [2, 5];

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(".title", "TITLE_SELECTOR"));
static TBODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("tbody", "TBODY_SELECTOR"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("tr", "ROW_SELECTOR"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("td", "CELL_SELECTOR"));
static DIV_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("div", "DIV_SELECTOR"));
static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("img", "IMG_SELECTOR"));

/// Extracts the current assignments.
///
/// # Errors
///
/// Fails if the "Current Assignments" table is absent, or if any row lacks a
/// cell, the title link, or a parseable due date.
pub fn extract_assignments(document: &Html) -> Result<Vec<AssignmentRecord>, StructureError> {
    let body = assignments_table(document)
        .ok_or(StructureError::MissingElement("Current Assignments table"))?;

    let assignments = body
        .select(&ROW_SELECTOR)
        .enumerate()
        .map(|(index, row)| assignment_from_row(index, row))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("Extracted {} assignments", assignments.len());
    Ok(assignments)
}

/// Whether `element` is the heading above the assignments table.
pub fn is_assignments_heading(element: ElementRef<'_>) -> bool {
    text_of(element).contains(ASSIGNMENTS_HEADING)
}

/// Body of the table that directly follows the assignments heading.
pub fn assignments_table(document: &Html) -> Option<ElementRef<'_>> {
    let heading = document
        .select(&TITLE_SELECTOR)
        .find(|element| is_assignments_heading(*element))?;
    let table = heading.next_siblings().find_map(ElementRef::wrap)?;
    table.select(&TBODY_SELECTOR).next()
}

/// Drops the spacer cells, leaving status, title, class and due date in order.
pub fn content_cells<'a>(
    index: usize,
    mut cells: Vec<ElementRef<'a>>,
) -> Result<Vec<ElementRef<'a>>, StructureError> {
    // Removing index 2 shifts the second spacer from 5 to 4.
    for (removed, &filler) in FILLER_CELLS.iter().enumerate() {
        let position = filler - removed;
        if position >= cells.len() {
            return Err(StructureError::MissingCell {
                row: index,
                index: filler,
            });
        }
        cells.remove(position);
    }
    Ok(cells)
}

/// Maps an icon `src` to a status.
pub fn status_from_icon(src: &str) -> AssignmentStatus {
    if src.contains("new.gif") {
        AssignmentStatus::New
    } else if src.contains("due.gif") {
        AssignmentStatus::Due
    } else {
        AssignmentStatus::None
    }
}

/// Status shown by the icon in a cell; no icon means no status.
pub fn status_from_cell(cell: ElementRef<'_>) -> AssignmentStatus {
    cell.select(&IMG_SELECTOR)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(status_from_icon)
        .unwrap_or_default()
}

/// Cuts a class label at the last "Period", dropping the period number.
///
/// Labels without the marker are returned whole.
pub fn class_name_from_label(label: &str) -> String {
    match label.rfind(PERIOD_MARKER) {
        Some(idx) => label[..idx].trim_end().to_string(),
        None => label.trim().to_string(),
    }
}

/// Parses a `mm/dd/yy` due date.
pub fn parse_due_date(text: &str) -> Result<NaiveDate, StructureError> {
    NaiveDate::parse_from_str(text.trim(), DUE_DATE_FORMAT).map_err(|_| {
        StructureError::InvalidValue {
            field: "due date",
            value: text.trim().to_string(),
        }
    })
}

/// Reads one assignment row.
pub fn assignment_from_row(
    index: usize,
    row: ElementRef<'_>,
) -> Result<AssignmentRecord, StructureError> {
    let cells = content_cells(index, row.select(&CELL_SELECTOR).collect())?;
    let cell = |i: usize| {
        cells
            .get(i)
            .copied()
            .ok_or(StructureError::MissingCell { row: index, index: i })
    };

    let status = status_from_cell(cell(0)?);
    let title = title_link(cell(1)?)?;
    let class_name = class_name_from_label(&text_of(first_div(cell(2)?)?));
    let due = parse_due_date(&text_of(first_div(cell(3)?)?))?;

    Ok(AssignmentRecord {
        status,
        title,
        class_name,
        due,
    })
}

fn first_div(cell: ElementRef<'_>) -> Result<ElementRef<'_>, StructureError> {
    cell.select(&DIV_SELECTOR)
        .next()
        .ok_or(StructureError::MissingElement("div"))
}

fn title_link(cell: ElementRef<'_>) -> Result<Link, StructureError> {
    let anchor = first_anchor(first_div(cell)?).ok_or(StructureError::MissingElement("a"))?;
    link_of(anchor)
}
