//! Dropbox file listing extraction.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{cell_link, text_of};
use crate::error_handling::StructureError;
use crate::models::DropboxRecord;
use crate::utils::parse_selector_unsafe;

const CONTAINER_SELECTOR_STR: &str = "div#container_content";

static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(CONTAINER_SELECTOR_STR, "CONTAINER_SELECTOR"));
static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("table", "TABLE_SELECTOR"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("tr", "ROW_SELECTOR"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("td", "CELL_SELECTOR"));

/// Extracts the submitted files.
///
/// The listing is the second table in the content container; its first row is
/// the header.
///
/// # Errors
///
/// Fails if the container or the listing table is missing, or if any data row
/// lacks one of its four cells or either link.
pub fn extract_dropbox(document: &Html) -> Result<Vec<DropboxRecord>, StructureError> {
    let table = listing_table(document)?;

    let files = table
        .select(&ROW_SELECTOR)
        .enumerate()
        .skip(1)
        .map(|(index, row)| dropbox_from_row(index, row))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("Extracted {} dropbox files", files.len());
    Ok(files)
}

/// The file listing table.
pub fn listing_table(document: &Html) -> Result<ElementRef<'_>, StructureError> {
    let container = document
        .select(&CONTAINER_SELECTOR)
        .next()
        .ok_or(StructureError::MissingElement(CONTAINER_SELECTOR_STR))?;
    container
        .select(&TABLE_SELECTOR)
        .nth(1)
        .ok_or(StructureError::MissingElement("second table of div#container_content"))
}

/// Reads the date, class, assignment link and file link cells of one row.
pub fn dropbox_from_row(
    index: usize,
    row: ElementRef<'_>,
) -> Result<DropboxRecord, StructureError> {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL_SELECTOR).collect();
    let cell = |i: usize| {
        cells
            .get(i)
            .copied()
            .ok_or(StructureError::MissingCell { row: index, index: i })
    };

    Ok(DropboxRecord {
        date: text_of(cell(0)?),
        class_name: text_of(cell(1)?),
        assignment: cell_link(cell(2)?)?,
        file: cell_link(cell(3)?)?,
    })
}
