//! HTML extraction.
//!
//! One extractor per portal page, each a function from a parsed document to
//! typed records. Extractors fail with a [`StructureError`] when an anchor they
//! rely on is missing; the per-row skip rules are documented on each extractor.
//!
//! The structural predicates each extractor uses are exposed as named
//! functions so they can be checked against fixed fixtures.

pub mod assignments;
pub mod calendar;
pub mod classes;
pub mod dropbox;
pub mod timezone;

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use crate::error_handling::StructureError;
use crate::models::Link;
use crate::utils::parse_selector_unsafe;

pub use assignments::extract_assignments;
pub use calendar::extract_events;
pub use classes::extract_classes;
pub use dropbox::extract_dropbox;
pub use timezone::infer_utc_offset;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("a", "ANCHOR_SELECTOR"));

/// Text content of an element with surrounding whitespace trimmed.
///
/// Uses `text()` so entities are decoded and nested tags are flattened.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Element children of `element`, skipping text and comment nodes.
pub(crate) fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// First anchor inside `element`.
pub(crate) fn first_anchor(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.select(&ANCHOR_SELECTOR).next()
}

/// Reads the `(href, text)` pair of an anchor.
pub(crate) fn link_of(anchor: ElementRef<'_>) -> Result<Link, StructureError> {
    let url = anchor
        .value()
        .attr("href")
        .ok_or(StructureError::MissingAttribute {
            element: "a",
            attribute: "href",
        })?;
    Ok(Link {
        url: url.to_string(),
        title: text_of(anchor),
    })
}

/// Reads the `(href, text)` pair of the first anchor inside `cell`.
pub(crate) fn cell_link(cell: ElementRef<'_>) -> Result<Link, StructureError> {
    let anchor = first_anchor(cell).ok_or(StructureError::MissingElement("a"))?;
    link_of(anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first<'a>(html: &'a Html, selector: &str) -> ElementRef<'a> {
        let selector = Selector::parse(selector).unwrap();
        html.select(&selector).next().unwrap()
    }

    #[test]
    fn test_text_of_trims_and_flattens() {
        let html = Html::parse_fragment("<div>\n  Algebra <b>II</b> &amp; more \n</div>");
        assert_eq!(text_of(first(&html, "div")), "Algebra II & more");
    }

    #[test]
    fn test_child_elements_skip_text() {
        let html = Html::parse_document(
            "<table><tr>\n<td>a</td>\n<td>b</td>\n</tr></table>",
        );
        let row = first(&html, "tr");
        assert_eq!(child_elements(row).count(), 2);
    }

    #[test]
    fn test_cell_link() {
        let html = Html::parse_document(
            r#"<table><tr><td><a href="/file?id=7"> essay.pdf </a></td></tr></table>"#,
        );
        let link = cell_link(first(&html, "td")).unwrap();
        assert_eq!(link.url, "/file?id=7");
        assert_eq!(link.title, "essay.pdf");
    }

    #[test]
    fn test_cell_link_missing_anchor() {
        let html = Html::parse_document("<table><tr><td>no link</td></tr></table>");
        assert_eq!(
            cell_link(first(&html, "td")),
            Err(StructureError::MissingElement("a"))
        );
    }

    #[test]
    fn test_link_without_href() {
        let html = Html::parse_fragment("<a name=\"top\">Top</a>");
        assert_eq!(
            link_of(first(&html, "a")),
            Err(StructureError::MissingAttribute {
                element: "a",
                attribute: "href"
            })
        );
    }
}
