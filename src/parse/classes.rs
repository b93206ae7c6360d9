//! Class list extraction from the student home page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{child_elements, first_anchor, text_of};
use crate::error_handling::StructureError;
use crate::models::ClassRecord;
use crate::utils::{parse_regex_unsafe, parse_selector_unsafe};

const COURSE_BODY_SELECTOR_STR: &str = "tbody.hub_general_body";

static COURSE_BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(COURSE_BODY_SELECTOR_STR, "COURSE_BODY_SELECTOR"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("tr", "ROW_SELECTOR"));
static COURSE_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("td.left", "COURSE_CELL_SELECTOR"));

static GROUP_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| parse_regex_unsafe(r"group_id=(\d+)", "GROUP_ID_RE"));

/// Class carrying a plain-text grade cell.
const GRADE_CELL_CLASS: &str = "list_text";

/// Extracts the class list.
///
/// Rows without a course link, or whose link carries no `group_id`, are
/// skipped.
///
/// # Errors
///
/// Returns `StructureError::MissingElement` if the course summary table body is absent.
pub fn extract_classes(document: &Html) -> Result<Vec<ClassRecord>, StructureError> {
    let body = document
        .select(&COURSE_BODY_SELECTOR)
        .next()
        .ok_or(StructureError::MissingElement(COURSE_BODY_SELECTOR_STR))?;

    let classes: Vec<ClassRecord> = body.select(&ROW_SELECTOR).filter_map(class_from_row).collect();
    log::debug!("Extracted {} classes", classes.len());
    Ok(classes)
}

/// Builds a record from one course row, or `None` if the row has no usable link.
pub fn class_from_row(row: ElementRef<'_>) -> Option<ClassRecord> {
    let anchor = course_anchor(row)?;
    let course_id = group_id(anchor.value().attr("href")?)?;
    let course_name = text_of(anchor);
    if course_name.is_empty() {
        return None;
    }

    let grade = child_elements(row).nth(1).and_then(grade_text);

    Some(ClassRecord {
        course_id,
        course_name,
        grade,
    })
}

/// The link inside the row's `td.left` cell.
pub fn course_anchor(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let cell = row.select(&COURSE_CELL_SELECTOR).next()?;
    first_anchor(cell)
}

/// Numeric course id from a course link.
pub fn group_id(href: &str) -> Option<String> {
    GROUP_ID_RE
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Grade text of a cell, if it is a plain-text grade cell.
///
/// The portal links the grade to a progress report when one exists; only
/// unlinked `list_text` cells hold a bare grade.
pub fn grade_text(cell: ElementRef<'_>) -> Option<String> {
    if !cell.value().has_class(GRADE_CELL_CLASS, scraper::CaseSensitivity::CaseSensitive) {
        return None;
    }
    if first_anchor(cell).is_some() {
        return None;
    }
    let grade = text_of(cell);
    (!grade.is_empty()).then_some(grade)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><table class="hub_general">
            <tbody class="hub_general_body">{}</tbody></table></body></html>"#,
            rows
        ))
    }

    #[test]
    fn test_class_without_grade() {
        let document = page(
            r#"<tr><td class="left"><a href="/portal/course?d=x&group_id=4821">Algebra II</a></td><td class="list_text"></td></tr>"#,
        );
        let classes = extract_classes(&document).unwrap();
        assert_eq!(
            classes,
            vec![ClassRecord {
                course_id: "4821".to_string(),
                course_name: "Algebra II".to_string(),
                grade: None,
            }]
        );
    }

    #[test]
    fn test_class_with_plain_grade() {
        let document = page(
            r#"<tr><td class="left"><a href="/?group_id=17">Chemistry</a></td><td class="list_text">
                <span>A-</span></td></tr>"#,
        );
        let classes = extract_classes(&document).unwrap();
        assert_eq!(classes[0].grade.as_deref(), Some("A-"));
    }

    #[test]
    fn test_linked_grade_is_ignored() {
        // A linked grade points at the progress report, not a bare grade
        let document = page(
            r#"<tr><td class="left"><a href="/?group_id=17">Chemistry</a></td>
               <td class="list_text"><a href="/progress?id=1">B+</a></td></tr>"#,
        );
        let classes = extract_classes(&document).unwrap();
        assert_eq!(classes[0].grade, None);
    }

    #[test]
    fn test_grade_requires_list_text_class() {
        let document = page(
            r#"<tr><td class="left"><a href="/?group_id=17">Chemistry</a></td><td class="other">B</td></tr>"#,
        );
        assert_eq!(extract_classes(&document).unwrap()[0].grade, None);
    }

    #[test]
    fn test_rows_without_usable_anchor_are_skipped() {
        let document = page(
            r#"<tr><td class="left">Advisory</td><td class="list_text">P</td></tr>
               <tr><td class="left"><a href="/portal/home">No group</a></td></tr>
               <tr><td>spacer</td></tr>
               <tr><td class="left"><a href="/?group_id=99">English 10</a></td><td class="list_text">A</td></tr>"#,
        );
        let classes = extract_classes(&document).unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].course_id, "99");
        assert_eq!(classes[0].course_name, "English 10");
        assert_eq!(classes[0].grade.as_deref(), Some("A"));
    }

    #[test]
    fn test_missing_course_table_is_fatal() {
        let document = Html::parse_document("<html><body><p>Maintenance</p></body></html>");
        assert_eq!(
            extract_classes(&document),
            Err(StructureError::MissingElement("tbody.hub_general_body"))
        );
    }

    #[test]
    fn test_group_id_pattern() {
        assert_eq!(group_id("/portal/x?group_id=4821&d=1"), Some("4821".to_string()));
        assert_eq!(group_id("/portal/x?group_id=abc"), None);
        assert_eq!(group_id("/portal/x"), None);
    }
}
