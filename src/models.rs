//! Records extracted from portal pages.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

/// A course the student is enrolled in, from the student home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassRecord {
    /// Numeric course group id taken from the course link (`group_id=...`)
    pub course_id: String,
    pub course_name: String,
    /// Letter grade, when the portal publishes one as plain text
    pub grade: Option<String>,
}

/// An `(href, text)` pair read from an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub url: String,
    pub title: String,
}

/// A file submitted to the dropbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropboxRecord {
    /// Submission date exactly as the portal prints it
    pub date: String,
    pub class_name: String,
    pub assignment: Link,
    pub file: Link,
}

/// Marker icon shown next to an assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    None,
    New,
    Due,
}

/// A current assignment from the student home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRecord {
    pub status: AssignmentStatus,
    pub title: Link,
    pub class_name: String,
    pub due: NaiveDate,
}

/// An event in the monthly calendar grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    pub event_id: String,
    /// Course the event belongs to; personal and public events have none
    pub course: Option<String>,
    pub description: String,
}

/// A calendar month to display, parsed from `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    pub year: i32,
    /// 1-based month
    pub month: u32,
}

impl FromStr for CalendarMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got '{}'", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in '{}'", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in '{}'", s))?;
        if !(1..=12).contains(&month) {
            return Err(format!("month out of range (1..12) in '{}'", s));
        }
        Ok(Self { year, month })
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssignmentStatus::None => "-",
            AssignmentStatus::New => "new",
            AssignmentStatus::Due => "due",
        })
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.title, self.url)
    }
}

impl fmt::Display for ClassRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.course_id,
            self.course_name,
            self.grade.as_deref().unwrap_or("")
        )
    }
}

impl fmt::Display for DropboxRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.date, self.class_name, self.assignment, self.file
        )
    }
}

impl fmt::Display for AssignmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.status, self.due, self.class_name, self.title
        )
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.date,
            self.event_id,
            self.course.as_deref().unwrap_or("-"),
            self.description
        )
    }
}
