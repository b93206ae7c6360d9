//! Per-session page cache.
//!
//! Pages are keyed by kind and query string and kept for the lifetime of the
//! session. Entries are never replaced or evicted; the portal's pages are
//! assumed stable once fetched.

use std::collections::HashMap;

use scraper::Html;
use strum_macros::{Display, EnumIter};

use crate::config::{CALENDAR_PATH, DROPBOX_PATH, MAIN_PATH};

/// Portal pages this client understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum PageKind {
    /// Student home: classes and current assignments
    Main,
    /// Dropbox file listing
    Dropbox,
    /// Calendar month grid
    Calendar,
}

impl PageKind {
    /// Absolute path of the page on the portal.
    pub fn path(self) -> &'static str {
        match self {
            PageKind::Main => MAIN_PATH,
            PageKind::Dropbox => DROPBOX_PATH,
            PageKind::Calendar => CALENDAR_PATH,
        }
    }
}

/// Identifies a cached page within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub kind: PageKind,
    /// Query string without the leading `?`
    pub params: Option<String>,
}

impl PageKey {
    pub fn new(kind: PageKind, params: Option<&str>) -> Self {
        Self {
            kind,
            params: params.map(str::to_string),
        }
    }

    /// Path plus query string, relative to the portal origin.
    pub fn path_and_query(&self) -> String {
        match &self.params {
            Some(params) => format!("{}?{}", self.kind.path(), params),
            None => self.kind.path().to_string(),
        }
    }
}

/// A fetched page.
///
/// `document` is `None` when the request was answered with a redirect rather
/// than content, which on this portal means the session is not logged in.
#[derive(Debug)]
pub struct CachedPage {
    pub key: PageKey,
    pub document: Option<Html>,
}

impl CachedPage {
    /// Parses `body` if the fetch produced content.
    pub fn new(key: PageKey, body: Option<String>) -> Self {
        Self {
            key,
            document: body.map(|body| Html::parse_document(&body)),
        }
    }
}

/// Insert-once store of fetched pages.
#[derive(Debug, Default)]
pub struct PageCache {
    pages: HashMap<PageKey, CachedPage>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &PageKey) -> bool {
        self.pages.contains_key(key)
    }

    /// Stores `page` unless its key is already cached, and returns the cached entry.
    ///
    /// An existing entry always wins.
    pub fn insert(&mut self, page: CachedPage) -> &CachedPage {
        self.pages.entry(page.key.clone()).or_insert(page)
    }

    /// Whether any page of `kind` has been fetched, with any query string.
    pub fn contains_kind(&self, kind: PageKind) -> bool {
        self.pages.keys().any(|key| key.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_page_paths() {
        for kind in PageKind::iter() {
            assert!(kind.path().starts_with('/'), "{} path must be absolute", kind);
        }
        assert_eq!(PageKind::Main.path(), "/portal/student_home");
        assert_eq!(PageKind::Dropbox.path(), "/student/drop_box");
        assert_eq!(PageKind::Calendar.path(), "/calendar/month");
    }

    #[test]
    fn test_page_kind_display() {
        assert_eq!(PageKind::Main.to_string(), "main");
        assert_eq!(PageKind::Dropbox.to_string(), "dropbox");
        assert_eq!(PageKind::Calendar.to_string(), "calendar");
    }

    #[test]
    fn test_path_and_query() {
        let key = PageKey::new(PageKind::Calendar, Some("month_id=1349074800000"));
        assert_eq!(key.path_and_query(), "/calendar/month?month_id=1349074800000");
        assert_eq!(
            PageKey::new(PageKind::Main, None).path_and_query(),
            "/portal/student_home"
        );
    }

    #[test]
    fn test_keys_distinguish_params() {
        let mut cache = PageCache::new();
        cache.insert(CachedPage::new(
            PageKey::new(PageKind::Calendar, None),
            Some("<p>current</p>".to_string()),
        ));
        cache.insert(CachedPage::new(
            PageKey::new(PageKind::Calendar, Some("month_id=1")),
            Some("<p>other</p>".to_string()),
        ));
        assert_eq!(cache.len(), 2);
        assert!(cache.contains_kind(PageKind::Calendar));
        assert!(!cache.contains_kind(PageKind::Dropbox));
    }

    #[test]
    fn test_insert_keeps_first_entry() {
        let mut cache = PageCache::new();
        let key = PageKey::new(PageKind::Main, None);
        cache.insert(CachedPage::new(key.clone(), None));
        let page = cache.insert(CachedPage::new(key.clone(), Some("<p>late</p>".to_string())));
        assert!(page.document.is_none());
        assert_eq!(cache.len(), 1);
    }
}
