//! Paged collections and list queries shared by all resources.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One page of a server-side collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    /// An empty page, used as the fallback when a list fails to load.
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            page_size,
        }
    }

    /// Maps the items, keeping the wrapper fields.
    pub fn try_map<U, E, F>(self, f: F) -> Result<Page<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(Page {
            items,
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDir::Asc => f.write_str("asc"),
            SortDir::Desc => f.write_str("desc"),
        }
    }
}

/// Sort instruction rendered as `field:dir`, e.g. `createdDate:desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub dir: SortDir,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: SortDir::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: SortDir::Desc,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.dir)
    }
}

/// Query for a paged list: search, paging, sort and per-field filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort: Option<SortKey>,
    pub filters: BTreeMap<String, String>,
}

impl PageQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Fills in the first page and `page_size` where the caller left them open.
    pub fn with_defaults(mut self, page_size: u32) -> Self {
        self.page.get_or_insert(0);
        self.page_size.get_or_insert(page_size);
        self
    }

    /// Renders the query as request parameters. Empty values are dropped.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: String| {
            if !value.is_empty() {
                pairs.push((key.to_string(), value));
            }
        };

        for (field, value) in &self.filters {
            push(field, value.clone());
        }
        if let Some(search) = &self.search {
            push("search", search.clone());
        }
        if let Some(page) = self.page {
            push("page", page.to_string());
        }
        if let Some(page_size) = self.page_size {
            push("pageSize", page_size.to_string());
        }
        if let Some(sort) = &self.sort {
            push("sort", sort.to_string());
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_serializes_camel_case() {
        let page: Page<u8> = Page::empty(0, 20);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pageSize"], 20);
    }

    #[test]
    fn test_try_map_keeps_wrapper() {
        let page = Page {
            items: vec![1, 2, 3],
            total: 30,
            page: 2,
            page_size: 3,
        };
        let mapped: Page<String> = page.try_map(|n| Ok::<_, ()>(n.to_string())).unwrap();
        assert_eq!(mapped.items, vec!["1", "2", "3"]);
        assert_eq!((mapped.total, mapped.page, mapped.page_size), (30, 2, 3));
    }

    #[test]
    fn test_query_pairs_drop_empty_values() {
        let query = PageQuery::new()
            .page(0, 20)
            .search("")
            .sort(SortKey::asc("createdDate"))
            .filter("status", "IN_PROGRESS")
            .filter("projectId", "");

        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("status".to_string(), "IN_PROGRESS".to_string()),
                ("page".to_string(), "0".to_string()),
                ("pageSize".to_string(), "20".to_string()),
                ("sort".to_string(), "createdDate:asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_defaults_only_fill_gaps() {
        let query = PageQuery::new().with_defaults(20);
        assert_eq!((query.page, query.page_size), (Some(0), Some(20)));

        let query = PageQuery::new().page(3, 50).with_defaults(20);
        assert_eq!((query.page, query.page_size), (Some(3), Some(50)));
    }
}
