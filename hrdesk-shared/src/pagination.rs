//! Fixed-size pagination
//!
//! Listing endpoints return five records per page. Clients pick a page with
//! `?page=n` (1-based; missing, zero or garbage values mean page 1) and get
//! back a [`Page`] envelope with navigation metadata.

use serde::{Deserialize, Deserializer, Serialize};

/// Records per page on every listing endpoint
pub const PER_PAGE: u32 = 5;

/// Requested page, deserialized from the query string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    #[serde(default = "first_page", deserialize_with = "lenient_page")]
    pub page: u32,

    #[serde(skip, default = "default_per_page")]
    pub per_page: u32,
}

fn first_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    PER_PAGE
}

fn lenient_page<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1))
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PageRequest {
    /// Page `page` with the standard page size; page 0 is treated as page 1
    pub fn new(page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: PER_PAGE,
        }
    }

    /// SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * i64::from(self.per_page)
    }
}

/// One page of results plus navigation metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub current_page: u32,
    pub data: Vec<T>,
    pub per_page: u32,
    pub total: i64,
    pub last_page: u32,
    /// 1-based position of the first record on this page, `None` when empty
    pub from: Option<i64>,
    /// 1-based position of the last record on this page, `None` when empty
    pub to: Option<i64>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        let per_page = i64::from(request.per_page.max(1));
        let last_page = ((total.max(0) + per_page - 1) / per_page).max(1);

        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let from = request.offset() + 1;
            (Some(from), Some(from + data.len() as i64 - 1))
        };

        Self {
            current_page: request.page,
            data,
            per_page: request.per_page,
            total,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            from,
            to,
        }
    }
}
