use std::{
    fmt::{Display, Formatter},
    num::NonZeroU32,
};

use serde::Deserialize;

use crate::error::PageSizeError;

/// Number of rows requested per page. The server only honours `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "u32")]
#[repr(transparent)]
pub struct PageSize(NonZeroU32);

impl PageSize {
    pub const MAX: u32 = 100;
    pub const DEFAULT: Self = Self(NonZeroU32::MIN.saturating_add(9));
    /// Sizes offered to the user when the config names none.
    pub const OPTIONS: [Self; 3] = [
        Self(NonZeroU32::MIN.saturating_add(4)),
        Self::DEFAULT,
        Self(NonZeroU32::MIN.saturating_add(24)),
    ];

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for PageSize {
    type Error = PageSizeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        NonZeroU32::new(value)
            .filter(|size| size.get() <= Self::MAX)
            .map(Self)
            .ok_or(PageSizeError(value))
    }
}

impl Display for PageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything that determines which rows a fetch returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageQuery {
    page_index: u32,
    page_size: PageSize,
    archived: bool,
}

impl PageQuery {
    pub fn new(page_index: u32, page_size: PageSize, archived: bool) -> Self {
        Self {
            page_index,
            page_size,
            archived,
        }
    }

    /// 0-based.
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn archived(&self) -> bool {
        self.archived
    }

    /// Request path of the collection endpoint. The wire page number is 1-based.
    pub fn to_path(&self) -> String {
        format!(
            "/api/messages?page={}&pageSize={}&archived={}",
            u64::from(self.page_index) + 1,
            self.page_size,
            self.archived
        )
    }
}

/// Number of pages needed to show `total_items`. Never less than one so an
/// empty collection still has a first page.
pub fn page_count(total_items: u64, page_size: PageSize) -> u64 {
    total_items.div_ceil(u64::from(page_size.get())).max(1)
}

/// Highest 0-based page index that holds rows for `total_items`.
pub fn last_page_index(total_items: u64, page_size: PageSize) -> u32 {
    u32::try_from(page_count(total_items, page_size) - 1).unwrap_or(u32::MAX)
}
