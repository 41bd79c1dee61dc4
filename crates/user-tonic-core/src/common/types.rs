//! # User Records and Paging
//!
//! Domain types shared by the service layer, the persistence gateways and the
//! RPC handler.
//!
//! ## Overview
//!
//! - [`User`] - A stored user. `id` and the timestamps are owned by the
//!   gateway and stay unset until the first save.
//! - [`PageRequest`] / [`Page`] - 0-based page selection and its result.
//! - [`format_timestamp`] - The single place where timestamps are rendered
//!   for responses.
//!
//! ## Constants
//!
//! - [`MIN_AGE`] / [`MAX_AGE`] - Accepted age range on creation.
//! - [`DEFAULT_PAGE_SIZE`] - Page size used when the client sends none.
//! - [`TIMESTAMP_FORMAT`] - `yyyy-MM-dd HH:mm:ss` in `chrono` syntax.

use chrono::NaiveDateTime;

/// Identifier assigned to a user by the persistence gateway.
pub type UserId = i64;

/// Lowest age accepted when creating a user.
pub const MIN_AGE: i32 = 1;

/// Highest age accepted when creating a user.
pub const MAX_AGE: i32 = 150;

/// Page size applied when the requested size is not positive.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Rendering of `created_at` / `updated_at` in responses.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unset until the gateway persists the record.
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    /// `None` means the age was never provided, which is distinct from zero.
    pub age: Option<i32>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl User {
    /// Builds a record that has not been saved yet.
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: Option<i32>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            age,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Selects one page of users. `index` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub index: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(index: u32, size: u32) -> Self {
        Self { index, size }
    }

    /// Normalizes a client's 1-based page number and requested size.
    ///
    /// Pages below 1 select the first page; sizes below 1 fall back to
    /// [`DEFAULT_PAGE_SIZE`].
    pub fn from_client(page: i32, size: i32) -> Self {
        let index = if page > 0 { (page - 1) as u32 } else { 0 };
        let size = if size > 0 {
            size as u32
        } else {
            DEFAULT_PAGE_SIZE
        };
        Self { index, size }
    }

    /// Number of records preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.index) * u64::from(self.size)
    }
}

/// One page of results plus the number of records across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Renders a timestamp with [`TIMESTAMP_FORMAT`], or `""` when unset.
pub fn format_timestamp(timestamp: Option<&NaiveDateTime>) -> String {
    timestamp
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn page_request_normalizes_client_values() {
        assert_eq!(PageRequest::from_client(0, 0), PageRequest::new(0, 10));
        assert_eq!(PageRequest::from_client(-3, -1), PageRequest::new(0, 10));
        assert_eq!(PageRequest::from_client(1, 25), PageRequest::new(0, 25));
        assert_eq!(PageRequest::from_client(2, 10), PageRequest::new(1, 10));
    }

    #[test]
    fn page_request_offset() {
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 7).offset(), 21);
        assert_eq!(
            PageRequest::new(u32::MAX, u32::MAX).offset(),
            u64::from(u32::MAX) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn formats_timestamps() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap();
        assert_eq!(format_timestamp(Some(&ts)), "2024-03-09 07:05:01");
        assert_eq!(format_timestamp(None), "");
    }

    #[test]
    fn new_user_is_unsaved() {
        let user = User::new("Alice", "alice@example.com", Some(30));
        assert_eq!(user.id, None);
        assert_eq!(user.created_at, None);
        assert_eq!(user.updated_at, None);
        assert_eq!(user.age, Some(30));
    }
}
