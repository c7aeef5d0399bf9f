//! Offset pagination for contact listings.

/// Records skipped when the caller omits `skip`.
pub const DEFAULT_SKIP: i64 = 0;
/// Page size used when the caller omits `limit`.
pub const DEFAULT_LIMIT: i64 = 100;
/// Largest page a caller may request.
pub const MAX_LIMIT: i64 = 1000;

/// Validation errors for [`Pagination::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// `skip` was negative.
    #[error("skip must be zero or greater")]
    NegativeSkip,
    /// `limit` was outside `1..=MAX_LIMIT`.
    #[error("limit must be between 1 and {max}")]
    LimitOutOfRange {
        /// Largest accepted limit.
        max: i64,
    },
}

/// Validated `skip`/`limit` window over an owner's contacts.
///
/// # Examples
/// ```
/// use contacts::domain::Pagination;
///
/// let page = Pagination::new(Some(2), None).expect("valid page");
/// assert_eq!(page.skip(), 2);
/// assert_eq!(page.limit(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    skip: i64,
    limit: i64,
}

impl Pagination {
    /// Build a page, applying defaults for omitted values.
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Result<Self, PaginationError> {
        let skip = skip.unwrap_or(DEFAULT_SKIP);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if skip < 0 {
            return Err(PaginationError::NegativeSkip);
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(PaginationError::LimitOutOfRange { max: MAX_LIMIT });
        }
        Ok(Self { skip, limit })
    }

    /// Number of records to skip.
    pub const fn skip(&self) -> i64 {
        self.skip
    }

    /// Maximum number of records to return.
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Apply the window to an ordered iterator.
    pub fn apply<I>(&self, items: I) -> impl Iterator<Item = I::Item>
    where
        I: IntoIterator,
    {
        // Both values are validated non-negative.
        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(0);
        items.into_iter().skip(skip).take(limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
        }
    }
}
