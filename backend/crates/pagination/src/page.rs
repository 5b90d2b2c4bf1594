//! Page envelope returned by store adapters.

use crate::ContinuationToken;

/// One page of results plus the token for the next page, if any.
///
/// # Examples
/// ```
/// use pagination::Page;
///
/// let page = Page::last(vec![1, 2, 3]);
/// assert!(page.is_last());
/// let (items, next) = page.into_parts();
/// assert_eq!(items, vec![1, 2, 3]);
/// assert!(next.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    next: Option<ContinuationToken>,
}

impl<T> Page<T> {
    /// Build a page with an optional continuation token.
    #[must_use]
    pub const fn new(items: Vec<T>, next: Option<ContinuationToken>) -> Self {
        Self { items, next }
    }

    /// Build a final page with no continuation.
    #[must_use]
    pub const fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Token for the following page.
    #[must_use]
    pub const fn next(&self) -> Option<&ContinuationToken> {
        self.next.as_ref()
    }

    /// Whether no further pages remain.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.next.is_none()
    }

    /// Split the page into its items and continuation token.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Option<ContinuationToken>) {
        (self.items, self.next)
    }

    /// Transform each item while keeping the continuation token.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next: self.next,
        }
    }
}
