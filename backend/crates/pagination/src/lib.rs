//! Opaque continuation tokens and page envelopes for keyed store reads.
//!
//! Store adapters return results one page at a time. A [`Page`] carries the
//! records plus an optional [`ContinuationToken`]; callers keep requesting
//! pages until the token is absent. The token wraps an adapter-defined key
//! (for example the last `(created_at, id)` pair read) serialized as JSON and
//! encoded as unpadded URL-safe base64, so callers can pass it around without
//! learning anything about the key's structure.

mod page;
mod token;

pub use page::Page;
pub use token::{ContinuationToken, TokenError};
