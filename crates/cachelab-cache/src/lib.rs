//! Cache directive declarations for cached pages, layouts and data loaders.
//!
//! Nothing here stores or serves cached values; these types describe what a
//! segment asks of the host's cache.
//!
//! This crate provides:
//! - `CacheKind` - `use cache`, `use cache: remote`, `use cache: private`
//! - `CacheLife` - Stale / revalidate / expire windows and named profiles
//! - `CacheTag` - Validated invalidation tags
//! - `CacheDirective` - A kind, a life and tags, with `Cache-Control` output
//! - `CacheKeyBuilder` - Segment key composition
//! - `CacheExplainHeaders` - Debug headers describing a directive
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use cachelab_cache::{CacheDirective, CacheKind, CacheLife};
//!
//! let directive = CacheDirective::new(CacheKind::Default)
//!     .with_life(CacheLife::custom().stale(Duration::from_secs(10)).revalidate(Duration::from_secs(20)))
//!     .with_tag("data");
//! assert_eq!(directive.cache_control_header(), "s-maxage=20, stale-while-revalidate");
//! ```

mod error;
mod headers;
mod key;
mod policy;
mod tag;

pub use error::*;
pub use headers::*;
pub use key::*;
pub use policy::*;
pub use tag::*;
