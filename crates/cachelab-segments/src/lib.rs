//! Demo pages, layouts and data loaders that declare cache directives.
//!
//! Every segment simulates slow work with the delay primitive and then
//! returns a value. Segments only *declare* how they would be cached.
//!
//! This crate provides:
//! - `Segment` - Page / layout interface
//! - `FetchPage` / `RemotePage` - Locale pages
//! - `NestedLayout` / `FooLayout` - Cached layouts with suspense fallbacks
//! - `fetch_data` - Cached data loader
//! - `SegmentRegistry` - Lookup by segment id

mod data;
mod error;
mod layouts;
mod pages;
mod registry;
mod segment;

pub use data::*;
pub use error::*;
pub use layouts::*;
pub use pages::*;
pub use registry::*;
pub use segment::*;
