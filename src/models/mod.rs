//! Data models held by the cache
//!
//! A `Profile` owns its `Order`s exclusively; the cache stores profiles
//! behind shared references and never deep-copies them on read.

pub mod order;
pub mod profile;

pub use order::Order;
pub use profile::Profile;
