//! This crate implements the paper and cardboard collection calendar for Lyss
//! and Busswil. Streets, schedules, and collection dates are bulk-loaded into
//! SQLite by the seed import and served read-only: a street name and optional
//! house number resolve to a collection directory, whose dates are rendered as
//! JSON-friendly lists or iCalendar files.

pub use ical;

pub mod calendar;
pub mod model;
pub mod resolver;
pub mod schedule;
pub mod seed;
pub mod store;
