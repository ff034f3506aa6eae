//! Metric vocabulary and sink for WireGuard device state.
//!
//! [`translate`] turns one device snapshot into a flat list of
//! [`Sample`]s; [`Metrics`] owns the registered prometheus gauges the
//! samples are written into. The split keeps translation a pure function
//! of snapshot plus wall clock, with all registry effects confined to
//! the sink.

mod sink;
mod translate;

pub use sink::Metrics;
pub use translate::{Direction, Sample, Series, translate};
