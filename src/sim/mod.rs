pub mod engine;
pub mod kpi;
/// Dispatch policies and step sizing.
pub mod policy;
pub mod types;
/// Daily time-of-day windows.
pub mod window;
