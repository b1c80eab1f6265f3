//! Services module
//!
//! Business logic services that sit between the application shell and
//! the persistence gateway. Validation happens here, at the boundary,
//! before any entity is constructed; the pure engines do the actual
//! computation.

pub mod projects;
pub mod timeoff;
pub mod timesheets;

pub use projects::ProjectsService;
pub use timeoff::TimeOffService;
pub use timesheets::TimesheetsService;
