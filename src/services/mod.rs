//! Pure helper services used by the stores and the HTTP layer.

pub mod month_grid;

pub use month_grid::{days_in_month, month_grid, normalize, weekday_of};
