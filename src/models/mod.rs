pub mod booking;
pub mod status;
pub mod time;
pub mod window;

pub use booking::*;
pub use status::*;
pub use time::*;
pub use window::*;
