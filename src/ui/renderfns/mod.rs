pub mod footer;
pub mod header;
pub mod utils;

pub use footer::{draw_footer, StatusKind};
pub use header::{draw_header, gateway_host};
pub use utils::{estado_color, format_age, optional, score_color, truncate};
