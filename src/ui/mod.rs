pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, info, section, status, success, summary_row, warn};
pub use table::users_table;
pub use theme::{style, theme, Theme, Tone};
