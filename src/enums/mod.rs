//! Enumerated types.

mod command;
mod image_type;
mod parse_mode;

pub use command::Command;
pub use image_type::ImageType;
pub use parse_mode::ParseMode;
