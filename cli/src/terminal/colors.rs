use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightCyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const LOCATION: Color = Color::BrightYellow;
pub const COUNT: Color = Color::BrightGreen;
pub const FAILURE: Color = Color::BrightRed;
