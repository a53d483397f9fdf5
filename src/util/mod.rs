// Utility Module
// File helpers shared by the cipher pipeline and the command line front end

pub mod file_ops;

pub use file_ops::{create_output, format_file_size, get_file_size, open_input};
