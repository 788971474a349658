pub mod error;
pub mod validation;
pub mod number;
pub mod fs;

pub use error::{OptimizerError, OptimizerResult, ValidationError};
pub use validation::{validate_settings, validate_svg_text};
pub use number::{format_number, parse_leading_number, parse_number_list, parse_number_tokens, round_to};
pub use fs::{extract_filename, read_text, unique_output_names, write_text};
