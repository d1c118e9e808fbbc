mod class_file;
pub mod descriptor;

#[cfg(test)]
pub(crate) mod test_support;

pub use class_file::{extract_references, ClassFileParser, MalformedClassError, ParsedClass};
