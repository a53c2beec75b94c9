pub mod text;

pub use text::{bytes_to_text, text_to_bytes, EncodedText};
