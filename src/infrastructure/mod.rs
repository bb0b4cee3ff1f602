pub mod output_dir;

pub use output_dir::{create_unique_dir, write_json, write_text, OutputTree};
