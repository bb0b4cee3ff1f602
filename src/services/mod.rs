pub mod assembler;
pub mod generator;
pub mod image_extractor;
pub mod reconciler;
pub mod renderer;
pub mod sanitizer;
pub mod warn_writer;

pub use assembler::{AssessmentAssembler, AssessmentSettings};
pub use image_extractor::{extract_images, AssetFetcher, FetchedAsset};
pub use reconciler::{reconcile, resolve_groups, GroupSource, PlacedQuestion, Reconciled};
pub use renderer::{render, RenderNotice, Rendered};
pub use sanitizer::{clean_question_text, file_name_only};
pub use warn_writer::WarnWriter;
