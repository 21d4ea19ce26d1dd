//! Domain services

pub mod enrichment;
pub mod recency;
pub mod reconciler;
pub mod report_assembler;

pub use enrichment::{enrich_label_colors, normalize_color, CachingResolver};
pub use recency::{classify, classify_at, classify_date};
pub use reconciler::merge_inventory;
pub use report_assembler::{assemble, normalize_columns, report_file_name};
