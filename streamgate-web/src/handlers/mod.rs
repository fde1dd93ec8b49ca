//! HTTP request handlers organized by functionality

pub mod addon;
pub mod configure;
pub mod utils;

// Re-export handler functions
pub use addon::{CatalogResponse, StreamResponse, catalog, catalog_with_extra, manifest, stream};
pub use configure::{ConfigureForm, configure_page, configure_submit, root};
pub use utils::{parse_kind, strip_json_suffix};
