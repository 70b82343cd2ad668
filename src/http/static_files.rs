//! Directory-backed file responder.
//!
//! The root route hands every request that is not the shutdown endpoint to a
//! `ServeDir` rooted at the served directory. `index.html` is served for
//! directory paths; anything missing is a 404.

use std::path::Path;

use tower_http::services::ServeDir;

/// Create the file service for `root`.
pub fn create_file_service(root: &Path) -> ServeDir {
    ServeDir::new(root).append_index_html_on_directories(true)
}
