//! Emitters for the merged entry set.
//!
//! Two renderings exist:
//!
//! - [`sitemap::render_sitemap`]: a sitemaps.org XML document
//! - [`url_list::merge_url_list`]: a plain list of paths for the pre-render tool
//!
//! Rendering is pure; writing happens once, through [`write_output`], which
//! replaces the destination atomically so a failed run never leaves a
//! truncated file behind.

pub mod sitemap;
pub mod url_list;

pub use sitemap::{SiteUrl, render_sitemap};
pub use url_list::{merge_url_list, render_url_list};

use crate::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Write `content` to `path`, fully replacing any previous file.
///
/// The content goes to a uniquely named temporary file in the destination
/// directory first and is then persisted over `path`. Parent directories are
/// created when missing. Any failure is reported as [`Error::Output`].
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    let output_err = |source| Error::Output {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(output_err)?;
            parent
        },
        None => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent).map_err(output_err)?;
    tmp.write_all(content.as_bytes()).map_err(output_err)?;
    tmp.persist(path).map_err(|e| output_err(e.error))?;

    debug!(path = %path.display(), bytes = content.len(), "wrote output");
    Ok(())
}
