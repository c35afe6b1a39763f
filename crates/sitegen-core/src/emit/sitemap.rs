//! Sitemap XML rendering.
//!
//! Produces a sitemaps.org 0.9 `<urlset>` document:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" ...>
//!   <url>
//!     <loc>https://agency.example/blogs/launch</loc>
//!     <lastmod>2024-01-05</lastmod>
//!     <changefreq>weekly</changefreq>
//!     <priority>0.6</priority>
//!   </url>
//! </urlset>
//! ```

use crate::{CanonicalEntry, Error, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fmt;
use tracing::instrument;
use url::Url;

/// Sitemap protocol namespace.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
/// XML Schema instance namespace.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// Schema location pair for `xsi:schemaLocation`.
pub const SCHEMA_LOCATION: &str = "http://www.sitemaps.org/schemas/sitemap/0.9 http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd";

/// Public origin of the site, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrl(String);

impl SiteUrl {
    /// Validate `raw` as an absolute http(s) URL and strip trailing slashes.
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "site URL must use http or https, got '{raw}'"
            )));
        }
        Ok(Self(url.as_str().trim_end_matches('/').to_string()))
    }

    /// Absolute URL for a site path.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}{path}", self.0)
    }
}

impl fmt::Display for SiteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render entries as a sitemap document.
#[instrument(skip_all, fields(entries = entries.len(), site = %site))]
pub fn render_sitemap(entries: &[CanonicalEntry], site: &SiteUrl) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let urlset = BytesStart::new("urlset").with_attributes([
        ("xmlns", SITEMAP_NS),
        ("xmlns:xsi", XSI_NS),
        ("xsi:schemaLocation", SCHEMA_LOCATION),
    ]);
    write(&mut writer, Event::Start(urlset))?;

    for entry in entries {
        write(&mut writer, Event::Start(BytesStart::new("url")))?;
        text_element(&mut writer, "loc", &site.join(&entry.path))?;
        text_element(
            &mut writer,
            "lastmod",
            &entry.last_modified.format("%Y-%m-%d").to_string(),
        )?;
        text_element(&mut writer, "changefreq", entry.change_frequency.as_str())?;
        text_element(&mut writer, "priority", &entry.priority.to_string())?;
        write(&mut writer, Event::End(BytesEnd::new("url")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("urlset")))?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| Error::Serialization(format!("sitemap is not UTF-8: {e}")))?;
    xml.push('\n');
    Ok(xml)
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Serialization(format!("failed to write sitemap XML: {e}")))
}
