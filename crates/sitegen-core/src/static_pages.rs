//! The agency site's hand-authored pages.
//!
//! These routes exist in the client router and never come from the API. The
//! config file may replace the list wholesale (`[[static_entries]]`).

use crate::ChangeFrequency;

/// One hand-authored page: path, change frequency, priority.
pub type StaticPage = (&'static str, ChangeFrequency, f32);

/// Built-in static pages, in sitemap order.
pub const DEFAULT_STATIC_PAGES: &[StaticPage] = &[
    ("/", ChangeFrequency::Weekly, 1.0),
    ("/about", ChangeFrequency::Monthly, 0.8),
    ("/work", ChangeFrequency::Weekly, 0.9),
    ("/services", ChangeFrequency::Monthly, 0.9),
    ("/influencer-network", ChangeFrequency::Monthly, 0.8),
    ("/contact", ChangeFrequency::Yearly, 0.7),
    ("/blogs", ChangeFrequency::Weekly, 0.8),
];
