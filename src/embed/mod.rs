//! Embedded static resources.
//!
//! - `serve::RELOAD_SNIPPET` - bootstrap `<script>` injected into HTML pages
//! - `serve::LISTING_HTML` - directory listing page
//!
//! ```ignore
//! use embed::serve::{RELOAD_SNIPPET, ReloadVars};
//!
//! let snippet = RELOAD_SNIPPET.render(&ReloadVars { path: "/.hotserve/reload" });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// Variables for reload.html.
    pub struct ReloadVars<'a> {
        /// Notification endpoint the script connects to.
        pub path: &'a str,
    }

    impl TemplateVars for ReloadVars<'_> {
        fn apply(&self, content: &str) -> String {
            content.replace("__RELOAD_PATH__", self.path)
        }
    }

    /// Live reload bootstrap script.
    pub const RELOAD_SNIPPET: Template<ReloadVars<'static>> =
        Template::new(include_str!("serve/reload.html"));

    /// Variables for listing.html. Both fields must already be HTML-escaped.
    pub struct ListingVars {
        pub title: String,
        pub entries: String,
    }

    impl TemplateVars for ListingVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__TITLE__", &self.title)
                .replace("__ENTRIES__", &self.entries)
        }
    }

    /// Directory listing page.
    pub const LISTING_HTML: Template<ListingVars> =
        Template::new(include_str!("serve/listing.html"));
}
