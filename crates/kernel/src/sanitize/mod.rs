//! Content sanitization.
//!
//! Two sanitizers with different contracts, named by capability:
//! - [`html::sanitize_for_html_display`] keeps an allow-list of markup
//!   and is used for descriptions delivered to browsers.
//! - [`text::sanitize_for_plain_text_storage`] strips all markup and is
//!   used for submitted values stored and re-rendered as plain text.
//!
//! They are not interchangeable. Running the plain-text stripper on a
//! description destroys legitimate formatting; running the HTML
//! sanitizer on a stored value leaves markup in places that never
//! render markup.

pub mod html;
pub mod text;

pub use html::sanitize_for_html_display;
pub use text::sanitize_for_plain_text_storage;
