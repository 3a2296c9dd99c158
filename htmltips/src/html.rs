//! HTML Engine Interface
//!
//! The tooltip does not lay out HTML itself. An engine supplies documents
//! that measure, paint and react to the pointer, and the tooltip supplies
//! a container the documents call back into for images, style sheets,
//! fonts, the cursor and anchor clicks.
//!
//! The application side is a [`TooltipsCallback`]: it resolves images and
//! imported style sheets, provides text for tools registered with
//! [`ToolOptions::ASK_TEXT`](crate::ToolOptions::ASK_TEXT) and decides what
//! an anchor click does.

extern crate alloc;

use crate::gdi::Dib;
use crate::types::{Point, Rect, Size};
use alloc::rc::Rc;
use alloc::string::String;

// ============================================================================
// Application Callback
// ============================================================================

/// Result of an image request
#[derive(Debug, Clone)]
pub enum ImageFetch {
    /// Image is available now
    Ready(Rc<Dib>),
    /// Loading; the application calls
    /// [`Tooltips::on_image_ready`](crate::Tooltips::on_image_ready) later
    Pending,
    /// Image cannot be provided
    Failed,
}

/// Application hooks (tooltips_callback)
pub trait TooltipsCallback {
    /// Resolve an image for tool `id`
    fn get_image(&mut self, id: u32, url: &str, redraw_on_ready: bool) -> ImageFetch;

    /// Markup and CSS for an ask-text tool; `None` keeps the registered text
    fn get_text(&mut self, id: u32) -> Option<(String, String)>;

    /// Anchor clicked in tool `id`; true if the application handled it
    fn on_anchor_click(&mut self, id: u32, url: &str) -> bool;

    /// Resolve an `@import`ed style sheet
    fn import_css(&mut self, _id: u32, _url: &str) -> Option<String> {
        None
    }
}

// ============================================================================
// Engine Side
// ============================================================================

/// Services a document needs from its host
pub trait DocumentContainer {
    fn get_image(&mut self, url: &str, redraw_on_ready: bool) -> Option<Rc<Dib>>;
    fn import_css(&mut self, url: &str, base_url: &str) -> Option<String>;
    fn on_anchor_click(&mut self, url: &str);
    /// Cursor requested by the element under the pointer (CSS keyword)
    fn set_cursor(&mut self, cursor: &str);
    /// Content viewport size as a rectangle at the origin
    fn client_rect(&self) -> Rect;
    fn default_font_name(&self) -> &str;
    fn default_font_size(&self) -> i32;
    fn make_url(&self, url: &str, base_url: &str) -> String;
}

/// A parsed document
///
/// Pointer coordinates are document coordinates. The boolean results of
/// the mouse handlers tell whether the document needs a repaint.
pub trait HtmlDocument {
    /// Lay out for `max_width`; returns the natural content size
    fn render(&mut self, max_width: i32, container: &mut dyn DocumentContainer) -> Size;

    /// Paint with the document origin at `origin`, limited to `clip`
    fn draw(&mut self, dib: &mut Dib, origin: Point, clip: &Rect, container: &mut dyn DocumentContainer);

    fn on_mouse_over(&mut self, pt: Point, container: &mut dyn DocumentContainer) -> bool;
    fn on_mouse_leave(&mut self, container: &mut dyn DocumentContainer) -> bool;
    fn on_lbutton_down(&mut self, pt: Point, container: &mut dyn DocumentContainer) -> bool;
    fn on_lbutton_up(&mut self, pt: Point, container: &mut dyn DocumentContainer) -> bool;
}

/// Document factory
pub trait HtmlEngine {
    type Document: HtmlDocument;

    /// Parse `markup` with the extra style sheet `css`
    fn create_document(
        &mut self,
        markup: &str,
        css: &str,
        container: &mut dyn DocumentContainer,
    ) -> Option<Self::Document>;
}
