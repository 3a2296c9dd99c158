//! Tip Content
//!
//! [`TipContainer`] is the tooltip's side of the document interface: it
//! routes image and style sheet requests to the application callback and
//! records what the document asks for (cursor, clicked anchor).
//!
//! [`TipContent`] owns the document of the tool whose content is loaded,
//! its natural size, and paints it into the content viewport.

extern crate alloc;

use crate::config::{DEFAULT_FONT_NAME, DEFAULT_FONT_SIZE};
use crate::gdi::Dib;
use crate::html::{DocumentContainer, HtmlDocument, HtmlEngine, ImageFetch, TooltipsCallback};
use crate::types::{Point, Rect, Size};
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use log::{trace, warn};

// ============================================================================
// Document Container
// ============================================================================

/// Container handed to documents of the tooltip
pub struct TipContainer {
    callback: Option<Box<dyn TooltipsCallback>>,
    /// Tool the requests are made for
    tool: Option<u32>,
    font_name: String,
    font_size: i32,
    /// Last CSS cursor keyword requested by the document
    cursor: String,
    /// Anchor clicked since the last [`TipContainer::take_anchor`]
    anchor: Option<String>,
    client: Rect,
}

impl TipContainer {
    pub fn new() -> Self {
        Self {
            callback: None,
            tool: None,
            font_name: String::from(DEFAULT_FONT_NAME),
            font_size: DEFAULT_FONT_SIZE,
            cursor: String::new(),
            anchor: None,
            client: Rect::default(),
        }
    }

    pub fn set_callback(&mut self, callback: Option<Box<dyn TooltipsCallback>>) {
        self.callback = callback;
    }

    pub fn callback_mut(&mut self) -> Option<&mut dyn TooltipsCallback> {
        match self.callback.as_mut() {
            Some(callback) => Some(callback.as_mut()),
            None => None,
        }
    }

    pub fn set_tool(&mut self, tool: Option<u32>) {
        self.tool = tool;
    }

    pub fn set_def_font(&mut self, name: &str, size: i32) {
        self.font_name = String::from(name);
        self.font_size = size;
    }

    pub fn set_client(&mut self, client: Rect) {
        self.client = client;
    }

    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    pub fn reset_cursor(&mut self) {
        self.cursor.clear();
    }

    /// Take the anchor clicked since the last call
    pub fn take_anchor(&mut self) -> Option<String> {
        self.anchor.take()
    }
}

impl Default for TipContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentContainer for TipContainer {
    fn get_image(&mut self, url: &str, redraw_on_ready: bool) -> Option<Rc<Dib>> {
        let tool = self.tool?;
        let callback = self.callback.as_deref_mut()?;

        match callback.get_image(tool, url, redraw_on_ready) {
            ImageFetch::Ready(image) => Some(image),
            ImageFetch::Pending => {
                trace!("[TOOLTIP] Image pending: {}", url);
                None
            }
            ImageFetch::Failed => {
                warn!("[TOOLTIP] Image not available: {}", url);
                None
            }
        }
    }

    fn import_css(&mut self, url: &str, base_url: &str) -> Option<String> {
        let full = self.make_url(url, base_url);
        let tool = self.tool?;
        self.callback.as_deref_mut()?.import_css(tool, &full)
    }

    fn on_anchor_click(&mut self, url: &str) {
        self.anchor = Some(String::from(url));
    }

    fn set_cursor(&mut self, cursor: &str) {
        if self.cursor != cursor {
            self.cursor = String::from(cursor);
        }
    }

    fn client_rect(&self) -> Rect {
        self.client
    }

    fn default_font_name(&self) -> &str {
        &self.font_name
    }

    fn default_font_size(&self) -> i32 {
        self.font_size
    }

    fn make_url(&self, url: &str, base_url: &str) -> String {
        if base_url.is_empty() || url.contains("://") {
            return String::from(url);
        }

        let mut full = String::from(base_url);
        if !full.ends_with('/') {
            full.push('/');
        }
        full.push_str(url.trim_start_matches('/'));
        full
    }
}

// ============================================================================
// Content
// ============================================================================

/// Loaded document and its natural size
pub struct TipContent<D> {
    doc: Option<D>,
    tool: Option<u32>,
    size: Size,
}

impl<D: HtmlDocument> TipContent<D> {
    pub const fn new() -> Self {
        Self {
            doc: None,
            tool: None,
            size: Size::new(0, 0),
        }
    }

    /// Build the document for `tool`; the previous one is dropped first
    pub fn load<E>(&mut self, engine: &mut E, tool: u32, markup: &str, css: &str, container: &mut TipContainer) -> bool
    where
        E: HtmlEngine<Document = D>,
    {
        self.clear();

        container.set_tool(Some(tool));
        match engine.create_document(markup, css, container) {
            Some(doc) => {
                self.doc = Some(doc);
                self.tool = Some(tool);
                true
            }
            None => {
                warn!("[TOOLTIP] Document creation failed for tool {}", tool);
                false
            }
        }
    }

    /// Reflow to `max_width` and store the natural size
    pub fn render(&mut self, max_width: i32, container: &mut TipContainer) -> Size {
        if let Some(doc) = self.doc.as_mut() {
            let size = doc.render(max_width.max(0), container);
            self.size = Size::new(size.cx.max(0), size.cy.max(0));
        }
        self.size
    }

    /// Natural size of the last render
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn tool(&self) -> Option<u32> {
        self.tool
    }

    pub fn is_loaded_for(&self, tool: u32) -> bool {
        self.doc.is_some() && self.tool == Some(tool)
    }

    /// Paint into `viewport` (popup coordinates) scrolled by `scroll`
    pub fn paint(&mut self, dib: &mut Dib, viewport: &Rect, scroll: Point, container: &mut TipContainer) {
        let Some(doc) = self.doc.as_mut() else {
            return;
        };
        let Some(clip) = viewport.intersect(&dib.rect()) else {
            return;
        };

        let origin = Point::new(viewport.left - scroll.x, viewport.top - scroll.y);
        doc.draw(dib, origin, &clip, container);
    }

    pub fn mouse_over(&mut self, pt: Point, container: &mut TipContainer) -> bool {
        self.doc.as_mut().is_some_and(|doc| doc.on_mouse_over(pt, container))
    }

    pub fn mouse_leave(&mut self, container: &mut TipContainer) -> bool {
        self.doc.as_mut().is_some_and(|doc| doc.on_mouse_leave(container))
    }

    pub fn lbutton_down(&mut self, pt: Point, container: &mut TipContainer) -> bool {
        self.doc.as_mut().is_some_and(|doc| doc.on_lbutton_down(pt, container))
    }

    pub fn lbutton_up(&mut self, pt: Point, container: &mut TipContainer) -> bool {
        self.doc.as_mut().is_some_and(|doc| doc.on_lbutton_up(pt, container))
    }

    /// Drop the document
    pub fn clear(&mut self) {
        self.doc = None;
        self.tool = None;
        self.size = Size::new(0, 0);
    }
}

impl<D: HtmlDocument> Default for TipContent<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockCallback, MockEngine};

    #[test]
    fn test_make_url() {
        let c = TipContainer::new();
        assert_eq!(c.make_url("a.png", ""), "a.png");
        assert_eq!(c.make_url("a.png", "res://tips"), "res://tips/a.png");
        assert_eq!(c.make_url("/a.png", "res://tips/"), "res://tips/a.png");
        assert_eq!(c.make_url("http://x/a.png", "res://tips"), "http://x/a.png");
    }

    #[test]
    fn test_image_fetch_outcomes() {
        let mut c = TipContainer::new();
        assert!(c.get_image("a.png", true).is_none());

        let (callback, log) = MockCallback::new();
        c.set_callback(Some(Box::new(callback)));
        c.set_tool(Some(4));

        log.borrow_mut().image = ImageFetch::Pending;
        assert!(c.get_image("a.png", true).is_none());

        log.borrow_mut().image = ImageFetch::Ready(Rc::new(Dib::new(2, 2)));
        assert_eq!(c.get_image("a.png", true).map(|d| d.width()), Some(2));

        assert_eq!(log.borrow().image_requests, alloc::vec![(4, String::from("a.png")); 2]);
    }

    #[test]
    fn test_load_render_clear() {
        let (mut engine, _) = MockEngine::new();
        let mut c = TipContainer::new();
        let mut content = TipContent::new();

        assert!(content.load(&mut engine, 1, "hello", "", &mut c));
        assert!(content.is_loaded_for(1));
        assert!(!content.is_loaded_for(2));

        let size = content.render(400, &mut c);
        assert_eq!(size, Size::new(30, 14));
        assert_eq!(content.size(), size);

        content.clear();
        assert!(!content.is_loaded_for(1));
        assert_eq!(content.size(), Size::new(0, 0));
    }

    #[test]
    fn test_failed_document_leaves_nothing_loaded() {
        let (mut engine, _) = MockEngine::new();
        engine.fail = true;
        let mut c = TipContainer::new();
        let mut content = TipContent::new();

        assert!(!content.load(&mut engine, 1, "hello", "", &mut c));
        assert!(content.tool().is_none());
    }
}
