//! Test doubles: a recording window host, a fixed-metrics HTML engine and
//! a scripted application callback.

extern crate alloc;

use crate::gdi::{Dib, RgbQuad};
use crate::host::{CursorShape, TimerId, WindowHost};
use crate::html::{DocumentContainer, HtmlDocument, HtmlEngine, ImageFetch, TooltipsCallback};
use crate::types::{Point, Rect, Size, HWND};
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

pub const POPUP: HWND = HWND::from_raw(0x100);

/// Screen position of every owner's client origin
pub const OWNER_ORIGIN: Point = Point::new(100, 100);

pub const PRIMARY_DESKTOP: Rect = Rect::new(0, 0, 800, 600);

/// Mock glyph cell
pub const CHAR_WIDTH: i32 = 6;
pub const LINE_HEIGHT: i32 = 14;

/// Target of the single link in mock documents
pub const LINK_URL: &str = "https://example.com/link";

/// Color mock documents paint their text box with
pub const INK: RgbQuad = RgbQuad::new(0, 0, 0, 255);

// ============================================================================
// Host
// ============================================================================

#[derive(Debug, Default)]
pub struct HostLog {
    pub popup: Option<HWND>,
    pub destroyed: bool,
    pub visible: bool,
    /// Every present: screen rectangle and image
    pub frames: Vec<(Rect, Dib)>,
    /// Armed timers and their elapse times
    pub timers: BTreeMap<usize, u32>,
    pub posted: Vec<(u32, usize, isize)>,
    pub cursor: CursorShape,
    pub subclassed: BTreeSet<HWND>,
    /// Windows with a leave notification requested
    pub tracking: BTreeSet<HWND>,
    /// Every leave tracking request, in order
    pub track_requests: Vec<(HWND, bool)>,
    /// Work area answer; `None` simulates a failed monitor query
    pub desktop: Option<Rect>,
}

impl HostLog {
    pub fn armed(&self, id: TimerId) -> bool {
        self.timers.contains_key(&(id as usize))
    }

    pub fn timer(&self, id: TimerId) -> Option<u32> {
        self.timers.get(&(id as usize)).copied()
    }

    pub fn last_frame(&self) -> Option<&(Rect, Dib)> {
        self.frames.last()
    }
}

pub struct MockHost {
    log: Rc<RefCell<HostLog>>,
    pub fail_create: bool,
}

impl MockHost {
    pub fn new() -> (Self, Rc<RefCell<HostLog>>) {
        let log = Rc::new(RefCell::new(HostLog {
            desktop: Some(Rect::new(0, 0, 1024, 768)),
            ..HostLog::default()
        }));
        let host = Self {
            log: log.clone(),
            fail_create: false,
        };
        (host, log)
    }
}

impl WindowHost for MockHost {
    fn create_popup(&mut self, _parent: HWND) -> Option<HWND> {
        if self.fail_create {
            return None;
        }
        self.log.borrow_mut().popup = Some(POPUP);
        Some(POPUP)
    }

    fn destroy_popup(&mut self, _hwnd: HWND) {
        let mut log = self.log.borrow_mut();
        log.popup = None;
        log.visible = false;
        log.destroyed = true;
    }

    fn subclass_owner(&mut self, owner: HWND) {
        self.log.borrow_mut().subclassed.insert(owner);
    }

    fn unsubclass_owner(&mut self, owner: HWND) {
        self.log.borrow_mut().subclassed.remove(&owner);
    }

    fn present_popup(&mut self, _hwnd: HWND, rect: &Rect, image: &Dib) {
        let mut log = self.log.borrow_mut();
        log.visible = true;
        log.frames.push((*rect, image.clone()));
    }

    fn hide_popup(&mut self, _hwnd: HWND) {
        self.log.borrow_mut().visible = false;
    }

    fn set_timer(&mut self, _hwnd: HWND, id: TimerId, elapse_ms: u32) {
        self.log.borrow_mut().timers.insert(id as usize, elapse_ms);
    }

    fn kill_timer(&mut self, _hwnd: HWND, id: TimerId) {
        self.log.borrow_mut().timers.remove(&(id as usize));
    }

    fn post_message(&mut self, _hwnd: HWND, msg: u32, wparam: usize, lparam: isize) {
        self.log.borrow_mut().posted.push((msg, wparam, lparam));
    }

    fn client_to_screen(&self, _hwnd: HWND, pt: Point) -> Point {
        pt.offset(OWNER_ORIGIN.x, OWNER_ORIGIN.y)
    }

    fn desktop_rect(&self, _hwnd: HWND, _pt: Point) -> Option<Rect> {
        self.log.borrow().desktop
    }

    fn primary_desktop_rect(&self) -> Rect {
        PRIMARY_DESKTOP
    }

    fn set_cursor(&mut self, cursor: CursorShape) {
        self.log.borrow_mut().cursor = cursor;
    }

    fn track_mouse_leave(&mut self, hwnd: HWND, track: bool) {
        let mut log = self.log.borrow_mut();
        log.track_requests.push((hwnd, track));
        if track {
            log.tracking.insert(hwnd);
        } else {
            log.tracking.remove(&hwnd);
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Document with fixed glyph metrics
///
/// Every markup character is one cell; text wraps at the render width.
/// Markup containing `<a` is one big link to [`LINK_URL`], markup
/// containing `<img` requests `image.png` on every render.
pub struct MockDocument {
    chars: i32,
    has_link: bool,
    has_image: bool,
    size: Size,
    hover: bool,
    pressed: bool,
}

impl MockDocument {
    fn hit(&self, pt: Point) -> bool {
        self.has_link && Rect::new(0, 0, self.size.cx, self.size.cy).contains_point(pt)
    }
}

impl HtmlDocument for MockDocument {
    fn render(&mut self, max_width: i32, container: &mut dyn DocumentContainer) -> Size {
        if self.has_image {
            container.get_image("image.png", true);
        }

        let width = self.chars * CHAR_WIDTH;
        self.size = if max_width <= 0 || width <= max_width {
            Size::new(width, LINE_HEIGHT)
        } else {
            let lines = (width + max_width - 1) / max_width;
            Size::new(max_width, lines * LINE_HEIGHT)
        };
        self.size
    }

    fn draw(&mut self, dib: &mut Dib, origin: Point, clip: &Rect, _container: &mut dyn DocumentContainer) {
        let text = Rect::from_origin(origin.x, origin.y, self.size.cx, self.size.cy);
        if let Some(rc) = text.intersect(clip) {
            dib.fill_rect(&rc, INK);
        }
    }

    fn on_mouse_over(&mut self, pt: Point, container: &mut dyn DocumentContainer) -> bool {
        let over = self.hit(pt);
        container.set_cursor(if over { "pointer" } else { "auto" });
        let changed = over != self.hover;
        self.hover = over;
        changed
    }

    fn on_mouse_leave(&mut self, container: &mut dyn DocumentContainer) -> bool {
        container.set_cursor("auto");
        let changed = self.hover;
        self.hover = false;
        changed
    }

    fn on_lbutton_down(&mut self, pt: Point, _container: &mut dyn DocumentContainer) -> bool {
        self.pressed = self.hit(pt);
        false
    }

    fn on_lbutton_up(&mut self, pt: Point, container: &mut dyn DocumentContainer) -> bool {
        if self.pressed && self.hit(pt) {
            container.on_anchor_click(LINK_URL);
        }
        self.pressed = false;
        false
    }
}

pub struct MockEngine {
    created: Rc<Cell<u32>>,
    pub fail: bool,
}

impl MockEngine {
    /// Engine plus a counter of created documents
    pub fn new() -> (Self, Rc<Cell<u32>>) {
        let created = Rc::new(Cell::new(0));
        let engine = Self {
            created: created.clone(),
            fail: false,
        };
        (engine, created)
    }
}

impl HtmlEngine for MockEngine {
    type Document = MockDocument;

    fn create_document(
        &mut self,
        markup: &str,
        _css: &str,
        _container: &mut dyn DocumentContainer,
    ) -> Option<MockDocument> {
        if self.fail {
            return None;
        }

        self.created.set(self.created.get() + 1);
        Some(MockDocument {
            chars: markup.chars().count() as i32,
            has_link: markup.contains("<a"),
            has_image: markup.contains("<img"),
            size: Size::new(0, 0),
            hover: false,
            pressed: false,
        })
    }
}

// ============================================================================
// Callback
// ============================================================================

/// Scripted answers and recorded requests
pub struct CallbackLog {
    pub image: ImageFetch,
    pub text: Option<(String, String)>,
    pub handle_clicks: bool,
    pub image_requests: Vec<(u32, String)>,
    pub text_requests: Vec<u32>,
    pub clicks: Vec<(u32, String)>,
}

impl Default for CallbackLog {
    fn default() -> Self {
        Self {
            image: ImageFetch::Failed,
            text: None,
            handle_clicks: false,
            image_requests: Vec::new(),
            text_requests: Vec::new(),
            clicks: Vec::new(),
        }
    }
}

pub struct MockCallback {
    log: Rc<RefCell<CallbackLog>>,
}

impl MockCallback {
    pub fn new() -> (Self, Rc<RefCell<CallbackLog>>) {
        let log = Rc::new(RefCell::new(CallbackLog::default()));
        (Self { log: log.clone() }, log)
    }
}

impl TooltipsCallback for MockCallback {
    fn get_image(&mut self, id: u32, url: &str, _redraw_on_ready: bool) -> ImageFetch {
        let mut log = self.log.borrow_mut();
        log.image_requests.push((id, String::from(url)));
        log.image.clone()
    }

    fn get_text(&mut self, id: u32) -> Option<(String, String)> {
        let mut log = self.log.borrow_mut();
        log.text_requests.push(id);
        log.text.clone()
    }

    fn on_anchor_click(&mut self, id: u32, url: &str) -> bool {
        let mut log = self.log.borrow_mut();
        log.clicks.push((id, String::from(url)));
        log.handle_clicks
    }
}
