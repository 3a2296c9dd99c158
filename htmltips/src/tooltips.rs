//! HTML Tooltip Control
//!
//! Top-level controller tying the tool registry, layout, background cache
//! and document content together, driven by owner window messages, popup
//! window messages and three one-shot timers.
//!
//! # Visibility States
//!
//! ```text
//!   Idle ──hover tool──► Pending ──show timer──► Shown
//!    ▲                      │                      │ pointer gone,
//!    │                      │ pointer gone         │ hide timer
//!    ├──────────────────────┘                      ▼
//!    └──────────inter-tip timer────────────────  Hiding
//! ```
//!
//! - **Pending**: dwell timer running for the hovered tool
//! - **Shown**: popup visible; leaving both the anchor and the popup arms
//!   the hide timer, coming back cancels it
//! - **Hiding**: popup hidden, inter-tip window running; another tool
//!   shows at once, the tool just hidden needs a full dwell
//!
//! # Messages
//!
//! The host forwards popup window messages to [`Tooltips::process_message`]
//! and subclassed owner messages to [`Tooltips::process_owner_message`].
//! Passive tips hide on any click or wheel input and let it fall through;
//! interactive tips forward the pointer to the document.

extern crate alloc;

use crate::bg_cache::BgCache;
use crate::config::{TipColors, TipConfig, TipTimes};
use crate::content::{TipContainer, TipContent};
use crate::error::TipError;
use crate::gdi::Dib;
use crate::host::{CursorShape, TimerId, WindowHost};
use crate::html::{HtmlEngine, TooltipsCallback};
use crate::layout::{calc_layout, calc_position, TipLayout, TipStyle};
use crate::message::{
    get_wheel_delta_wparam, get_x_lparam, get_y_lparam, UPDATE_REDRAW_ONLY, UPDATE_RE_RENDER, WHEEL_DELTA,
    WM_DESTROY, WM_KEYDOWN, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MBUTTONDOWN, WM_MOUSEHWHEEL, WM_MOUSELEAVE,
    WM_MOUSEMOVE, WM_MOUSEWHEEL, WM_RBUTTONDOWN, WM_REDRAW_TIP, WM_SETCURSOR, WM_TIMER, WM_UPDATE_TIP,
};
use crate::tools::{Tool, ToolOptions, ToolRegistry};
use crate::types::{Point, Rect, Size, HWND};
use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use log::{debug, info, trace, warn};

/// Pixels scrolled per wheel notch
pub const WHEEL_SCROLL_STEP: i32 = 40;

// ============================================================================
// State
// ============================================================================

/// Visibility state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TipState {
    #[default]
    Idle,
    /// Dwell timer running for `tool`
    Pending { tool: u32 },
    /// `tool` is visible
    Shown { tool: u32 },
    /// Inter-tip window after `last` was hidden
    Hiding { last: u32 },
}

impl TipState {
    /// Tool currently visible
    pub const fn shown_tool(self) -> Option<u32> {
        match self {
            TipState::Shown { tool } => Some(tool),
            _ => None,
        }
    }

    /// True if the state refers to `id` in any way
    const fn involves(self, id: u32) -> bool {
        match self {
            TipState::Idle => false,
            TipState::Pending { tool } | TipState::Shown { tool } => tool == id,
            TipState::Hiding { last } => last == id,
        }
    }
}

/// Presentation counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TipStats {
    /// Tips made visible (updates of a visible tip are not counted)
    pub shows: u32,
    /// Chrome renders
    pub bg_redraws: u32,
    /// Presents that reused the cached chrome
    pub bg_reuses: u32,
}

// ============================================================================
// Tooltips
// ============================================================================

/// HTML tooltip control for a set of owner windows
pub struct Tooltips<H: WindowHost, E: HtmlEngine> {
    host: H,
    engine: E,
    container: TipContainer,
    content: TipContent<E::Document>,
    tools: ToolRegistry,
    config: TipConfig,

    hwnd: Option<HWND>,
    parent: HWND,
    /// Composited popup image (chrome + content)
    dib: Option<Dib>,
    bg_cache: BgCache,

    state: TipState,
    /// Tool under the pointer, as of the last owner mouse move
    over_tool: Option<u32>,
    last_shown_tool: Option<u32>,
    /// Last known pointer position (screen)
    mouse_pos: Point,
    disabled: bool,
    layout: TipLayout,
    /// Anchor of the shown tool (screen)
    anchor_rect: Rect,
    scroll_pos: Point,
    hide_timer_active: bool,
    /// Tool hidden when the running inter-tip window opened
    inter_tip: Option<u32>,
    mouse_hover_on: bool,
    /// Owner asked for a leave notification
    owner_tracking: Option<HWND>,
    redraw_requested: bool,
    last_desktop: Option<Rect>,
    stats: TipStats,
}

impl<H: WindowHost, E: HtmlEngine> Tooltips<H, E> {
    /// Create a control; `radius` is the corner radius of rounded styles
    pub fn new(host: H, engine: E, radius: i32) -> Self {
        Self {
            host,
            engine,
            container: TipContainer::new(),
            content: TipContent::new(),
            tools: ToolRegistry::new(),
            config: TipConfig::new(radius),
            hwnd: None,
            parent: HWND::NULL,
            dib: None,
            bg_cache: BgCache::new(),
            state: TipState::Idle,
            over_tool: None,
            last_shown_tool: None,
            mouse_pos: Point::new(0, 0),
            disabled: false,
            layout: TipLayout::default(),
            anchor_rect: Rect::default(),
            scroll_pos: Point::new(0, 0),
            hide_timer_active: false,
            inter_tip: None,
            mouse_hover_on: false,
            owner_tracking: None,
            redraw_requested: false,
            last_desktop: None,
            stats: TipStats::default(),
        }
    }

    // ========================================================================
    // Lifetime
    // ========================================================================

    /// Create the popup window and hook the owners of registered tools
    pub fn create(&mut self, parent: HWND) -> Result<(), TipError> {
        if self.hwnd.is_some() {
            return Err(TipError::AlreadyCreated);
        }

        let Some(hwnd) = self.host.create_popup(parent) else {
            warn!("[TOOLTIP] Popup creation failed for parent {:#x}", parent.raw());
            return Err(TipError::PopupCreationFailed);
        };

        self.hwnd = Some(hwnd);
        self.parent = parent;
        for owner in self.owners() {
            self.host.subclass_owner(owner);
        }

        info!("[TOOLTIP] Created popup {:#x} (parent {:#x})", hwnd.raw(), parent.raw());
        Ok(())
    }

    /// Kill timers, unhook owners and destroy the popup window
    ///
    /// Registered tools survive; a later [`Tooltips::create`] hooks their
    /// owners again.
    pub fn destroy(&mut self) {
        let Some(hwnd) = self.hwnd else {
            return;
        };

        self.reset_state();
        if let Some(owner) = self.owner_tracking.take() {
            self.host.track_mouse_leave(owner, false);
        }
        for owner in self.owners() {
            self.host.unsubclass_owner(owner);
        }
        self.host.destroy_popup(hwnd);

        self.hwnd = None;
        self.dib = None;
        self.bg_cache.clear();
        self.content.clear();
        self.container.set_tool(None);
        self.redraw_requested = false;

        info!("[TOOLTIP] Destroyed popup {:#x}", hwnd.raw());
    }

    // ========================================================================
    // Tools
    // ========================================================================

    /// Register or replace a tool
    ///
    /// A replaced tool that is visible is re-rendered in place.
    pub fn add_tool(&mut self, id: u32, text: &str, owner: HWND, rect: Rect, options: ToolOptions) {
        let new_owner = !self.tools.has_owner(owner);
        let previous = self.tools.add_tool(id, text, owner, rect, options);

        if self.hwnd.is_some() {
            if new_owner {
                self.host.subclass_owner(owner);
            }
            if let Some(prev) = &previous {
                if prev.owner != owner && !self.tools.has_owner(prev.owner) {
                    self.host.unsubclass_owner(prev.owner);
                }
            }
        }

        if self.content.is_loaded_for(id) {
            self.content.clear();
        }

        debug!(
            "[TOOLTIP] {} tool {} owner={:#x} rect=({}, {}, {}, {})",
            if previous.is_some() { "Replaced" } else { "Added" },
            id,
            owner.raw(),
            rect.left,
            rect.top,
            rect.right,
            rect.bottom
        );

        if self.state.shown_tool() == Some(id) {
            self.update(id, true);
        }
    }

    /// Remove a tool; returns false for an unknown id
    pub fn remove_tool(&mut self, id: u32) -> bool {
        let Some(tool) = self.tools.remove_tool(id) else {
            return false;
        };

        self.forget_tool(id);
        if self.hwnd.is_some() && !self.tools.has_owner(tool.owner) {
            self.host.unsubclass_owner(tool.owner);
        }

        debug!("[TOOLTIP] Removed tool {}", id);
        true
    }

    /// Move a tool's anchor; a visible tip is repositioned
    pub fn set_tool_rect(&mut self, id: u32, rect: Rect) -> bool {
        if !self.tools.set_tool_rect(id, rect) {
            return false;
        }
        self.update(id, false);
        true
    }

    /// Replace a tool's markup; a visible tip is re-rendered
    pub fn set_tool_text(&mut self, id: u32, text: &str) -> bool {
        if !self.tools.set_tool_text(id, text) {
            return false;
        }
        if self.content.is_loaded_for(id) {
            self.content.clear();
        }
        self.update(id, true);
        true
    }

    /// Hide and remove every tool
    pub fn clear(&mut self) {
        self.reset_state();

        if self.hwnd.is_some() {
            for owner in self.owners() {
                self.host.unsubclass_owner(owner);
            }
        }

        self.tools.clear();
        self.content.clear();
        self.container.set_tool(None);
        self.last_shown_tool = None;
    }

    /// Distinct owner windows of the registered tools
    fn owners(&self) -> BTreeSet<HWND> {
        self.tools.iter().map(|(_, tool)| tool.owner).collect()
    }

    /// Drop every reference to a tool that is going away
    fn forget_tool(&mut self, id: u32) {
        if self.state.involves(id) || self.over_tool == Some(id) {
            self.reset_state();
        }
        if self.last_shown_tool == Some(id) {
            self.last_shown_tool = None;
        }
        if self.content.is_loaded_for(id) {
            self.content.clear();
            self.container.set_tool(None);
        }
    }

    fn is_tool_interactive(&self, id: u32) -> bool {
        self.tools.get(id).is_some_and(|tool| tool.options.is_interactive())
    }

    /// Visible tool, if it takes pointer input
    fn shown_interactive(&self) -> Option<u32> {
        self.state.shown_tool().filter(|id| self.is_tool_interactive(*id))
    }

    // ========================================================================
    // Show / Hide
    // ========================================================================

    /// Show tool `id`
    ///
    /// `top` is the initial vertical scroll offset. With `is_update` a
    /// visible tip keeps its scroll position; `re_render` rebuilds the
    /// document from the tool text. Unknown ids are ignored.
    pub fn show(&mut self, id: u32, top: i32, is_update: bool, re_render: bool) {
        if self.hwnd.is_none() || self.disabled {
            return;
        }
        let Some(tool) = self.tools.get(id).cloned() else {
            return;
        };

        self.stop_timers();

        // Ask-text tools fetch fresh text every time they appear
        let ask_text = !is_update && tool.options.asks_text();
        if re_render || ask_text || !self.content.is_loaded_for(id) {
            let (markup, css) = self.tool_markup(id, &tool);
            if !self.content.load(&mut self.engine, id, &markup, &css, &mut self.container) {
                self.reset_state();
                return;
            }
            self.content.render(self.config.max_size.cx, &mut self.container);
        }
        self.container.set_tool(Some(id));

        let was_shown = self.state.shown_tool();
        let align = tool.options.align();
        let mut layout = calc_layout(
            self.content.size(),
            self.config.max_size,
            self.config.style,
            self.config.radius,
            align,
        );

        let origin = self.host.client_to_screen(tool.owner, Point::new(tool.rect.left, tool.rect.top));
        let rc_tool = Rect::from_origin(origin.x, origin.y, tool.rect.width(), tool.rect.height());
        let desktop = self.desktop_rect(tool.owner, Point::new(rc_tool.center_x(), rc_tool.center_y()));
        calc_position(align, &rc_tool, &mut layout, &desktop, false);

        self.layout = layout;
        self.anchor_rect = rc_tool;
        self.container
            .set_client(Rect::new(0, 0, layout.content_width, layout.content_height));

        if !is_update || was_shown != Some(id) {
            self.scroll_pos = Point::new(0, top);
        }
        self.clamp_scroll();

        if was_shown != Some(id) {
            self.stats.shows += 1;
            debug!(
                "[TOOLTIP] Show tool {} at ({}, {}) {}x{} align={:?}",
                id, layout.x, layout.y, layout.width, layout.height, layout.align
            );
        }

        self.state = TipState::Shown { tool: id };
        self.over_tool = Some(id);
        self.draw_window();
        self.start_hover_tracking(true);
    }

    /// Hide the visible tip and cancel pending timers
    pub fn hide(&mut self) {
        if self.hwnd.is_some() {
            self.reset_state();
        }
    }

    /// Refresh tool `id` if it is visible
    pub fn update(&mut self, id: u32, re_render: bool) {
        if self.state.shown_tool() == Some(id) {
            self.show(id, self.scroll_pos.y, true, re_render);
        }
    }

    /// Refresh tool `id` if it is visible; `redraw_only` repaints the
    /// current layout without measuring again
    pub fn update_tool(&mut self, id: u32, re_render: bool, redraw_only: bool) {
        if self.state.shown_tool() != Some(id) {
            return;
        }
        if redraw_only {
            self.draw_window();
        } else {
            self.update(id, re_render);
        }
    }

    /// Queue a [`WM_UPDATE_TIP`] for tool `id`
    pub fn post_update(&mut self, id: u32, re_render: bool, redraw_only: bool) {
        let Some(hwnd) = self.hwnd else {
            return;
        };

        let mut flags = 0;
        if re_render {
            flags |= UPDATE_RE_RENDER;
        }
        if redraw_only {
            flags |= UPDATE_REDRAW_ONLY;
        }
        self.host.post_message(hwnd, WM_UPDATE_TIP, id as usize, flags);
    }

    /// Tool currently visible
    pub fn current_tip_id(&self) -> Option<u32> {
        self.state.shown_tool()
    }

    /// Markup and CSS for a tool, asking the callback for ask-text tools
    fn tool_markup(&mut self, id: u32, tool: &Tool) -> (String, String) {
        if tool.options.asks_text() {
            if let Some(callback) = self.container.callback_mut() {
                if let Some(text) = callback.get_text(id) {
                    return text;
                }
            }
        }
        (tool.text.clone(), String::new())
    }

    /// Back to `Idle`, hiding the visible tip
    fn reset_state(&mut self) {
        self.stop_timers();
        if let TipState::Shown { tool } = self.state {
            self.hide_current_tool(tool);
        }
        self.state = TipState::Idle;
        self.over_tool = None;
    }

    fn hide_current_tool(&mut self, tool: u32) {
        if let Some(hwnd) = self.hwnd {
            self.host.hide_popup(hwnd);
        }
        self.start_hover_tracking(false);
        self.release_tool(tool);

        debug!("[TOOLTIP] Hide tool {}", tool);
    }

    /// Pointer state of a tool that stops being visible
    fn release_tool(&mut self, tool: u32) {
        if self.is_tool_interactive(tool) {
            self.content.mouse_leave(&mut self.container);
        }
        self.container.reset_cursor();
        self.last_shown_tool = Some(tool);
    }

    /// Replace the visible tool without hiding the popup
    fn switch_tool(&mut self, from: u32, to: u32) {
        self.release_tool(from);
        debug!("[TOOLTIP] Switch tool {} -> {}", from, to);
        self.show(to, 0, false, false);
    }

    /// Hidden by the hide timer: open the inter-tip window
    fn enter_hiding(&mut self, hwnd: HWND, tool: u32) {
        self.over_tool = None;

        if self.config.times.hide_interval > 0 {
            self.state = TipState::Hiding { last: tool };
            self.inter_tip = Some(tool);
            self.host
                .set_timer(hwnd, TimerId::HideInterval, self.config.times.hide_interval);
        } else {
            self.state = TipState::Idle;
        }
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Composite chrome and content and hand the image to the host
    fn draw_window(&mut self) {
        let Some(hwnd) = self.hwnd else {
            return;
        };

        let layout = self.layout;
        let colors = self.config.colors;
        if self.bg_cache.need_redraw(&layout, colors.border) {
            self.bg_cache.draw(&layout, &colors, self.config.alpha);
            self.stats.bg_redraws += 1;
        } else {
            self.stats.bg_reuses += 1;
        }

        let Some(bg) = self.bg_cache.dib() else {
            return;
        };

        let mut dib = match self.dib.take() {
            Some(dib) if dib.width() == layout.width && dib.height() == layout.height => dib,
            _ => Dib::new(layout.width, layout.height),
        };
        dib.bit_blt(0, 0, bg);
        self.content
            .paint(&mut dib, &layout.content_rect(), self.scroll_pos, &mut self.container);

        self.host.present_popup(hwnd, &layout.outer_rect(), &dib);
        self.dib = Some(dib);
    }

    /// Work area for a tool, falling back to the last known bounds and
    /// then to the primary display
    fn desktop_rect(&mut self, owner: HWND, pt: Point) -> Rect {
        match self.host.desktop_rect(owner, pt) {
            Some(rc) => {
                self.last_desktop = Some(rc);
                rc
            }
            None => {
                warn!("[TOOLTIP] No work area at ({}, {}), using fallback", pt.x, pt.y);
                self.last_desktop
                    .unwrap_or_else(|| self.host.primary_desktop_rect())
            }
        }
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    /// Largest scroll offsets for the current content and viewport
    fn max_scroll(&self) -> Point {
        let size = self.content.size();
        Point::new(
            (size.cx - self.layout.content_width).max(0),
            (size.cy - self.layout.content_height).max(0),
        )
    }

    fn clamp_scroll(&mut self) {
        let max = self.max_scroll();
        self.scroll_pos = Point::new(self.scroll_pos.x.clamp(0, max.x), self.scroll_pos.y.clamp(0, max.y));
    }

    /// True if the visible content exceeds its viewport
    pub fn can_scroll(&self) -> bool {
        let max = self.max_scroll();
        self.state.shown_tool().is_some() && (max.x > 0 || max.y > 0)
    }

    /// Scroll vertically by `dy`; returns whether the offset changed
    pub fn scroll(&mut self, dy: i32) -> bool {
        if self.state.shown_tool().is_none() {
            return false;
        }

        let y = self.scroll_pos.y.saturating_add(dy).clamp(0, self.max_scroll().y);
        if y == self.scroll_pos.y {
            return false;
        }

        self.scroll_pos.y = y;
        self.draw_window();
        true
    }

    /// Scroll horizontally by `dx`; returns whether the offset changed
    pub fn hscroll(&mut self, dx: i32) -> bool {
        if self.state.shown_tool().is_none() {
            return false;
        }

        let x = self.scroll_pos.x.saturating_add(dx).clamp(0, self.max_scroll().x);
        if x == self.scroll_pos.x {
            return false;
        }

        self.scroll_pos.x = x;
        self.draw_window();
        true
    }

    /// Popup point to document point
    fn content_point(&self, pt: Point) -> Point {
        Point::new(
            pt.x - self.layout.content_x + self.scroll_pos.x,
            pt.y - self.layout.content_y + self.scroll_pos.y,
        )
    }

    // ========================================================================
    // Settings
    // ========================================================================

    pub fn set_style(&mut self, style: TipStyle) {
        if self.config.style != style {
            self.config.style = style;
            self.bg_cache.clear();
            self.refresh_layout();
        }
    }

    /// Suppress (or allow again) tips; disabling hides the visible tip
    pub fn disable(&mut self, val: bool) {
        if self.disabled == val {
            return;
        }

        if val {
            self.reset_state();
        }
        self.disabled = val;
        debug!("[TOOLTIP] {}", if val { "Disabled" } else { "Enabled" });
    }

    /// Maximum content size before the tip scrolls
    pub fn set_max_size(&mut self, width: i32, height: i32) {
        self.config.max_size = Size::new(width.max(0), height.max(0));
        self.content.clear();
        self.refresh_layout();
    }

    pub fn set_times(&mut self, show_time: u32, hide_time: u32, hide_time_int: u32) {
        self.config.times = TipTimes::new(show_time, hide_time, hide_time_int);
    }

    /// Derive the hide and inter-tip delays from the dwell time
    pub fn set_times_automatic(&mut self, show_time: u32) {
        self.config.times = TipTimes::automatic(show_time);
    }

    pub fn set_callback(&mut self, callback: Box<dyn TooltipsCallback>) {
        self.container.set_callback(Some(callback));
    }

    /// Chrome opacity
    pub fn set_alpha(&mut self, alpha: u8) {
        if self.config.alpha != alpha {
            self.config.alpha = alpha;
            self.bg_cache.clear();
            self.redraw_shown();
        }
    }

    pub fn set_colors(&mut self, colors: TipColors) {
        if self.config.colors != colors {
            self.config.colors = colors;
            self.bg_cache.clear();
            self.redraw_shown();
        }
    }

    /// Font used by documents that do not set one
    pub fn set_def_font(&mut self, font_name: &str, font_size: i32) {
        self.container.set_def_font(font_name, font_size);
        self.content.clear();
        self.refresh_layout();
    }

    /// Lay the visible tip out again
    fn refresh_layout(&mut self) {
        if let Some(id) = self.state.shown_tool() {
            self.show(id, self.scroll_pos.y, true, false);
        }
    }

    fn redraw_shown(&mut self) {
        if self.state.shown_tool().is_some() {
            self.draw_window();
        }
    }

    pub fn state(&self) -> TipState {
        self.state
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn config(&self) -> &TipConfig {
        &self.config
    }

    /// Layout of the visible (or last visible) tip
    pub fn layout(&self) -> &TipLayout {
        &self.layout
    }

    pub fn scroll_pos(&self) -> Point {
        self.scroll_pos
    }

    pub fn stats(&self) -> TipStats {
        self.stats
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn hwnd(&self) -> Option<HWND> {
        self.hwnd
    }

    pub fn parent(&self) -> HWND {
        self.parent
    }

    /// Tool hidden most recently
    pub fn last_shown_tool(&self) -> Option<u32> {
        self.last_shown_tool
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// An image requested with `redraw_on_ready` has arrived
    ///
    /// Completions are coalesced: one [`WM_REDRAW_TIP`] is posted until
    /// the popup processes it.
    pub fn on_image_ready(&mut self) {
        let Some(hwnd) = self.hwnd else {
            return;
        };
        if self.redraw_requested {
            return;
        }

        self.redraw_requested = true;
        self.host.post_message(hwnd, WM_REDRAW_TIP, 0, 0);
        trace!("[TOOLTIP] Redraw posted");
    }

    fn on_redraw(&mut self) {
        self.redraw_requested = false;

        if let Some(id) = self.state.shown_tool() {
            self.content.render(self.config.max_size.cx, &mut self.container);
            self.show(id, self.scroll_pos.y, true, false);
        }
    }

    // ========================================================================
    // Timers
    // ========================================================================

    fn stop_timers(&mut self) {
        self.inter_tip = None;
        let Some(hwnd) = self.hwnd else {
            return;
        };

        for id in [TimerId::Show, TimerId::Hide, TimerId::HideInterval] {
            self.host.kill_timer(hwnd, id);
        }
        self.hide_timer_active = false;
    }

    fn start_hide_timer(&mut self, hwnd: HWND) {
        if !self.hide_timer_active {
            self.hide_timer_active = true;
            self.host.set_timer(hwnd, TimerId::Hide, self.config.times.hide);
            trace!("[TOOLTIP] Hide timer armed ({} ms)", self.config.times.hide);
        }
    }

    fn cancel_hide_timer(&mut self, hwnd: HWND) {
        if self.hide_timer_active {
            self.hide_timer_active = false;
            self.host.kill_timer(hwnd, TimerId::Hide);
        }
    }

    /// Hover `id` and (re)start the dwell timer
    ///
    /// A running inter-tip window keeps running.
    fn start_dwell(&mut self, hwnd: HWND, id: u32) {
        self.over_tool = Some(id);
        self.state = TipState::Pending { tool: id };
        self.host.set_timer(hwnd, TimerId::Show, self.config.times.show);
        trace!("[TOOLTIP] Dwell on tool {} ({} ms)", id, self.config.times.show);
    }

    fn on_timer(&mut self, hwnd: HWND, id: TimerId) {
        self.host.kill_timer(hwnd, id);
        trace!("[TOOLTIP] Timer {:?} in {:?}", id, self.state);

        match id {
            TimerId::Show => {
                if let TipState::Pending { tool } = self.state {
                    self.show(tool, 0, false, false);
                }
            }
            TimerId::Hide => {
                self.hide_timer_active = false;
                if let TipState::Shown { tool } = self.state {
                    self.hide_current_tool(tool);
                    self.enter_hiding(hwnd, tool);
                }
            }
            TimerId::HideInterval => {
                self.inter_tip = None;
                if let TipState::Hiding { .. } = self.state {
                    self.state = TipState::Idle;
                }
            }
        }
    }

    // ========================================================================
    // Owner Messages
    // ========================================================================

    /// Message of a subclassed owner window; the owner processes it
    /// normally afterwards
    pub fn process_owner_message(&mut self, owner: HWND, msg: u32, _wparam: usize, lparam: isize) {
        if self.hwnd.is_none() {
            return;
        }

        match msg {
            WM_MOUSEMOVE => {
                let pt = Point::new(get_x_lparam(lparam), get_y_lparam(lparam));
                self.on_mouse_over_tool(owner, pt);
            }
            WM_MOUSELEAVE => self.on_owner_leave(owner),
            WM_LBUTTONDOWN | WM_RBUTTONDOWN | WM_MBUTTONDOWN | WM_KEYDOWN | WM_MOUSEWHEEL => {
                if self.state != TipState::Idle {
                    self.hide();
                }
            }
            WM_DESTROY => self.on_owner_destroy(owner),
            _ => {}
        }
    }

    fn on_mouse_over_tool(&mut self, owner: HWND, pt: Point) {
        let Some(hwnd) = self.hwnd else {
            return;
        };

        self.mouse_pos = self.host.client_to_screen(owner, pt);
        if self.disabled {
            return;
        }

        let hit = self.tools.find_tool(owner, pt);
        if hit.is_some() {
            self.track_owner(owner);
        }

        match (self.state, hit) {
            (TipState::Idle, Some(id)) => self.start_dwell(hwnd, id),
            (TipState::Idle, None) => {}

            (TipState::Pending { tool }, Some(id)) if id == tool => {}
            (TipState::Pending { .. }, Some(id)) if self.in_inter_tip(id) => self.show(id, 0, false, false),
            (TipState::Pending { .. }, Some(id)) => self.start_dwell(hwnd, id),
            (TipState::Pending { .. }, None) => self.cancel_dwell(hwnd),

            (TipState::Shown { tool }, Some(id)) if id == tool => self.cancel_hide_timer(hwnd),
            (TipState::Shown { tool }, Some(id)) => self.switch_tool(tool, id),
            (TipState::Shown { .. }, None) => {
                self.over_tool = None;
                if !self.layout.outer_rect().contains_point(self.mouse_pos) {
                    self.start_hide_timer(hwnd);
                }
            }

            (TipState::Hiding { .. }, Some(id)) if self.in_inter_tip(id) => self.show(id, 0, false, false),
            (TipState::Hiding { .. }, Some(id)) => self.start_dwell(hwnd, id),
            (TipState::Hiding { .. }, None) => {}
        }
    }

    /// True if `id` may skip the dwell: an inter-tip window is running
    /// and `id` is not the tool it was opened for
    fn in_inter_tip(&self, id: u32) -> bool {
        self.inter_tip.is_some_and(|last| last != id)
    }

    /// Drop the pending tool; back to the inter-tip window if one runs
    fn cancel_dwell(&mut self, hwnd: HWND) {
        self.host.kill_timer(hwnd, TimerId::Show);
        self.over_tool = None;
        self.state = match self.inter_tip {
            Some(last) => TipState::Hiding { last },
            None => TipState::Idle,
        };
    }

    /// Ask for a leave notification once the pointer is over one of
    /// `owner`'s tools
    fn track_owner(&mut self, owner: HWND) {
        if self.owner_tracking != Some(owner) {
            self.owner_tracking = Some(owner);
            self.host.track_mouse_leave(owner, true);
        }
    }

    fn on_owner_leave(&mut self, owner: HWND) {
        let Some(hwnd) = self.hwnd else {
            return;
        };

        if self.owner_tracking == Some(owner) {
            self.owner_tracking = None;
        }
        self.over_tool = None;
        match self.state {
            TipState::Pending { .. } => self.cancel_dwell(hwnd),
            TipState::Shown { .. } => {
                if !self.layout.outer_rect().contains_point(self.mouse_pos) {
                    self.start_hide_timer(hwnd);
                }
            }
            _ => {}
        }
    }

    /// Owner window is going away: drop its tools and unhook it
    fn on_owner_destroy(&mut self, owner: HWND) {
        let ids: Vec<u32> = self
            .tools
            .iter()
            .filter(|(_, tool)| tool.owner == owner)
            .map(|(id, _)| id)
            .collect();

        for id in &ids {
            self.forget_tool(*id);
        }
        self.tools.remove_owner_tools(owner);
        self.host.unsubclass_owner(owner);
        if self.owner_tracking == Some(owner) {
            self.owner_tracking = None;
        }

        debug!("[TOOLTIP] Owner {:#x} destroyed, {} tools removed", owner.raw(), ids.len());
    }

    // ========================================================================
    // Popup Messages
    // ========================================================================

    /// Message of the popup window
    ///
    /// Returns `Some(result)` when the message was consumed, `None` when it
    /// should get default processing. Messages arriving without a popup
    /// are ignored.
    pub fn process_message(&mut self, msg: u32, wparam: usize, lparam: isize) -> Option<isize> {
        let hwnd = self.hwnd?;
        let pt = Point::new(get_x_lparam(lparam), get_y_lparam(lparam));

        match msg {
            WM_TIMER => {
                if let Some(id) = TimerId::from_raw(wparam) {
                    self.on_timer(hwnd, id);
                }
                Some(0)
            }
            WM_REDRAW_TIP => {
                self.on_redraw();
                Some(0)
            }
            WM_UPDATE_TIP => {
                self.update_tool(
                    wparam as u32,
                    lparam & UPDATE_RE_RENDER != 0,
                    lparam & UPDATE_REDRAW_ONLY != 0,
                );
                Some(0)
            }
            WM_MOUSEMOVE => {
                self.on_popup_mouse_move(hwnd, pt);
                Some(0)
            }
            WM_MOUSELEAVE => {
                self.on_popup_mouse_leave(hwnd);
                Some(0)
            }
            WM_SETCURSOR => {
                self.shown_interactive()?;
                self.update_cursor();
                Some(1)
            }
            WM_LBUTTONDOWN | WM_LBUTTONUP => match self.shown_interactive() {
                Some(id) => {
                    self.on_popup_click(id, msg, pt);
                    Some(0)
                }
                None => {
                    self.hide();
                    None
                }
            },
            WM_RBUTTONDOWN | WM_MBUTTONDOWN => match self.shown_interactive() {
                Some(_) => Some(0),
                None => {
                    self.hide();
                    None
                }
            },
            WM_MOUSEWHEEL | WM_MOUSEHWHEEL => match self.shown_interactive() {
                Some(_) => {
                    let step = get_wheel_delta_wparam(wparam) * WHEEL_SCROLL_STEP / WHEEL_DELTA;
                    if msg == WM_MOUSEWHEEL {
                        self.scroll(-step);
                    } else {
                        self.hscroll(step);
                    }
                    Some(0)
                }
                None => {
                    self.hide();
                    None
                }
            },
            _ => None,
        }
    }

    fn on_popup_mouse_move(&mut self, hwnd: HWND, pt: Point) {
        let TipState::Shown { tool } = self.state else {
            return;
        };

        self.mouse_pos = Point::new(self.layout.x + pt.x, self.layout.y + pt.y);
        self.cancel_hide_timer(hwnd);
        self.start_hover_tracking(true);

        if self.is_tool_interactive(tool) {
            let doc_pt = self.content_point(pt);
            if self.content.mouse_over(doc_pt, &mut self.container) {
                self.draw_window();
            }
            self.update_cursor();
        }
    }

    fn on_popup_mouse_leave(&mut self, hwnd: HWND) {
        self.mouse_hover_on = false;
        let TipState::Shown { tool } = self.state else {
            return;
        };

        if self.is_tool_interactive(tool) {
            if self.content.mouse_leave(&mut self.container) {
                self.draw_window();
            }
            self.container.reset_cursor();
        }

        // Tracking starts at show time while the pointer is still on the anchor
        if !self.anchor_rect.contains_point(self.mouse_pos) {
            self.start_hide_timer(hwnd);
        }
    }

    fn on_popup_click(&mut self, tool: u32, msg: u32, pt: Point) {
        let doc_pt = self.content_point(pt);
        let redraw = if msg == WM_LBUTTONDOWN {
            self.content.lbutton_down(doc_pt, &mut self.container)
        } else {
            self.content.lbutton_up(doc_pt, &mut self.container)
        };
        if redraw {
            self.draw_window();
        }

        let Some(url) = self.container.take_anchor() else {
            return;
        };
        let handled = self
            .container
            .callback_mut()
            .is_some_and(|callback| callback.on_anchor_click(tool, &url));

        debug!("[TOOLTIP] Anchor {} in tool {} handled={}", url, tool, handled);
        if handled {
            self.hide();
        }
    }

    fn update_cursor(&mut self) {
        let shape = CursorShape::from_css(self.container.cursor());
        self.host.set_cursor(shape);
    }

    fn start_hover_tracking(&mut self, start: bool) {
        let Some(hwnd) = self.hwnd else {
            return;
        };
        if self.mouse_hover_on != start {
            self.mouse_hover_on = start;
            self.host.track_mouse_leave(hwnd, start);
        }
    }
}

impl<H: WindowHost, E: HtmlEngine> Drop for Tooltips<H, E> {
    fn drop(&mut self) {
        self.destroy();
    }
}
