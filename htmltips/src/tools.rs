//! Tool Registry
//!
//! A tool is an anchor rectangle inside an owner window that shows a
//! tooltip when the pointer dwells over it. Tools are keyed by a caller
//! assigned id; registering an id again replaces the previous entry.
//!
//! Hit testing walks the tools in ascending id order, so overlapping
//! anchors always resolve to the lowest id.

extern crate alloc;

use crate::types::{Point, Rect, HWND};
use alloc::collections::BTreeMap;
use alloc::string::String;

// ============================================================================
// Tool Options
// ============================================================================

bitflags::bitflags! {
    /// Tool option flags (tool_opt_*)
    ///
    /// The low nibble holds the alignment, see [`TipAlign`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ToolOptions: u32 {
        /// Alignment field
        const ALIGN_MASK = 0x000F;
        /// Ask the callback for text and CSS when the tip is shown
        const ASK_TEXT = 0x0010;
        /// Tip accepts clicks and wheel input
        const INTERACTIVE = 0x0020;
    }
}

impl ToolOptions {
    /// Preferred alignment stored in the low nibble
    pub fn align(self) -> TipAlign {
        TipAlign::from_bits(self.bits() & Self::ALIGN_MASK.bits())
    }

    /// Replace the alignment field
    pub fn with_align(self, align: TipAlign) -> Self {
        Self::from_bits_retain((self.bits() & !Self::ALIGN_MASK.bits()) | align as u32)
    }

    pub fn is_interactive(self) -> bool {
        self.contains(Self::INTERACTIVE)
    }

    pub fn asks_text(self) -> bool {
        self.contains(Self::ASK_TEXT)
    }
}

/// Side of the anchor the tip is placed on
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TipAlign {
    /// Tip above the anchor
    #[default]
    Top = 0,
    /// Tip below the anchor
    Bottom = 1,
    /// Tip left of the anchor
    Left = 2,
    /// Tip right of the anchor
    Right = 3,
}

impl TipAlign {
    /// Decode the alignment nibble; unknown values fall back to `Top`
    pub const fn from_bits(bits: u32) -> Self {
        match bits {
            1 => TipAlign::Bottom,
            2 => TipAlign::Left,
            3 => TipAlign::Right,
            _ => TipAlign::Top,
        }
    }

    /// Opposite side, used when the preferred side has no room
    pub const fn mirror(self) -> Self {
        match self {
            TipAlign::Top => TipAlign::Bottom,
            TipAlign::Bottom => TipAlign::Top,
            TipAlign::Left => TipAlign::Right,
            TipAlign::Right => TipAlign::Left,
        }
    }

    /// True for tips placed above or below the anchor
    pub const fn is_vertical(self) -> bool {
        matches!(self, TipAlign::Top | TipAlign::Bottom)
    }
}

// ============================================================================
// Tool
// ============================================================================

/// One monitored anchor region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    /// Tip markup
    pub text: String,
    /// Owner window; `rect` is in its client coordinates
    pub owner: HWND,
    /// Anchor rectangle
    pub rect: Rect,
    pub options: ToolOptions,
}

impl Tool {
    pub fn new(text: &str, owner: HWND, rect: Rect, options: ToolOptions) -> Self {
        Self {
            text: String::from(text),
            owner,
            rect,
            options,
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Tools keyed by id
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<u32, Tool>,
}

impl ToolRegistry {
    pub const fn new() -> Self {
        Self { tools: BTreeMap::new() }
    }

    /// Insert or replace a tool; returns the replaced entry
    pub fn add_tool(&mut self, id: u32, text: &str, owner: HWND, rect: Rect, options: ToolOptions) -> Option<Tool> {
        self.tools.insert(id, Tool::new(text, owner, rect, options))
    }

    /// Remove a tool
    pub fn remove_tool(&mut self, id: u32) -> Option<Tool> {
        self.tools.remove(&id)
    }

    /// Remove every tool of an owner window, returning how many went away
    pub fn remove_owner_tools(&mut self, owner: HWND) -> usize {
        let before = self.tools.len();
        self.tools.retain(|_, tool| tool.owner != owner);
        before - self.tools.len()
    }

    pub fn clear(&mut self) {
        self.tools.clear();
    }

    pub fn get(&self, id: u32) -> Option<&Tool> {
        self.tools.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.tools.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// True if any tool is registered for `owner`
    pub fn has_owner(&self, owner: HWND) -> bool {
        self.tools.values().any(|tool| tool.owner == owner)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Tool)> {
        self.tools.iter().map(|(id, tool)| (*id, tool))
    }

    /// Move a tool's anchor rectangle
    pub fn set_tool_rect(&mut self, id: u32, rect: Rect) -> bool {
        match self.tools.get_mut(&id) {
            Some(tool) => {
                tool.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Replace a tool's markup
    pub fn set_tool_text(&mut self, id: u32, text: &str) -> bool {
        match self.tools.get_mut(&id) {
            Some(tool) => {
                tool.text = String::from(text);
                true
            }
            None => false,
        }
    }

    /// Tool under a point given in `owner` client coordinates
    pub fn find_tool(&self, owner: HWND, pt: Point) -> Option<u32> {
        self.tools
            .iter()
            .find(|(_, tool)| tool.owner == owner && tool.rect.contains_point(pt))
            .map(|(id, _)| *id)
    }
}
