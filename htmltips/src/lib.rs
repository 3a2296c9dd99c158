//! HTML Tooltips
//!
//! Rich-content tooltips anchored to regions of owner windows: when a tip
//! appears, where it goes relative to its anchor and the desktop, which
//! shape it is drawn with, and how its chrome bitmap is cached across
//! redraws.
//!
//! # Architecture
//!
//! - **tools** - Tool registry and anchor hit testing
//! - **layout** - Popup size and placement, balloon leg anchor
//! - **bg_cache** - Chrome rendering (frame, fill, leg) and its cache
//! - **content** - Document loading, measuring and painting
//! - **tooltips** - Visibility state machine and message dispatch
//! - **gdi** - 32bpp DIB, path construction and scanline fill
//!
//! HTML layout, windowing and image loading stay outside the crate, behind
//! [`HtmlEngine`], [`WindowHost`] and [`TooltipsCallback`].
//!
//! # Usage
//!
//! ```ignore
//! let mut tips = Tooltips::new(host, engine, 8);
//! tips.create(parent)?;
//! tips.add_tool(1, "<b>Save</b> the document", toolbar, rc_save, ToolOptions::empty());
//!
//! // Popup window procedure
//! if let Some(result) = tips.process_message(msg, wparam, lparam) {
//!     return result;
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::new_without_default)]

extern crate alloc;

pub mod bg_cache;
pub mod config;
pub mod content;
pub mod error;
pub mod gdi;
pub mod host;
pub mod html;
pub mod layout;
pub mod message;
pub mod tools;
pub mod tooltips;
pub mod types;

#[cfg(test)]
mod testing;

pub use bg_cache::BgCache;
pub use config::{TipColors, TipConfig, TipTimes};
pub use error::TipError;
pub use gdi::{Dib, RgbQuad};
pub use host::{CursorShape, TimerId, WindowHost};
pub use html::{DocumentContainer, HtmlDocument, HtmlEngine, ImageFetch, TooltipsCallback};
pub use layout::{TipLayout, TipStyle};
pub use tools::{TipAlign, Tool, ToolOptions, ToolRegistry};
pub use tooltips::{TipState, TipStats, Tooltips};
pub use types::{ColorRef, Point, Rect, Size, HWND};
