//! Canvas renderer for the topology engine.
//!
//! Draws the current [`PrunedView`](crate::topology::PrunedView) on an HTML
//! canvas with:
//! - Physics-based node positioning via force simulation, frozen after a
//!   size-dependent number of ticks
//! - Pan, zoom, and node dragging (dragged nodes stay pinned)
//! - Click to expand a node's neighborhood or collapse a leaf
//! - Hover ring and name tooltip
//! - Link width scaled by capacity
//!
//! # Example
//!
//! ```ignore
//! use topology_graph::{ForceGraphCanvas, RawGraph, RawLink, RawNode};
//!
//! let data = RawGraph {
//!     nodes: vec![
//!         RawNode { id: "a".into(), name: Some("Alpha".into()), color: None },
//!         RawNode { id: "b".into(), name: None, color: None },
//!     ],
//!     links: vec![
//!         RawLink { id: "ab".into(), capacity: 100, source: "a".into(), target: "b".into() },
//!     ],
//! };
//!
//! view! { <ForceGraphCanvas data=data fullscreen=true /> }
//! ```

mod component;
mod render;
pub mod scale;
mod state;
pub mod theme;

pub use component::ForceGraphCanvas;
pub use theme::Theme;
