//! wardrobe-renderer: avatar outfit compositing
//!
//! This crate turns a base body appearance plus an ordered list of worn
//! items into one rendered image. It owns the algorithmic core of the
//! process:
//!
//! 1. **Pose fallback** — the desired pose is resolved against the
//!    species/color pair's capability bitmask along a fixed closeness table
//!    ([`fallback_poses`]).
//! 2. **Zone conflict resolution** — items claiming the same visual zones
//!    are resolved with a later-equipped-wins accumulator pass
//!    ([`resolve_conflicts`]).
//! 3. **Layer ordering** — base and item layers are merged, globally
//!    restricted zones filtered out, and the rest stable-sorted by zone
//!    depth ([`visible_layers`]).
//! 4. **Compositing** — layer images are fetched concurrently through an
//!    [`AssetFetcher`], then alpha-composited sequentially in paint order
//!    onto a transparent canvas and encoded as PNG ([`composite`]).
//!
//! Data fetching, pagination, and species/color validation live in
//! collaborators; this crate only consumes their already-constructed
//! records.
//!
//! # Example
//!
//! ```no_run
//! use std::io::Cursor;
//! use wardrobe_renderer::{
//!     AssetFetcher, CanvasSize, Outfit, Pose, PoseCapabilities,
//! };
//!
//! # async fn example(
//! #     species: wardrobe_renderer::SpeciesRef,
//! #     color: wardrobe_renderer::ColorRef,
//! #     capabilities: PoseCapabilities,
//! #     appearances: Vec<wardrobe_renderer::BaseAppearance>,
//! #     items: Vec<wardrobe_renderer::WearableItem>,
//! #     fetcher: &dyn AssetFetcher,
//! # ) -> wardrobe_renderer::RenderResult<()> {
//! let outfit = Outfit::new(species, color, capabilities, Pose::HappyFem, appearances, items)
//!     .with_size(CanvasSize::Medium);
//!
//! let mut sink = Cursor::new(Vec::new());
//! outfit.render(fetcher, &mut sink).await?;
//! # Ok(())
//! # }
//! ```

mod appearance;
mod conflict;
mod error;
mod fetch;
mod ordering;
mod outfit;
mod pose;
mod render;

pub use appearance::{
    AppearanceLayer, BaseAppearance, ColorRef, ItemAppearance, LayerRole, SpeciesRef,
    WearableItem, Zone,
};
pub use conflict::resolve_conflicts;
pub use error::{RenderError, RenderResult};
pub use fetch::{AssetFetcher, FetchError};
pub use ordering::visible_layers;
pub use outfit::Outfit;
pub use pose::{fallback_poses, Pose, PoseCapabilities};
pub use render::{composite, CanvasSize, RenderSubject};
