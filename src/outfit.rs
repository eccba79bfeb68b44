//! The outfit engine: owns one render pass's worth of constructed entities
//! and runs the pose → conflict → ordering → compositing pipeline.
//!
//! An [`Outfit`] is built from records the data collaborators have already
//! fetched and validated (species/color compatibility checked, items without
//! appearance data for the pair dropped or left appearance-less). It is
//! immutable after construction and discarded after the render; nothing is
//! cached across calls.
//!
//! # Example
//!
//! ```no_run
//! use std::io::Cursor;
//! use wardrobe_renderer::{AssetFetcher, CanvasSize, Outfit};
//!
//! # async fn example(
//! #     outfit: Outfit,
//! #     fetcher: &dyn AssetFetcher,
//! # ) -> wardrobe_renderer::RenderResult<()> {
//! // Inspect what will actually be worn before rendering.
//! for item in outfit.worn_items() {
//!     println!("wearing: {:?}", item.name);
//! }
//!
//! let mut sink = Cursor::new(Vec::new());
//! outfit.render(fetcher, &mut sink).await?;
//! // `sink` now holds the PNG, rewound to the start.
//! # Ok(())
//! # }
//! ```

use std::io::{Seek, Write};

use tracing::debug;

use crate::appearance::{AppearanceLayer, BaseAppearance, ColorRef, SpeciesRef, WearableItem};
use crate::conflict::resolve_conflicts;
use crate::error::{RenderError, RenderResult};
use crate::fetch::AssetFetcher;
use crate::ordering;
use crate::pose::{fallback_poses, Pose, PoseCapabilities};
use crate::render::{composite, CanvasSize, RenderSubject};

// ============================================================================
// Outfit
// ============================================================================

/// One avatar customization, ready to render.
#[derive(Debug, Clone)]
pub struct Outfit {
    species: SpeciesRef,
    color: ColorRef,
    capabilities: PoseCapabilities,
    pose: Pose,
    /// One base appearance per valid pose of the species/color pair.
    appearances: Vec<BaseAppearance>,
    /// Items in equip order; later position = equipped more recently.
    items: Vec<WearableItem>,
    size: CanvasSize,
    name: Option<String>,
}

impl Outfit {
    /// Assembles an outfit from already-fetched records.
    pub fn new(
        species: SpeciesRef,
        color: ColorRef,
        capabilities: PoseCapabilities,
        pose: Pose,
        appearances: Vec<BaseAppearance>,
        items: Vec<WearableItem>,
    ) -> Self {
        Self {
            species,
            color,
            capabilities,
            pose,
            appearances,
            items,
            size: CanvasSize::default(),
            name: None,
        }
    }

    /// Sets the output canvas size (default [`CanvasSize::Large`]).
    pub fn with_size(mut self, size: CanvasSize) -> Self {
        self.size = size;
        self
    }

    /// Attaches a display name, carried through for callers' own use.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    // ---- Read-only accessors ----

    pub fn species(&self) -> &SpeciesRef {
        &self.species
    }

    pub fn color(&self) -> &ColorRef {
        &self.color
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The items as given, in equip order, before conflict resolution.
    pub fn items(&self) -> &[WearableItem] {
        &self.items
    }

    // ---- Pose resolution ----

    /// The acceptable poses for this outfit, closest to the desired pose
    /// first, filtered by the capability mask. Empty means nothing can be
    /// rendered for this species/color pair.
    pub fn valid_poses(&self, override_pose: Option<Pose>) -> Vec<Pose> {
        fallback_poses(override_pose.unwrap_or(self.pose), self.capabilities)
    }

    /// The pose a render would actually use, if any pose is valid.
    pub fn resolved_pose(&self) -> Option<Pose> {
        self.valid_poses(None).into_iter().next()
    }

    /// The base appearance record for a specific pose, if one was fetched.
    pub fn appearance_for(&self, pose: Pose) -> Option<&BaseAppearance> {
        self.appearances.iter().find(|a| a.pose == pose)
    }

    // ---- Item and layer resolution ----

    /// The items that remain worn after zone conflict resolution, in equip
    /// order. Callers can diff this against [`Self::items`] to show what got
    /// evicted.
    pub fn worn_items(&self) -> Vec<WearableItem> {
        resolve_conflicts(&self.items)
    }

    /// The final bottom-to-top, visibility-filtered layer sequence for the
    /// resolved pose (or an override).
    pub fn visible_layers(&self, override_pose: Option<Pose>) -> RenderResult<Vec<AppearanceLayer>> {
        let (_, base) = self.resolve_appearance(override_pose)?;
        let worn = self.worn_items();
        Ok(ordering::visible_layers(base, &worn))
    }

    // ---- Rendering ----

    /// Renders the outfit as a PNG into `sink`, which is rewound afterwards
    /// so it is immediately readable.
    pub async fn render<W, F>(&self, fetcher: &F, sink: &mut W) -> RenderResult<()>
    where
        W: Write + Seek,
        F: AssetFetcher + ?Sized,
    {
        self.render_with_pose(fetcher, sink, None).await
    }

    /// Renders with a pose override instead of the outfit's desired pose.
    pub async fn render_with_pose<W, F>(
        &self,
        fetcher: &F,
        sink: &mut W,
        override_pose: Option<Pose>,
    ) -> RenderResult<()>
    where
        W: Write + Seek,
        F: AssetFetcher + ?Sized,
    {
        let (pose, base) = self.resolve_appearance(override_pose)?;
        let worn = self.worn_items();
        debug!(
            species = self.species.id,
            color = self.color.id,
            ?pose,
            worn = worn.len(),
            "rendering outfit"
        );

        let layers = ordering::visible_layers(base, &worn);
        let subject = RenderSubject {
            species_id: self.species.id,
            color_id: self.color.id,
            pose,
        };
        composite(&layers, self.size, fetcher, subject, sink).await
    }

    /// Resolves the pose to render and its base appearance record.
    fn resolve_appearance(&self, override_pose: Option<Pose>) -> RenderResult<(Pose, &BaseAppearance)> {
        let pose = self
            .valid_poses(override_pose)
            .into_iter()
            .next()
            .ok_or(RenderError::MissingAppearance {
                species_id: self.species.id,
                color_id: self.color.id,
                pose: None,
            })?;

        let base = self
            .appearance_for(pose)
            .ok_or(RenderError::MissingAppearance {
                species_id: self.species.id,
                color_id: self.color.id,
                pose: Some(pose),
            })?;

        Ok((pose, base))
    }
}

// ============================================================================
// Tests
// ============================================================================
