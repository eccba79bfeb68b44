//! Render error taxonomy.
//!
//! Every failure aborts the whole render; there is no partial-success
//! return. Variants carry the identifiers needed to diagnose a bad asset or
//! an impossible species/color/pose combination.

use crate::fetch::FetchError;
use crate::pose::Pose;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No pose survived capability filtering, or no base appearance record
    /// exists for the resolved pose.
    #[error("no appearance exists for species {species_id} color {color_id} (pose {pose:?})")]
    MissingAppearance {
        species_id: u32,
        color_id: u32,
        /// `None` when no pose was valid at all.
        pose: Option<Pose>,
    },

    /// A layer's fetched bytes failed to decode as an image.
    #[error(
        "layer image broken: layer {layer_id} zone {zone_label:?} \
         (species {species_id} color {color_id} pose {pose:?})"
    )]
    BrokenLayerImage {
        layer_id: String,
        zone_label: String,
        species_id: u32,
        color_id: u32,
        pose: Pose,
        #[source]
        source: image::ImageError,
    },

    /// The binary-fetch collaborator failed for a layer. Retry policy, if
    /// any, belongs to the collaborator; this engine does not retry.
    #[error("asset retrieval failed for {image_url}")]
    AssetRetrieval {
        image_url: String,
        #[source]
        source: FetchError,
    },

    /// The final canvas could not be encoded or written to the sink.
    #[error("failed to encode rendered canvas")]
    Encode {
        #[from]
        source: image::ImageError,
    },
}
