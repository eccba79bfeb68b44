//! Pose variants, capability bitmasks, and pose-fallback resolution.
//!
//! Every species/color pair supports some subset of the eight pose variants,
//! encoded as a bitmask by the pose-capability collaborator. When the desired
//! pose is unsupported, rendering falls back along a fixed closeness-ordered
//! substitution table: same emotion in the other presentation first, then
//! milder emotions, with the unconverted/unknown poses as a last resort.

use serde::{Deserialize, Serialize};

// ============================================================================
// Pose
// ============================================================================

/// A discrete pose variant. Each variant owns one bit of the capability mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Pose {
    HappyMasc = 1,
    SadMasc = 2,
    SickMasc = 4,
    HappyFem = 8,
    SadFem = 16,
    SickFem = 32,
    Unconverted = 64,
    Unknown = 128,
}

impl Pose {
    /// The bit this pose occupies in a capability mask.
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Substitute poses for this pose, closest first. The pose itself is
    /// always the first entry, so index 0 of a filtered result is the pose
    /// actually rendered.
    pub const fn closest_poses(self) -> &'static [Pose; 8] {
        use Pose::*;
        match self {
            HappyMasc => &[
                HappyMasc,
                HappyFem,
                SadMasc,
                SadFem,
                SickMasc,
                SickFem,
                Unconverted,
                Unknown,
            ],
            HappyFem => &[
                HappyFem,
                HappyMasc,
                SadFem,
                SadMasc,
                SickFem,
                SickMasc,
                Unconverted,
                Unknown,
            ],
            SadMasc => &[
                SadMasc,
                SadFem,
                HappyMasc,
                HappyFem,
                SickMasc,
                SickFem,
                Unconverted,
                Unknown,
            ],
            SadFem => &[
                SadFem,
                SadMasc,
                HappyFem,
                HappyMasc,
                SickFem,
                SickMasc,
                Unconverted,
                Unknown,
            ],
            SickMasc => &[
                SickMasc,
                SickFem,
                SadMasc,
                SadFem,
                HappyMasc,
                HappyFem,
                Unconverted,
                Unknown,
            ],
            SickFem => &[
                SickFem,
                SickMasc,
                SadFem,
                SadMasc,
                HappyFem,
                HappyMasc,
                Unconverted,
                Unknown,
            ],
            Unconverted => &[
                Unconverted,
                Unknown,
                HappyMasc,
                HappyFem,
                SadMasc,
                SadFem,
                SickMasc,
                SickFem,
            ],
            Unknown => &[
                Unknown,
                Unconverted,
                HappyMasc,
                HappyFem,
                SadMasc,
                SadFem,
                SickMasc,
                SickFem,
            ],
        }
    }
}

// ============================================================================
// PoseCapabilities
// ============================================================================

/// The capability bitmask of a species/color pair: one bit per supported
/// pose variant, as returned by the pose-capability collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseCapabilities(pub u8);

impl PoseCapabilities {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0xFF);

    /// Builds a mask supporting exactly the given poses.
    pub fn from_poses(poses: &[Pose]) -> Self {
        Self(poses.iter().fold(0, |mask, pose| mask | pose.bit()))
    }

    /// Whether this mask supports the pose: `(mask & bit) == bit`.
    pub fn supports(self, pose: Pose) -> bool {
        self.0 & pose.bit() == pose.bit()
    }
}

// ============================================================================
// Fallback resolution
// ============================================================================

/// Resolves the ordered fallback sequence for a desired pose under a
/// capability mask.
///
/// Walks the desired pose's substitution table in closeness order and keeps
/// only the poses the mask supports. An empty result means no appearance can
/// be rendered at all and must be treated as fatal by the caller. The first
/// element of a non-empty result is the pose actually used; later elements
/// exist for introspection only.
pub fn fallback_poses(desired: Pose, capabilities: PoseCapabilities) -> Vec<Pose> {
    desired
        .closest_poses()
        .iter()
        .copied()
        .filter(|&pose| capabilities.supports(pose))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
