//! Appearance data entities: visual zones, paintable layers, and the
//! base-body / item records they belong to.
//!
//! All of these types are constructed once from the data collaborator's
//! camelCase JSON records immediately before a render pass and never mutated
//! afterwards. The resolution passes ([`crate::conflict`],
//! [`crate::ordering`]) are pure functions over them.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::pose::Pose;

// ============================================================================
// Zone
// ============================================================================

/// An identified visual region with a stacking depth.
///
/// Depth defines paint order: ascending depth is painted later, i.e. ends up
/// visually on top. Zones are shared across layers and restriction sets and
/// compared by `id` only — two distinct zones may carry the same depth, so
/// depth must never participate in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: u32,
    pub depth: u32,
    pub label: String,
}

impl Zone {
    pub fn new(id: u32, depth: u32, label: impl Into<String>) -> Self {
        Self {
            id,
            depth,
            label: label.into(),
        }
    }
}

impl PartialEq for Zone {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Zone {}

impl Hash for Zone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ============================================================================
// AppearanceLayer
// ============================================================================

/// Whether a layer came from the base body or from a worn item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerRole {
    /// Part of the base body appearance.
    Biology,
    /// Contributed by a worn item.
    #[default]
    Object,
}

/// A single paintable image layer.
///
/// The layer's zone determines both its paint order (via the zone depth) and
/// its membership in conflict/restriction checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceLayer {
    pub id: String,
    pub zone: Zone,
    /// Locator for the layer's raw encoded image bytes.
    pub image_url: String,
    /// Remote asset id, carried through for diagnostics.
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub role: LayerRole,
}

// ============================================================================
// Species / Color references
// ============================================================================

/// Lightweight species reference as embedded in appearance records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesRef {
    pub id: u32,
    pub name: String,
}

/// Lightweight color reference as embedded in appearance records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorRef {
    pub id: u32,
    pub name: String,
}

// ============================================================================
// BaseAppearance
// ============================================================================

/// The base body appearance for one (species, color, pose) triple.
///
/// One `BaseAppearance` exists per valid pose of a species/color pair. Its
/// `restricted_zones` may name zones that appear in no layer of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseAppearance {
    pub id: String,
    pub body_id: String,
    pub species: SpeciesRef,
    pub color: ColorRef,
    pub pose: Pose,
    pub layers: Vec<AppearanceLayer>,
    pub restricted_zones: Vec<Zone>,
}

impl BaseAppearance {
    /// Parses a base appearance from the data collaborator's JSON record,
    /// stamping every layer as body-derived.
    pub fn from_json(record: &str) -> Result<Self, serde_json::Error> {
        let mut appearance: Self = serde_json::from_str(record)?;
        for layer in &mut appearance.layers {
            layer.role = LayerRole::Biology;
        }
        Ok(appearance)
    }
}

// ============================================================================
// ItemAppearance
// ============================================================================

/// The visual data an item contributes for the active species/color.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAppearance {
    pub id: String,
    pub layers: Vec<AppearanceLayer>,
    pub restricted_zones: Vec<Zone>,
}

impl ItemAppearance {
    /// The zones this appearance paints into: the zones of its own layers.
    pub fn occupied_zones(&self) -> HashSet<Zone> {
        self.layers.iter().map(|layer| layer.zone.clone()).collect()
    }

    /// The zones this appearance forbids anyone from painting into.
    pub fn restricted_zone_set(&self) -> HashSet<Zone> {
        self.restricted_zones.iter().cloned().collect()
    }
}

// ============================================================================
// WearableItem
// ============================================================================

/// An equippable item record.
///
/// An item with no appearance data for the active species/color contributes
/// nothing: it occupies no zones, restricts no zones, and paints no layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WearableItem {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub is_nc: Option<bool>,
    #[serde(default)]
    pub is_pb: Option<bool>,
    #[serde(default, rename = "rarityIndex")]
    pub rarity: Option<i32>,
    #[serde(default, rename = "appearanceOn")]
    pub appearance: Option<ItemAppearance>,
}

impl WearableItem {
    /// Zones occupied by this item's layers; empty if it has no appearance.
    pub fn occupied_zones(&self) -> HashSet<Zone> {
        self.appearance
            .as_ref()
            .map(ItemAppearance::occupied_zones)
            .unwrap_or_default()
    }

    /// Zones restricted by this item; empty if it has no appearance.
    pub fn restricted_zones(&self) -> HashSet<Zone> {
        self.appearance
            .as_ref()
            .map(ItemAppearance::restricted_zone_set)
            .unwrap_or_default()
    }

    /// Occupied and restricted zones combined, the set an incoming item's
    /// footprint is tested against during conflict resolution.
    pub fn claimed_zones(&self) -> HashSet<Zone> {
        let mut zones = self.occupied_zones();
        zones.extend(self.restricted_zones());
        zones
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_identity_ignores_depth_and_label() {
        let a = Zone::new(7, 10, "Hat");
        let b = Zone::new(7, 99, "Renamed");
        let c = Zone::new(8, 10, "Hat");

        assert_eq!(a, b, "same id must compare equal regardless of depth");
        assert_ne!(a, c, "different ids must not compare equal");

        let set: HashSet<Zone> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2, "set semantics must follow id identity");
    }

    #[test]
    fn item_record_deserializes_from_camel_case() {
        let json = r#"{
            "id": 42,
            "name": "Blue Hat",
            "isNc": false,
            "isPb": true,
            "rarityIndex": 101,
            "appearanceOn": {
                "id": "item-42-on-1",
                "layers": [
                    {"id": "l1", "imageUrl": "https://assets.example/l1.png",
                     "remoteId": "9001",
                     "zone": {"id": 3, "depth": 40, "label": "Hat"}}
                ],
                "restrictedZones": [
                    {"id": 4, "depth": 41, "label": "Hair Front"}
                ]
            }
        }"#;

        let item: WearableItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 42);
        assert_eq!(item.name.as_deref(), Some("Blue Hat"));
        assert_eq!(item.is_pb, Some(true));
        assert_eq!(item.rarity, Some(101));

        let appearance = item.appearance.as_ref().unwrap();
        assert_eq!(appearance.layers.len(), 1);
        assert_eq!(appearance.layers[0].role, LayerRole::Object);
        assert_eq!(appearance.layers[0].remote_id.as_deref(), Some("9001"));
        assert!(item.occupied_zones().contains(&Zone::new(3, 0, "")));
        assert!(item.restricted_zones().contains(&Zone::new(4, 0, "")));
    }

    #[test]
    fn item_without_appearance_claims_nothing() {
        let item: WearableItem = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(item.occupied_zones().is_empty());
        assert!(item.restricted_zones().is_empty());
        assert!(item.claimed_zones().is_empty());
    }

    #[test]
    fn base_appearance_layers_are_stamped_as_biology() {
        let json = r#"{
            "id": "app-1",
            "bodyId": "93",
            "species": {"id": 1, "name": "Acara"},
            "color": {"id": 8, "name": "Blue"},
            "pose": "HAPPY_MASC",
            "layers": [
                {"id": "b1", "imageUrl": "https://assets.example/b1.png",
                 "zone": {"id": 1, "depth": 5, "label": "Body"}}
            ],
            "restrictedZones": []
        }"#;

        let appearance = BaseAppearance::from_json(json).unwrap();
        assert_eq!(appearance.species.id, 1);
        assert_eq!(appearance.pose, Pose::HappyMasc);
        assert_eq!(appearance.layers[0].role, LayerRole::Biology);
    }
}
