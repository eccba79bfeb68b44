//! Final layer ordering: merge base and item layers, drop restricted zones,
//! sort bottom-to-top by zone depth.

use std::collections::HashSet;

use tracing::debug;

use crate::appearance::{AppearanceLayer, BaseAppearance, WearableItem, Zone};

/// Produces the definitive bottom-to-top paint order.
///
/// Base layers come first, then each resolved item's layers in item order.
/// Any layer whose zone is restricted by *anyone* — the base appearance or
/// any resolved item — is dropped; restriction is a global union, not
/// per-contributor. The survivors are stable-sorted by zone depth ascending,
/// so equal depths keep their concatenation order.
///
/// `items` is expected to be the output of
/// [`crate::conflict::resolve_conflicts`].
pub fn visible_layers(base: &BaseAppearance, items: &[WearableItem]) -> Vec<AppearanceLayer> {
    let mut all_layers: Vec<AppearanceLayer> = base.layers.clone();
    let mut restricted: HashSet<Zone> = base.restricted_zones.iter().cloned().collect();

    for item in items {
        if let Some(appearance) = &item.appearance {
            all_layers.extend(appearance.layers.iter().cloned());
            restricted.extend(appearance.restricted_zones.iter().cloned());
        }
    }

    let total = all_layers.len();
    let mut layers: Vec<AppearanceLayer> = all_layers
        .into_iter()
        .filter(|layer| !restricted.contains(&layer.zone))
        .collect();

    // Stable sort: ties on depth preserve base-then-items order.
    layers.sort_by_key(|layer| layer.zone.depth);

    debug!(
        visible = layers.len(),
        dropped = total - layers.len(),
        "layer order computed"
    );

    layers
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::{ColorRef, ItemAppearance, LayerRole, SpeciesRef};
    use crate::pose::Pose;

    fn layer(id: &str, zone: Zone, role: LayerRole) -> AppearanceLayer {
        AppearanceLayer {
            id: id.into(),
            image_url: format!("https://assets.example/{id}.png"),
            remote_id: None,
            role,
            zone,
        }
    }

    fn base(layers: Vec<AppearanceLayer>, restricted: Vec<Zone>) -> BaseAppearance {
        BaseAppearance {
            id: "base".into(),
            body_id: "93".into(),
            species: SpeciesRef { id: 1, name: "Acara".into() },
            color: ColorRef { id: 8, name: "Blue".into() },
            pose: Pose::HappyMasc,
            layers,
            restricted_zones: restricted,
        }
    }

    fn item(id: u64, layers: Vec<AppearanceLayer>, restricted: Vec<Zone>) -> WearableItem {
        WearableItem {
            id,
            name: None,
            description: None,
            thumbnail_url: None,
            is_nc: None,
            is_pb: None,
            rarity: None,
            appearance: Some(ItemAppearance {
                id: format!("appearance-{id}"),
                layers,
                restricted_zones: restricted,
            }),
        }
    }

    #[test]
    fn layers_sort_by_depth_ascending() {
        let base = base(
            vec![
                layer("body", Zone::new(1, 10, "Body"), LayerRole::Biology),
                layer("eyes", Zone::new(2, 30, "Eyes"), LayerRole::Biology),
            ],
            vec![],
        );
        let wig = item(
            1,
            vec![layer("wig", Zone::new(3, 20, "Hair"), LayerRole::Object)],
            vec![],
        );

        let ordered = visible_layers(&base, &[wig]);
        let ids: Vec<&str> = ordered.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["body", "wig", "eyes"]);
    }

    #[test]
    fn equal_depths_keep_concatenation_order() {
        let shared_depth = 15;
        let base = base(
            vec![layer("base-a", Zone::new(1, shared_depth, "A"), LayerRole::Biology)],
            vec![],
        );
        let first = item(
            1,
            vec![layer("item-1", Zone::new(2, shared_depth, "B"), LayerRole::Object)],
            vec![],
        );
        let second = item(
            2,
            vec![layer("item-2", Zone::new(3, shared_depth, "C"), LayerRole::Object)],
            vec![],
        );

        let ordered = visible_layers(&base, &[first, second]);
        let ids: Vec<&str> = ordered.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["base-a", "item-1", "item-2"]);
    }

    #[test]
    fn restriction_is_a_global_union() {
        // The hat restricts the hair zone. The base's own hair layer must be
        // dropped too, even though the base did not restrict it.
        let hair_zone = Zone::new(2, 20, "Hair");
        let base = base(
            vec![
                layer("body", Zone::new(1, 10, "Body"), LayerRole::Biology),
                layer("hair", hair_zone.clone(), LayerRole::Biology),
            ],
            vec![],
        );
        let hat = item(
            1,
            vec![layer("hat", Zone::new(3, 40, "Hat"), LayerRole::Object)],
            vec![hair_zone],
        );

        let ordered = visible_layers(&base, &[hat]);
        let ids: Vec<&str> = ordered.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["body", "hat"]);
    }

    #[test]
    fn base_restrictions_drop_item_layers() {
        let wing_zone = Zone::new(5, 25, "Wings");
        let base = base(
            vec![layer("body", Zone::new(1, 10, "Body"), LayerRole::Biology)],
            vec![wing_zone.clone()],
        );
        let wings = item(
            1,
            vec![layer("wings", wing_zone, LayerRole::Object)],
            vec![],
        );

        let ordered = visible_layers(&base, &[wings]);
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].id, "body");
    }

    #[test]
    fn appearance_less_item_contributes_nothing() {
        let base = base(
            vec![layer("body", Zone::new(1, 10, "Body"), LayerRole::Biology)],
            vec![],
        );
        let ghost = WearableItem {
            appearance: None,
            ..item(1, vec![], vec![])
        };

        let ordered = visible_layers(&base, &[ghost]);
        assert_eq!(ordered.len(), 1);
    }

    #[test]
    fn restricted_zone_may_be_absent_from_all_layers() {
        // Restricting a zone nobody paints is a no-op, not an error.
        let base = base(
            vec![layer("body", Zone::new(1, 10, "Body"), LayerRole::Biology)],
            vec![Zone::new(99, 1, "Foreground")],
        );
        let ordered = visible_layers(&base, &[]);
        assert_eq!(ordered.len(), 1);
    }
}
