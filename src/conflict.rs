//! Zone conflict resolution between worn items.
//!
//! Items are processed in equip order (later position = equipped more
//! recently). Each incoming item evicts every already-retained item whose
//! zone footprint collides with it, then joins the retained set itself. The
//! net effect is that a later-equipped item always wins a zone conflict over
//! an earlier one, and an evicted item can never evict anything afterwards.

use tracing::debug;

use crate::appearance::WearableItem;

/// Resolves pairwise zone conflicts over an equip-ordered item list.
///
/// Returns the subsequence of `items` that remains worn, in input order.
/// Two items conflict when either one's occupied zones intersect the other's
/// occupied-or-restricted zones. Items with no appearance occupy nothing and
/// are always retained.
///
/// The scan is intentionally the O(n²) pairwise pass over zone sets; item
/// lists are tiny and set intersection is the whole primitive.
pub fn resolve_conflicts(items: &[WearableItem]) -> Vec<WearableItem> {
    let mut retained: Vec<WearableItem> = Vec::with_capacity(items.len());

    for incoming in items {
        let occupied = incoming.occupied_zones();
        let claimed = incoming.claimed_zones();

        retained.retain(|held| {
            let collides = !occupied.is_disjoint(&held.claimed_zones())
                || !held.occupied_zones().is_disjoint(&claimed);
            if collides {
                debug!(
                    evicted = held.id,
                    by = incoming.id,
                    "item evicted by later-equipped item over a zone conflict"
                );
            }
            !collides
        });

        retained.push(incoming.clone());
    }

    retained
}

// ============================================================================
// Tests
// ============================================================================
