use tracing::{debug, trace};

use crate::layout_engine::binary_tree::PackerTree;
use crate::layout_engine::systems::{
    PackError, PackItem, Packing, PackingSystem, Placement, validate_items,
};

/// Growing binary-tree packer. Items are placed strictly in the order given,
/// so callers should sort largest first; already placed rectangles never
/// move when the root grows.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GrowingPackSystem;

impl PackingSystem for GrowingPackSystem {
    fn pack<K: Clone>(&self, items: &[PackItem<K>]) -> Result<Packing<K>, PackError> {
        validate_items(items)?;
        if items.is_empty() {
            return Ok(Packing::empty());
        }

        let mut tree = PackerTree::new();
        let mut placements = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let rect = tree.insert(item.w, item.h).ok_or(PackError::Infeasible {
                index,
                width: item.w,
                height: item.h,
            })?;
            placements.push(Placement { key: item.key.clone(), rect });
        }

        let root = tree.root_rect();
        debug!(
            items = items.len(),
            width = root.w,
            height = root.h,
            nodes = tree.len(),
            "binary tree packing done"
        );
        trace!("packer tree:\n{}", tree.draw_tree());

        Ok(Packing {
            width: root.w,
            height: root.h,
            placements,
        })
    }
}
