use tracing::debug;

use crate::layout_engine::geometry::Rect;
use crate::layout_engine::systems::{
    PackError, PackItem, Packing, PackingSystem, Placement, validate_items,
};

/// Target fill ratio used to size the initial strip width.
const TARGET_FILL: f64 = 0.95;

/// Shelf packer over a list of free spaces. Items are visited tallest first
/// (ties keep input order) inside a strip whose width is chosen so that the
/// result comes out roughly square. Placements are still reported in input
/// order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PotpackSystem;

impl PackingSystem for PotpackSystem {
    fn pack<K: Clone>(&self, items: &[PackItem<K>]) -> Result<Packing<K>, PackError> {
        validate_items(items)?;
        if items.is_empty() {
            return Ok(Packing::empty());
        }

        let area: f64 = items.iter().map(PackItem::area).sum();
        let max_width = items.iter().map(|i| i.w).fold(0.0, f64::max);
        let start_width = (area / TARGET_FILL).sqrt().ceil().max(max_width);

        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| items[b].h.total_cmp(&items[a].h));

        let mut spaces = vec![Rect::new(0.0, 0.0, start_width, f64::INFINITY)];
        let mut placed: Vec<Option<Rect>> = vec![None; items.len()];
        let (mut width, mut height) = (0.0f64, 0.0f64);

        for index in order {
            let item = &items[index];
            let Some(slot) = spaces.iter().rposition(|s| s.fits(item.w, item.h)) else {
                return Err(PackError::Infeasible {
                    index,
                    width: item.w,
                    height: item.h,
                });
            };
            let space = spaces[slot];
            let rect = Rect::new(space.x, space.y, item.w, item.h);
            width = width.max(rect.right());
            height = height.max(rect.bottom());
            placed[index] = Some(rect);

            if item.w == space.w && item.h == space.h {
                spaces.swap_remove(slot);
            } else if item.h == space.h {
                let s = &mut spaces[slot];
                s.x += item.w;
                s.w -= item.w;
            } else if item.w == space.w {
                let s = &mut spaces[slot];
                s.y += item.h;
                s.h -= item.h;
            } else {
                spaces.push(Rect::new(space.x + item.w, space.y, space.w - item.w, item.h));
                let s = &mut spaces[slot];
                s.y += item.h;
                s.h -= item.h;
            }
        }

        let placements = items
            .iter()
            .zip(placed)
            .enumerate()
            .map(|(index, (item, rect))| {
                rect.map(|rect| Placement { key: item.key.clone(), rect }).ok_or(
                    PackError::Infeasible {
                        index,
                        width: item.w,
                        height: item.h,
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(items = items.len(), width, height, start_width, "potpack done");
        Ok(Packing {
            width,
            height,
            placements,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn items(sizes: &[(f64, f64)]) -> Vec<PackItem<usize>> {
        sizes.iter().enumerate().map(|(i, &(w, h))| PackItem::new(i, w, h)).collect()
    }

    #[test]
    fn empty_input_packs_to_nothing() {
        assert_eq!(PotpackSystem.pack::<usize>(&[]).unwrap(), Packing::empty());
    }

    #[test]
    fn single_item_sits_at_origin() {
        let packing = PotpackSystem.pack(&items(&[(200.0, 200.0)])).unwrap();
        assert_eq!((packing.width, packing.height), (200.0, 200.0));
        assert_eq!(packing.placements[0].rect, Rect::new(0.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn tallest_items_go_first_but_results_keep_input_order() {
        // area 17500 -> strip width ceil(sqrt(17500 / 0.95)) = 136
        let packing =
            PotpackSystem.pack(&items(&[(50.0, 50.0), (100.0, 100.0), (50.0, 100.0)])).unwrap();
        let rects: Vec<_> = packing.placements.iter().map(|p| p.rect).collect();
        assert_eq!(
            rects,
            vec![
                Rect::new(50.0, 100.0, 50.0, 50.0),
                Rect::new(0.0, 0.0, 100.0, 100.0),
                Rect::new(0.0, 100.0, 50.0, 100.0),
            ]
        );
        assert_eq!((packing.width, packing.height), (100.0, 200.0));
        assert_eq!(packing.fill(), 0.875);
    }

    #[test]
    fn equal_squares_tile_a_row() {
        let packing = PotpackSystem.pack(&items(&[(10.0, 10.0); 4])).unwrap();
        // area 400 -> strip width 21, two squares per row
        assert_eq!((packing.width, packing.height), (20.0, 20.0));
        assert_eq!(packing.fill(), 1.0);
    }

    proptest! {
        #[test]
        fn placements_never_overlap(
            sizes in prop::collection::vec((1u32..300, 1u32..300), 0..40)
        ) {
            let sizes: Vec<(f64, f64)> =
                sizes.into_iter().map(|(w, h)| (w as f64, h as f64)).collect();
            let packing = PotpackSystem.pack(&items(&sizes)).unwrap();
            prop_assert_eq!(packing.placements.len(), sizes.len());
            let bounds = packing.bounds();
            for (i, a) in packing.placements.iter().enumerate() {
                prop_assert!(bounds.contains(&a.rect));
                for b in &packing.placements[i + 1..] {
                    prop_assert!(!a.rect.intersects(&b.rect), "{a:?} overlaps {b:?}");
                }
            }
        }
    }
}
