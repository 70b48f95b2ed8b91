use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::config::PackStrategy;
use crate::layout_engine::geometry::Rect;

/// A rectangle to be placed. `key` is opaque to the packer and handed back
/// with the placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackItem<K> {
    pub key: K,
    pub w: f64,
    pub h: f64,
}

impl<K> PackItem<K> {
    pub fn new(key: K, w: f64, h: f64) -> Self { Self { key, w, h } }

    pub fn area(&self) -> f64 { self.w * self.h }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement<K> {
    pub key: K,
    pub rect: Rect,
}

/// Result of one packing run. `placements` follow the input order and all
/// lie inside `0, 0, width, height`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Packing<K> {
    pub width: f64,
    pub height: f64,
    pub placements: Vec<Placement<K>>,
}

impl<K> Packing<K> {
    pub fn empty() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            placements: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect { Rect::from_size(self.width, self.height) }

    /// Share of the bounding area covered by items, 0 for an empty packing.
    pub fn fill(&self) -> f64 {
        let total = self.width * self.height;
        if total > 0.0 {
            self.placements.iter().map(|p| p.rect.area()).sum::<f64>() / total
        } else {
            0.0
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PackError {
    #[error("item {index} ({width}x{height}) does not have a positive, finite size")]
    InvalidDimensions { index: usize, width: f64, height: f64 },
    #[error("no free slot or growth direction for item {index} ({width}x{height})")]
    Infeasible { index: usize, width: f64, height: f64 },
}

pub(crate) fn validate_items<K>(items: &[PackItem<K>]) -> Result<(), PackError> {
    for (index, item) in items.iter().enumerate() {
        if !Rect::from_size(item.w, item.h).has_positive_size() {
            return Err(PackError::InvalidDimensions {
                index,
                width: item.w,
                height: item.h,
            });
        }
    }
    Ok(())
}

#[enum_dispatch]
pub trait PackingSystem {
    /// Places every item without overlap. Items are taken in the order given
    /// unless the system documents its own ordering.
    fn pack<K: Clone>(&self, items: &[PackItem<K>]) -> Result<Packing<K>, PackError>;
}

mod growing;
pub use growing::GrowingPackSystem;
mod potpack;
pub use potpack::PotpackSystem;

#[derive(Clone, Copy, Debug, PartialEq)]
#[enum_dispatch(PackingSystem)]
pub enum PackingSystemKind {
    BinaryTree(GrowingPackSystem),
    Potpack(PotpackSystem),
}

impl From<PackStrategy> for PackingSystemKind {
    fn from(strategy: PackStrategy) -> Self {
        match strategy {
            PackStrategy::BinaryTree => GrowingPackSystem.into(),
            PackStrategy::Potpack => PotpackSystem.into(),
        }
    }
}

impl PackingSystemKind {
    pub fn strategy(&self) -> PackStrategy {
        match self {
            PackingSystemKind::BinaryTree(_) => PackStrategy::BinaryTree,
            PackingSystemKind::Potpack(_) => PackStrategy::Potpack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_round_trips_through_kind() {
        for strategy in [PackStrategy::BinaryTree, PackStrategy::Potpack] {
            assert_eq!(PackingSystemKind::from(strategy).strategy(), strategy);
        }
    }

    #[test]
    fn fill_of_empty_packing_is_zero() {
        assert_eq!(Packing::<()>::empty().fill(), 0.0);
    }

    #[test]
    fn validation_reports_first_bad_item() {
        let items = [
            PackItem::new('a', 10.0, 10.0),
            PackItem::new('b', 0.0, 10.0),
            PackItem::new('c', -1.0, 10.0),
        ];
        assert_eq!(
            validate_items(&items),
            Err(PackError::InvalidDimensions { index: 1, width: 0.0, height: 10.0 })
        );
    }
}
