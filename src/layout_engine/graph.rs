use serde::{Deserialize, Serialize};

/// Which edge of the packing root gets extended when nothing fits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowDirection {
    Right,
    Down,
}

impl GrowDirection {
    /// Picks the growth direction for a `w × h` item that found no free slot
    /// in a `root_w × root_h` root. Favours the direction that keeps the root
    /// closer to a square, then whichever direction is feasible at all.
    pub fn choose(root_w: f64, root_h: f64, w: f64, h: f64) -> Option<GrowDirection> {
        let can_grow_down = w <= root_w;
        let can_grow_right = h <= root_h;

        let should_grow_right = can_grow_right && root_h >= root_w + w;
        let should_grow_down = can_grow_down && root_w >= root_h + h;

        if should_grow_right {
            Some(GrowDirection::Right)
        } else if should_grow_down {
            Some(GrowDirection::Down)
        } else if can_grow_right {
            Some(GrowDirection::Right)
        } else if can_grow_down {
            Some(GrowDirection::Down)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_squarer_root() {
        // tall root, narrow item: widen
        assert_eq!(GrowDirection::choose(100.0, 300.0, 50.0, 50.0), Some(GrowDirection::Right));
        // wide root, short item: deepen
        assert_eq!(GrowDirection::choose(300.0, 100.0, 50.0, 50.0), Some(GrowDirection::Down));
    }

    #[test]
    fn falls_back_to_feasible_direction() {
        // neither growth keeps it square; right is tried first
        assert_eq!(GrowDirection::choose(100.0, 100.0, 50.0, 50.0), Some(GrowDirection::Right));
        // too tall to sit beside the root
        assert_eq!(GrowDirection::choose(100.0, 100.0, 50.0, 150.0), Some(GrowDirection::Down));
        // too wide to sit under it
        assert_eq!(GrowDirection::choose(100.0, 100.0, 150.0, 50.0), Some(GrowDirection::Right));
        assert_eq!(GrowDirection::choose(100.0, 100.0, 150.0, 150.0), None);
    }
}
