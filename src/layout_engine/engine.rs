use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::common::collections::HashMap;
use crate::common::config::{LayoutSettings, PackStrategy};
use crate::layout_engine::geometry::{Point, Rect, bounding_box};
use crate::layout_engine::systems::{PackError, PackItem, PackingSystem, PackingSystemKind};
use crate::layout_engine::utils::{centered_origin, padded_frame, unpadded_frame};
use crate::model::{AppId, AppWindow, Position, WindowUpdate};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("padding must be a finite, non-negative number, got {0}")]
    InvalidPadding(f64),
    #[error(transparent)]
    Pack(#[from] PackError),
}

/// Outcome of arranging a selection. `updates` are meant to be applied as a
/// single batch; windows listed in `skipped` keep their current position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub updates: Vec<WindowUpdate>,
    pub skipped: Vec<AppId>,
    /// Bounding box of the arranged windows, without padding.
    pub footprint: Option<Rect>,
    /// Share of the packed area covered by padded windows.
    pub fill: f64,
}

impl LayoutPlan {
    pub fn is_empty(&self) -> bool { self.updates.is_empty() }

    /// Final top-left corner of every arranged window.
    pub fn positions(&self) -> HashMap<AppId, Point> {
        self.updates
            .iter()
            .map(|u| (u.id.clone(), Point::new(u.position.x, u.position.y)))
            .collect()
    }
}

/// Arranges a selection of windows so that none overlap, keeping the group
/// centered where it was.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutEngine {
    system: PackingSystemKind,
    padding: f64,
}

impl LayoutEngine {
    pub fn new(settings: &LayoutSettings) -> Self {
        Self::with_system(settings.strategy, settings.padding)
    }

    pub fn with_system(system: impl Into<PackingSystemKind>, padding: f64) -> Self {
        Self {
            system: system.into(),
            padding,
        }
    }

    pub fn strategy(&self) -> PackStrategy { self.system.strategy() }

    pub fn padding(&self) -> f64 { self.padding }

    /// Computes new positions for `windows`.
    ///
    /// Windows are packed largest area first (equal areas keep their input
    /// order), each with half the padding on every side. The packed block is
    /// then centered on the center of the selection's original bounding box
    /// and every window is placed centered in its padded cell. Windows without
    /// a usable position or size are skipped rather than failing the batch.
    #[instrument(
        name = "arrange",
        skip_all,
        fields(windows = windows.len(), strategy = %self.system.strategy())
    )]
    pub fn arrange(&self, windows: &[AppWindow]) -> Result<LayoutPlan, LayoutError> {
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(LayoutError::InvalidPadding(self.padding));
        }

        let mut skipped = Vec::new();
        let mut boxes: Vec<(&AppWindow, Rect)> = Vec::with_capacity(windows.len());
        for window in windows {
            match window.frame() {
                Some(frame) => boxes.push((window, frame)),
                None => {
                    warn!(id = %window.id, "app has no usable position or size, leaving it alone");
                    skipped.push(window.id.clone());
                }
            }
        }

        let Some(bounds) = bounding_box(boxes.iter().map(|(_, frame)| frame)) else {
            debug!("nothing to arrange");
            return Ok(LayoutPlan {
                skipped,
                ..LayoutPlan::default()
            });
        };
        let center = bounds.center();

        boxes.sort_by(|a, b| b.1.area().total_cmp(&a.1.area()));

        let items: Vec<PackItem<usize>> = boxes
            .iter()
            .enumerate()
            .map(|(index, (_, frame))| {
                let cell = padded_frame(*frame, self.padding);
                PackItem::new(index, cell.w, cell.h)
            })
            .collect();
        let packing = self.system.pack(&items)?;
        let origin = centered_origin(center, packing.width, packing.height);

        let mut updates = Vec::with_capacity(packing.placements.len());
        let mut frames = Vec::with_capacity(packing.placements.len());
        for placement in &packing.placements {
            let (window, _) = boxes[placement.key];
            let cell = placement.rect.translate(origin.x, origin.y);
            let frame = unpadded_frame(cell, self.padding);
            let z = window.data.position.map_or(0.0, |p| p.z);
            updates.push(WindowUpdate {
                id: window.id.clone(),
                position: Position {
                    x: frame.x,
                    y: frame.y,
                    z,
                },
            });
            frames.push(frame);
        }

        let footprint = bounding_box(&frames);
        debug!(
            arranged = updates.len(),
            skipped = skipped.len(),
            width = packing.width,
            height = packing.height,
            fill = packing.fill(),
            "arranged selection"
        );

        Ok(LayoutPlan {
            updates,
            skipped,
            footprint,
            fill: packing.fill(),
        })
    }
}
