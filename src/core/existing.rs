//! Index of sleeves already in the document, keyed by source conduit and host.
//!
//! Existing sleeves are only recognised, never moved or deleted.

use crate::core::codec;
use crate::domain::model::{ElementId, Marker};
use nalgebra::Point3;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ExistingSleeves {
    by_penetration: HashMap<(String, ElementId), Vec<Point3<f64>>>,
    unknown_position: usize,
    tolerance: f64,
}

impl ExistingSleeves {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads source id and encoded position from each marker.
    ///
    /// Markers without a source id are ignored. Markers whose position does not
    /// decode are counted as "position unknown" and never match.
    pub fn index(
        markers: &[Marker],
        source_id_parameter: &str,
        position_parameter: &str,
        tolerance: f64,
    ) -> Self {
        let mut index = Self {
            tolerance,
            ..Self::default()
        };

        for marker in markers {
            let Some(source_id) = marker
                .parameter(source_id_parameter)
                .and_then(|value| value.as_text())
            else {
                continue;
            };

            let encoded = marker
                .parameter(position_parameter)
                .and_then(|value| value.as_text())
                .unwrap_or_default();

            match codec::decode(encoded) {
                Ok(position) => index
                    .by_penetration
                    .entry((source_id.to_string(), marker.host))
                    .or_default()
                    .push(position),
                Err(err) => {
                    tracing::warn!(
                        "Sleeve {} for conduit {}: position unknown ({})",
                        marker.id,
                        source_id,
                        err
                    );
                    index.unknown_position += 1;
                }
            }
        }

        index
    }

    /// Whether `host` already carries a sleeve for `source_id` at `center`.
    pub fn contains(&self, source_id: &str, host: ElementId, center: &Point3<f64>) -> bool {
        self.by_penetration
            .get(&(source_id.to_string(), host))
            .is_some_and(|positions| {
                positions
                    .iter()
                    .any(|p| (p - center).norm() <= self.tolerance)
            })
    }

    pub fn len(&self) -> usize {
        self.by_penetration.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn unknown_position(&self) -> usize {
        self.unknown_position
    }
}
