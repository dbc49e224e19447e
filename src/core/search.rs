//! Ray-cast candidate search against one class of structural hosts.

use crate::domain::model::{CandidateHit, HostClass};
use crate::domain::ports::RayCaster;
use crate::geometry::Line;

/// Candidates for one conduit, split into those within its length and the rest.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub hits: Vec<CandidateHit>,
    pub beyond_length: usize,
}

/// A stateless search bound to one host class. One is built per class and
/// the classifier picks which one a conduit goes through.
pub struct CandidateSearch<'a, R: RayCaster + ?Sized> {
    caster: &'a R,
    class: HostClass,
}

impl<'a, R: RayCaster + ?Sized> CandidateSearch<'a, R> {
    pub fn new(caster: &'a R, class: HostClass) -> Self {
        Self { caster, class }
    }

    pub fn class(&self) -> HostClass {
        self.class
    }

    /// Casts from the conduit start along its direction and keeps hits no
    /// farther than the conduit length.
    pub fn candidates(&self, conduit: &Line) -> SearchResult {
        let direction = conduit.direction();
        if conduit.is_degenerate() {
            return SearchResult::default();
        }

        let length = conduit.length();
        let (hits, beyond): (Vec<_>, Vec<_>) = self
            .caster
            .find(&conduit.start(), &direction, self.class)
            .into_iter()
            .partition(|hit| hit.proximity <= length);

        tracing::trace!(
            "{} search: {} hit(s) within {:.3}, {} beyond",
            self.class,
            hits.len(),
            length,
            beyond.len()
        );

        SearchResult {
            hits,
            beyond_length: beyond.len(),
        }
    }
}
