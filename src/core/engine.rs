use crate::core::adapter;
use crate::core::dedup::deduplicate;
use crate::core::existing::ExistingSleeves;
use crate::core::orientation::{self, Orientation};
use crate::core::placement::{ParameterNames, PlacementWriter};
use crate::core::resolver::{IntersectionResolver, SkipReason};
use crate::core::search::CandidateSearch;
use crate::domain::model::{FamilyVariant, HostClass, PenetrationResult, PlacedSleeve};
use crate::domain::ports::{ConfigProvider, ModelDocument};
use crate::utils::error::{Result, SleeveError};
use crate::utils::monitor::{PhaseSample, RunPhase, SystemMonitor};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const TRANSACTION_NAME: &str = "Place sleeves";

/// Engine settings resolved from a [`ConfigProvider`].
#[derive(Debug, Clone)]
pub struct PlacementSettings {
    pub wall_variant: String,
    pub floor_variant: String,
    pub parameters: ParameterNames,
    /// Added to each conduit's outer diameter, in model units.
    pub clearance: f64,
    pub skip_existing: bool,
    pub existing_tolerance: f64,
}

impl PlacementSettings {
    pub fn from_provider<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            wall_variant: config.wall_variant().to_string(),
            floor_variant: config.floor_variant().to_string(),
            parameters: ParameterNames {
                diameter: config.diameter_parameter().to_string(),
                source_id: config.source_id_parameter().to_string(),
                position: config.position_parameter().to_string(),
            },
            clearance: config.clearance(),
            skip_existing: config.skip_existing(),
            existing_tolerance: config.existing_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub linked_models: usize,
    pub conduits_scanned: usize,
    pub conduits_without_curve: usize,
    pub skew_conduits: usize,
    pub raw_hits: usize,
    pub hits_beyond_length: usize,
    pub duplicate_hits: usize,
    pub candidates: usize,
    /// Resolution skips by reason label.
    pub skipped: BTreeMap<String, usize>,
    pub penetrations: usize,
    pub already_placed: usize,
    pub unknown_existing_positions: usize,
    pub markers_created: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlacementReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub placed: Vec<PlacedSleeve>,
    pub stats: RunStats,
    /// Empty unless monitoring is enabled.
    pub resources: Vec<PhaseSample>,
}

/// What a caller outside the core sees of one pass.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub succeeded: bool,
    pub message: Option<String>,
    pub report: PlacementReport,
}

struct Variants {
    wall: FamilyVariant,
    floor: FamilyVariant,
}

impl Variants {
    fn for_class(&self, class: HostClass) -> &FamilyVariant {
        match class {
            HostClass::Wall => &self.wall,
            HostClass::Floor => &self.floor,
        }
    }
}

pub struct SleevePlacer<D: ModelDocument> {
    document: D,
    settings: PlacementSettings,
    monitoring: bool,
}

impl<D: ModelDocument> SleevePlacer<D> {
    pub fn new(document: D, settings: PlacementSettings) -> Self {
        Self::new_with_monitoring(document, settings, false)
    }

    pub fn new_with_monitoring(document: D, settings: PlacementSettings, monitor: bool) -> Self {
        Self {
            document,
            settings,
            monitoring: monitor,
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }

    /// Runs one pass and folds any error into a failed outcome with a message.
    pub fn execute(&mut self) -> RunOutcome {
        match self.run() {
            Ok(report) => RunOutcome {
                succeeded: true,
                message: None,
                report,
            },
            Err(err) => {
                tracing::error!("❌ Sleeve placement failed: {}", err);
                RunOutcome {
                    succeeded: false,
                    message: Some(err.user_friendly_message()),
                    report: PlacementReport::default(),
                }
            }
        }
    }

    /// One full placement pass.
    ///
    /// All penetrations are computed against the document as it is when the
    /// pass starts, then placed inside a single transaction. A configuration
    /// error rolls that transaction back and nothing is committed.
    pub fn run(&mut self) -> Result<PlacementReport> {
        let started_at = Utc::now();
        tracing::info!("Starting sleeve placement");

        let variants = self.resolve_variants()?;
        let mut stats = RunStats::default();
        let mut monitor = SystemMonitor::new(self.monitoring);

        let existing = if self.settings.skip_existing {
            let markers = self.document.markers();
            let index = ExistingSleeves::index(
                &markers,
                &self.settings.parameters.source_id,
                &self.settings.parameters.position,
                self.settings.existing_tolerance,
            );
            stats.unknown_existing_positions = index.unknown_position();
            tracing::info!("Found {} existing sleeve(s)", index.len());
            index
        } else {
            ExistingSleeves::empty()
        };
        monitor.sample(RunPhase::Index);

        tracing::info!("Scanning conduits...");
        let penetrations = self.scan(&mut stats);
        stats.penetrations = penetrations.len();
        tracing::info!(
            "Scanned {} conduit(s): {} penetration(s) from {} candidate(s)",
            stats.conduits_scanned,
            penetrations.len(),
            stats.candidates
        );
        monitor.sample(RunPhase::Scan);

        let placed = if penetrations.is_empty() {
            Vec::new()
        } else {
            tracing::info!("Placing sleeves...");
            self.place_all(&penetrations, &variants, &existing, &mut stats)?
        };
        stats.markers_created = placed.len();
        monitor.sample(RunPhase::Placement);

        tracing::info!(
            "Created {} sleeve(s), {} already present",
            stats.markers_created,
            stats.already_placed
        );
        if let Some(peak) = monitor.peak_memory_mb() {
            tracing::info!("📊 Peak memory across phases: {}MB", peak);
        }

        Ok(PlacementReport {
            started_at,
            finished_at: Utc::now(),
            placed,
            stats,
            resources: monitor.samples().to_vec(),
        })
    }

    fn resolve_variants(&self) -> Result<Variants> {
        let lookup = |name: &str| {
            self.document
                .family_variant(name)
                .ok_or_else(|| SleeveError::FamilyVariantNotFound {
                    name: name.to_string(),
                })
        };

        Ok(Variants {
            wall: lookup(&self.settings.wall_variant)?,
            floor: lookup(&self.settings.floor_variant)?,
        })
    }

    fn scan(&self, stats: &mut RunStats) -> Vec<PenetrationResult> {
        let walls = CandidateSearch::new(&self.document, HostClass::Wall);
        let floors = CandidateSearch::new(&self.document, HostClass::Floor);
        let resolver = IntersectionResolver::new(self.settings.clearance);
        let mut penetrations = Vec::new();

        let models = self.document.linked_models();
        stats.linked_models = models.len();

        for model in models {
            for conduit in self.document.conduits(model) {
                stats.conduits_scanned += 1;

                let Some(axis) = adapter::get_conduit_curve(&conduit) else {
                    tracing::debug!("Conduit {} has no line location", conduit.unique_id);
                    stats.conduits_without_curve += 1;
                    continue;
                };

                let search = match orientation::classify(&axis) {
                    Orientation::Vertical => &floors,
                    Orientation::Horizontal => &walls,
                    Orientation::Skew => {
                        tracing::debug!("Conduit {} is skew, skipped", conduit.unique_id);
                        stats.skew_conduits += 1;
                        continue;
                    }
                };

                let found = search.candidates(&axis);
                stats.raw_hits += found.hits.len() + found.beyond_length;
                stats.hits_beyond_length += found.beyond_length;

                let hit_count = found.hits.len();
                let candidates = deduplicate(found.hits);
                stats.duplicate_hits += hit_count - candidates.len();

                for hit in candidates {
                    stats.candidates += 1;
                    let resolution = match self.document.host(&hit.reference) {
                        Some(host) => resolver.resolve(&conduit, &axis, host),
                        None => Err(SkipReason::HostNotFound(hit.reference.element)),
                    };

                    match resolution {
                        Ok(penetration) => penetrations.push(penetration),
                        Err(reason) => {
                            tracing::debug!(
                                "Conduit {} / host {}: {}",
                                conduit.unique_id,
                                hit.reference.element,
                                reason
                            );
                            *stats.skipped.entry(reason.label().to_string()).or_default() += 1;
                        }
                    }
                }
            }
        }

        penetrations
    }

    fn place_all(
        &mut self,
        penetrations: &[PenetrationResult],
        variants: &Variants,
        existing: &ExistingSleeves,
        stats: &mut RunStats,
    ) -> Result<Vec<PlacedSleeve>> {
        self.document.start_transaction(TRANSACTION_NAME)?;

        match self.place_in_transaction(penetrations, variants, existing, stats) {
            Ok(placed) => {
                self.document.commit()?;
                Ok(placed)
            }
            Err(err) => {
                tracing::error!("Rolling back '{}': {}", TRANSACTION_NAME, err);
                self.document.roll_back();
                Err(err)
            }
        }
    }

    fn place_in_transaction(
        &mut self,
        penetrations: &[PenetrationResult],
        variants: &Variants,
        existing: &ExistingSleeves,
        stats: &mut RunStats,
    ) -> Result<Vec<PlacedSleeve>> {
        for variant in [&variants.wall, &variants.floor] {
            if !variant.active {
                self.document.activate_variant(variant.id)?;
            }
        }

        let skip_existing = self.settings.skip_existing;
        let mut writer = PlacementWriter::new(&mut self.document, &self.settings.parameters);
        let mut placed = Vec::with_capacity(penetrations.len());

        for penetration in penetrations {
            if skip_existing
                && existing.contains(
                    &penetration.source_conduit_id,
                    penetration.host,
                    &penetration.center,
                )
            {
                tracing::debug!(
                    "Sleeve for conduit {} on host {} already present",
                    penetration.source_conduit_id,
                    penetration.host
                );
                stats.already_placed += 1;
                continue;
            }

            placed.push(writer.place(penetration, variants.for_class(penetration.host_class))?);
        }

        Ok(placed)
    }
}
