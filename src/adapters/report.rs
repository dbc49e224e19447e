//! Placement report output: a CSV row per created sleeve and a JSON summary.

use crate::core::engine::PlacementReport;
use crate::domain::model::{HostClass, PlacedSleeve};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::Serialize;

const HEADER: [&str; 10] = [
    "marker",
    "variant",
    "host",
    "host_class",
    "source_conduit_id",
    "x",
    "y",
    "z",
    "diameter",
    "position",
];

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    marker: i64,
    variant: &'a str,
    host: i64,
    host_class: HostClass,
    source_conduit_id: &'a str,
    x: f64,
    y: f64,
    z: f64,
    diameter: f64,
    position: &'a str,
}

impl<'a> From<&'a PlacedSleeve> for ReportRow<'a> {
    fn from(sleeve: &'a PlacedSleeve) -> Self {
        Self {
            marker: sleeve.marker.0,
            variant: &sleeve.variant,
            host: sleeve.host.0,
            host_class: sleeve.host_class,
            source_conduit_id: &sleeve.source_conduit_id,
            x: sleeve.center.x,
            y: sleeve.center.y,
            z: sleeve.center.z,
            diameter: sleeve.diameter,
            position: &sleeve.encoded_position,
        }
    }
}

/// 將已放置的套管輸出為 CSV，沒有套管時仍輸出標題列
pub fn placed_to_csv(placed: &[PlacedSleeve]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buffer);
        writer.write_record(HEADER)?;
        for sleeve in placed {
            writer.serialize(ReportRow::from(sleeve))?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

pub fn write_csv_report<S: Storage + ?Sized>(
    storage: &S,
    path: &str,
    report: &PlacementReport,
) -> Result<()> {
    storage.write_file(path, &placed_to_csv(&report.placed)?)?;
    tracing::info!("📁 Placement report saved to: {}", path);
    Ok(())
}

/// Run statistics and timings as pretty JSON.
pub fn write_summary<S: Storage + ?Sized>(
    storage: &S,
    path: &str,
    report: &PlacementReport,
) -> Result<()> {
    let summary = serde_json::json!({
        "started_at": report.started_at,
        "finished_at": report.finished_at,
        "stats": report.stats,
        "resources": report.resources,
    });
    storage.write_file(path, &serde_json::to_vec_pretty(&summary)?)
}
