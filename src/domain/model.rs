use crate::geometry::{Line, Solid};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub i64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Link instance through which a reference was reached; `NONE` for the main model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkPathId(pub i64);

impl LinkPathId {
    pub const NONE: LinkPathId = LinkPathId(-1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub i64);

/// Composite key that identifies a referenced element regardless of how it was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementReference {
    pub link_path: LinkPathId,
    pub element: ElementId,
}

impl ElementReference {
    pub fn new(link_path: LinkPathId, element: ElementId) -> Self {
        Self { link_path, element }
    }

    pub fn in_main_model(element: ElementId) -> Self {
        Self::new(LinkPathId::NONE, element)
    }
}

/// Structural host classes a ray cast can be filtered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostClass {
    Wall,
    Floor,
}

impl fmt::Display for HostClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostClass::Wall => write!(f, "wall"),
            HostClass::Floor => write!(f, "floor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Curve(Line),
    Point(Point3<f64>),
    #[default]
    None,
}

/// One entry of an element's geometric representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryObject {
    Solid(Solid),
    Curve(Line),
    Empty,
}

/// A wall or floor in the main model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralElement {
    pub id: ElementId,
    pub class: HostClass,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: Option<LevelId>,
    #[serde(default)]
    pub location: Location,
    /// `None` when the element exposes no geometry at all.
    #[serde(default)]
    pub geometry: Option<Vec<GeometryObject>>,
}

/// A straight pipe segment from a linked model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conduit {
    pub id: ElementId,
    /// Stable across runs; written to the sleeve's source-id attribute.
    pub unique_id: String,
    pub location: Location,
    pub outer_diameter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyVariant {
    pub id: ElementId,
    pub family: String,
    pub name: String,
    /// Instance parameters a marker of this variant carries.
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StructuralRole {
    #[default]
    NonStructural,
    Beam,
    Column,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Double(f64),
    Text(String),
}

impl ParameterValue {
    pub fn as_double(&self) -> Option<f64> {
        match self {
            ParameterValue::Double(value) => Some(*value),
            ParameterValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParameterValue::Text(value) => Some(value),
            ParameterValue::Double(_) => None,
        }
    }
}

/// A sleeve instance persisted in the host document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: ElementId,
    pub variant: ElementId,
    pub host: ElementId,
    #[serde(default)]
    pub level: Option<LevelId>,
    pub location: Point3<f64>,
    #[serde(default)]
    pub role: StructuralRole,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterValue>,
}

impl Marker {
    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }
}

/// One ray/host intersection record.
///
/// Equality and hashing consider only the reference key, never the proximity,
/// so re-entrant hits on the same element collapse in a set.
#[derive(Debug, Clone, Copy)]
pub struct CandidateHit {
    pub reference: ElementReference,
    pub proximity: f64,
}

impl CandidateHit {
    pub fn new(reference: ElementReference, proximity: f64) -> Self {
        Self {
            reference,
            proximity,
        }
    }

    pub fn key(&self) -> ElementReference {
        self.reference
    }
}

impl PartialEq for CandidateHit {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl Eq for CandidateHit {}

impl Hash for CandidateHit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
    }
}

/// Computed penetration of one conduit through one host.
#[derive(Debug, Clone, PartialEq)]
pub struct PenetrationResult {
    pub center: Point3<f64>,
    pub cleared_diameter: f64,
    pub host: ElementId,
    pub host_class: HostClass,
    pub host_level: Option<LevelId>,
    pub source_conduit_id: String,
}

/// A sleeve created during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedSleeve {
    pub marker: ElementId,
    pub variant: String,
    pub host: ElementId,
    pub host_class: HostClass,
    pub source_conduit_id: String,
    pub center: Point3<f64>,
    pub diameter: f64,
    pub encoded_position: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_candidate_hit_equality_ignores_proximity() {
        let reference = ElementReference::in_main_model(ElementId(7));
        let near = CandidateHit::new(reference, 1.0);
        let far = CandidateHit::new(reference, 42.0);

        assert_eq!(near, far);

        let set: HashSet<CandidateHit> = [near, far].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_candidate_hit_differs_by_link_path() {
        let a = CandidateHit::new(ElementReference::new(LinkPathId(3), ElementId(7)), 1.0);
        let b = CandidateHit::new(ElementReference::new(LinkPathId::NONE, ElementId(7)), 1.0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_parameter_value_accessors() {
        assert_eq!(ParameterValue::Double(1.5).as_double(), Some(1.5));
        assert_eq!(ParameterValue::Double(1.5).as_text(), None);
        assert_eq!(ParameterValue::Text("a".into()).as_text(), Some("a"));
    }

    #[test]
    fn test_location_deserializes_curve() {
        let json = r#"{"curve": {"start": [0.0, 0.0, 0.0], "end": [1.0, 0.0, 0.0]}}"#;
        let location: Location = serde_json::from_str(json).unwrap();
        assert!(matches!(location, Location::Curve(line) if line.length() == 1.0));
    }
}
