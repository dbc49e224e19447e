//! JSON model snapshots.
//!
//! A snapshot is the on-disk form of an [`InMemoryDocument`]: the structural
//! hosts of the main model, the linked models with their conduits, the sleeve
//! family variants and any sleeves already placed.

use crate::adapters::memory::{InMemoryDocument, LinkedModel};
use crate::domain::model::{
    ElementId, FamilyVariant, GeometryObject, HostClass, LevelId, Location, Marker,
    StructuralElement,
};
use crate::domain::ports::Storage;
use crate::geometry::{Line, Solid};
use crate::utils::error::Result;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Host geometry as written by hand or exported from a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostGeometry {
    Solid {
        vertices: Vec<Point3<f64>>,
        triangles: Vec<[usize; 3]>,
    },
    /// Axis-aligned box.
    Box {
        min: Point3<f64>,
        max: Point3<f64>,
    },
    /// Quadrilateral base swept along `extrusion`.
    Prism {
        base: [Point3<f64>; 4],
        extrusion: Vector3<f64>,
    },
    Curve {
        start: Point3<f64>,
        end: Point3<f64>,
    },
    Empty,
}

impl HostGeometry {
    fn into_object(self) -> Result<GeometryObject> {
        let object = match self {
            HostGeometry::Solid {
                vertices,
                triangles,
            } => {
                let solid = Solid::new(vertices, triangles);
                solid.validate()?;
                GeometryObject::Solid(solid)
            }
            HostGeometry::Box { min, max } => GeometryObject::Solid(Solid::cuboid(min, max)),
            HostGeometry::Prism { base, extrusion } => {
                GeometryObject::Solid(Solid::prism(base, extrusion))
            }
            HostGeometry::Curve { start, end } => GeometryObject::Curve(Line::new(start, end)),
            HostGeometry::Empty => GeometryObject::Empty,
        };
        Ok(object)
    }

    fn from_object(object: &GeometryObject) -> Self {
        match object {
            GeometryObject::Solid(solid) => HostGeometry::Solid {
                vertices: solid.vertices().to_vec(),
                triangles: solid.triangles().to_vec(),
            },
            GeometryObject::Curve(line) => HostGeometry::Curve {
                start: line.start(),
                end: line.end(),
            },
            GeometryObject::Empty => HostGeometry::Empty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSnapshot {
    pub id: ElementId,
    pub class: HostClass,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: Option<LevelId>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub geometry: Option<Vec<HostGeometry>>,
}

impl HostSnapshot {
    fn into_element(self) -> Result<StructuralElement> {
        let geometry = self
            .geometry
            .map(|objects| {
                objects
                    .into_iter()
                    .map(HostGeometry::into_object)
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(StructuralElement {
            id: self.id,
            class: self.class,
            name: self.name,
            level: self.level,
            location: self.location,
            geometry,
        })
    }

    fn from_element(element: &StructuralElement) -> Self {
        Self {
            id: element.id,
            class: element.class,
            name: element.name.clone(),
            level: element.level,
            location: element.location.clone(),
            geometry: element
                .geometry
                .as_ref()
                .map(|objects| objects.iter().map(HostGeometry::from_object).collect()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    #[serde(default)]
    pub hosts: Vec<HostSnapshot>,
    #[serde(default)]
    pub links: Vec<LinkedModel>,
    #[serde(default)]
    pub family_variants: Vec<FamilyVariant>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl ModelSnapshot {
    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// 從儲存空間載入快照
    pub fn load<S: Storage + ?Sized>(storage: &S, path: &str) -> Result<Self> {
        let data = storage.read_file(path)?;
        let snapshot = Self::from_json(&data)?;
        tracing::info!(
            "Loaded snapshot '{}': {} host(s), {} linked model(s), {} marker(s)",
            path,
            snapshot.hosts.len(),
            snapshot.links.len(),
            snapshot.markers.len()
        );
        Ok(snapshot)
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &S, path: &str) -> Result<()> {
        storage.write_file(path, &self.to_json()?)
    }

    pub fn conduit_count(&self) -> usize {
        self.links.iter().map(|link| link.conduits.len()).sum()
    }

    /// Builds a document; host solids are validated on the way in.
    pub fn into_document(self) -> Result<InMemoryDocument> {
        let mut document = InMemoryDocument::new();

        for host in self.hosts {
            document.add_host(host.into_element()?);
        }
        for link in self.links {
            document.add_linked_model(link);
        }
        for variant in self.family_variants {
            document.add_family_variant(variant);
        }
        for marker in self.markers {
            document.add_marker(marker);
        }

        Ok(document)
    }

    /// Captures the committed state of `document`.
    pub fn from_document(document: &InMemoryDocument) -> Self {
        Self {
            hosts: document
                .hosts()
                .iter()
                .map(HostSnapshot::from_element)
                .collect(),
            links: document.links().to_vec(),
            family_variants: document.variants().to_vec(),
            markers: document.committed_markers().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ModelDocument;
    use crate::geometry::GeometryError;
    use crate::utils::error::SleeveError;

    const SNAPSHOT: &str = r#"{
        "hosts": [
            {
                "id": 10,
                "class": "floor",
                "level": 1,
                "geometry": [{"kind": "box", "min": [0.0, 0.0, 0.0], "max": [10.0, 10.0, 0.5]}]
            },
            {
                "id": 11,
                "class": "wall",
                "location": {"curve": {"start": [5.0, 0.0, 0.0], "end": [5.0, 10.0, 0.0]}},
                "geometry": [
                    {"kind": "curve", "start": [5.0, 0.0, 0.0], "end": [5.0, 10.0, 0.0]},
                    {
                        "kind": "prism",
                        "base": [[4.75, 0.0, 0.0], [5.25, 0.0, 0.0], [5.25, 10.0, 0.0], [4.75, 10.0, 0.0]],
                        "extrusion": [0.0, 0.0, 3.0]
                    }
                ]
            }
        ],
        "links": [
            {
                "id": 1,
                "name": "MEP",
                "conduits": [
                    {
                        "id": 500,
                        "unique_id": "pipe-1",
                        "location": {"curve": {"start": [3.0, 7.0, -1.0], "end": [3.0, 7.0, 2.0]}},
                        "outer_diameter": 0.2
                    }
                ]
            }
        ],
        "family_variants": [
            {"id": 900, "family": "Sleeve", "name": "Sleeve_Floor", "parameters": ["Diameter"]}
        ]
    }"#;

    #[test]
    fn test_snapshot_builds_document() {
        let snapshot = ModelSnapshot::from_json(SNAPSHOT.as_bytes()).unwrap();
        assert_eq!(snapshot.conduit_count(), 1);

        let document = snapshot.into_document().unwrap();

        assert_eq!(document.hosts().len(), 2);
        assert_eq!(document.linked_models().len(), 1);
        assert!(document.family_variant("Sleeve_Floor").is_some());
        assert!(!document.family_variant("Sleeve_Floor").unwrap().active);

        let wall = &document.hosts()[1];
        let objects = wall.geometry.as_ref().unwrap();
        assert!(matches!(objects[0], GeometryObject::Curve(_)));
        assert!(matches!(objects[1], GeometryObject::Solid(_)));
    }

    #[test]
    fn test_document_round_trips_through_snapshot() {
        let document = ModelSnapshot::from_json(SNAPSHOT.as_bytes())
            .unwrap()
            .into_document()
            .unwrap();

        let saved = ModelSnapshot::from_document(&document);
        let reloaded = ModelSnapshot::from_json(&saved.to_json().unwrap())
            .unwrap()
            .into_document()
            .unwrap();

        assert_eq!(reloaded.hosts(), document.hosts());
        assert_eq!(reloaded.links(), document.links());
    }

    #[test]
    fn test_invalid_solid_is_rejected() {
        let json = r#"{
            "hosts": [{
                "id": 1,
                "class": "wall",
                "geometry": [{"kind": "solid", "vertices": [[0,0,0],[1,0,0],[0,1,0]], "triangles": [[0,1,3]]}]
            }]
        }"#;

        let err = ModelSnapshot::from_json(json.as_bytes())
            .unwrap()
            .into_document()
            .unwrap_err();

        assert!(matches!(
            err,
            SleeveError::GeometryError(GeometryError::InvalidFaceIndex { index: 3, .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_a_serialization_error() {
        let err = ModelSnapshot::from_json(b"{ not json").unwrap_err();
        assert!(matches!(err, SleeveError::SerializationError(_)));
    }
}
