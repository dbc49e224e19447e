//! A self-contained host document held in memory.
//!
//! Ray casts run over each host's first solid; placements are staged in an
//! open transaction and only become visible through [`ModelDocument::markers`]
//! after commit.

use crate::core::adapter;
use crate::domain::model::{
    CandidateHit, Conduit, ElementId, ElementReference, FamilyVariant, HostClass, LevelId,
    LinkPathId, Marker, ModelId, ParameterValue, StructuralElement, StructuralRole,
};
use crate::domain::ports::{HostError, HostResult, ModelDocument, RayCaster};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedModel {
    pub id: ModelId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub conduits: Vec<Conduit>,
}

#[derive(Debug, Clone)]
struct Transaction {
    name: String,
    markers: Vec<Marker>,
    activated: Vec<ElementId>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDocument {
    hosts: Vec<StructuralElement>,
    links: Vec<LinkedModel>,
    variants: Vec<FamilyVariant>,
    markers: Vec<Marker>,
    transaction: Option<Transaction>,
    next_id: i64,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    pub fn add_host(&mut self, host: StructuralElement) {
        self.reserve_id(host.id);
        self.hosts.push(host);
    }

    pub fn add_linked_model(&mut self, link: LinkedModel) {
        for conduit in &link.conduits {
            self.reserve_id(conduit.id);
        }
        self.links.push(link);
    }

    pub fn add_family_variant(&mut self, variant: FamilyVariant) {
        self.reserve_id(variant.id);
        self.variants.push(variant);
    }

    /// Adds a sleeve that already exists before any run.
    pub fn add_marker(&mut self, marker: Marker) {
        self.reserve_id(marker.id);
        self.markers.push(marker);
    }

    pub fn hosts(&self) -> &[StructuralElement] {
        &self.hosts
    }

    pub fn links(&self) -> &[LinkedModel] {
        &self.links
    }

    pub fn variants(&self) -> &[FamilyVariant] {
        &self.variants
    }

    pub fn committed_markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    fn reserve_id(&mut self, id: ElementId) {
        self.next_id = self.next_id.max(id.0 + 1);
    }

    fn open_transaction(&mut self) -> HostResult<&mut Transaction> {
        self.transaction.as_mut().ok_or(HostError::NoOpenTransaction)
    }
}

impl RayCaster for InMemoryDocument {
    fn find(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        class: HostClass,
    ) -> Vec<CandidateHit> {
        let mut hits: Vec<CandidateHit> = self
            .hosts
            .iter()
            .filter(|host| host.class == class)
            .filter_map(|host| adapter::get_solid(host).map(|solid| (host.id, solid)))
            .flat_map(|(id, solid)| {
                solid
                    .ray_hits(origin, direction)
                    .into_iter()
                    .map(move |t| CandidateHit::new(ElementReference::in_main_model(id), t))
            })
            .collect();

        hits.sort_by(|a, b| a.proximity.total_cmp(&b.proximity));
        hits
    }
}

impl ModelDocument for InMemoryDocument {
    fn linked_models(&self) -> Vec<ModelId> {
        self.links.iter().map(|link| link.id).collect()
    }

    fn conduits(&self, model: ModelId) -> Vec<Conduit> {
        self.links
            .iter()
            .filter(|link| link.id == model)
            .flat_map(|link| link.conduits.iter().cloned())
            .collect()
    }

    fn host(&self, reference: &ElementReference) -> Option<&StructuralElement> {
        // Hosts only live in the main model
        if reference.link_path != LinkPathId::NONE {
            return None;
        }
        self.hosts.iter().find(|host| host.id == reference.element)
    }

    fn family_variant(&self, name: &str) -> Option<FamilyVariant> {
        self.variants.iter().find(|v| v.name == name).cloned()
    }

    fn activate_variant(&mut self, variant: ElementId) -> HostResult<()> {
        if !self.variants.iter().any(|v| v.id == variant) {
            return Err(HostError::ElementNotFound(variant));
        }
        self.open_transaction()?.activated.push(variant);
        Ok(())
    }

    fn markers(&self) -> Vec<Marker> {
        self.markers.clone()
    }

    fn create_instance(
        &mut self,
        point: Point3<f64>,
        variant: ElementId,
        host: ElementId,
        level: Option<LevelId>,
        role: StructuralRole,
    ) -> HostResult<ElementId> {
        if self.transaction.is_none() {
            return Err(HostError::NoOpenTransaction);
        }
        if !self.variants.iter().any(|v| v.id == variant) {
            return Err(HostError::ElementNotFound(variant));
        }
        if !self.hosts.iter().any(|h| h.id == host) {
            return Err(HostError::ElementNotFound(host));
        }
        if point.iter().any(|c| !c.is_finite()) {
            return Err(HostError::CreationFailed {
                reason: "point has non-finite coordinates".to_string(),
            });
        }

        let id = ElementId(self.next_id);
        self.next_id += 1;

        self.open_transaction()?.markers.push(Marker {
            id,
            variant,
            host,
            level,
            location: point,
            role,
            parameters: BTreeMap::new(),
        });
        Ok(id)
    }

    fn set_parameter(
        &mut self,
        element: ElementId,
        name: &str,
        value: ParameterValue,
    ) -> HostResult<()> {
        let variants = &self.variants;
        let transaction = self
            .transaction
            .as_mut()
            .ok_or(HostError::NoOpenTransaction)?;

        // Only markers staged in this transaction are editable
        let marker = transaction
            .markers
            .iter_mut()
            .find(|m| m.id == element)
            .ok_or(HostError::ElementNotFound(element))?;

        let defined = variants
            .iter()
            .find(|v| v.id == marker.variant)
            .is_some_and(|v| v.parameters.iter().any(|p| p == name));
        if !defined {
            return Err(HostError::ParameterNotFound {
                element,
                parameter: name.to_string(),
            });
        }

        marker.parameters.insert(name.to_string(), value);
        Ok(())
    }

    fn start_transaction(&mut self, name: &str) -> HostResult<()> {
        if let Some(open) = &self.transaction {
            return Err(HostError::TransactionAlreadyOpen(open.name.clone()));
        }
        self.transaction = Some(Transaction {
            name: name.to_string(),
            markers: Vec::new(),
            activated: Vec::new(),
        });
        Ok(())
    }

    fn commit(&mut self) -> HostResult<()> {
        let transaction = self.transaction.take().ok_or(HostError::NoOpenTransaction)?;

        for variant in self
            .variants
            .iter_mut()
            .filter(|v| transaction.activated.contains(&v.id))
        {
            variant.active = true;
        }
        self.markers.extend(transaction.markers);
        Ok(())
    }

    fn roll_back(&mut self) {
        if let Some(transaction) = self.transaction.take() {
            tracing::debug!(
                "Rolled back '{}' ({} staged marker(s))",
                transaction.name,
                transaction.markers.len()
            );
        }
    }
}
