use crate::domain::model::{
    CandidateHit, Conduit, ElementId, ElementReference, FamilyVariant, HostClass, LevelId, Marker,
    ModelId, ParameterValue, StructuralElement, StructuralRole,
};
use crate::utils::error::Result;
use nalgebra::{Point3, Vector3};
use thiserror::Error;

/// Failures reported by the host document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("Element {0} not found")]
    ElementNotFound(ElementId),

    #[error("Parameter '{parameter}' not found on element {element}")]
    ParameterNotFound { element: ElementId, parameter: String },

    #[error("No transaction is open")]
    NoOpenTransaction,

    #[error("Transaction '{0}' is already open")]
    TransactionAlreadyOpen(String),

    #[error("Instance creation failed: {reason}")]
    CreationFailed { reason: String },
}

pub type HostResult<T> = std::result::Result<T, HostError>;

/// Ray-cast primitive scoped to the main model.
pub trait RayCaster {
    /// All ray/host intersections for hosts of `class`, nearest first.
    fn find(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        class: HostClass,
    ) -> Vec<CandidateHit>;
}

/// The host document the placement pass reads from and writes into.
pub trait ModelDocument: RayCaster {
    fn linked_models(&self) -> Vec<ModelId>;

    fn conduits(&self, model: ModelId) -> Vec<Conduit>;

    fn host(&self, reference: &ElementReference) -> Option<&StructuralElement>;

    fn family_variant(&self, name: &str) -> Option<FamilyVariant>;

    fn activate_variant(&mut self, variant: ElementId) -> HostResult<()>;

    fn markers(&self) -> Vec<Marker>;

    fn create_instance(
        &mut self,
        point: Point3<f64>,
        variant: ElementId,
        host: ElementId,
        level: Option<LevelId>,
        role: StructuralRole,
    ) -> HostResult<ElementId>;

    fn set_parameter(
        &mut self,
        element: ElementId,
        name: &str,
        value: ParameterValue,
    ) -> HostResult<()>;

    fn start_transaction(&mut self, name: &str) -> HostResult<()>;

    fn commit(&mut self) -> HostResult<()>;

    fn roll_back(&mut self);
}

/// Settings the placement engine needs, independent of where they came from.
pub trait ConfigProvider {
    fn wall_variant(&self) -> &str;
    fn floor_variant(&self) -> &str;
    fn diameter_parameter(&self) -> &str;
    fn source_id_parameter(&self) -> &str;
    fn position_parameter(&self) -> &str;
    /// Clearance added to the outer diameter, already in model units.
    fn clearance(&self) -> f64;
    fn skip_existing(&self) -> bool;
    fn existing_tolerance(&self) -> f64;
}

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}
