//! Creation of sleeve markers in the host document.

use crate::core::codec;
use crate::domain::model::{
    ElementId, FamilyVariant, ParameterValue, PenetrationResult, PlacedSleeve, StructuralRole,
};
use crate::domain::ports::{HostError, ModelDocument};
use crate::utils::error::{Result, SleeveError};

/// Names of the three attributes written on every sleeve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterNames {
    pub diameter: String,
    pub source_id: String,
    pub position: String,
}

pub struct PlacementWriter<'d, D: ModelDocument> {
    document: &'d mut D,
    parameters: &'d ParameterNames,
}

impl<'d, D: ModelDocument> PlacementWriter<'d, D> {
    pub fn new(document: &'d mut D, parameters: &'d ParameterNames) -> Self {
        Self {
            document,
            parameters,
        }
    }

    /// Creates one sleeve for `result` and writes its attributes.
    ///
    /// A missing attribute on `variant` is returned as
    /// [`SleeveError::MissingParameter`]; every later placement would fail the
    /// same way, so callers abort the run on it.
    pub fn place(&mut self, result: &PenetrationResult, variant: &FamilyVariant) -> Result<PlacedSleeve> {
        let marker = self.document.create_instance(
            result.center,
            variant.id,
            result.host,
            result.host_level,
            StructuralRole::NonStructural,
        )?;

        let encoded_position = codec::encode(&result.center);
        let parameters = self.parameters;

        self.set(
            marker,
            variant,
            &parameters.diameter,
            ParameterValue::Double(result.cleared_diameter),
        )?;
        self.set(
            marker,
            variant,
            &parameters.source_id,
            ParameterValue::Text(result.source_conduit_id.clone()),
        )?;
        self.set(
            marker,
            variant,
            &parameters.position,
            ParameterValue::Text(encoded_position.clone()),
        )?;

        tracing::debug!(
            "Placed sleeve {} ({}) on host {} at {}",
            marker,
            variant.name,
            result.host,
            encoded_position
        );

        Ok(PlacedSleeve {
            marker,
            variant: variant.name.clone(),
            host: result.host,
            host_class: result.host_class,
            source_conduit_id: result.source_conduit_id.clone(),
            center: result.center,
            diameter: result.cleared_diameter,
            encoded_position,
        })
    }

    fn set(
        &mut self,
        marker: ElementId,
        variant: &FamilyVariant,
        name: &str,
        value: ParameterValue,
    ) -> Result<()> {
        self.document
            .set_parameter(marker, name, value)
            .map_err(|err| match err {
                HostError::ParameterNotFound { parameter, .. } => SleeveError::MissingParameter {
                    parameter,
                    variant: variant.name.clone(),
                },
                other => SleeveError::HostError(other),
            })
    }
}
