//! Drives a [`FlowsheetModel`] and extracts raw flow records.

use tracing::{debug, warn};

use lca_model::{RawFlowRecord, canonical_unit};

use crate::error::{Result, SimulationError};
use crate::model::{FlowsheetModel, Port, PortRoleMap, PortStream, SimulationInputs};

/// Basis/content unit combinations and the unit of their product, in
/// canonical spelling.
const COMPOSITION_UNITS: &[(&str, &str, &str)] = &[
    ("kg/hr", "mass fraction", "kg/hr"),
    ("kg/hr", "ppm", "mg/hr"),
    ("L/hr", "mg/L", "mg/hr"),
    ("m3/hr", "kg/m3", "kg/hr"),
    ("L/hr", "g/L", "g/hr"),
];

/// Builds, configures and solves `model`, then extracts every port flow.
///
/// A non-converged solve is returned as [`SimulationError::NotConverged`]
/// carrying the solver diagnostics; it is never retried.
pub fn run_simulation<M>(
    model: &mut M,
    inputs: &SimulationInputs,
    port_roles: &PortRoleMap,
) -> Result<Vec<RawFlowRecord>>
where
    M: FlowsheetModel + ?Sized,
{
    model.build()?;
    model.set_inputs(inputs)?;
    let report = model.solve()?;
    if !report.converged {
        warn!(
            diagnostics = report.diagnostics.len(),
            "flowsheet did not converge"
        );
        return Err(SimulationError::NotConverged {
            diagnostics: report.diagnostics,
        });
    }
    extract_raw_flows(model, port_roles)
}

/// Reads every stream at every port of an already solved model.
///
/// Records come out in port order, then stream order within a port.
pub fn extract_raw_flows<M>(model: &M, port_roles: &PortRoleMap) -> Result<Vec<RawFlowRecord>>
where
    M: FlowsheetModel + ?Sized,
{
    let mut records = Vec::new();
    for port in model.ports() {
        let role = port_roles.role_for(&port)?;
        let streams = model.port_streams(&port.name)?;
        debug!(
            port = %port.name,
            kind = %port.kind,
            role = %role,
            streams = streams.len(),
            "extracting port"
        );
        for stream in &streams {
            let (quantity, unit) = component_quantity(&port, stream)?;
            if quantity == 0.0 {
                debug!(port = %port.name, component = %stream.component, "zero flow reported");
            }
            records.push(
                RawFlowRecord::new(stream.component.trim(), quantity, unit, role)
                    .with_source(port.name.clone())
                    .with_direction(port.kind.direction()),
            );
        }
    }
    Ok(records)
}

fn component_quantity(port: &Port, stream: &PortStream) -> Result<(f64, String)> {
    let Some(content) = &stream.content else {
        return Ok((stream.basis, stream.basis_unit.trim().to_string()));
    };
    let basis_unit = canonical_unit(&stream.basis_unit);
    let content_unit = canonical_unit(&content.unit);
    COMPOSITION_UNITS
        .iter()
        .find(|(basis, content, _)| *basis == basis_unit && *content == content_unit)
        .map(|(_, _, unit)| (stream.basis * content.value, (*unit).to_string()))
        .ok_or_else(|| SimulationError::IncompatibleContent {
            port: port.name.clone(),
            component: stream.component.clone(),
            basis_unit: stream.basis_unit.trim().to_string(),
            content_unit: content.unit.trim().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port() -> Port {
        Port::inlet("Solid Feed")
    }

    #[test]
    fn mass_fraction_scales_total_flow() {
        let stream = PortStream::total("Yttrium Oxide", 200.0, "kg/hr").with_content(0.01, "mass fraction");
        let (quantity, unit) = component_quantity(&port(), &stream).unwrap();
        assert!((quantity - 2.0).abs() < 1e-12);
        assert_eq!(unit, "kg/hr");
    }

    #[test]
    fn concentration_gives_mass_rate() {
        let stream = PortStream::total("Aluminum", 50.0, "L/hr").with_content(12.0, "mg/L");
        let (quantity, unit) = component_quantity(&port(), &stream).unwrap();
        assert!((quantity - 600.0).abs() < 1e-12);
        assert_eq!(unit, "mg/hr");
    }

    #[test]
    fn aliased_units_are_recognized() {
        let stream = PortStream::total("Y2O3", 200.0, "kg/h").with_content(0.01, "Mass Fraction");
        let (quantity, unit) = component_quantity(&port(), &stream).unwrap();
        assert!((quantity - 2.0).abs() < 1e-12);
        assert_eq!(unit, "kg/hr");

        let stream = PortStream::total("Iron", 4.0, "m3/hour").with_content(1.5, "kg/m^3");
        assert_eq!(
            component_quantity(&port(), &stream).unwrap(),
            (6.0, "kg/hr".to_string())
        );

        let stream = PortStream::total("Aluminum", 50.0, "l/h").with_content(12.0, "MG/L");
        assert_eq!(component_quantity(&port(), &stream).unwrap().1, "mg/hr");
    }

    #[test]
    fn stream_without_content_is_taken_as_is() {
        let stream = PortStream::total("Water", 10.0, " L/hr ");
        assert_eq!(
            component_quantity(&port(), &stream).unwrap(),
            (10.0, "L/hr".to_string())
        );
    }

    #[test]
    fn unknown_combination_is_rejected() {
        let stream = PortStream::total("Iron", 3.0, "kg/hr").with_content(5.0, "mg/L");
        let err = component_quantity(&port(), &stream).unwrap_err();
        assert!(matches!(err, SimulationError::IncompatibleContent { .. }));
    }
}
