//! Adapter tests against an in-test flowsheet double and a TOML recording.

use std::collections::BTreeMap;

use lca_model::{Direction, FlowRole};
use lca_simulation::{
    FlowsheetModel, Port, PortRoleMap, PortStream, RecordedFlowsheet, SimulationError,
    SimulationInputs, SolveReport, extract_raw_flows, run_simulation,
};

#[derive(Default)]
struct StubFlowsheet {
    calls: Vec<&'static str>,
    converged: bool,
    streams: BTreeMap<String, Vec<PortStream>>,
    ports: Vec<Port>,
}

impl StubFlowsheet {
    fn leach(converged: bool) -> Self {
        let mut streams = BTreeMap::new();
        streams.insert(
            "Solid Feed".to_string(),
            vec![
                PortStream::total("Inerts", 100.0, "kg/hr").with_content(0.9, "mass fraction"),
                PortStream::total("Cerium Oxide", 100.0, "kg/hr").with_content(0.1, "mass fraction"),
            ],
        );
        streams.insert(
            "Leach Liquor".to_string(),
            vec![PortStream::total("Cerium", 40.0, "L/hr").with_content(25.0, "mg/L")],
        );
        streams.insert(
            "Solid Residue".to_string(),
            vec![PortStream::total("Inerts", 88.0, "kg/hr")],
        );
        Self {
            calls: Vec::new(),
            converged,
            streams,
            ports: vec![
                Port::inlet("Solid Feed"),
                Port::outlet("Leach Liquor"),
                Port::outlet("Solid Residue"),
            ],
        }
    }
}

impl FlowsheetModel for StubFlowsheet {
    fn build(&mut self) -> lca_simulation::Result<()> {
        self.calls.push("build");
        Ok(())
    }

    fn set_inputs(&mut self, _inputs: &SimulationInputs) -> lca_simulation::Result<()> {
        self.calls.push("set_inputs");
        Ok(())
    }

    fn solve(&mut self) -> lca_simulation::Result<SolveReport> {
        self.calls.push("solve");
        if self.converged {
            Ok(SolveReport::converged())
        } else {
            Ok(SolveReport::failed(vec![
                "EXIT: Converged to a point of local infeasibility.".to_string(),
            ]))
        }
    }

    fn ports(&self) -> Vec<Port> {
        self.ports.clone()
    }

    fn port_streams(&self, port: &str) -> lca_simulation::Result<Vec<PortStream>> {
        self.streams
            .get(port)
            .cloned()
            .ok_or_else(|| SimulationError::UnknownPort {
                port: port.to_string(),
            })
    }
}

fn leach_roles() -> PortRoleMap {
    PortRoleMap::new()
        .with("Leach Liquor", FlowRole::Product)
        .with("Solid Residue", FlowRole::Waste)
}

#[test]
fn captures_every_port_in_order() {
    let mut model = StubFlowsheet::leach(true);
    let records = run_simulation(&mut model, &SimulationInputs::new(), &leach_roles()).unwrap();

    assert_eq!(model.calls, vec!["build", "set_inputs", "solve"]);
    let summary: Vec<(&str, &str, FlowRole, Direction)> = records
        .iter()
        .map(|r| (r.flow_name.as_str(), r.source.as_str(), r.flow_role, r.direction))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Inerts", "Solid Feed", FlowRole::Product, Direction::Input),
            ("Cerium Oxide", "Solid Feed", FlowRole::Product, Direction::Input),
            ("Cerium", "Leach Liquor", FlowRole::Product, Direction::Output),
            ("Inerts", "Solid Residue", FlowRole::Waste, Direction::Output),
        ]
    );
    assert!((records[0].quantity - 90.0).abs() < 1e-9);
    assert_eq!(records[2].unit, "mg/hr");
    assert!((records[2].quantity - 1000.0).abs() < 1e-9);
}

#[test]
fn non_convergence_surfaces_diagnostics() {
    let mut model = StubFlowsheet::leach(false);
    let err = run_simulation(&mut model, &SimulationInputs::new(), &leach_roles()).unwrap_err();
    assert!(matches!(err, SimulationError::NotConverged { .. }));
    assert_eq!(err.diagnostics().len(), 1);
    assert!(err.to_string().contains("local infeasibility"));
}

#[test]
fn unmapped_outlet_fails_extraction() {
    let model = StubFlowsheet::leach(true);
    let roles = PortRoleMap::new().with("Leach Liquor", FlowRole::Product);
    let err = extract_raw_flows(&model, &roles).unwrap_err();
    assert!(matches!(err, SimulationError::UnmappedPort { port } if port == "Solid Residue"));
}

const RECORDING: &str = r#"
converged = true
diagnostics = ["EXIT: Optimal Solution Found."]

[inputs]
"leach_solid_feed.flow_mass" = 100.0

[[ports]]
name = "Solid Feed"
kind = "inlet"

[[ports.streams]]
component = "Cerium Oxide"
basis = 100.0
basis_unit = "kg/hr"
content = { value = 0.1, unit = "mass fraction" }

[[ports]]
name = "Roaster Product"
kind = "outlet"

[[ports.streams]]
component = "Cerium Oxide"
basis = 9.5
basis_unit = "kg/hr"
"#;

#[test]
fn recorded_flowsheet_replays_streams() {
    let mut model = RecordedFlowsheet::from_toml_str(RECORDING).unwrap();
    let roles = PortRoleMap::new().with("Roaster Product", FlowRole::Product);
    let inputs = SimulationInputs::new().with("leach_solid_feed.flow_mass", 120.0);

    let records = run_simulation(&mut model, &inputs, &roles).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].source, "Roaster Product");
    assert_eq!(records[1].quantity, 9.5);
    assert_eq!(records[1].direction, Direction::Output);
}

#[test]
fn recorded_streams_require_a_solve() {
    let model = RecordedFlowsheet::from_toml_str(RECORDING).unwrap();
    let err = extract_raw_flows(&model, &PortRoleMap::new().with("Roaster Product", FlowRole::Product))
        .unwrap_err();
    assert!(matches!(err, SimulationError::NotSolved));
}

#[test]
fn recording_with_duplicate_ports_is_rejected() {
    let text = r#"
[[ports]]
name = "Feed"
kind = "inlet"

[[ports]]
name = "Feed"
kind = "outlet"
"#;
    let err = RecordedFlowsheet::from_toml_str(text).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidRecording { .. }));
}
