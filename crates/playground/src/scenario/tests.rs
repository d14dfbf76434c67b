use portico_portal::{HostOptions, PortalError};
use portico_primitives::{Position, Rect};
use pretty_assertions::assert_eq;

use super::{Scenario, ScenarioError, Step, replay};

const FIRST_FRAME: &str = r#"
[[step]]
op = "open"
node = "a"
content = "X"

[[step]]
op = "open"
node = "b"
content = "Y"

[[step]]
op = "update"
node = "b"
content = "Y2"

[[step]]
op = "close"
node = "a"

[[step]]
op = "attach"
"#;

fn run(text: &str) -> Result<super::Report, ScenarioError> {
	replay(&Scenario::parse(text)?, HostOptions::default())
}

#[test]
fn parses_every_step_kind() {
	let scenario = Scenario::parse(
		r#"
[[step]]
op = "open"
node = "menu"
content = "File"
bounds = { x = 0, y = 1, width = 10, height = 4 }

[[step]]
op = "detach"

[[step]]
op = "probe"
at = { x = 2, y = 3 }
"#,
	)
	.unwrap();

	assert_eq!(
		scenario.steps,
		vec![
			Step::Open {
				node: "menu".into(),
				content: "File".into(),
				bounds: Some(Rect::new(0, 1, 10, 4)),
			},
			Step::Detach,
			Step::Probe { at: Position::new(2, 3) },
		]
	);
}

#[test]
fn first_frame_replay_keeps_only_latest_surviving_content() {
	let report = run(FIRST_FRAME).unwrap();

	let rows: Vec<_> = report
		.layers
		.iter()
		.map(|layer| (layer.key.get(), layer.content.node.as_str(), layer.content.text.as_str()))
		.collect();
	assert_eq!(rows, vec![(1, "b", "Y2")]);
	assert_eq!(report.pending, 0);
	assert_eq!(report.to_string(), "1\tb\tY2\n");
}

#[test]
fn unattached_run_reports_pending_operations() {
	let report = run(
		r#"
[[step]]
op = "open"
node = "a"
content = "X"

[[step]]
op = "update"
node = "a"
content = "X2"
"#,
	)
	.unwrap();

	assert!(report.layers.is_empty());
	assert_eq!(report.pending, 1);
}

#[test]
fn probes_report_capturing_node_or_pass_through() {
	let report = run(
		r#"
[[step]]
op = "attach"

[[step]]
op = "open"
node = "sheet"
content = "sheet"
bounds = { x = 0, y = 0, width = 20, height = 10 }

[[step]]
op = "open"
node = "menu"
content = "menu"
bounds = { x = 2, y = 2, width = 4, height = 2 }

[[step]]
op = "probe"
at = { x = 3, y = 3 }

[[step]]
op = "probe"
at = { x = 10, y = 8 }

[[step]]
op = "probe"
at = { x = 30, y = 30 }
"#,
	)
	.unwrap();

	let hits: Vec<_> = report.probes.iter().map(|probe| probe.node.as_deref()).collect();
	assert_eq!(hits, vec![Some("menu"), Some("sheet"), None]);
	assert!(report.to_string().ends_with("probe\t30,30\tpass-through\n"));
}

#[test]
fn unknown_node_is_reported_with_its_step() {
	let err = run(
		r#"
[[step]]
op = "close"
node = "ghost"
"#,
	)
	.unwrap_err();

	assert!(matches!(err, ScenarioError::UnknownNode { step: 1, ref node } if node == "ghost"));
}

#[test]
fn reopening_an_open_node_is_rejected() {
	let err = run(
		r#"
[[step]]
op = "open"
node = "a"
content = "1"

[[step]]
op = "open"
node = "a"
content = "2"
"#,
	)
	.unwrap_err();

	assert!(matches!(err, ScenarioError::NodeAlreadyOpen { step: 2, .. }));
}

#[test]
fn double_attach_surfaces_portal_error() {
	let err = run(
		r#"
[[step]]
op = "attach"

[[step]]
op = "attach"
"#,
	)
	.unwrap_err();

	assert!(matches!(
		err,
		ScenarioError::Portal {
			step: 2,
			source: PortalError::SurfaceAlreadyAttached
		}
	));
}

#[test]
fn portal_errors_are_reported_once_in_the_chain() {
	use std::error::Error as _;

	let err = run(
		r#"
[[step]]
op = "attach"

[[step]]
op = "attach"
"#,
	)
	.unwrap_err();

	let source = err.source().map(ToString::to_string).unwrap();
	assert_eq!(source, PortalError::SurfaceAlreadyAttached.to_string());
	assert!(!err.to_string().contains(&source));
}

#[test]
fn probe_without_surface_is_an_error() {
	let err = run(
		r#"
[[step]]
op = "probe"
at = { x = 0, y = 0 }
"#,
	)
	.unwrap_err();

	assert!(matches!(err, ScenarioError::NotAttached { step: 1 }));
}

#[test]
fn unknown_op_fails_to_parse() {
	let err = Scenario::parse(
		r#"
[[step]]
op = "explode"
"#,
	)
	.unwrap_err();

	assert!(matches!(err, ScenarioError::Parse(_)));
}

#[test]
fn bundled_scenario_replays() {
	let report = run(include_str!("../../scenarios/first_frame.toml")).unwrap();
	assert_eq!(
		report.to_string(),
		"1\tb\tY2\nprobe\t5,3\tb\nprobe\t0,0\tpass-through\n"
	);
}

#[test]
fn bundled_host_options_parse() {
	let options: HostOptions = toml::from_str(include_str!("../../scenarios/host.toml")).unwrap();
	assert_eq!(options.label, "playground");
	assert_eq!(options.pending_warn_threshold, 8);
}
