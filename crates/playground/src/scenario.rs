//! Scenario files: a scripted sequence of portal and surface lifecycle steps.

use std::collections::HashMap;
use std::fmt;

use portico_portal::{
	HitTarget, Host, HostOptions, Layer, PointerRoute, Portal, PortalContext, PortalError, Surface,
};
use portico_primitives::{PointerEvent, PointerKind, Position, Rect};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or replaying a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
	/// The scenario file is not valid TOML or has the wrong shape.
	#[error("malformed scenario file")]
	Parse(#[from] toml::de::Error),

	/// A step names a node that is not open.
	#[error("step {step}: unknown node '{node}'")]
	UnknownNode { step: usize, node: String },

	/// An `open` step reuses the name of a node that is still open.
	#[error("step {step}: node '{node}' is already open")]
	NodeAlreadyOpen { step: usize, node: String },

	/// A `probe` step ran with no surface attached.
	#[error("step {step}: probe needs an attached surface")]
	NotAttached { step: usize },

	/// The portal layer rejected a step.
	#[error("step {step} rejected by the portal host")]
	Portal {
		step: usize,
		#[source]
		source: PortalError,
	},
}

/// A parsed scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
	#[serde(default, rename = "step")]
	pub steps: Vec<Step>,
}

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
	/// Create a portal named `node`.
	Open {
		node: String,
		content: String,
		#[serde(default)]
		bounds: Option<Rect>,
	},
	/// Replace the content of an open portal.
	Update {
		node: String,
		content: String,
		#[serde(default)]
		bounds: Option<Rect>,
	},
	/// Drop an open portal.
	Close { node: String },
	/// Mount the render surface.
	Attach,
	/// Unmount the render surface.
	Detach,
	/// Route a pointer press through the surface.
	Probe { at: Position },
}

impl Scenario {
	pub fn parse(text: &str) -> Result<Self, ScenarioError> {
		Ok(toml::from_str(text)?)
	}
}

/// Content carried by scenario portals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
	pub node: String,
	pub text: String,
	pub bounds: Option<Rect>,
}

impl HitTarget for Card {
	fn hit_area(&self) -> Option<Rect> {
		self.bounds
	}
}

/// Outcome of one `probe` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
	pub at: Position,
	/// Node that captured the press, or `None` when it passed through.
	pub node: Option<String>,
}

/// Final state after replaying a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
	/// Layer stack of the surface attached at the end, bottom to top.
	pub layers: Vec<Layer<Card>>,
	/// Operations still buffered in the host.
	pub pending: usize,
	pub probes: Vec<ProbeResult>,
}

impl fmt::Display for Report {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for layer in &self.layers {
			writeln!(f, "{}\t{}\t{}", layer.key, layer.content.node, layer.content.text)?;
		}
		if self.pending > 0 {
			writeln!(f, "pending\t{}", self.pending)?;
		}
		for probe in &self.probes {
			let target = probe.node.as_deref().unwrap_or("pass-through");
			writeln!(f, "probe\t{},{}\t{}", probe.at.x, probe.at.y, target)?;
		}
		Ok(())
	}
}

/// Replays `scenario` against a fresh host configured with `options`.
pub fn replay(scenario: &Scenario, options: HostOptions) -> Result<Report, ScenarioError> {
	let host = Host::with_options(options);
	let ctx = host.context();
	let mut stage = Stage {
		host: &host,
		ctx,
		surface: None,
		nodes: HashMap::new(),
		probes: Vec::new(),
	};

	for (index, step) in scenario.steps.iter().enumerate() {
		let _span = tracing::debug_span!("step", index).entered();
		stage.apply(index + 1, step)?;
	}

	Ok(Report {
		layers: stage.surface.as_ref().map(Surface::snapshot).unwrap_or_default(),
		pending: host.pending_len(),
		probes: stage.probes,
	})
}

struct Stage<'h> {
	host: &'h Host<Card>,
	ctx: PortalContext<Card>,
	surface: Option<Surface<Card>>,
	nodes: HashMap<String, Portal<Card>>,
	probes: Vec<ProbeResult>,
}

impl Stage<'_> {
	fn apply(&mut self, step: usize, action: &Step) -> Result<(), ScenarioError> {
		match action {
			Step::Open { node, content, bounds } => {
				if self.nodes.contains_key(node) {
					return Err(ScenarioError::NodeAlreadyOpen {
						step,
						node: node.clone(),
					});
				}
				let card = card(node, content, *bounds);
				let portal =
					Portal::new(&self.ctx, card).map_err(|source| ScenarioError::Portal { step, source })?;
				tracing::debug!(node = %node, key = %portal.key(), "opened");
				self.nodes.insert(node.clone(), portal);
			}
			Step::Update { node, content, bounds } => {
				let portal = self.node_mut(step, node)?;
				portal.set_content(card(node, content, *bounds));
			}
			Step::Close { node } => {
				let portal = self.nodes.remove(node).ok_or_else(|| ScenarioError::UnknownNode {
					step,
					node: node.clone(),
				})?;
				portal.close();
			}
			Step::Attach => {
				let surface =
					Surface::mount(self.host).map_err(|source| ScenarioError::Portal { step, source })?;
				self.surface = Some(surface);
			}
			Step::Detach => {
				if self.surface.take().is_none() {
					tracing::debug!("detach with no surface attached");
				}
			}
			Step::Probe { at } => {
				let surface = self.surface.as_ref().ok_or(ScenarioError::NotAttached { step })?;
				let route = surface.route_pointer(&PointerEvent::new(PointerKind::Down, *at));
				let node = match route {
					PointerRoute::Captured(key) => surface.with_content(key, |card| card.node.clone()),
					PointerRoute::PassThrough => None,
				};
				self.probes.push(ProbeResult { at: *at, node });
			}
		}
		Ok(())
	}

	fn node_mut(&mut self, step: usize, node: &str) -> Result<&mut Portal<Card>, ScenarioError> {
		self.nodes.get_mut(node).ok_or_else(|| ScenarioError::UnknownNode {
			step,
			node: node.to_string(),
		})
	}
}

fn card(node: &str, text: &str, bounds: Option<Rect>) -> Card {
	Card {
		node: node.to_string(),
		text: text.to_string(),
		bounds,
	}
}

#[cfg(test)]
mod tests;
