use serde::Deserialize;

/// Default number of buffered operations before the host starts warning.
pub const DEFAULT_PENDING_WARN_THRESHOLD: usize = 64;

/// Tunables for a [`Host`](crate::Host).
///
/// Every field has a default, so an empty config table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostOptions {
	/// Name attached to this host's log events.
	pub label: String,
	/// Pending-buffer length above which a warning is logged once per detached period.
	pub pending_warn_threshold: usize,
}

impl Default for HostOptions {
	fn default() -> Self {
		Self {
			label: "host".to_string(),
			pending_warn_threshold: DEFAULT_PENDING_WARN_THRESHOLD,
		}
	}
}

impl HostOptions {
	/// Default options with a custom label.
	pub fn labeled(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			..Self::default()
		}
	}
}
