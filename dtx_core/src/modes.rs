//! Mode embedding.
//!
//! A token's mode set holds one value per design-tool mode. The generated
//! stylesheets carry no notion of modes, so when the values diverge they
//! are folded into a single CSS expression gated on externally set flags
//! (`--is-light`, `--is-size-compact`, ...).

use serde_json::Value;

use crate::ModeSet;
use crate::Token;

pub const LIGHT: &str = "Light";
pub const DARK: &str = "Dark";
pub const BASE: &str = "Base";
pub const COMPACT: &str = "Compact";
pub const COMFORTABLE: &str = "Comfortable";

/// The recognized partitions of a mode set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModePartition {
	/// `{Light, Dark}`
	ColorScheme,
	/// `{Base, Compact, Comfortable}`
	Density,
}

impl ModePartition {
	/// Classify a mode set by its exact key set. Any other combination of
	/// modes has no embedding rule.
	pub fn detect(modes: &ModeSet) -> Option<Self> {
		let has = |mode: &str| modes.contains_key(mode);

		if modes.len() == 2 && has(LIGHT) && has(DARK) {
			return Some(Self::ColorScheme);
		}

		if modes.len() == 3 && has(BASE) && has(COMPACT) && has(COMFORTABLE) {
			return Some(Self::Density);
		}

		None
	}
}

/// Fold a token's diverging mode values into its `$value`. Tokens without
/// modes, with equal mode values, or with an unrecognized partition are left
/// untouched.
pub fn embed_modes(token: &mut Token) {
	let Some(modes) = &token.modes else {
		return;
	};

	let embedded = match ModePartition::detect(modes) {
		Some(ModePartition::ColorScheme) => {
			let (light, dark) = (&modes[LIGHT], &modes[DARK]);
			if light == dark {
				return;
			}

			let (light, dark) = (mode_text(light), mode_text(dark));
			if token.is_type("color") {
				format!("light-dark({light}, {dark})")
			} else {
				format!("var(--is-light, {light}) var(--is-dark, {dark})")
			}
		}
		Some(ModePartition::Density) => {
			let (base, compact, comfortable) = (&modes[BASE], &modes[COMPACT], &modes[COMFORTABLE]);
			if base == compact && compact == comfortable {
				return;
			}

			format!(
				"var(--is-size-base, {}) var(--is-size-compact, {}) var(--is-size-comfortable, {})",
				mode_text(base),
				mode_text(compact),
				mode_text(comfortable)
			)
		}
		None => return,
	};

	token.value = Value::String(embedded);
}

fn mode_text(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}
