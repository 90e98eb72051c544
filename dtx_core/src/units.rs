use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::Token;
use crate::references::is_reference;

/// Root font size the relative unit is computed against.
pub const BASE_FONT_SIZE_PX: f64 = 16.0;

static PIXELS: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\s*(-?(?:\d+(?:\.\d*)?|\.\d+))px\s*$")
		.unwrap_or_else(|e| panic!("invalid pixel pattern: {e}"))
});

/// Convert a pixel length such as `24px` into `1.5rem`. Returns `None` for
/// anything that is not a plain pixel length, including references.
pub fn px_to_rem(text: &str) -> Option<String> {
	if is_reference(text) {
		return None;
	}

	let magnitude: f64 = PIXELS.captures(text)?.get(1)?.as_str().parse().ok()?;
	let rem = magnitude / BASE_FONT_SIZE_PX;
	// Avoid printing `-0rem`.
	let rem = if rem == 0.0 { 0.0 } else { rem };

	Some(format!("{rem}rem"))
}

/// Convert the token value and every mode entry from pixels to rem where
/// they are plain pixel lengths.
pub fn convert_token_units(token: &mut Token) {
	convert_value(&mut token.value);

	if let Some(modes) = &mut token.modes {
		modes.values_mut().for_each(convert_value);
	}
}

fn convert_value(value: &mut Value) {
	if let Some(converted) = value.as_str().and_then(px_to_rem) {
		*value = Value::String(converted);
	}
}
