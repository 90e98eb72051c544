//! Built-in emission transforms.
//!
//! Each transform rewrites a [`FlatToken`] in place. Value transforms only
//! touch tokens of the types they understand and pass everything else
//! through, so they can be listed on any platform.

use serde_json::Value;

use crate::references::is_reference;
use crate::registry::FlatToken;
use crate::registry::kebab_case;
use crate::registry::value_text;
use crate::units::px_to_rem;

pub const NAME_KEBAB: &str = "name/kebab";
pub const FONT_FAMILY_CSS: &str = "font-family/css";
pub const SHADOW_CSS: &str = "shadow/css";
pub const SIZE_PX_TO_REM: &str = "size/px-to-rem";

const FONT_FAMILY_MEMBER: &str = "fontFamily";

/// `["radius", "Small"]` → `radius-small`.
pub fn name_kebab(token: &mut FlatToken) {
	token.name = kebab_case(&token.path.join(" "));
}

/// Render font family stacks as CSS: array members and comma separated
/// entries are joined with `, ` and multi-word family names are quoted.
/// Applies to `fontFamily` tokens and the `fontFamily` member of typography
/// values.
pub fn font_family_css(token: &mut FlatToken) {
	if token.original.is_type("fontFamily") {
		if let Some(css) = font_stack(&token.value) {
			token.value = Value::String(css);
		}
		return;
	}

	if token.original.is_type("typography") {
		let Value::Object(members) = &mut token.value else {
			return;
		};

		if let Some(css) = members.get(FONT_FAMILY_MEMBER).and_then(font_stack) {
			members.insert(FONT_FAMILY_MEMBER.to_string(), Value::String(css));
		}
	}
}

fn font_stack(value: &Value) -> Option<String> {
	match value {
		Value::Array(families) => {
			Some(
				families
					.iter()
					.map(|family| quote_family(&value_text(family)))
					.collect::<Vec<_>>()
					.join(", "),
			)
		}
		Value::String(families) if !is_reference(families) => {
			Some(
				families
					.split(',')
					.map(quote_family)
					.collect::<Vec<_>>()
					.join(", "),
			)
		}
		_ => None,
	}
}

fn quote_family(family: &str) -> String {
	let family = family.trim();
	let quoted = family.len() >= 2
		&& (family.starts_with('"') || family.starts_with('\''))
		&& (family.ends_with('"') || family.ends_with('\''));

	if quoted || !family.contains(char::is_whitespace) || is_reference(family) {
		return family.to_string();
	}

	let quote = if family.contains('\'') { '"' } else { '\'' };
	format!("{quote}{family}{quote}")
}

/// Flatten composite shadow values into the CSS `box-shadow` shorthand.
/// Lists of shadows are joined with `, `. Values that are already strings
/// (including references) are left alone.
pub fn shadow_css(token: &mut FlatToken) {
	if !(token.original.is_type("shadow") || token.original.is_type("boxShadow")) {
		return;
	}

	let css = match &token.value {
		Value::Array(layers) => {
			layers
				.iter()
				.map(shadow_layer)
				.collect::<Vec<_>>()
				.join(", ")
		}
		Value::Object(_) => shadow_layer(&token.value),
		_ => return,
	};

	token.value = Value::String(css);
}

fn shadow_layer(layer: &Value) -> String {
	let Value::Object(members) = layer else {
		return value_text(layer);
	};

	let member = |name: &str| members.get(name).filter(|value| !value.is_null());
	let length = |name: &str| member(name).map_or_else(|| "0".to_string(), value_text);

	let mut css = String::new();

	if member("inset").is_some_and(is_truthy) {
		css.push_str("inset ");
	}

	css.push_str(&format!(
		"{} {} {} ",
		length("offsetX"),
		length("offsetY"),
		length("blur")
	));

	if let Some(spread) = member("spread").filter(|spread| is_truthy(spread)) {
		css.push_str(&value_text(spread));
		css.push(' ');
	}

	css.push_str(&member("color").map_or_else(|| "#000000".to_string(), value_text));
	css
}

/// Loose truthiness of an optional shadow member: `false`, `0` and the empty
/// string switch the feature off.
fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
		Value::String(text) => !text.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Convert plain pixel lengths to rem.
pub fn size_px_to_rem(token: &mut FlatToken) {
	if let Some(rem) = token.value.as_str().and_then(px_to_rem) {
		token.value = Value::String(rem);
	}
}
