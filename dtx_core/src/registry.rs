use std::collections::BTreeMap;

use convert_case::Case;
use convert_case::Casing;
use serde_json::Value;

use crate::DtxError;
use crate::DtxResult;
use crate::FormatOptions;
use crate::Token;
use crate::formats;
use crate::transforms;

/// A token prepared for emission.
///
/// Transforms rewrite `name` and `value`; `original` keeps the token as it
/// was assembled so formats can read composite members the transforms have
/// already flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatToken {
	/// Key path inside its source, e.g. `["radius", "Small"]`.
	pub path: Vec<String>,
	/// Output name. Defaults to the dot-joined path until a name transform
	/// runs.
	pub name: String,
	/// Output value, rewritten by value transforms.
	pub value: Value,
	/// The token before any transform ran.
	pub original: Token,
	/// Identity of the source the token came from.
	pub source: String,
}

impl FlatToken {
	pub fn new(source: &str, path: Vec<String>, token: &Token) -> Self {
		Self {
			name: path.join("."),
			path,
			value: token.value.clone(),
			original: token.clone(),
			source: source.to_string(),
		}
	}

	/// The top-level namespace of the token, e.g. `radius`.
	pub fn namespace(&self) -> Option<&str> {
		self.path.first().map(String::as_str)
	}
}

/// Rewrites a single token in place.
pub type TransformFn = fn(&mut FlatToken);

/// Renders every selected token into the text of one output file.
pub type FormatFn = fn(&[FlatToken], &FormatOptions) -> DtxResult<String>;

/// Named transforms and formats available to platforms.
///
/// Built once at start-up and handed to the [`Pipeline`](crate::Pipeline);
/// nothing is registered globally.
#[derive(Clone)]
pub struct Registry {
	transforms: BTreeMap<String, TransformFn>,
	formats: BTreeMap<String, FormatFn>,
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("transforms", &self.transforms.keys().collect::<Vec<_>>())
			.field("formats", &self.formats.keys().collect::<Vec<_>>())
			.finish()
	}
}

impl Default for Registry {
	fn default() -> Self {
		Self::builtin()
	}
}

impl Registry {
	/// A registry with nothing registered.
	pub fn empty() -> Self {
		Self {
			transforms: BTreeMap::new(),
			formats: BTreeMap::new(),
		}
	}

	/// The built-in transforms and formats.
	pub fn builtin() -> Self {
		let mut registry = Self::empty();
		registry
			.register_transform(transforms::NAME_KEBAB, transforms::name_kebab)
			.register_transform(transforms::FONT_FAMILY_CSS, transforms::font_family_css)
			.register_transform(transforms::SHADOW_CSS, transforms::shadow_css)
			.register_transform(transforms::SIZE_PX_TO_REM, transforms::size_px_to_rem)
			.register_format(formats::CSS_VARIABLES, formats::css_variables)
			.register_format(formats::CSS_COMPONENTS, formats::css_components)
			.register_format(formats::JSON_CLASS_MERGE, formats::class_merge);
		registry
	}

	/// Register (or replace) a transform under `name`.
	pub fn register_transform(&mut self, name: impl Into<String>, transform: TransformFn) -> &mut Self {
		self.transforms.insert(name.into(), transform);
		self
	}

	/// Register (or replace) a format under `name`.
	pub fn register_format(&mut self, name: impl Into<String>, format: FormatFn) -> &mut Self {
		self.formats.insert(name.into(), format);
		self
	}

	pub fn transform(&self, name: &str) -> DtxResult<TransformFn> {
		self.transforms
			.get(name)
			.copied()
			.ok_or_else(|| DtxError::UnknownTransform(name.to_string()))
	}

	pub fn format(&self, name: &str) -> DtxResult<FormatFn> {
		self.formats
			.get(name)
			.copied()
			.ok_or_else(|| DtxError::UnknownFormat(name.to_string()))
	}

	pub fn transform_names(&self) -> impl Iterator<Item = &str> {
		self.transforms.keys().map(String::as_str)
	}

	pub fn format_names(&self) -> impl Iterator<Item = &str> {
		self.formats.keys().map(String::as_str)
	}
}

/// Kebab-case a token path or reference: every run of characters that are
/// not letters or digits separates words, and case and digit boundaries
/// split words further (`Blue500` → `blue-500`, `XLarge` → `x-large`).
pub fn kebab_case(text: &str) -> String {
	let words: String = text
		.chars()
		.map(|c| if c.is_alphanumeric() { c } else { ' ' })
		.collect();

	words
		.split_whitespace()
		.collect::<Vec<_>>()
		.join(" ")
		.to_case(Case::Kebab)
}

/// The CSS text of a JSON value: strings verbatim, arrays comma-joined.
pub fn value_text(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		Value::Array(items) => {
			items
				.iter()
				.map(value_text)
				.collect::<Vec<_>>()
				.join(", ")
		}
		other => other.to_string(),
	}
}
