//! Built-in output formats.

use indexmap::IndexMap;
use serde_json::Map;
use serde_json::Value;

use crate::DtxError;
use crate::DtxResult;
use crate::FormatOptions;
use crate::references::is_reference;
use crate::references::map_references;
use crate::registry::FlatToken;
use crate::registry::kebab_case;
use crate::registry::value_text;

pub const CSS_VARIABLES: &str = "css/variables";
pub const CSS_COMPONENTS: &str = "css/components";
pub const JSON_CLASS_MERGE: &str = "json/class-merge";

pub const FILE_HEADER: &str = "/**\n * Do not edit directly, this file was auto-generated.\n */\n\n";

const DEFAULT_SELECTOR: &str = ":root";

fn header(options: &FormatOptions) -> &'static str {
	if options.file_header { FILE_HEADER } else { "" }
}

/// One custom property declaration per token inside a single selector
/// block.
///
/// ```css
/// @theme {
///   --radius-small: 0.25rem;
///   --ring-color-focus: var(--color-blue-500); /* Focus ring */
/// }
/// ```
pub fn css_variables(tokens: &[FlatToken], options: &FormatOptions) -> DtxResult<String> {
	let selector = options.selector.as_deref().unwrap_or(DEFAULT_SELECTOR);

	let declarations = tokens
		.iter()
		.map(|token| {
			let mut value = value_text(&token.value);
			if options.output_references && is_reference(&value) {
				value = map_references(&value, |path| format!("var(--{})", kebab_case(path)))
					.into_owned();
			}

			match &token.original.description {
				Some(description) => format!("  --{}: {value}; /* {description} */", token.name),
				None => format!("  --{}: {value};", token.name),
			}
		})
		.collect::<Vec<_>>()
		.join("\n");

	Ok(format!(
		"{}{selector} {{\n{declarations}\n}}\n",
		header(options)
	))
}

/// A typography style member and how its values become utility classes.
struct Facet {
	member: &'static str,
	root: Option<&'static str>,
	/// Known values and the class they map to. `None` contributes nothing.
	classes: &'static [(&'static str, Option<&'static str>)],
}

const FACETS: [Facet; 8] = [
	Facet {
		member: "fontFamily",
		root: Some("font"),
		classes: &[],
	},
	Facet {
		member: "fontSize",
		root: Some("text"),
		classes: &[],
	},
	Facet {
		member: "lineHeight",
		root: Some("leading"),
		classes: &[],
	},
	Facet {
		member: "fontWeight",
		root: Some("font"),
		classes: &[],
	},
	Facet {
		member: "letterSpacing",
		root: Some("tracking"),
		classes: &[],
	},
	Facet {
		member: "textCase",
		root: None,
		classes: &[
			("ORIGINAL", None),
			("UPPER", Some("uppercase")),
			("LOWER", Some("lowercase")),
			("TITLE", None),
		],
	},
	Facet {
		member: "fontStyle",
		root: None,
		classes: &[("normal", None), ("italic", Some("italic"))],
	},
	Facet {
		member: "textDecoration",
		root: None,
		classes: &[
			("NONE", None),
			("UNDERLINE", Some("underline")),
			("STRIKETHROUGH", Some("line-through")),
		],
	},
];

impl Facet {
	fn class(&self, value: &Value) -> Option<String> {
		let text = value_text(value);
		let prefix = self.root.map(|root| format!("{root}-")).unwrap_or_default();

		if let Some(&(_, class)) = self.classes.iter().find(|(known, _)| *known == text) {
			return class.map(|class| format!("{prefix}{class}"));
		}

		if is_reference(&text) {
			return Some(kebab_case(&text));
		}

		Some(format!("{prefix}[{}]", text.replace(' ', "_")))
	}
}

/// The utility classes a typography style composes, deduplicated in facet
/// order.
pub fn typography_classes(style: &Value) -> Vec<String> {
	let mut classes: Vec<String> = Vec::new();

	for facet in &FACETS {
		let Some(value) = style.get(facet.member).filter(|value| !value.is_null()) else {
			continue;
		};

		let Some(class) = facet.class(value) else {
			continue;
		};

		if !classes.contains(&class) {
			classes.push(class);
		}
	}

	classes
}

/// One `@apply` rule per typography token, named after the token.
///
/// Reads the untransformed style so references and raw values map onto the
/// utility class scale.
pub fn css_components(tokens: &[FlatToken], options: &FormatOptions) -> DtxResult<String> {
	let blocks = tokens
		.iter()
		.filter_map(|token| {
			let classes = typography_classes(&token.original.value);
			if classes.is_empty() {
				return None;
			}

			Some(format!(
				".{} {{\n  @apply {};\n}}",
				token.name,
				classes.join(" ")
			))
		})
		.collect::<Vec<_>>()
		.join("\n\n");

	Ok(format!("{}{blocks}\n", header(options)))
}

/// Namespaces whose default scale the generated theme replaces.
pub const OVERRIDE_NAMESPACES: [&str; 9] = [
	"blur",
	"drop-shadow",
	"font-weight",
	"inset-shadow",
	"leading",
	"radius",
	"shadow",
	"text",
	"tracking",
];

/// Namespaces whose default scale the generated theme adds to.
pub const EXTEND_NAMESPACES: [&str; 1] = ["spacing"];

/// The class-merge configuration: for every scale the theme defines, the
/// value names a class-merging utility must treat as members of that scale.
///
/// ```json
/// {
///   "override": { "theme": { "leading": ["none", "tight"], "radius": ["small"] } },
///   "extend": { "theme": { "spacing": ["space-1"] } }
/// }
/// ```
pub fn class_merge(tokens: &[FlatToken], _options: &FormatOptions) -> DtxResult<String> {
	let mut overrides: IndexMap<&str, Vec<String>> =
		IndexMap::from([("leading", vec!["none".to_string()])]);
	let mut extends: IndexMap<&str, Vec<String>> = IndexMap::new();

	for token in tokens {
		let Some(namespace) = token.namespace() else {
			continue;
		};

		let bucket = if let Some(namespace) = known(&OVERRIDE_NAMESPACES, namespace) {
			overrides.entry(namespace).or_default()
		} else if let Some(namespace) = known(&EXTEND_NAMESPACES, namespace) {
			extends.entry(namespace).or_default()
		} else {
			continue;
		};

		let name = kebab_case(&token.path[1..].join(" "));
		if !bucket.contains(&name) {
			bucket.push(name);
		}
	}

	let config = Value::Object(Map::from_iter([
		("override".to_string(), theme_section(overrides)),
		("extend".to_string(), theme_section(extends)),
	]));

	let json = serde_json::to_string_pretty(&config).map_err(|e| {
		DtxError::FormatRender {
			format: JSON_CLASS_MERGE.to_string(),
			reason: e.to_string(),
		}
	})?;

	Ok(json + "\n")
}

fn theme_section(buckets: IndexMap<&str, Vec<String>>) -> Value {
	let theme: Map<String, Value> = buckets
		.into_iter()
		.map(|(namespace, names)| (namespace.to_string(), Value::from(names)))
		.collect();

	Value::Object(Map::from_iter([("theme".to_string(), Value::Object(theme))]))
}

fn known(namespaces: &[&'static str], namespace: &str) -> Option<&'static str> {
	namespaces
		.iter()
		.copied()
		.find(|candidate| *candidate == namespace)
}
