//! Assembly of destination subtrees from the design tool export.
//!
//! The export is organised by design-tool collection (`Theme`, `Size`,
//! `Color Primitives`, ...). The generated stylesheets are organised by
//! theme namespace (`color`, `spacing`, `radius`, ...). The assemblers
//! select, omit, pick and re-key subtrees of the export into that fixed
//! shape, then run the value passes over the result.

use tracing::debug;

use crate::DtxConfig;
use crate::DtxError;
use crate::DtxResult;
use crate::Group;
use crate::Node;
use crate::Token;
use crate::mapper::Mapped;
use crate::mapper::map_tokens;
use crate::modes::embed_modes;
use crate::references::rewrite_token_references;
use crate::units::convert_token_units;

pub const THEME_GROUP: &str = "Theme";
pub const COLOR_PRIMITIVES: &str = "Color Primitives";
pub const TYPOGRAPHY_PRIMITIVES: &str = "Typography Primitives";
pub const TYPOGRAPHY_STYLES: &str = "Typography-styles";
pub const EFFECT_STYLES: &str = "Effect-styles";
pub const SIZE: &str = "Size";

/// Sub-groups of a theme group that hold colours rather than typography.
const THEME_COLOR_GROUPS: [&str; 4] = ["Background", "Text", "Icon", "Border"];
const UTILITIES: &str = "Utilities";

/// Every top-level namespace an assembled source can contain. References
/// whose head is one of these are already in the target convention.
pub const THEME_NAMESPACES: [&str; 18] = [
	"color",
	"background-color",
	"text-color",
	"border-color",
	"ring-color",
	"spacing",
	"font",
	"text",
	"font-weight",
	"tracking",
	"leading",
	"radius",
	"shadow",
	"inset-shadow",
	"blur",
	"default-border-width",
	"default-ring-width",
	"typography",
];

/// An assembled and prepared token tree together with the file identity it
/// is published under. Destinations select sources by this identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
	pub id: String,
	pub tokens: Group,
}

/// Look up the node at `path`, failing with a malformed source error that
/// names the first missing segment.
pub fn select<'a>(tree: &'a Group, path: &[&str]) -> DtxResult<&'a Node> {
	let mut current = tree;
	let mut node = None;

	for (index, segment) in path.iter().enumerate() {
		let Some(next) = current.get(*segment) else {
			return Err(DtxError::malformed(
				path[..=index].join("."),
				"expected namespace is missing",
			));
		};

		if index + 1 < path.len() {
			current = next.as_group().ok_or_else(|| {
				DtxError::malformed(path[..=index].join("."), "expected a group, found a token")
			})?;
		}

		node = Some(next);
	}

	node.ok_or_else(|| DtxError::malformed("<root>", "empty selection path"))
}

pub fn select_group<'a>(tree: &'a Group, path: &[&str]) -> DtxResult<&'a Group> {
	select(tree, path)?
		.as_group()
		.ok_or_else(|| DtxError::malformed(path.join("."), "expected a group, found a token"))
}

pub fn select_token<'a>(tree: &'a Group, path: &[&str]) -> DtxResult<&'a Token> {
	select(tree, path)?
		.as_token()
		.ok_or_else(|| DtxError::malformed(path.join("."), "expected a token, found a group"))
}

/// A copy of `group` without the named entries.
pub fn omit(group: &Group, keys: &[&str]) -> Group {
	let mut output = group.clone();
	output.retain(|key, _| !keys.contains(&key.as_str()));
	output
}

/// A copy of `group` with only the named entries, in the order given.
pub fn pick(group: &Group, keys: &[&str]) -> DtxResult<Group> {
	let mut output = Group::new();

	for key in keys {
		let node = group
			.get(*key)
			.ok_or_else(|| DtxError::malformed(*key, "expected entry is missing"))?;
		output.insert((*key).to_string(), node.clone());
	}

	Ok(output)
}

/// Merge groups left to right. A key that appears again keeps its first
/// position and takes the later value.
pub fn merge(groups: impl IntoIterator<Item = Group>) -> Group {
	let mut output = Group::new();

	for group in groups {
		output.meta.extend(group.meta);
		output.extend(group.entries);
	}

	output
}

/// Collect the tokens of every typography sub-group whose key starts with
/// `prefix`, re-keyed as the sub-group name followed by the rest of the key.
///
/// `{ Heading: { "Font Size Large": t } }` with prefix `Font Size` yields
/// `{ "Heading Large": t }`.
pub fn extract_prefixed(typography: &Group, prefix: &str) -> Group {
	let mut output = Group::new();

	for (group_key, node) in &typography.entries {
		let Node::Group(group) = node else {
			continue;
		};

		for (token_key, token) in &group.entries {
			if let Some(rest) = token_key.strip_prefix(prefix) {
				output.insert(format!("{group_key}{rest}"), token.clone());
			}
		}
	}

	output
}

fn convert_units(group: &Group) -> Group {
	map_tokens(group, |key, mut token| {
		convert_token_units(&mut token);
		Mapped::keep(key, token)
	})
}

fn font_families(primitives: &Group) -> Group {
	map_tokens(&omit(primitives, &["Weight", "Scale"]), |key, mut token| {
		token.r#type = Some("fontFamily".to_string());

		let fallback = match key {
			"Family Sans" => Some("sans-serif"),
			"Family Serif" => Some("serif"),
			"Family Mono" => Some("monospace"),
			_ => None,
		};
		if let Some(fallback) = fallback {
			token.value = serde_json::Value::Array(vec![token.value, fallback.into()]);
		}

		let key = key.strip_prefix("Family ").unwrap_or(key);
		Mapped::keep(key, token)
	})
}

/// Build the theme subtree for the theme group named `theme_group`.
pub fn assemble_theme(tree: &Group, theme_group: &str) -> DtxResult<Group> {
	let theme = select_group(tree, &[theme_group])?;
	let typography = omit(theme, &THEME_COLOR_GROUPS);
	let color_group = |name: &str| -> DtxResult<Group> {
		Ok(omit(select_group(theme, &[name]).map_err(|_| {
			DtxError::malformed(format!("{theme_group}.{name}"), "expected namespace is missing")
		})?, &[UTILITIES]))
	};

	let primitives = select_group(tree, &[TYPOGRAPHY_PRIMITIVES])?;

	let mut text_color = color_group("Text")?;
	text_color.insert("icon".to_string(), Node::Group(color_group("Icon")?));

	let text = convert_units(&merge([
		map_tokens(select_group(tree, &[TYPOGRAPHY_PRIMITIVES, "Scale"])?, |key, token| {
			Mapped::keep(&key.replacen("Scale ", "", 1), token)
		}),
		extract_prefixed(&typography, "Font Size"),
	]));

	let font_weight = merge([
		map_tokens(select_group(tree, &[TYPOGRAPHY_PRIMITIVES, "Weight"])?, |key, token| {
			if key.ends_with(" Italic") {
				return Mapped::Skip;
			}
			Mapped::keep(key.strip_prefix("Weight ").unwrap_or(key), token)
		}),
		extract_prefixed(&typography, "Font Weight"),
	]);

	let entries: Vec<(&str, Node)> = vec![
		("color", select_group(tree, &[COLOR_PRIMITIVES])?.clone().into()),
		("background-color", color_group("Background")?.into()),
		("text-color", text_color.into()),
		("border-color", color_group("Border")?.into()),
		("ring-color", color_group("Border")?.into()),
		("spacing", pick(select_group(tree, &[SIZE])?, &["Space", "Depth", "Icon"])?.into()),
		(
			"font",
			merge([
				font_families(primitives),
				extract_prefixed(&typography, "Font Family"),
			])
			.into(),
		),
		("text", text.into()),
		("font-weight", font_weight.into()),
		(
			"tracking",
			convert_units(&extract_prefixed(&typography, "Letter Spacing")).into(),
		),
		(
			"leading",
			convert_units(&extract_prefixed(&typography, "Line Height")).into(),
		),
		("radius", select_group(tree, &[SIZE, "Radius"])?.clone().into()),
		(
			"shadow",
			select_group(tree, &[EFFECT_STYLES, "Drop Shadow"])?.clone().into(),
		),
		(
			"inset-shadow",
			select_group(tree, &[EFFECT_STYLES, "Inner Shadow"])?.clone().into(),
		),
		("blur", select_group(tree, &[SIZE, "Blur"])?.clone().into()),
		(
			"default-border-width",
			select_token(tree, &[SIZE, "Stroke", "Border"])?.clone().into(),
		),
		(
			"default-ring-width",
			select_token(tree, &[SIZE, "Stroke", "Focus Ring"])?.clone().into(),
		),
	];

	Ok(entries.into_iter().collect())
}

/// Build the component subtree: every typography style except the
/// `.Utilities` helpers.
pub fn assemble_components(tree: &Group) -> DtxResult<Group> {
	let styles = select_group(tree, &[TYPOGRAPHY_STYLES])?;
	Ok([("typography", omit(styles, &[".Utilities"]))]
		.into_iter()
		.collect())
}

/// Run the value passes every assembled subtree receives: rewrite alias
/// references into the theme convention, then fold mode values into the
/// token value.
pub fn prepare(group: &Group) -> Group {
	map_tokens(group, |key, mut token| {
		rewrite_token_references(&mut token);
		embed_modes(&mut token);
		Mapped::keep(key, token)
	})
}

/// Assemble and prepare every configured source: one per theme, followed by
/// the component source.
pub fn assemble_sources(tree: &Group, config: &DtxConfig) -> DtxResult<Vec<Source>> {
	let mut sources = Vec::with_capacity(config.themes.len() + 1);

	for (key, theme) in &config.themes {
		let id = theme.file(key);
		let tokens = prepare(&assemble_theme(tree, theme.group())?);
		debug!(
			theme = key.as_str(),
			source = id.as_str(),
			tokens = tokens.token_count(),
			"assembled theme source"
		);
		sources.push(Source { id, tokens });
	}

	let tokens = prepare(&assemble_components(tree)?);
	debug!(
		source = config.components.file.as_str(),
		tokens = tokens.token_count(),
		"assembled component source"
	);
	sources.push(Source {
		id: config.components.file.clone(),
		tokens,
	});

	Ok(sources)
}
