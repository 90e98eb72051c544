//! Alias reference rewriting.
//!
//! References are brace-delimited token paths embedded in string values,
//! e.g. `{Color Primitives.Blue.500}`. The design tool names them after its
//! own collections; the generated theme uses different namespaces, so every
//! recognized source path shape is rewritten into the theme's shape. The
//! referenced value is never looked up.
//!
//! Each rule only matches inside a single brace expression and every
//! replacement starts with a theme namespace that no rule matches, which
//! makes [`rewrite_references`] idempotent.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;
use serde_json::Value;

use crate::Group;
use crate::Token;
use crate::assemble::THEME_NAMESPACES;

/// Ordered `(pattern, replacement)` pairs. Earlier rules win when shapes
/// overlap.
const REWRITE_RULES: [(&str, &str); 18] = [
	(
		r"\{Theme\.([^{}]+)\.Font Family( [^{}]+)?\}",
		"{font.${1}${2}}",
	),
	(r"\{Theme\.([^{}]+)\.Font Size( [^{}]+)?\}", "{text.${1}${2}}"),
	(
		r"\{Theme\.([^{}]+)\.Font Weight( [^{}]+)?\}",
		"{font-weight.${1}${2}}",
	),
	(
		r"\{Theme\.([^{}]+)\.Letter Spacing( [^{}]+)?\}",
		"{tracking.${1}${2}}",
	),
	(
		r"\{Theme\.([^{}]+)\.Line Height( [^{}]+)?\}",
		"{leading.${1}${2}}",
	),
	(r"\{Theme\.Background\.", "{background-color."),
	(r"\{Theme\.Text\.", "{text-color."),
	(r"\{Theme\.Icon\.", "{text-color.icon."),
	(r"\{Theme\.Border\.", "{border-color."),
	(r"\{Size\.Depth\.", "{spacing.Depth."),
	(r"\{Size\.Space\.", "{spacing.Space."),
	(r"\{Size\.Icon\.", "{spacing.Icon."),
	(r"\{Size\.Radius\.", "{radius."),
	(r"\{Size\.Blur\.", "{blur."),
	(r"\{Color Primitives\.", "{color."),
	(r"\{Typography Primitives\.Scale\.Scale ", "{text."),
	(r"\{Typography Primitives\.Weight\.Weight ", "{font-weight."),
	(r"\{Typography Primitives\.([^{}]+)\.Family ", "{font.${1}."),
];

struct RewriteRule {
	pattern: Regex,
	replacement: &'static str,
}

static RULES: LazyLock<Vec<RewriteRule>> = LazyLock::new(|| {
	REWRITE_RULES
		.iter()
		.map(|&(pattern, replacement)| {
			RewriteRule {
				pattern: Regex::new(pattern)
					.unwrap_or_else(|e| panic!("invalid rewrite rule `{pattern}`: {e}")),
				replacement,
			}
		})
		.collect()
});

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\{([^{}]+)\}").unwrap_or_else(|e| panic!("invalid reference pattern: {e}"))
});

/// Returns true when the text contains a brace-delimited reference.
pub fn is_reference(text: &str) -> bool {
	text.contains('{')
}

/// The inner paths of every reference in `text`, e.g. `color.Blue.500` for
/// `{color.Blue.500}`.
pub fn references(text: &str) -> impl Iterator<Item = &str> {
	REFERENCE
		.captures_iter(text)
		.filter_map(|captures| captures.get(1).map(|path| path.as_str()))
}

/// Replace every reference in `text` with the output of `replace`, which
/// receives the reference path without braces.
pub fn map_references<F>(text: &str, mut replace: F) -> Cow<'_, str>
where
	F: FnMut(&str) -> String,
{
	REFERENCE.replace_all(text, |captures: &Captures<'_>| replace(&captures[1]))
}

/// Rewrite every recognized source reference in `text` into the theme
/// namespace convention. Unrecognized shapes are left as they are.
pub fn rewrite_references(text: &str) -> Cow<'_, str> {
	if !is_reference(text) {
		return Cow::Borrowed(text);
	}

	let mut rewritten: Option<String> = None;

	for rule in RULES.iter() {
		let input = rewritten.as_deref().unwrap_or(text);
		let next = match rule.pattern.replace_all(input, rule.replacement) {
			Cow::Borrowed(_) => continue,
			Cow::Owned(next) => next,
		};
		rewritten = Some(next);
	}

	rewritten.map_or(Cow::Borrowed(text), Cow::Owned)
}

/// Rewrite references in every string of a token: the value (including
/// strings nested inside composite values) and each mode entry.
pub fn rewrite_token_references(token: &mut Token) {
	rewrite_value(&mut token.value);

	if let Some(modes) = &mut token.modes {
		for value in modes.values_mut() {
			rewrite_value(value);
		}
	}
}

fn rewrite_value(value: &mut Value) {
	match value {
		Value::String(text) if is_reference(text) => {
			let rewritten = rewrite_references(text).into_owned();
			*text = rewritten;
		}
		Value::Array(items) => items.iter_mut().for_each(rewrite_value),
		Value::Object(members) => members.values_mut().for_each(rewrite_value),
		_ => {}
	}
}

/// A reference that no rewrite rule recognized and that does not point into
/// a theme namespace. Passed through unchanged; reported so a renamed
/// upstream collection does not go unnoticed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceWarning {
	/// Identity of the source the token was assembled into.
	pub source: String,
	/// Key path of the token inside that source.
	pub path: Vec<String>,
	/// The reference path as written, without braces.
	pub reference: String,
}

/// Collect every reference in `group` whose head segment is not a theme
/// namespace.
pub fn unrecognized_references(source: &str, group: &Group) -> Vec<ReferenceWarning> {
	let mut warnings = Vec::new();

	for (path, token) in group.flatten() {
		let mut strings = Vec::new();
		collect_strings(&token.value, &mut strings);
		if let Some(modes) = &token.modes {
			modes
				.values()
				.for_each(|value| collect_strings(value, &mut strings));
		}

		for text in strings {
			for reference in references(text) {
				if is_recognized(reference) {
					continue;
				}

				let warning = ReferenceWarning {
					source: source.to_string(),
					path: path.clone(),
					reference: reference.to_string(),
				};
				if !warnings.contains(&warning) {
					warnings.push(warning);
				}
			}
		}
	}

	warnings
}

fn is_recognized(reference: &str) -> bool {
	let head = reference.split('.').next().unwrap_or(reference);
	THEME_NAMESPACES.contains(&head)
}

fn collect_strings<'a>(value: &'a Value, strings: &mut Vec<&'a str>) {
	match value {
		Value::String(text) => strings.push(text),
		Value::Array(items) => items.iter().for_each(|item| collect_strings(item, strings)),
		Value::Object(members) => {
			members
				.values()
				.for_each(|member| collect_strings(member, strings));
		}
		_ => {}
	}
}
