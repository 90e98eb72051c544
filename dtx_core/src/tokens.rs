use derive_more::Deref;
use derive_more::DerefMut;
use indexmap::IndexMap;
use serde_json::Map;
use serde_json::Value;

use crate::DtxError;
use crate::DtxResult;

const VALUE_KEY: &str = "$value";
const TYPE_KEY: &str = "$type";
const DESCRIPTION_KEY: &str = "$description";
const EXTENSIONS_KEY: &str = "$extensions";
const MODE_KEY: &str = "mode";

/// Per-mode variant values attached to a token, keyed by mode name (e.g.
/// `Light`, `Dark`, `Compact`).
pub type ModeSet = IndexMap<String, Value>;

/// A leaf design value.
///
/// Any object in the export with a `$value` member is a token. The members
/// the pipeline reads are lifted into fields; everything else is kept
/// verbatim so it survives the round trip back to JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	/// The raw `$value`: a scalar, a reference-bearing string, or a composite
	/// such as a shadow list or typography style.
	pub value: Value,
	/// The `$type` tag (`color`, `dimension`, `shadow`, `typography`, ...).
	pub r#type: Option<String>,
	/// The optional `$description`.
	pub description: Option<String>,
	/// The optional `$extensions.mode` map.
	pub modes: Option<ModeSet>,
	/// `$extensions` members other than `mode`.
	pub extensions: Map<String, Value>,
	/// Any other members of the token object.
	pub extra: Map<String, Value>,
}

impl Token {
	pub fn new(value: impl Into<Value>) -> Self {
		Self {
			value: value.into(),
			r#type: None,
			description: None,
			modes: None,
			extensions: Map::new(),
			extra: Map::new(),
		}
	}

	#[must_use]
	pub fn with_type(mut self, r#type: impl Into<String>) -> Self {
		self.r#type = Some(r#type.into());
		self
	}

	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	#[must_use]
	pub fn with_modes<K, V>(mut self, modes: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.modes = Some(
			modes
				.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		);
		self
	}

	/// Returns true when the `$type` tag equals `name`.
	pub fn is_type(&self, name: &str) -> bool {
		self.r#type.as_deref() == Some(name)
	}

	fn from_object(object: &Map<String, Value>) -> Self {
		let mut token = Token::new(object.get(VALUE_KEY).cloned().unwrap_or(Value::Null));

		for (key, value) in object {
			match key.as_str() {
				VALUE_KEY => {}
				TYPE_KEY => {
					match value.as_str() {
						Some(tag) => token.r#type = Some(tag.to_string()),
						None => {
							token.extra.insert(key.clone(), value.clone());
						}
					}
				}
				DESCRIPTION_KEY => {
					match value.as_str() {
						Some(text) => token.description = Some(text.to_string()),
						None => {
							token.extra.insert(key.clone(), value.clone());
						}
					}
				}
				EXTENSIONS_KEY => {
					let Value::Object(extensions) = value else {
						token.extra.insert(key.clone(), value.clone());
						continue;
					};

					for (name, extension) in extensions {
						match (name.as_str(), extension) {
							(MODE_KEY, Value::Object(modes)) => {
								token.modes = Some(
									modes
										.iter()
										.map(|(mode, value)| (mode.clone(), value.clone()))
										.collect(),
								);
							}
							_ => {
								token.extensions.insert(name.clone(), extension.clone());
							}
						}
					}
				}
				_ => {
					token.extra.insert(key.clone(), value.clone());
				}
			}
		}

		token
	}

	/// Serialize the token back into its export shape.
	pub fn to_json(&self) -> Value {
		let mut object = Map::new();

		if let Some(r#type) = &self.r#type {
			object.insert(TYPE_KEY.to_string(), Value::String(r#type.clone()));
		}

		object.insert(VALUE_KEY.to_string(), self.value.clone());

		if let Some(description) = &self.description {
			object.insert(
				DESCRIPTION_KEY.to_string(),
				Value::String(description.clone()),
			);
		}

		for (key, value) in &self.extra {
			object.insert(key.clone(), value.clone());
		}

		if self.modes.is_some() || !self.extensions.is_empty() {
			let mut extensions = self.extensions.clone();
			if let Some(modes) = &self.modes {
				let modes: Map<String, Value> = modes
					.iter()
					.map(|(mode, value)| (mode.clone(), value.clone()))
					.collect();
				extensions.insert(MODE_KEY.to_string(), Value::Object(modes));
			}
			object.insert(EXTENSIONS_KEY.to_string(), Value::Object(extensions));
		}

		Value::Object(object)
	}
}

/// A node of the token tree: either a leaf [`Token`] or a nested [`Group`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	Token(Token),
	Group(Group),
}

impl Node {
	pub fn as_token(&self) -> Option<&Token> {
		match self {
			Self::Token(token) => Some(token),
			Self::Group(_) => None,
		}
	}

	pub fn as_group(&self) -> Option<&Group> {
		match self {
			Self::Group(group) => Some(group),
			Self::Token(_) => None,
		}
	}

	pub fn to_json(&self) -> Value {
		match self {
			Self::Token(token) => token.to_json(),
			Self::Group(group) => group.to_json(),
		}
	}
}

impl From<Token> for Node {
	fn from(token: Token) -> Self {
		Self::Token(token)
	}
}

impl From<Group> for Node {
	fn from(group: Group) -> Self {
		Self::Group(group)
	}
}

/// An ordered collection of named tokens and groups.
///
/// Dereferences to the underlying ordered map, so entries can be looked up,
/// inserted and iterated directly. Members that are neither tokens nor groups
/// (`$type` inherited defaults, `$description`, stray scalars) are kept in
/// [`Group::meta`] and passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Deref, DerefMut)]
pub struct Group {
	#[deref]
	#[deref_mut]
	pub entries: IndexMap<String, Node>,
	pub meta: Map<String, Value>,
}

impl Group {
	pub fn new() -> Self {
		Self::default()
	}

	/// Classify a parsed export into the token tree. The root must be an
	/// object; every nested object is a token when it has a `$value` member
	/// and a group otherwise.
	pub fn from_json(value: &Value) -> DtxResult<Self> {
		let Value::Object(object) = value else {
			return Err(DtxError::malformed(
				"<root>",
				"the token document must be a JSON object",
			));
		};

		Ok(Self::from_object(object))
	}

	fn from_object(object: &Map<String, Value>) -> Self {
		let mut group = Group::new();

		for (key, value) in object {
			match value {
				Value::Object(child) if key.starts_with('$') => {
					group.meta.insert(key.clone(), Value::Object(child.clone()));
				}
				Value::Object(child) if child.contains_key(VALUE_KEY) => {
					group.insert(key.clone(), Node::Token(Token::from_object(child)));
				}
				Value::Object(child) => {
					group.insert(key.clone(), Node::Group(Group::from_object(child)));
				}
				other => {
					group.meta.insert(key.clone(), other.clone());
				}
			}
		}

		group
	}

	/// Serialize the group back into its export shape.
	pub fn to_json(&self) -> Value {
		let mut object = self.meta.clone();

		for (key, node) in &self.entries {
			object.insert(key.clone(), node.to_json());
		}

		Value::Object(object)
	}

	pub fn group(&self, key: &str) -> Option<&Group> {
		self.get(key).and_then(Node::as_group)
	}

	pub fn token(&self, key: &str) -> Option<&Token> {
		self.get(key).and_then(Node::as_token)
	}

	/// Every token in document order together with its key path.
	pub fn flatten(&self) -> Vec<(Vec<String>, &Token)> {
		let mut tokens = Vec::new();
		collect_tokens(self, &mut Vec::new(), &mut tokens);
		tokens
	}

	/// Total number of tokens in this group and all nested groups.
	pub fn token_count(&self) -> usize {
		self.values()
			.map(|node| {
				match node {
					Node::Token(_) => 1,
					Node::Group(group) => group.token_count(),
				}
			})
			.sum()
	}
}

fn collect_tokens<'a>(
	group: &'a Group,
	path: &mut Vec<String>,
	tokens: &mut Vec<(Vec<String>, &'a Token)>,
) {
	for (key, node) in &group.entries {
		path.push(key.clone());
		match node {
			Node::Token(token) => tokens.push((path.clone(), token)),
			Node::Group(child) => collect_tokens(child, path, tokens),
		}
		path.pop();
	}
}

impl<K: Into<String>, N: Into<Node>> FromIterator<(K, N)> for Group {
	fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
		Self {
			entries: iter
				.into_iter()
				.map(|(key, node)| (key.into(), node.into()))
				.collect(),
			meta: Map::new(),
		}
	}
}
