//! Recursive token tree mapping.
//!
//! The mapper visits every [`Token`] of a [`Group`] and lets a callback
//! decide what replaces it. Groups are always descended into; a replacement
//! produced by the callback is only walked again when it asks for that with
//! [`Mapped::Descend`], so synthesizing new structure never recurses into
//! itself.

use std::convert::Infallible;

use indexmap::IndexMap;

use crate::Group;
use crate::Node;
use crate::Token;

/// The outcome of mapping a single token.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapped {
	/// Replace the token, optionally under a new key.
	Token(String, Token),
	/// Replace the token with an arbitrary node. The node is not walked.
	Node(String, Node),
	/// Replace the token with a node and walk it when it is a group.
	Descend(String, Node),
	/// Drop the entry from the output.
	Skip,
}

impl Mapped {
	/// Keep the token under its current key.
	pub fn keep(key: &str, token: Token) -> Self {
		Self::Token(key.to_string(), token)
	}
}

/// Produce a cloned copy of `group` where every token is replaced by the
/// result of `mapper`. The input is never modified.
pub fn map_tokens<F>(group: &Group, mut mapper: F) -> Group
where
	F: FnMut(&str, Token) -> Mapped,
{
	match try_map_tokens(group, |key, token| Ok::<_, Infallible>(mapper(key, token))) {
		Ok(output) => output,
		Err(never) => match never {},
	}
}

/// Fallible variant of [`map_tokens`]; the first error aborts the walk.
pub fn try_map_tokens<F, E>(group: &Group, mut mapper: F) -> Result<Group, E>
where
	F: FnMut(&str, Token) -> Result<Mapped, E>,
{
	try_map_group(group, &mut mapper)
}

fn try_map_group<F, E>(group: &Group, mapper: &mut F) -> Result<Group, E>
where
	F: FnMut(&str, Token) -> Result<Mapped, E>,
{
	let mut output = Group {
		entries: IndexMap::with_capacity(group.len()),
		meta: group.meta.clone(),
	};

	for (key, node) in &group.entries {
		match node {
			Node::Group(child) => {
				output.insert(key.clone(), Node::Group(try_map_group(child, mapper)?));
			}
			Node::Token(token) => {
				match mapper(key, token.clone())? {
					Mapped::Token(new_key, token) => {
						output.insert(new_key, Node::Token(token));
					}
					Mapped::Node(new_key, node) => {
						output.insert(new_key, node);
					}
					Mapped::Descend(new_key, Node::Group(child)) => {
						output.insert(new_key, Node::Group(try_map_group(&child, mapper)?));
					}
					Mapped::Descend(new_key, node) => {
						output.insert(new_key, node);
					}
					Mapped::Skip => {}
				}
			}
		}
	}

	Ok(output)
}
