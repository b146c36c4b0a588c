//! Argument template evaluation.
//!
//! Action arguments are JSON values. A string argument that is exactly one
//! `${expr}` template evaluates to the expression's JSON value; strings that
//! merely contain templates are interpolated into a string. Everything else is
//! passed through unchanged.
//!
//! Expressions are a dotted identifier (`config.panel.locations.groupByFile`),
//! `true`, `false` or `null`, optionally prefixed by any number of `!`. Negation
//! treats anything that is not `true` as false, so `${!config.missing}` is
//! `true`.

use serde_json::Value;
use xref_config::SettingsCascade;

/// Errors produced while parsing or evaluating a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExprError {
	/// A `${` was not closed.
	#[error("unterminated template in {0:?}")]
	Unterminated(String),
	/// The expression inside a template is empty or malformed.
	#[error("invalid expression: {0:?}")]
	Invalid(String),
}

/// Values visible to template expressions.
///
/// `config.<path>` reads the merged settings at `<path>`; other roots are
/// looked up in the extra bindings.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
	config: serde_json::Map<String, Value>,
	bindings: serde_json::Map<String, Value>,
}

impl EvalContext {
	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Exposes the merged settings of a cascade under `config.`.
	///
	/// An errored cascade exposes no settings.
	pub fn from_settings(cascade: &SettingsCascade) -> Self {
		let config = match cascade.final_settings() {
			Ok(settings) => settings.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
			Err(_) => serde_json::Map::new(),
		};
		Self {
			config,
			bindings: serde_json::Map::new(),
		}
	}

	/// Adds a top-level binding.
	pub fn with_binding(mut self, name: impl Into<String>, value: Value) -> Self {
		self.bindings.insert(name.into(), value);
		self
	}

	/// Looks up a dotted identifier.
	pub fn lookup(&self, ident: &str) -> Option<&Value> {
		if let Some(path) = ident.strip_prefix("config.") {
			return self.config.get(path);
		}
		self.bindings.get(ident)
	}
}

/// One action argument, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandArgument {
	/// Passed through unchanged.
	Literal(Value),
	/// A whole-string `${expr}` template.
	Expr(Expr),
	/// A string with one or more embedded templates.
	Interpolated(Vec<Segment>),
}

/// Piece of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
	/// Verbatim text.
	Text(String),
	/// Evaluated and stringified.
	Expr(Expr),
}

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
	negations: usize,
	atom: Atom,
}

#[derive(Debug, Clone, PartialEq)]
enum Atom {
	Literal(Value),
	Ident(String),
}

impl CommandArgument {
	/// Classifies a raw argument.
	pub fn parse(raw: &Value) -> Result<Self, ExprError> {
		let Value::String(s) = raw else {
			return Ok(Self::Literal(raw.clone()));
		};
		if !s.contains("${") {
			return Ok(Self::Literal(raw.clone()));
		}

		let segments = parse_segments(s)?;
		match segments.as_slice() {
			[Segment::Expr(expr)] => Ok(Self::Expr(expr.clone())),
			_ => Ok(Self::Interpolated(segments)),
		}
	}

	/// Evaluates the argument against a context.
	pub fn evaluate(&self, ctx: &EvalContext) -> Value {
		match self {
			Self::Literal(v) => v.clone(),
			Self::Expr(expr) => expr.evaluate(ctx),
			Self::Interpolated(segments) => {
				let mut out = String::new();
				for segment in segments {
					match segment {
						Segment::Text(text) => out.push_str(text),
						Segment::Expr(expr) => match expr.evaluate(ctx) {
							Value::String(s) => out.push_str(&s),
							Value::Null => {}
							other => out.push_str(&other.to_string()),
						},
					}
				}
				Value::String(out)
			}
		}
	}
}

impl Expr {
	/// Parses an expression body (the text between `${` and `}`).
	pub fn parse(body: &str) -> Result<Self, ExprError> {
		let trimmed = body.trim();
		let rest = trimmed.trim_start_matches('!');
		let negations = trimmed.len() - rest.len();
		let rest = rest.trim();

		let atom = match rest {
			"true" => Atom::Literal(Value::Bool(true)),
			"false" => Atom::Literal(Value::Bool(false)),
			"null" => Atom::Literal(Value::Null),
			ident if is_dotted_ident(ident) => Atom::Ident(ident.to_string()),
			_ => return Err(ExprError::Invalid(body.to_string())),
		};
		Ok(Self { negations, atom })
	}

	/// Evaluates to a JSON value. Unknown identifiers evaluate to `null`.
	pub fn evaluate(&self, ctx: &EvalContext) -> Value {
		let value = match &self.atom {
			Atom::Literal(v) => v.clone(),
			Atom::Ident(ident) => ctx.lookup(ident).cloned().unwrap_or(Value::Null),
		};
		if self.negations == 0 {
			return value;
		}
		let truthy = value == Value::Bool(true);
		Value::Bool(if self.negations % 2 == 1 { !truthy } else { truthy })
	}
}

fn parse_segments(s: &str) -> Result<Vec<Segment>, ExprError> {
	let mut segments = Vec::new();
	let mut rest = s;
	while let Some(start) = rest.find("${") {
		if start > 0 {
			segments.push(Segment::Text(rest[..start].to_string()));
		}
		let after = &rest[start + 2..];
		let end = after.find('}').ok_or_else(|| ExprError::Unterminated(s.to_string()))?;
		segments.push(Segment::Expr(Expr::parse(&after[..end])?));
		rest = &after[end + 1..];
	}
	if !rest.is_empty() {
		segments.push(Segment::Text(rest.to_string()));
	}
	Ok(segments)
}

fn is_dotted_ident(s: &str) -> bool {
	!s.is_empty()
		&& s.split('.').all(|part| {
			let mut chars = part.chars();
			chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
				&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
		})
}
