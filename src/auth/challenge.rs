//! `WWW-Authenticate` challenge parsing helpers for challenge handlers.
//!
//! The policy itself only tests for header presence; handlers that honor challenges use
//! [`Challenge::parse_header`] to pull the scheme and parameters (realm, scope, claims)
//! out of the server's response before re-authorizing.

/// A parsed authentication challenge from a `WWW-Authenticate` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
	/// Challenge scheme, e.g. `Bearer`.
	pub scheme: String,
	/// `key=value` parameters in header order, values unquoted.
	pub parameters: Vec<(String, String)>,
}
impl Challenge {
	/// Parses the first challenge out of a `WWW-Authenticate` header value.
	///
	/// Returns `None` for empty or scheme-less values. Parameter segments without an `=`
	/// are skipped rather than rejected, since proxies occasionally inject bare tokens.
	/// In a multi-challenge header, parsing stops where the next challenge's scheme
	/// begins; only the first challenge's parameters are returned.
	pub fn parse_header(value: &str) -> Option<Self> {
		let value = value.trim();
		let (scheme, rest) = match value.split_once(char::is_whitespace) {
			Some((scheme, rest)) => (scheme, rest),
			None if !value.is_empty() => (value, ""),
			None => return None,
		};
		let mut parameters = Vec::new();

		for segment in split_unquoted_commas(rest) {
			let Some((key, raw)) = segment.split_once('=') else {
				continue;
			};
			let key = key.trim();

			if key.is_empty() {
				continue;
			}
			// A key with embedded whitespace is the scheme of the next challenge in a
			// multi-challenge header; everything from here on belongs to it.
			if key.contains(char::is_whitespace) {
				break;
			}

			parameters.push((key.to_owned(), unquote(raw.trim())));
		}

		Some(Self { scheme: scheme.to_owned(), parameters })
	}

	/// Looks up a parameter by case-insensitive key.
	pub fn parameter(&self, key: &str) -> Option<&str> {
		self.parameters
			.iter()
			.find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
			.map(|(_, value)| value.as_str())
	}
}

/// Splits on commas sitting outside quoted strings, honoring `\"` escapes.
fn split_unquoted_commas(raw: &str) -> Vec<&str> {
	let mut segments = Vec::new();
	let mut start = 0;
	let mut in_quotes = false;
	let mut escaped = false;

	for (i, c) in raw.char_indices() {
		if escaped {
			escaped = false;
		} else if in_quotes && c == '\\' {
			escaped = true;
		} else if c == '"' {
			in_quotes = !in_quotes;
		} else if c == ',' && !in_quotes {
			segments.push(&raw[start..i]);

			start = i + 1;
		}
	}

	segments.push(&raw[start..]);

	segments
}

fn unquote(raw: &str) -> String {
	let Some(inner) = raw.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) else {
		return raw.to_owned();
	};
	let mut unquoted = String::with_capacity(inner.len());
	let mut escaped = false;

	for c in inner.chars() {
		if escaped {
			unquoted.push(c);

			escaped = false;
		} else if c == '\\' {
			escaped = true;
		} else {
			unquoted.push(c);
		}
	}

	unquoted
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn bearer_challenge_parses_scheme_and_parameters() {
		let challenge =
			Challenge::parse_header("Bearer realm=\"r\", error=\"insufficient_claims\"")
				.expect("Bearer challenge should parse.");

		assert_eq!(challenge.scheme, "Bearer");
		assert_eq!(challenge.parameter("realm"), Some("r"));
		assert_eq!(challenge.parameter("ERROR"), Some("insufficient_claims"));
		assert_eq!(challenge.parameter("scope"), None);
	}

	#[test]
	fn scheme_only_challenge_parses() {
		let challenge = Challenge::parse_header("Negotiate")
			.expect("Scheme-only challenge should parse.");

		assert_eq!(challenge.scheme, "Negotiate");
		assert!(challenge.parameters.is_empty());
	}

	#[test]
	fn empty_value_is_rejected() {
		assert_eq!(Challenge::parse_header("   "), None);
	}

	#[test]
	fn quoted_values_are_unescaped() {
		let challenge = Challenge::parse_header("Bearer error_description=\"say \\\"hi\\\"\"")
			.expect("Escaped challenge should parse.");

		assert_eq!(challenge.parameter("error_description"), Some("say \"hi\""));
	}

	#[test]
	fn quoted_comma_stays_in_one_value() {
		let challenge = Challenge::parse_header("Bearer realm=\"a,b\", error=\"invalid_token\"")
			.expect("Challenge with a quoted comma should parse.");

		assert_eq!(challenge.parameter("realm"), Some("a,b"));
		assert_eq!(challenge.parameter("error"), Some("invalid_token"));
		assert_eq!(challenge.parameters.len(), 2);
	}

	#[test]
	fn second_challenge_is_not_folded_into_the_first() {
		let challenge = Challenge::parse_header("Bearer realm=\"r\", Basic realm=\"proxy\"")
			.expect("Multi-challenge header should parse its first challenge.");

		assert_eq!(challenge.scheme, "Bearer");
		assert_eq!(challenge.parameters, vec![("realm".to_owned(), "r".to_owned())]);
	}

	#[test]
	fn unquoted_values_pass_through() {
		let challenge = Challenge::parse_header("Digest qop=auth, algorithm=MD5")
			.expect("Digest challenge should parse.");

		assert_eq!(challenge.parameter("qop"), Some("auth"));
		assert_eq!(challenge.parameter("algorithm"), Some("MD5"));
	}
}
