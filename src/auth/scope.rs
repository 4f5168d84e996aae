//! Ordered scope list modeling with validation.

// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Validated, ordered list of authorization scopes.
///
/// Order is significant and is handed to the credential source untouched; duplicates are
/// dropped keeping the first occurrence. Entries must be non-empty and whitespace-free.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScopeList {
	scopes: Arc<[String]>,
}
impl ScopeList {
	/// Creates a validated scope list from any iterator, preserving caller order.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut validated = Vec::new();

		for scope in scopes {
			let scope = scope.into();

			if scope.is_empty() {
				return Err(ScopeValidationError::Empty);
			}
			if scope.chars().any(char::is_whitespace) {
				return Err(ScopeValidationError::ContainsWhitespace { scope });
			}
			if !validated.contains(&scope) {
				validated.push(scope);
			}
		}

		Ok(Self { scopes: validated.into() })
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.scopes.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.scopes.is_empty()
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.scopes.iter().any(|candidate| candidate == scope)
	}

	/// Iterator over the scopes in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.scopes.iter().map(|s| s.as_str())
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.scopes
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.scopes.join(" "))
	}
}
impl Serialize for ScopeList {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.scopes.len()))?;

		for scope in self.scopes.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeList {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let scopes = Vec::<String>::deserialize(deserializer)?;

		Self::new(scopes).map_err(DeError::custom)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn caller_order_is_preserved() {
		let scopes = ScopeList::new(["write", "read", "admin"])
			.expect("Scope fixture should be valid for ordering test.");

		assert_eq!(scopes.as_slice(), ["write", "read", "admin"]);
		assert_eq!(scopes.to_string(), "write read admin");
	}

	#[test]
	fn duplicates_keep_first_occurrence() {
		let scopes = ScopeList::new(["read", "write", "read"])
			.expect("Scope fixture should be valid for deduplication test.");

		assert_eq!(scopes.as_slice(), ["read", "write"]);
		assert_eq!(scopes.len(), 2);
		assert!(scopes.contains("write"));
	}

	#[test]
	fn validation_rejects_bad_entries() {
		assert_eq!(ScopeList::new([""]), Err(ScopeValidationError::Empty));
		assert_eq!(
			ScopeList::new(["a b"]),
			Err(ScopeValidationError::ContainsWhitespace { scope: "a b".into() })
		);
	}

	#[test]
	fn serde_round_trips_in_order() {
		let scopes = ScopeList::new(["b", "a"])
			.expect("Scope fixture should be valid for serde round trip.");
		let json = serde_json::to_string(&scopes).expect("Scope list should serialize.");

		assert_eq!(json, "[\"b\",\"a\"]");

		let parsed: ScopeList = serde_json::from_str(&json).expect("Scope list should parse back.");

		assert_eq!(parsed, scopes);
	}
}
