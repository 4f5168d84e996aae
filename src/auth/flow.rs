//! Auth flow descriptors hinting acceptable authentication mechanisms.

// self
use crate::_prelude::*;

/// Named hint describing an authentication mechanism acceptable to the caller.
///
/// Descriptors are forwarded verbatim to the credential source inside
/// [`TokenRequestOptions`](crate::credential::TokenRequestOptions); the policy itself
/// never interprets them. An explicitly empty descriptor list on a request is the
/// caller's opt-out: the request goes out unauthenticated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFlow {
	/// Mechanism name understood by the credential source.
	pub kind: String,
	/// Mechanism-specific parameters, forwarded untouched.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub parameters: BTreeMap<String, serde_json::Value>,
}
impl AuthFlow {
	/// Creates a descriptor for the named mechanism.
	pub fn new(kind: impl Into<String>) -> Self {
		Self { kind: kind.into(), parameters: BTreeMap::new() }
	}

	/// Attaches a mechanism-specific parameter.
	pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.parameters.insert(key.into(), value.into());

		self
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn descriptor_serializes_compactly() {
		let flow = AuthFlow::new("authorization_code");
		let json = serde_json::to_string(&flow).expect("Flow descriptor should serialize.");

		assert_eq!(json, "{\"kind\":\"authorization_code\"}");
	}

	#[test]
	fn parameters_round_trip() {
		let flow = AuthFlow::new("managed_identity").with_parameter("client_id", "abc-123");
		let json = serde_json::to_string(&flow).expect("Flow descriptor should serialize.");
		let parsed: AuthFlow = serde_json::from_str(&json).expect("Flow descriptor should parse.");

		assert_eq!(parsed, flow);
		assert_eq!(parsed.parameters["client_id"], serde_json::Value::from("abc-123"));
	}
}
