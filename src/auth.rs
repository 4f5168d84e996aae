//! Auth-domain models: scope lists, access tokens, flow descriptors, and challenges.

pub mod challenge;
pub mod flow;
pub mod scope;
pub mod token;

pub use challenge::*;
pub use flow::*;
pub use scope::*;
pub use token::*;
