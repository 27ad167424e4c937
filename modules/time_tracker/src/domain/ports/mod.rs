pub mod identity;

pub use identity::{IdentityLookupError, IdentityPort, IdentityProfile};
