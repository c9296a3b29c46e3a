//! Bearer-token authentication: the token verifier and the gate that guards
//! protected routes.

mod error;
pub mod firebase;
pub mod gate;
mod identity;
mod verifier;

pub use error::AuthError;
pub use firebase::FirebaseIdentityProvider;
pub use gate::{auth_middleware, extract_bearer_token, AuthGate, AuthUser};
pub use identity::Identity;
pub use verifier::{IdentityProvider, ProviderClaims, TokenVerifier};
