//! Access token issuance and membership claim encoding.
//!
//! Access tokens are signed HS256 JWTs carrying the user's full membership
//! list, so one token can act across multiple teams; the "current team" is
//! decided per-request by the tenant resolver, never baked into the token.

mod claims;
mod codec;
mod config;
mod issuer;

pub use claims::AccessClaims;
pub use codec::{
    decode_memberships, encode_memberships, ClaimRole, MemberType, MembershipClaim, TeamRole,
};
pub use config::JwtConfig;
pub use issuer::{TokenIssuer, TokenPair};
