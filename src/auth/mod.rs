//! Interface to the external auth system. Tokens are issued elsewhere; this
//! service only verifies them and extracts the owning user id.

mod claims;
pub(crate) mod extractors;

pub use extractors::AuthUser;
