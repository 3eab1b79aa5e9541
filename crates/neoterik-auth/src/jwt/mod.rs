//! Session token encoding, decoding, and the signing secret.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod secret;

pub use claims::{Claims, ClaimsInput, SESSION_TTL_SECONDS};
pub use decoder::JwtDecoder;
pub use encoder::{IssuedToken, JwtEncoder};
pub use secret::SigningSecret;
