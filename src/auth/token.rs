//! Bearer token secrets and issued token models.

pub mod issued;
pub mod secret;
