//! User domain entities.

pub mod model;
pub mod reset;

pub use model::{CreateUser, PublicUser, User};
pub use reset::ResetState;
