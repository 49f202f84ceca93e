//! PostgreSQL implementations of the store traits.

pub mod file;
pub mod user;

pub use file::FileRepository;
pub use user::UserRepository;
