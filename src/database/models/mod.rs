pub mod user;

pub use user::{NewUser, ProfileUser, Role, SanitizedUser, UserRecord};
