pub mod location;
pub mod post;
pub mod user;
