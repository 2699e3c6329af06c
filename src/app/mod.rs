pub mod clock;
pub mod engagement;
pub mod feed;
pub mod feed_state;
pub mod location;
pub mod nearby;
pub mod posts;
