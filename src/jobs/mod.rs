pub mod expiry_sweeper;
pub mod feed_watcher;
