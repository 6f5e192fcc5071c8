pub mod config;
pub mod credential;
pub mod region;
pub mod slug;

pub use config::Config;
pub use credential::*;
pub use region::*;
pub use slug::slugify;
