mod discover;
mod interactive;
mod search;
mod trending;

pub use discover::cmd_discover;
pub use interactive::cmd_interactive;
pub use search::cmd_search;
pub use trending::cmd_trending;
