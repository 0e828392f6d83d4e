pub mod trend_store;
pub use trend_store::{TrendError, TrendStore};

pub mod trend_store_impl;
pub use trend_store_impl::{AppwriteTrendStore, SeaOrmTrendStore};

pub mod trending;
pub use trending::{TrendRecorder, TrendingService};

pub mod search;
pub use search::SearchService;

pub mod session;
pub use session::{SearchSession, SessionRegistry};

#[cfg(test)]
pub mod testing;
