pub mod movie;
pub mod trending;

pub use movie::Movie;
pub use trending::SearchCountRecord;
