pub mod appwrite;
pub mod tmdb;

pub use appwrite::AppwriteClient;
pub use tmdb::{CatalogError, MovieCatalog, TmdbClient};
