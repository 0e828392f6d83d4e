pub mod messages {

    /// Shown when the catalog rejects a query without saying why.
    pub const FETCH_FAILED: &str = "Failed to fetch movies";

    /// Shown for transport and HTTP status failures.
    pub const TRY_AGAIN_LATER: &str = "Error fetching movies. Please try again later.";
}

pub mod limits {

    pub const DEFAULT_TRENDING_LIMIT: u32 = 5;

    pub const MAX_TRENDING_LIMIT: u32 = 20;
}

pub mod intervals {
    use std::time::Duration;

    pub const SESSION_SWEEP: Duration = Duration::from_secs(60);

    pub const SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);
}
