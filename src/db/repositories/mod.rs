pub mod search_counts;
