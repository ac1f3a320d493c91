pub mod data_url;
pub mod identifier_cache;
pub mod identifier_filter;
