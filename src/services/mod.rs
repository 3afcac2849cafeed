pub mod analytics;
pub mod reflection;
