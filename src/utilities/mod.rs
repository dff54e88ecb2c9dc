// Utilities module
// Helper functions and tools

pub mod paths;
pub mod patterns;

pub use paths::{expand_home, normalize_path};
pub use patterns::{matches_pattern, PatternMatcher};
