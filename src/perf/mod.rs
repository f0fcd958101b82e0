mod details;

pub use details::PerformanceDetails;
pub use details::PerformanceFrame;
pub use details::PerformanceNode;
