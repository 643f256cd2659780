pub mod search_flow;

pub use search_flow::SearchFlow;
