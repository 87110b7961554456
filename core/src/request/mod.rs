pub mod parser;
pub mod types;

pub use parser::{parse_query_string, split_uri};
pub use types::{HttpRequest, Request};
