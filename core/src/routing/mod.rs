pub mod matcher;
pub mod normalize;
pub mod parser;
pub mod table;
pub mod types;

pub use matcher::Router;
pub use normalize::{normalize_path, normalize_template};
pub use parser::{compile_pattern, tokenize, PathPattern, Segment};
pub use table::{NamedRoute, Registered, RouteTable};
pub use types::{HttpMethod, Route, RouteMatch, RouteParams};
