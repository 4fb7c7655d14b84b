mod driver;
mod tree;

pub use driver::{parse, ParseError};
pub use tree::SyntaxTree;
