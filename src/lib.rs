//! bash-syntax - A parser for the POSIX/Bash shell language
//!
//! This library parses a complete source buffer into an abstract syntax tree
//! with positional metadata sufficient to reconstruct source locations.
//!
//! ```
//! use bash_syntax::{parse, Mode};
//!
//! let file = parse("echo hello | wc -l", "example.sh", Mode::default()).unwrap();
//! assert_eq!(file.stmts.len(), 1);
//! ```

pub mod ast;
pub mod parser;
pub mod token;

pub use ast::types::*;
pub use parser::{parse, Mode, ParseError, Parser};
pub use token::Token;
