//! # subpy parser
//!
//! Lexer, syntax tree and parser for the Python subset analysed by subpy:
//! Python 3 statements and expressions plus the legacy `print` and `exec`
//! statements.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod token;

pub use ast::*;
pub use lexer::{Lexer, tokenize};
pub use parser::{Parser, parse, parse_expression};
pub use source::{SourceMap, SourcePosition, SourceUnit, dedent};
pub use token::{Token, TokenKind};
