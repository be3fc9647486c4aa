//! Tag filter expression engine
//!
//! Translates a human readable boolean filter into the wire models of the
//! monitoring API and back into a canonical string.
//!
//! # Syntax
//!
//! ```text
//! entity[:tagKey][@origin] OPERATOR value      Comparison
//! entity[:tagKey][@origin] UNARY_OPERATOR      Unary operation (no tag key)
//! expr AND expr                                Conjunction
//! expr OR expr                                 Disjunction, binds weaker than AND
//! ( expr )                                     Brackets override precedence
//! ```
//!
//! Values are single-quoted strings, numbers or the literals `true`/`false`.
//! Origins are `@dest` (default), `@src` and `@na`.
//!
//! # Examples
//!
//! ```text
//! entity.name CONTAINS 'foo' AND entity.type EQUALS 'mysql'
//! entity.type@src EQUALS 'elasticsearch' OR call.http.status GREATER_THAN 499
//! agent.tag:stage EQUALS 'prod' AND (entity.name IS_EMPTY OR call.erroneous EQUALS true)
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod mapper;
pub mod normalize;
pub mod parser;
pub mod render;

pub use ast::FilterExpression;
pub use error::{FilterError, LexError, MappingError, ParseError};
pub use lexer::{Token, TokenKind, tokenize};
pub use mapper::{ApiModel, to_api_model, to_match_expression};
pub use normalize::{equivalent, equivalent_as, normalize, normalize_as, to_model};
pub use parser::{parse, parse_tokens};
pub use render::{render, render_match_expression};
