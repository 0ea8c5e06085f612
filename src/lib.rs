pub mod ast;
pub mod parser;
pub mod tokenizer;

pub mod declarations;
pub mod resolver;

pub mod layout;
pub mod target;

pub mod context;
pub mod query;
pub mod script;

pub mod error;

pub mod source_location;
pub mod string_interner;

pub mod type_interner;
pub mod types;

pub use context::{Context, Options};
pub use error::{Error, QueryError};
pub use query::{FoundOffset, QueryOutcome};
