//! bracecfg - schema-driven parser for compact configuration strings
//!
//! Parses strings such as `port=8080;tls={enabled;cert=a.pem};mode=fast` into
//! a nested configuration tree, coercing every value to the type declared by a
//! [`Schema`]. Text after a whitespace-dash boundary (`... -v file`) is kept as
//! the unparsed tail for the caller.
//!
//! ```
//! use std::sync::Arc;
//! use bracecfg::{Config, Schema};
//!
//! let schema = Arc::new(Schema::from_json_str(r#"{
//!     "port": 80,
//!     "tls": { "enabled": false, "cert": "" }
//! }"#)?);
//!
//! let config = Config::parse(schema, "port=8080;tls={enabled;cert=a.pem} -v")?;
//! assert_eq!(config.get_number("port"), Some(8080.0));
//! assert_eq!(config.get_bool("tls.enabled"), Some(true));
//! assert_eq!(config.unparsed(), "-v");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod schema;

pub use bracecfg_tokenizer as tokenizer;

pub use config::{Config, Node, ParseOptions};
pub use error::{ParseError, SchemaError};
pub use schema::{FieldDescriptor, FieldKind, RawValue, Scalar, Schema};
