//! Generate a fluent request/response test from an expected JSON body.
//!
//! The pipeline is analyze → transform → generate:
//!
//! ```
//! use json2rest::compiler::compile;
//! use json2rest::options::{CompilerOptions, GeneratorOptions};
//!
//! let options = CompilerOptions {
//!     generator: GeneratorOptions { format: false, ..Default::default() },
//!     ..Default::default()
//! };
//! let source = compile(r#"{"id": 7}"#, &options).unwrap();
//! assert_eq!(source, r#"given().when().then().body("id", equalTo(7));"#);
//! ```
pub mod analyzer;
pub mod cli;
pub mod compiler;
pub mod generator;
pub mod ir;
pub mod jq_exec;
pub mod options;
pub mod path;
pub mod path_de;
pub mod transformer;

pub use compiler::{compile, compile_value, CompileError};
