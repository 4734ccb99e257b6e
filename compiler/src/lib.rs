//! grpc-gen-compiler
//!
//! This crate implements:
//!  1) A tokenizer + parser for the top-level declarations of a Go file,
//!  2) Extraction of `@grpcGen:Message` structs and `@grpcGen:Service` functions,
//!  3) Assembly into a `SchemaModel`, plus its verification,
//!  4) Translation of Go field types into proto3 types,
//!  5) Rendering of the proto3 document (`render_proto` → `String`),
//!  6) Invocation of `protoc` and the source rewrite that disables extracted
//!     messages, and the error type (`GenError`).

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod extract;
pub mod record;
pub mod procedure;
pub mod assembler;
pub mod verifier;
pub mod translate;
pub mod gen_proto;
pub mod rewrite;
pub mod protoc;
pub mod config;
pub mod compiler;

pub use compiler::{compile_source, generate_file, output_path, validate_input, write_document};
pub use config::GenConfig;
pub use error::GenError;
pub use gen_proto::render_proto;
pub use protoc::ProtocConfig;
pub use translate::translate;
