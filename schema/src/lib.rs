//! Intermediate schema model produced by the grpc-gen extractor and consumed
//! by the proto3 renderer.
//!
//! ```
//! use grpc_gen_schema::*;
//!
//! let mut model = SchemaModel::new("greeter");
//! model.insert_record(RecordDescriptor {
//!     name:   "Reply".to_owned(),
//!     fields: vec![FieldDescriptor::new("Message", "string")],
//! });
//! model.add_procedure("Greeting", ProcedureDescriptor {
//!     name:        "SayHello".to_owned(),
//!     input_type:  "Request".to_owned(),
//!     output_type: "Reply".to_owned(),
//! });
//! assert_eq!(model.procedure_count(), 1);
//! ```

pub mod schema;

pub use schema::*;
