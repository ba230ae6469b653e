//! arbor-ir - Intermediate Representation of the arbor compiler
//!
//! An SSA-style IR with structured control flow:
//! - Functions own arenas of blocks, operations and values, addressed by
//!   stable ids
//! - Structured operations (`cond`, `loop`) hold nested regions with an
//!   implicit result
//! - Explicit control flow is expressed with `br` / `cond_br` terminators
//!   carrying block arguments
//!
//! # Architecture
//!
//! ```text
//!   Module
//!   └── Functions
//!       ├── Blocks (params, ops, terminator)
//!       │   └── Operations
//!       │       └── Regions (structured ops only)
//!       └── Values
//!         ↓
//!    [arbor-transform]
//!         ↓
//!   Branch-only control-flow graph
//! ```
//!
//! The mutation primitives transforms build on live here: block splitting,
//! region cloning with identity remapping, use replacement and operation
//! erasure.

pub mod function;
pub mod module;
pub mod op;
pub mod types;
pub mod verify;

pub use function::{Block, CloneMap, Function, Region};
pub use module::Module;
pub use op::{BinaryOp, BlockId, CompareOp, Op, OpId, OpKind, Terminator, Value};
pub use types::Type;
pub use verify::verify_function;
