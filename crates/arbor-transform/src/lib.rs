//! arbor-transform - IR-to-IR rewrites for the arbor compiler
//!
//! Passes mutate one function at a time and report failure through
//! diagnostics; the pass manager drives them over every function of a
//! module. Each pass registers under a stable name so pipelines can request
//! it as a string.
//!
//! # Example
//!
//! ```rust,ignore
//! use arbor_ir::Module;
//! use arbor_transform::PassManager;
//!
//! let mut module: Module = /* ... */;
//! let mut pm = PassManager::new();
//! pm.add_pass_by_name("legalize-control-flow");
//! let diags = pm.run(&mut module);
//! assert!(!diags.has_errors());
//! ```

pub mod legalize;

pub use legalize::{legalize_function, LegalizeControlFlow};

use arbor_error::{Diagnostics, Result};
use arbor_ir::{Function, Module};

/// A function-at-a-time rewrite over the IR
pub trait Pass {
    /// Stable name the pass registers under in a pipeline
    fn name(&self) -> &'static str;

    /// One-line description for pipeline listings
    fn description(&self) -> &'static str;

    /// Mutates the function in place; an error means the function is left
    /// partially rewritten and must be discarded by the caller
    fn run_on_function(&self, func: &mut Function) -> Result<()>;
}

/// Creates a registered pass from its pipeline name
pub fn create_pass(name: &str) -> Option<Box<dyn Pass>> {
    match name {
        legalize::PASS_NAME => Some(Box::new(LegalizeControlFlow)),
        _ => None,
    }
}

/// Runs registered passes over every function of a module, in registration
/// order. Functions are independent compilation units: a failure in one is
/// recorded and the remaining functions still run.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pass instance
    pub fn add_pass(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    /// Adds a pass by its registered name; returns false for unknown names
    pub fn add_pass_by_name(&mut self, name: &str) -> bool {
        match create_pass(name) {
            Some(pass) => {
                self.passes.push(pass);
                true
            }
            None => false,
        }
    }

    /// Runs every pass over every function, accumulating failures
    pub fn run(&self, module: &mut Module) -> Diagnostics {
        let mut diags = Diagnostics::new();
        for pass in &self.passes {
            for func in &mut module.functions {
                tracing::debug!("running {} on @{}", pass.name(), func.name);
                if let Err(diag) = pass.run_on_function(func) {
                    tracing::error!("{} failed on @{}: {}", pass.name(), func.name, diag);
                    diags.push(diag);
                }
            }
        }
        diags
    }
}
