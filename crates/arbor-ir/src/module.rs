//! IR Module - container of functions
//!
//! A module is the unit a pass pipeline runs over. Functions are
//! independent: a transform never reaches outside the function it was
//! handed.

use crate::function::Function;
use std::fmt;

/// IR Module - a named collection of functions
#[derive(Debug, Default)]
pub struct Module {
    /// Module name
    pub name: String,
    /// Functions
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
        }
    }

    /// Adds a function
    pub fn add_function(&mut self, func: Function) {
        self.functions.push(func);
    }

    /// Finds a function by name
    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Finds a mutable function by name
    pub fn get_function_mut(&mut self, name: &str) -> Option<&mut Function> {
        self.functions.iter_mut().find(|f| f.name == name)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; Module: {}", self.name)?;
        writeln!(f)?;
        for func in &self.functions {
            writeln!(f, "{}", func)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::Terminator;
    use crate::types::Type;

    #[test]
    fn test_module_display() {
        let mut module = Module::new("test");
        let mut func = Function::new("main", Vec::new(), Vec::new());
        let entry = func.entry();
        func.set_terminator(entry, Terminator::Return { values: Vec::new() });
        module.add_function(func);

        let output = module.to_string();
        assert!(output.contains("; Module: test"));
        assert!(output.contains("define @main()"));
    }

    #[test]
    fn test_get_function() {
        let mut module = Module::new("test");
        module.add_function(Function::new("a", Vec::new(), vec![Type::Int]));
        assert!(module.get_function("a").is_some());
        assert!(module.get_function("b").is_none());
        assert!(module.get_function_mut("a").is_some());
    }
}
