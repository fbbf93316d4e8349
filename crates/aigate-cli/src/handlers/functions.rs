//! Functions command handler.

use aigate_core::FunctionRegistry;

use crate::presentation::format_functions;

/// Print the registered functions.
pub fn execute(registry: &FunctionRegistry) {
    let functions = registry.list();
    println!("{} function(s) available:\n", functions.len());
    print!("{}", format_functions(&functions));
}
