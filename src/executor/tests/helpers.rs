//! Test helpers for executor tests
//!
//! Common utilities for compiling scripts and building VMs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::executor::engine::record_descriptor;
use crate::executor::{stdlib, Interpreter, VM};
use crate::host::{Globals, ScriptEngine, Writer};
use crate::parser::parse_script;
use crate::render::RenderNode;

/// Everything dumped by a VM, in call order
pub type Dumps = Arc<Mutex<Vec<RenderNode>>>;

/// A writer that records every dumped node
pub fn collecting_writer() -> (Writer, Dumps) {
    let dumps: Dumps = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&dumps);
    let writer = Writer::new(move |node| sink.lock().unwrap().push(node));
    (writer, dumps)
}

/// Compile source with the built-in engine and create a VM
///
/// This helper:
/// - Parses and validates the script (panics on any Error diagnostic)
/// - Injects `Cauldron` plus the given stdlib modules
/// - Routes dumps into the returned buffer
///
/// # Returns
/// A VM ready to execute with `run_until_done()` or `step()`
pub fn parse_script_and_build_vm(source: &str, imports: &[&str]) -> (VM, Dumps) {
    let imports: Vec<String> = imports.iter().map(|s| s.to_string()).collect();
    let compilation = Interpreter::new().compile(source, &imports, &Globals::shape());
    let errors: Vec<_> = compilation
        .diagnostics
        .iter()
        .filter(|d| d.is_error())
        .collect();
    assert!(errors.is_empty(), "Script validation failed: {:?}", errors);
    let program = compilation.program.expect("program");

    let (writer, dumps) = collecting_writer();
    let vm = VM::new(
        program.script.body,
        stdlib::globals(&program.imports),
        program.records,
        writer,
    );
    (vm, dumps)
}

/// Parse source WITHOUT validation, for testing runtime error behavior.
///
/// Use this helper when testing that the runtime correctly handles errors
/// that semantic validation would catch (undefined variables, break outside
/// a loop, unknown record fields).
pub fn parse_script_without_validation(source: &str, imports: &[&str]) -> (VM, Dumps) {
    let script = parse_script(source).expect("Parse script failed");
    let imports: Vec<String> = imports.iter().map(|s| s.to_string()).collect();
    let records: HashMap<_, _> = script
        .records
        .iter()
        .map(|decl| (decl.name.clone(), Arc::new(record_descriptor(decl))))
        .collect();

    let (writer, dumps) = collecting_writer();
    let vm = VM::new(script.body, stdlib::globals(&imports), records, writer);
    (vm, dumps)
}

/// Text of every dumped node; panics on non-text nodes
pub fn dumped_text(dumps: &Dumps) -> Vec<String> {
    dumps
        .lock()
        .unwrap()
        .iter()
        .map(|node| match node {
            RenderNode::Text(text) => text.clone(),
            other => panic!("Expected text node, got {:?}", other),
        })
        .collect()
}
