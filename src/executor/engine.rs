//! The built-in engine: cauldron script behind the host's `ScriptEngine` seam

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::exec_loop::run_until_cancelled;
use super::stdlib;
use super::types::{Control, RecordDecl};
use super::vm::{RunState, VM};
use crate::diagnostics::{Diagnostic, SourceSpan};
use crate::host::{Compilation, Globals, GlobalsShape, ScriptEngine, Termination};
use crate::parser::semantic_validator::{GlobalBinding, ValidationContext, Validator};
use crate::parser::{codes, parse_script_recovering, ParseError, ScriptDef};
use crate::render::{Descriptor, FieldDescriptor, TypeName};

/// A script that compiled without errors
#[derive(Debug, Clone)]
pub struct CompiledScript {
    pub script: ScriptDef,
    /// Descriptors built once per record type and shared by every instance
    pub records: HashMap<String, Arc<Descriptor>>,
    /// Known stdlib modules to inject
    pub imports: Vec<String>,
}

/// Parser, semantic validator and VM
pub struct Interpreter {
    validator: Validator,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            validator: Validator::new(),
        }
    }

    fn validation_context(shape: &GlobalsShape, imports: &[String]) -> ValidationContext {
        let mut globals: Vec<GlobalBinding> = shape
            .bindings
            .iter()
            .map(|b| GlobalBinding {
                name: b.name.clone(),
                members: b.members.clone(),
            })
            .collect();

        for import in imports {
            if shape.contains(import) || globals.iter().any(|g| &g.name == import) {
                continue;
            }
            if let Some(members) = stdlib::members(import) {
                globals.push(GlobalBinding::new(import.clone(), &members));
            }
        }

        ValidationContext::new(globals)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the shared descriptor of a record declaration
pub fn record_descriptor(decl: &RecordDecl) -> Descriptor {
    let fields = decl
        .fields
        .iter()
        .map(|field| {
            let mut descriptor = FieldDescriptor::new(field.name.clone());
            if let Some(display_name) = &field.display_name {
                descriptor = descriptor.display_as(display_name.clone());
            }
            if field.hidden {
                descriptor = descriptor.hidden();
            }
            descriptor
        })
        .collect();

    Descriptor::new(TypeName::new(decl.name.clone()), fields)
}

impl ScriptEngine for Interpreter {
    type Program = CompiledScript;

    fn compile(
        &self,
        code: &str,
        imports: &[String],
        shape: &GlobalsShape,
    ) -> Compilation<CompiledScript> {
        let mut diagnostics: Vec<Diagnostic> = imports
            .iter()
            .filter(|import| !stdlib::is_module(import))
            .map(|import| {
                Diagnostic::error(
                    codes::UNKNOWN_IMPORT,
                    format!("Unknown import '{}'", import),
                    SourceSpan::new(0, 0),
                )
            })
            .collect();

        // Validation is skipped while there are syntax errors
        let script = match parse_script_recovering(code) {
            Ok(script) => script,
            Err(errors) => {
                diagnostics.extend(errors.iter().map(ParseError::to_diagnostic));
                return Compilation {
                    program: None,
                    diagnostics,
                };
            }
        };

        let ctx = Self::validation_context(shape, imports);
        diagnostics.extend(
            self.validator
                .validate(&script, &ctx)
                .into_iter()
                .map(Diagnostic::from),
        );

        debug!(
            records = script.records.len(),
            diagnostics = diagnostics.len(),
            "compiled script"
        );

        if diagnostics.iter().any(Diagnostic::is_error) {
            return Compilation {
                program: None,
                diagnostics,
            };
        }

        // First declaration wins; duplicates were reported above
        let mut records = HashMap::new();
        for decl in &script.records {
            records
                .entry(decl.name.clone())
                .or_insert_with(|| Arc::new(record_descriptor(decl)));
        }

        let imports = imports
            .iter()
            .filter(|import| stdlib::is_module(import))
            .cloned()
            .collect();

        Compilation {
            program: Some(CompiledScript {
                script,
                records,
                imports,
            }),
            diagnostics,
        }
    }

    fn execute(
        &self,
        program: &CompiledScript,
        globals: Globals,
        cancel: &CancellationToken,
    ) -> Termination {
        let mut vm = VM::new(
            program.script.body.clone(),
            stdlib::globals(&program.imports),
            program.records.clone(),
            globals.writer,
        );

        match run_until_cancelled(&mut vm, cancel) {
            RunState::Cancelled => Termination::Cancelled,
            RunState::Finished => match &vm.control {
                Control::Throw(thrown) => Termination::Threw {
                    description: vm.describe_fault(thrown),
                },
                _ => Termination::Completed,
            },
        }
    }
}
