//! Execution phase enums for each statement type
//!
//! Statements that take more than one step keep their progress in a phase.
//! Single-step statements (declarations, assignments, expressions, return,
//! throw, break, continue) have no phase.

/// Execution phase for Block statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BlockPhase {
    /// Open the block scope
    Enter = 0,
    /// Run the statement at `idx`
    Execute = 1,
}

/// Execution phase for If statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IfPhase {
    /// Evaluate the test and push the chosen branch
    Eval = 0,
    /// Branch finished
    Done = 1,
}

/// Execution phase for While statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WhilePhase {
    /// Evaluate the test; a truthy test pushes the body and comes back here
    Check = 0,
}

/// Execution phase for For loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ForPhase {
    /// Evaluate the iterable into the items to visit
    Eval = 0,
    /// Bind the next item and push the body
    Iterate = 1,
}

/// Execution phase for Try statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TryPhase {
    /// Push the try block
    Enter = 0,
    /// Executing the try block
    ExecuteTry = 1,
    /// Executing the catch block (error was caught)
    ExecuteCatch = 2,
}
