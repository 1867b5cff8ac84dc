//! Linear program vocabulary shared by the model builder and the backends.

mod backend;
mod expr;


pub use backend::{LinearProgram, MilpBackend, SolvedState, TerminalStatus};
pub use expr::{Comparison, LinearConstraint, LinearExpr, Sense, VarId};
