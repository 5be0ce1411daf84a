//! Evaluation-time values and the conversion engine.

mod coerce;
mod container;
mod context;
mod convert;
mod expr;
mod geometry;
mod value;

#[cfg(test)]
mod exec_test;

pub use coerce::{decode_native, encode_native};
pub use container::{ArrayElement, Container, Variable};
pub use context::{DebuggerHook, ExecContext, ReentrancyGuard};
pub use expr::{Expression, Literal};
pub use geometry::{Color, Point, Rectangle};
pub use value::{ExecValue, ExecValueType};
