pub mod bridge;
pub mod config;
pub mod error;
pub mod exec;
pub mod invoke;
pub mod module;
pub mod property;
pub mod util;
pub mod val;

pub use config::{NumberFormat, RuntimeConfig};
pub use error::{NativeError, RuntimeError, RuntimeResult};
pub use exec::{ExecContext, ExecValue, ExecValueType};
pub use module::{ExtensionModule, HandlerTable, ModuleRegistry};
pub use val::Val;
