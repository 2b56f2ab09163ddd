pub mod operation;

pub use operation::{OperationRecord, OperationType};
