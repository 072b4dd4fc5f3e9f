mod preview;
mod workflow_error;

pub use preview::{PreviewWorkflow, WorkflowState};
pub use workflow_error::{CommitError, WorkflowError};
