pub mod classifier_worker;
pub mod process_worker;

pub use classifier_worker::{ClassifierWorker, WorkerError};
pub use process_worker::ProcessClassifierWorker;
