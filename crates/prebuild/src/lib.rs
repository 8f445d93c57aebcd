pub mod pipeline;

pub use pipeline::{derive_documents, Pipeline, RunReport, Snapshot};
