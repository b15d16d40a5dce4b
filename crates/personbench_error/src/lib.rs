mod bench_error;
mod store_error;

pub use bench_error::{BenchError, DataLoadError, SetupError, SetupStage};
pub use store_error::StoreError;
