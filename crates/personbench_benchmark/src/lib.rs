pub mod config;
pub mod driver;
pub mod environment;
pub mod fixture;
pub mod lifecycle;
pub mod model;
pub mod report;

pub use config::{BenchConfig, LogLevel};
pub use driver::Trial;
pub use environment::reset_best_effort;
pub use fixture::{load_fixture, parse_fixture};
pub use lifecycle::{StoreHandle, register_schema, setup_store, teardown_store};
pub use model::{Address, Person, PrivateData};
pub use personbench_error::{BenchError, DataLoadError, SetupError, SetupStage};
pub use report::Report;
