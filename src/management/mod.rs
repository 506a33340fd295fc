mod report;
mod store;

pub use report::RunReportManager;
pub use store::PosterStore;
pub use store::StoreError;
pub use store::parse_artifact_name;
