//! Application Layer
//!
//! Use cases shared by every record type.

pub mod create_records;
pub mod get_record;
pub mod patch_record;

// Re-exports
pub use create_records::CreateRecordsUseCase;
pub use get_record::GetRecordUseCase;
pub use patch_record::PatchRecordUseCase;
