pub mod collector;
pub mod domain_xml;
pub mod heap_dump;
pub mod jvm_report;
pub mod server_log;
pub mod thread_dump;

pub use collector::Collector;
pub use domain_xml::ConfigSnapshotCollector;
pub use heap_dump::HeapDumpCollector;
pub use jvm_report::JvmReportCollector;
pub use server_log::ServerLogCollector;
pub use thread_dump::ThreadDumpCollector;
