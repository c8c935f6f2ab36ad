pub(crate) mod pages;
pub(crate) mod records;
pub(crate) mod report;
pub(crate) mod request_tracing;
pub(crate) mod utilities;
