pub mod init;
pub mod pipelines;
pub mod status;
