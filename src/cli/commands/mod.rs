pub mod fix;
pub mod init;
