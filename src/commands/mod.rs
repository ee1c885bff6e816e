pub mod clone;
pub mod export;
pub mod files;
pub mod import;
pub mod init;
pub mod status;
pub mod sync;
pub mod topic_log;

pub use clone::*;
pub use export::*;
pub use files::*;
pub use import::*;
pub use init::*;
pub use status::*;
pub use sync::*;
pub use topic_log::*;
