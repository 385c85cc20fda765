mod batch;
mod diff;
mod init;
mod stats;

pub use self::batch::batch;
pub use self::diff::diff;
pub use self::init::init;
pub use self::stats::stats;
