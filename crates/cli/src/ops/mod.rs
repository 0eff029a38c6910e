pub mod add;
pub mod init;
pub mod ls;
pub mod version;

pub use add::Add;
pub use init::Init;
pub use ls::Ls;
pub use version::Version;
