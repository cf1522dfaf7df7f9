pub mod cascade;
pub mod delete;
pub mod init;
pub mod list;
pub mod login;
pub mod logout;
pub mod show;
pub mod version;
pub mod whoami;

pub use cascade::Cascade;
pub use delete::Delete;
pub use init::Init;
pub use list::List;
pub use login::Login;
pub use logout::Logout;
pub use show::Show;
pub use version::Version;
pub use whoami::Whoami;
