//! Facts about the local host: privileges, users, package manager, address.

pub mod network;
pub mod package_manager;
pub mod preflight;
pub mod privilege;
pub mod user;

pub use network::{parse_primary_ip, primary_ip, url_host};
pub use package_manager::PackageManager;
pub use preflight::Preflight;
pub use privilege::{is_elevated, require_elevated};
pub use user::{resolve_invoking_user, InvokerEnv, InvokingUser, SystemUsers, UserLookup};
