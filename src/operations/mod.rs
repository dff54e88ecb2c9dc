// Operations module
// Reconciliation logic and the collaborators it drives: filesystem, rclone, mounts

mod destination;
pub mod freshness;
pub mod fs;
pub mod mount;
pub mod rclone;
pub mod reconcile;
pub mod remote;
pub mod session;
pub mod transfer;

pub use freshness::FreshnessGate;
pub use fs::{LocalFs, StdFs};
pub use mount::MountManager;
pub use rclone::Rclone;
pub use reconcile::Reconciler;
pub use remote::RemoteStore;
pub use session::{EditSession, SessionOutcome};
pub use transfer::{RetryPolicy, VerifiedTransfer};
