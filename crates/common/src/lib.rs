/**
 * Package identifiers and their transport encoding.
 */
pub mod name;
/**
 * Registry metadata documents, as much of them
 *  as we need to walk dependencies.
 */
pub mod metadata;
/**
 * The registry seam: anything that can list,
 *  describe and delete packages.
 */
pub mod registry;
/**
 * Clusters nested package names into
 *  parent/child buckets for tree display.
 */
pub mod grouping;
/**
 * Subsequence scoring over readable package names.
 */
pub mod filter;
/**
 * Dependency closure walk and ordered deletion.
 */
pub mod closure;
/**
 * Login handshake, credential caching and the
 *  polling policy that drives it.
 */
pub mod session;
/**
 * Automatic vs manual retry of load failures.
 */
pub mod retry;
/**
 * Build metadata reporting.
 */
pub mod version;

pub mod prelude {
    pub use crate::closure::{
        cascade_delete, execute_plan, resolve_closure, CascadeError, CascadeReport, DeletionPlan,
    };
    pub use crate::filter::{fuzzy_filter, fuzzy_score, MIN_SCORE};
    pub use crate::grouping::{group_by_prefix, PackageGroup, PackageGroups};
    pub use crate::metadata::{PackageMetadata, VersionManifest};
    pub use crate::name::PackageName;
    pub use crate::registry::Registry;
    pub use crate::retry::{retry, LoadError, RetryPolicy};
    pub use crate::session::{
        BearerToken, FileSessionStore, HandshakeStatus, LoginEndpoint, LoginGate, LoginTicket,
        MemorySessionStore, PollPolicy, SessionError, SessionState, SessionStore, StoreError,
    };
    pub use crate::version::BuildInfo;
}
