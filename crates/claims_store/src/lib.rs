//! Claims List Store
//!
//! Holds the working set of claims behind the claims portal's list screens
//! and derives everything those screens render from it.
//!
//! # Data flow
//!
//! ```text
//! transport -> ClaimsStore::set_claims / load_page -> projection -> observers
//! push channel -> ClaimsStore::handle_claim_update -> reconciler -> projection -> observers
//! UI -> set_filters / set_sort / set_page / toggle_selection -> projection / selection
//! ```
//!
//! The store is single-threaded. Every mutation runs to completion, then
//! observers are notified once. Readers receive snapshots (`Arc<Page>`,
//! `BTreeSet<ClaimId>`), never references into the collection.

pub mod collection;
pub mod config;
pub mod error;
pub mod filter;
pub mod observer;
pub mod projection;
pub mod reconciler;
pub mod selection;
pub mod store;
pub mod transport;
pub mod update;

pub use collection::ClaimCollection;
pub use config::StoreConfig;
pub use error::{ReconcileError, StoreError};
pub use filter::{matches, FilterSpec};
pub use observer::{ChangeKind, ChannelObserver, ObserverId, StoreChange, StoreObserver};
pub use projection::{project, Page, ProjectionCache, ProjectionQuery, SortDirection, SortKey, SortSpec};
pub use reconciler::{ReconcileOutcome, ReconcileStats, Reconciler};
pub use selection::SelectionTracker;
pub use store::{BulkStatusOutcome, ClaimsStore, RejectedUpdate};
pub use transport::{LoadOutcome, PageFetchResult};
pub use update::{ClaimField, ClaimPatch, ClaimUpdateEvent, FieldChange};
