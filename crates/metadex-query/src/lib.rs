//! metadex-query — query state for the metadata console.
//!
//! # Architecture
//!
//! ```text
//! MetadataSession
//!   ├── QueryStateController (sync state machine, behind a tokio Mutex)
//!   │   ├── SearchRequest — single source of truth for what to fetch
//!   │   ├── ListResult    — rows from the latest applied fetch
//!   │   └── DetailState   — label view selection
//!   ├── Arc<dyn MetadataSource> — fetches run in spawned tasks
//!   └── Notices — drained by the next render
//! ```
//!
//! Each fetch carries a generation; completions older than the latest
//! issued fetch are dropped, so a slow reply never overwrites a newer one.

pub mod controller;
pub mod detail;
pub mod notice;
pub mod session;

pub use controller::{Completion, FetchTicket, FilterForm, QueryStateController};
pub use detail::DetailState;
pub use notice::{Notice, NoticeLevel};
pub use session::{FetchHandle, MetadataSession, SessionSnapshot, settle};
