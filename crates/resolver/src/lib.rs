//! # Crumbtrail Resolver
//!
//! Turns a navigational path into a breadcrumb trail whose identifier
//! segments are resolved to display names by a remote lookup service.
//!
//! ## Features
//!
//! - **Positional classification** - `payloads/<id>` and `flights/<id>` segments
//! - **Single-flight lookups** - at most one outstanding request per identifier
//! - **Session cache** - resolved labels live as long as the resolver
//! - **Immediate rendering** - fallback labels until lookups land
//!
//! ## Architecture
//!
//! ```text
//! path segments
//!     │
//!     ├──> SegmentClassifier
//!     │      └─ Literal | PayloadId | FlightId
//!     │
//!     ├──> BreadcrumbResolver::on_path_change
//!     │      ├─ diff against cache + in-flight set
//!     │      └─ spawn one EntityLookup per new identifier
//!     │             └─ completion writes label, clears marker, bumps revision
//!     │
//!     └──> BreadcrumbResolver::render
//!            └─ Home + one BreadcrumbItem per segment
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use crumbtrail_protocol::parse_pathname;
//! use crumbtrail_resolver::{BreadcrumbResolver, ResolverConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let resolver = BreadcrumbResolver::from_config(&ResolverConfig::from_env()?)?;
//!     let path = parse_pathname("/payloads/p1/flights/f1");
//!
//!     resolver.navigate(&path);
//!     resolver.wait_idle().await;
//!
//!     for item in resolver.render(&path) {
//!         println!("{} -> {:?}", item.label, item.href);
//!     }
//!     Ok(())
//! }
//! ```

mod cache;
mod classifier;
mod config;
mod error;
mod label;
mod lookup;
mod resolver;
mod trail;

pub use cache::{CacheWrite, LookupKey, ResolutionCache};
pub use classifier::{IdentifierKind, SegmentClassifier};
pub use config::{ResolverConfig, API_URL_ENV, HTTP_TIMEOUT_ENV};
pub use error::{LookupError, Result, ResolverError};
pub use label::{fixed_label, format_flight_date, format_segment};
pub use lookup::{fetch_label, EntityLookup, HttpLookup};
pub use resolver::{BreadcrumbResolver, Dispatch, ResolverStatus};
pub use trail::{render_trail, trail_text};
