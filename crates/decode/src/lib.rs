//! `vincheck-decode`: turn a VIN into a canonical vehicle record.
//!
//! The remote decode service is authoritative; the structural decode from
//! `vincheck-core` fills whatever it leaves empty, and stands in completely
//! when the service cannot be reached.

pub mod error;
pub mod remote;
pub mod resolve;
pub mod standardize;

pub use error::ResolverError;
pub use remote::{
    parse_results, RawRemoteRecord, RemoteFields, RemoteResolver, RemoteVariable, RetryPolicy,
    VinLookup, DEFAULT_BASE_URL,
};
pub use resolve::{resolve, VehicleResolution};
pub use standardize::standardize;
