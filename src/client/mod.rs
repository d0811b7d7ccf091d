// Client-side support library for dialer front-ends: a cookie-carrying
// request client, an explicitly-invalidated query cache, and the route-guard
// state machine. Nothing here touches the server modules.
pub mod cache;
pub mod guard;
pub mod http;

pub use cache::{query_key, QueryCache, QueryKey};
pub use guard::{GuardDecision, RouteGuard, SessionState};
pub use http::{ApiClient, ClientError};
