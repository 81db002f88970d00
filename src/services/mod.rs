pub mod api_client;
pub mod fallback;
pub mod routes;
pub mod local_store;
pub mod dispatcher;
pub mod budget;
pub mod calendar;

pub use api_client::{ApiClient, ApiRequest, HttpMethod, RemoteEndpoint, RemoteError, RemoteResponse};
pub use fallback::{FallbackPolicy, RemoteFailure, RemoteOutcome};
pub use routes::{LocalAction, PathPattern, Route, RouteTable};
pub use local_store::{LocalStore, StoreError};
pub use dispatcher::{DispatchError, Dispatcher};
pub use budget::BudgetSummary;
pub use calendar::{days_until, parse_event_date, MonthGrid};
