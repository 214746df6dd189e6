//! Application shell: logging/config bootstrap and the page-level flows
//! gluing the form engine, the embed bridge and the CRUD clients together.

mod context;
mod flows;
mod route;

pub use context::{AppBuilder, AppContext, Application, BoxError};
pub use flows::{DetailPage, ListPage, AUTH_WARNING};
pub use route::{EntityRoute, RouteError};
