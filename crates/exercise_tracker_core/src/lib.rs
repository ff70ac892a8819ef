pub mod domain;
pub mod ports;
pub mod query;

pub use domain::{Exercise, User};
pub use ports::{PortError, PortResult, UserStore};
pub use query::{is_valid_iso_date, parse_date_or, parse_date_or_today, parse_limit, query_log, render_day};
