pub mod handlers;
pub mod logging;
pub mod routes;

pub use handlers::{DEFAULT_CHECK_URLS, load_urls_from_file, parse_url_line, resolve_config};
pub use routes::{AppState, create_router};
