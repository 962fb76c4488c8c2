mod output;
mod query;
mod token;
pub mod ui;

pub use output::OutputFormat;
pub use query::{run_query, QueryInput};
pub use token::{clear_token, get_token, set_token};
