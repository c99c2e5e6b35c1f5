pub use rand;
pub use rand_distr;
pub use serde;
pub use toml;

pub mod constants;
pub mod data_file;
pub mod plot;
pub mod term_plot;
pub mod utils;
