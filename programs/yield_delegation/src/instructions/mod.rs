pub mod initialize_globals;
pub mod update_globals;
pub mod set_route;
pub mod initialize_config;
pub mod settlement;
pub mod collect;
pub mod follow;
pub mod undelegate;
pub mod get_config;

pub use initialize_globals::*;
pub use update_globals::*;
pub use set_route::*;
pub use settlement::*;
pub use collect::*;
pub use follow::*;
pub use undelegate::*;
pub use get_config::*;
