pub mod articles;
pub mod associations;
pub mod pokemon;
pub mod trainers;
pub mod users;
pub mod validate;
pub mod versioning;

pub use articles::*;
pub use associations::*;
pub use pokemon::*;
pub use trainers::*;
pub use users::*;
pub use validate::*;
