pub mod cart;
pub mod money;
pub mod product;
pub mod receipt;

pub use cart::*;
pub use money::*;
pub use product::*;
pub use receipt::*;
