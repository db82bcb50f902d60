mod display;
mod event;
mod expr;
mod literal;
mod property;
mod temporal;

pub use event::*;
pub use expr::*;
pub use literal::*;
pub use property::*;
pub use temporal::*;
