pub mod cart;
pub mod errors;
pub mod history;
pub mod money;
pub mod order;
pub mod ports;
pub mod product;
pub mod session;
pub mod tender;
