//! Order Execution Value Objects

mod order_parameters;
mod order_side;
mod order_type;
mod protection_mode;
mod time_in_force;
mod trigger_type;

pub use order_parameters::OrderParameters;
pub use order_side::OrderSide;
pub use order_type::OrderType;
pub use protection_mode::ProtectionMode;
pub use time_in_force::TimeInForce;
pub use trigger_type::TriggerType;
