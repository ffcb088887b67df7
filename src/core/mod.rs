//! Domain model: tickets, their statuses and the lifecycle rules between them

mod builders;
mod lifecycle;
mod ticket;

pub use builders::TicketBuilder;
pub use lifecycle::Transition;
pub use ticket::{Status, Ticket, TicketId, timestamp_now};
