//! Data models shared by the bot, the API and storage.

mod event;
pub(crate) mod lenient;
mod menu_item;
mod order;
mod proposal;
mod status;

pub use event::{EventDetails, EventType, DEFAULT_GUESTS};
pub use menu_item::{MenuCategory, MenuItem, Nutrition};
pub use order::{OrderData, OrderInfo, OrderMenuItem, OrderService, OrderTotals};
pub use proposal::{Proposal, ProposalCategory, ProposalItem, ProposalSummary, ServiceCalculation};
pub use status::OrderStatus;
