pub mod router;
pub mod state;

pub use router::hub_router;
pub use state::HubState;
