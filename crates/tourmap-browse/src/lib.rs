pub mod pagination;
pub mod ready;
pub mod sync;

pub use pagination::{LoadOutcome, PaginationController, SessionPhase, SessionSnapshot};
pub use ready::{ready_gate, MapReadyError, ReadyGate, ReadyHandle};
pub use sync::{
    fit_all, ListSurface, MapListSyncController, MapSurface, Marker, SelectionState, Viewport,
};
