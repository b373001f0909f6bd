// ============================================================================
// Shop Components - E-commerce Behavior Bound onto the App
// ============================================================================
//
// The order-processing hook, the inventory lookup endpoint and the static
// asset binding. Each module exposes a single register() that wires itself
// against the application handle.
//
// ============================================================================

pub mod inventory;
pub mod orders;
pub mod static_files;
