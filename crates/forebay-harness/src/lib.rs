//! Forebay Harness
//!
//! Deterministic in-memory doubles for the two external collaborators of
//! the bootstrap: a scriptable ambient scope ([`MockScope`]) and a
//! scriptable processing module ([`MockModule`]). Both run entirely inside
//! a single-threaded test executor, mirroring the cooperative scheduling
//! model of a real worker.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod event;
pub mod module;
pub mod scope;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use event::{ClientId, SimEvent, SimEventKind};
pub use module::{InitGate, InitScript, MockModule, ModuleHandle, ModuleProbe, SimModuleError};
pub use scope::MockScope;
