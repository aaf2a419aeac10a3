/*! Utilities used by the engine components: [`memory`], [`outputs`] and [`events`]. */
pub mod memory;
pub mod outputs;
pub mod events;
