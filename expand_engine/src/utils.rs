/*! Utility types shared across the engine.*/

use lazy_static::lazy_static;
use std::path::PathBuf;
use std::rc::Rc;

pub mod errors;

/// A [`HashMap`](std::collections::HashMap) with [`rustc_hash::FxBuildHasher`] as hasher.
pub type HMap<A,B> = rustc_hash::FxHashMap<A,B>;
/// The reference counting pointer type used throughout the engine.
pub type Ptr<A> = Rc<A>;

lazy_static! {
    /// The working directory at startup; relative input paths are resolved against it by default.
    pub static ref PWD : PathBuf = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
}
