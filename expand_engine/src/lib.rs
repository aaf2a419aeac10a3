/*! A macro-expanding TeX interpreter: the input is tokenized by the [`Mouth`](engine::mouth::Mouth),
    expanded by the [`Gullet`](engine::gullet::Gullet) and digested by the
    [`Stomach`](engine::stomach::Stomach), which hands typesetting material to a
    [`Typesetter`](tex::nodes::Typesetter).

```rust
use expand_engine::engine::{DefaultEngine, TeXEngine, DefaultPlainTeXEngineTypes};
let mut engine = DefaultEngine::<DefaultPlainTeXEngineTypes>::new();
engine.do_string(r"\def\hi{Hello}\hi{} World").unwrap();
assert_eq!(engine.typesetter.text().trim_end(),"Hello World");
```
*/
#![forbid(unsafe_code)]

pub mod utils;
pub mod engine;
pub mod tex;
pub mod commands;

#[doc(hidden)]
pub mod tests;

pub mod prelude {
    pub use crate::tex::catcodes::{CategoryCode, CategoryCodeScheme, CommandCode};
    pub use crate::tex::characters::{Character, CharacterMap};
    pub use crate::tex::tokens::{StandardToken, Token};
    pub use crate::tex::tokens::control_sequences::{CSName, CSHandler};
    pub use crate::engine::{EngineTypes, TeXEngine};
    pub use crate::engine::state::State;
}
