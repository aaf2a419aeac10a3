/*! Names of primitive commands.

   Every primitive is identified by a [`PrimitiveIdentifier`], which is independent of the control
   sequence it is currently bound to: after `\let\foo=\relax`, `\foo` is the primitive `\relax`.
   Identifiers are interned in the global [`PRIMITIVES`] table, which is only ever appended to.
 */
use std::fmt::{Display, Formatter};
use std::sync::RwLock;
use lazy_static::lazy_static;
use string_interner::{StringInterner, backend::StringBackend, symbol::SymbolU16};
use either::Either;
use crate::commands::{BoxSpec, PrimitiveCommand};
use crate::engine::{EngineReferences, EngineTypes, TeXEngine};
use crate::engine::state::State;
use crate::tex::characters::Character;
use crate::tex::nodes::TeXBox;
use crate::tex::numerics::{Dim32, Skip};
use crate::utils::errors::TeXResult;

type Tk<E> = <<E as TeXEngine>::Types as EngineTypes>::Token;

/// Identifies a primitive command by its original name.
#[derive(Copy,Clone,PartialEq,Eq,Hash,Debug)]
pub struct PrimitiveIdentifier(SymbolU16);
impl PrimitiveIdentifier {
    /// Displays the primitive as `\name`, using the given escape character.
    pub fn display<C:Character>(self,escapechar:Option<C>) -> PrimitiveDisplay<C> {
        PrimitiveDisplay { id:self, escapechar }
    }
    /// The original name, without escape character.
    pub fn name(self) -> String {
        PRIMITIVES.with_name(self,|s| s.to_string())
    }
}

/// See [`PrimitiveIdentifier::display`].
pub struct PrimitiveDisplay<C:Character> {
    id:PrimitiveIdentifier,
    escapechar:Option<C>
}
impl<C:Character> Display for PrimitiveDisplay<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f,"{}",C::displayable_opt(self.escapechar))?;
        PRIMITIVES.with_name(self.id,|s| f.write_str(s))
    }
}

macro_rules! primitive_names {
    ($($field:ident = $name:literal),* $(,)?) => {
        /// The table of primitive names, with direct access to the primitives the engine itself
        /// needs to recognize.
        pub struct PrimitiveInterner {
            interner:RwLock<StringInterner<StringBackend<SymbolU16>>>,
            $(pub $field:PrimitiveIdentifier),*
        }
        impl PrimitiveInterner {
            fn new() -> Self {
                let mut interner = StringInterner::<StringBackend<SymbolU16>>::new();
                $(let $field = PrimitiveIdentifier(interner.get_or_intern_static($name));)*
                PrimitiveInterner { interner:RwLock::new(interner), $($field),* }
            }
        }
    }
}

primitive_names!(
    relax = "relax", par = "par", endcsname = "endcsname", the = "the", noexpand = "noexpand",
    else_ = "else", or = "or", fi = "fi", ifcase = "ifcase",
    global = "global", long = "long", protected = "protected", outer = "outer",
    def = "def", edef = "edef", gdef = "gdef", xdef = "xdef",
    count = "count", dimen = "dimen", skip = "skip", toks = "toks",
    globaldefs = "globaldefs", tracingassigns = "tracingassigns", tracingrestores = "tracingrestores",
    tracinggroups = "tracinggroups", tracingmacros = "tracingmacros", tracingcommands = "tracingcommands",
    tracingonline = "tracingonline", mag = "mag", time = "time", day = "day", month = "month", year = "year",
    everyjob = "everyjob", everypar = "everypar", nullfont = "nullfont",
);

impl PrimitiveInterner {
    /// The identifier for `name`, interning it if necessary.
    pub fn get(&self,name:&str) -> PrimitiveIdentifier {
        if let Some(s) = self.read().get(name) { return PrimitiveIdentifier(s) }
        let mut w = self.interner.write().unwrap_or_else(|e| e.into_inner());
        PrimitiveIdentifier(w.get_or_intern(name))
    }
    /// The identifier for `name`, if it has been registered.
    pub fn lookup(&self,name:&str) -> Option<PrimitiveIdentifier> {
        self.read().get(name).map(PrimitiveIdentifier)
    }
    fn read(&self) -> std::sync::RwLockReadGuard<'_,StringInterner<StringBackend<SymbolU16>>> {
        self.interner.read().unwrap_or_else(|e| e.into_inner())
    }
    fn with_name<R>(&self,id:PrimitiveIdentifier,f:impl FnOnce(&str) -> R) -> R {
        let int = self.read();
        f(int.resolve(id.0).unwrap_or(""))
    }
    /// The number of primitive names interned so far.
    pub fn len(&self) -> usize { self.read().len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Registers the primitive `name` with the given behaviour; the control sequence `\name` is bound to it
/// globally.
pub fn register<E:TeXEngine>(engine:&mut E,name:&'static str,cmd:PrimitiveCommand<E::Types>) -> PrimitiveIdentifier {
    let mut refs = engine.get_engine_refs();
    refs.state.register_primitive(refs.aux,name,cmd)
}

/// Registers an [`Expandable`](PrimitiveCommand::Expandable) primitive.
pub fn register_expandable<E:TeXEngine>(engine:&mut E,name:&'static str,
    f:fn(&mut EngineReferences<E::Types>,&mut Vec<Tk<E>>,Tk<E>) -> TeXResult<()>) {
    register(engine,name,PrimitiveCommand::Expandable(f));
}

/// Registers a [`SimpleExpandable`](PrimitiveCommand::SimpleExpandable) primitive.
pub fn register_simple_expandable<E:TeXEngine>(engine:&mut E,name:&'static str,
    f:fn(&mut EngineReferences<E::Types>,Tk<E>) -> TeXResult<()>) {
    register(engine,name,PrimitiveCommand::SimpleExpandable(f));
}

/// Registers a [`Conditional`](PrimitiveCommand::Conditional).
pub fn register_conditional<E:TeXEngine>(engine:&mut E,name:&'static str,
    f:fn(&mut EngineReferences<E::Types>,Tk<E>) -> TeXResult<bool>) {
    register(engine,name,PrimitiveCommand::Conditional(f));
}

/// Registers an [`Unexpandable`](PrimitiveCommand::Unexpandable) primitive.
pub fn register_unexpandable<E:TeXEngine>(engine:&mut E,name:&'static str,
    f:fn(&mut EngineReferences<E::Types>,Tk<E>) -> TeXResult<()>) {
    register(engine,name,PrimitiveCommand::Unexpandable(f));
}

/// Registers an [`Assignment`](PrimitiveCommand::Assignment) primitive.
pub fn register_assignment<E:TeXEngine>(engine:&mut E,name:&'static str,
    f:fn(&mut EngineReferences<E::Types>,Tk<E>,bool) -> TeXResult<()>) {
    register(engine,name,PrimitiveCommand::Assignment(f));
}

type Assign<E> = Option<fn(&mut EngineReferences<<E as TeXEngine>::Types>,Tk<E>,bool) -> TeXResult<()>>;

/// Registers a primitive that yields (and optionally assigns) an integer.
pub fn register_int<E:TeXEngine>(engine:&mut E,name:&'static str,
    read:fn(&mut EngineReferences<E::Types>,Tk<E>) -> TeXResult<i32>,assign:Assign<E>) {
    register(engine,name,PrimitiveCommand::Int{read,assign});
}

/// Registers a primitive that yields (and optionally assigns) a dimension.
pub fn register_dim<E:TeXEngine>(engine:&mut E,name:&'static str,
    read:fn(&mut EngineReferences<E::Types>,Tk<E>) -> TeXResult<Dim32>,assign:Assign<E>) {
    register(engine,name,PrimitiveCommand::Dim{read,assign});
}

/// Registers a primitive that yields (and optionally assigns) glue.
pub fn register_skip<E:TeXEngine>(engine:&mut E,name:&'static str,
    read:fn(&mut EngineReferences<E::Types>,Tk<E>) -> TeXResult<Skip>,assign:Assign<E>) {
    register(engine,name,PrimitiveCommand::Skip{read,assign});
}

/// Registers a primitive that yields (and optionally assigns) a font.
pub fn register_font<E:TeXEngine>(engine:&mut E,name:&'static str,
    read:fn(&mut EngineReferences<E::Types>,Tk<E>) -> TeXResult<<E::Types as EngineTypes>::Font>,assign:Assign<E>) {
    register(engine,name,PrimitiveCommand::FontCmd{read,assign});
}

/// Registers a primitive that yields a box, or opens one.
pub fn register_box<E:TeXEngine>(engine:&mut E,name:&'static str,
    f:fn(&mut EngineReferences<E::Types>,Tk<E>) -> TeXResult<Either<Option<TeXBox<E::Types>>,BoxSpec>>) {
    register(engine,name,PrimitiveCommand::Box(f));
}

/// Registers integer parameters, initially `0`.
pub fn register_primitive_int<E:TeXEngine>(engine:&mut E,names:&[&'static str]) {
    for name in names { register(engine,*name,PrimitiveCommand::PrimitiveInt); }
}
/// Registers dimension parameters, initially `0pt`.
pub fn register_primitive_dim<E:TeXEngine>(engine:&mut E,names:&[&'static str]) {
    for name in names { register(engine,*name,PrimitiveCommand::PrimitiveDim); }
}
/// Registers glue parameters, initially `0pt`.
pub fn register_primitive_skip<E:TeXEngine>(engine:&mut E,names:&[&'static str]) {
    for name in names { register(engine,*name,PrimitiveCommand::PrimitiveSkip); }
}
/// Registers token list parameters, initially empty.
pub fn register_primitive_toks<E:TeXEngine>(engine:&mut E,names:&[&'static str]) {
    for name in names { register(engine,*name,PrimitiveCommand::PrimitiveToks); }
}

lazy_static! {
    /// The global table of primitive names.
    pub static ref PRIMITIVES : PrimitiveInterner = PrimitiveInterner::new();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_names() {
        let relax = PRIMITIVES.get("relax");
        assert_eq!(relax,PRIMITIVES.relax);
        assert_eq!(PRIMITIVES.else_.name(),"else");
        assert_eq!(PRIMITIVES.fi.display(Some(b'\\')).to_string(),"\\fi");
        assert_eq!(PRIMITIVES.fi.display::<u8>(None).to_string(),"fi");
        let new = PRIMITIVES.get("someprimitive");
        assert_eq!(PRIMITIVES.lookup("someprimitive"),Some(new));
    }
}
