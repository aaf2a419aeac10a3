/*! A control sequence is a [`Token`](super::Token) of the (usually) form `\foo`.

    Names are stored as strings whose `char`s are the code points of the [`Character`] type
    (for `u8`, a byte `b` becomes `char::from(b)`), which is lossless and lets us use ordinary string
    machinery. Two representations are provided:

    * [`Ptr`]`<str>` with the unit handler `()`: no interning, convenient for tests;
    * [`InternedCSName`] with the [`CSInterner`] handler (backed by [`string_interner`]): `Copy`,
      and what [`DefaultEngine`](crate::engine::DefaultEngine) uses.
*/

use std::fmt::{Debug, Write};
use string_interner::{DefaultStringInterner, DefaultSymbol};
use crate::tex::catcodes::{CategoryCode, CategoryCodeScheme};
use crate::tex::characters::{Character, CharacterMap};
use crate::utils::Ptr;

/** The name of a control sequence. */
pub trait CSName<C:Character>: Clone + Eq + 'static + std::hash::Hash + Debug {
    /// The handler that creates and resolves names of this type.
    type Handler: CSHandler<C,Self>;

    /// Writes the name the way TeX prints control sequences: the escape character, the name, and a
    /// trailing space unless the name is a single non-letter.
    fn display_fmt<W:Write>(&self, int:&Self::Handler, cc:&CategoryCodeScheme<C>, escapechar:Option<C>, f: &mut W) -> std::fmt::Result {
        let res = int.resolve(self);
        write!(f, "{}", C::displayable_opt(escapechar))?;
        let mut chars = cs_chars::<C>(res);
        match (chars.next(),chars.next()) {
            (None,_) => {
                write!(f,"csname{}endcsname ",C::displayable_opt(escapechar))
            }
            (Some(c),None) => {
                c.display_fmt(f);
                if *cc.get(c) == CategoryCode::Letter { f.write_char(' ') } else { Ok(()) }
            }
            _ => {
                for c in cs_chars::<C>(res) { c.display_fmt(f) }
                f.write_char(' ')
            }
        }
    }
    /// A wrapper implementing [`Display`](std::fmt::Display) via [`display_fmt`](Self::display_fmt).
    fn display<'a>(&'a self, int:&'a Self::Handler, cc:&'a CategoryCodeScheme<C>, escapechar:Option<C>) -> DisplayCSName<'a,C,Self> {
        DisplayCSName { cs:self, int, cc, escapechar }
    }
}

/// The characters of a resolved control sequence name.
pub fn cs_chars<C:Character>(name:&str) -> impl Iterator<Item=C> + '_ {
    name.chars().filter_map(C::from_char)
}

pub struct DisplayCSName<'a,C:Character,CS:CSName<C>> {
    cs:&'a CS,
    int:&'a CS::Handler,
    cc:&'a CategoryCodeScheme<C>,
    escapechar:Option<C>
}
impl<'a,C:Character,CS:CSName<C>> std::fmt::Display for DisplayCSName<'a,C,CS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.cs.display_fmt(self.int,self.cc,self.escapechar,f)
    }
}

/** Creates and resolves control sequence names. */
pub trait CSHandler<C:Character,CS: CSName<C>>:Default+Clone {
    /// A name given as a Rust string, e.g. the name of a primitive.
    fn new(&mut self,s: &str) -> CS;
    /// A name given as characters, e.g. as scanned by the tokenizer.
    fn from_chars(&mut self,v: &[C]) -> CS {
        let s : String = v.iter().map(|c| c.to_char()).collect();
        self.new(&s)
    }
    /// The name as a string (see the [module documentation](self)).
    fn resolve<'a>(&'a self,cs:&'a CS) -> &'a str;
    /// `\par`
    fn par(&self) -> CS;
    /// The empty name, as produced by `\csname\endcsname`.
    fn empty_str(&self) -> CS;
}

impl<C:Character> CSName<C> for Ptr<str> {
    type Handler = ();
}

impl<C:Character> CSHandler<C,Ptr<str>> for () {
    #[inline(always)]
    fn new(&mut self,s: &str) -> Ptr<str> { s.into() }
    #[inline(always)]
    fn resolve<'a>(&'a self, cs: &'a Ptr<str>) -> &'a str { cs }
    fn par(&self) -> Ptr<str> { "par".into() }
    fn empty_str(&self) -> Ptr<str> { "".into() }
}

/// An interned control sequence name; resolve it with the [`CSInterner`] it came from.
#[derive(Copy,Clone,PartialEq,Eq,Hash,Debug)]
pub struct InternedCSName(DefaultSymbol);

impl<C:Character> CSName<C> for InternedCSName {
    type Handler = CSInterner;
}

/// Interns control sequence names as [`InternedCSName`]s.
#[derive(Clone)]
pub struct CSInterner {
    interner:DefaultStringInterner,
    par:InternedCSName,
    empty:InternedCSName
}
impl Default for CSInterner {
    fn default() -> Self {
        let mut interner = DefaultStringInterner::default();
        let par = InternedCSName(interner.get_or_intern_static("par"));
        let empty = InternedCSName(interner.get_or_intern_static(""));
        CSInterner { interner, par, empty }
    }
}
impl CSInterner {
    /// The number of distinct names interned so far.
    pub fn len(&self) -> usize { self.interner.len() }
    pub fn is_empty(&self) -> bool { self.interner.is_empty() }
    /// The name for `s`, if it has been interned already.
    pub fn get(&self,s:&str) -> Option<InternedCSName> {
        self.interner.get(s).map(InternedCSName)
    }
}
impl<C:Character> CSHandler<C,InternedCSName> for CSInterner {
    #[inline(always)]
    fn new(&mut self, s: &str) -> InternedCSName {
        InternedCSName(self.interner.get_or_intern(s))
    }
    #[inline(always)]
    fn resolve<'a>(&'a self, cs: &'a InternedCSName) -> &'a str {
        self.interner.resolve(cs.0).unwrap_or("")
    }
    #[inline(always)]
    fn par(&self) -> InternedCSName { self.par }
    #[inline(always)]
    fn empty_str(&self) -> InternedCSName { self.empty }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tex::catcodes::DEFAULT_SCHEME_U8;

    #[test]
    fn interning() {
        let mut int = CSInterner::default();
        let a : InternedCSName = CSHandler::<u8,_>::new(&mut int,"foo");
        let b = CSHandler::<u8,_>::from_chars(&mut int,b"foo");
        assert_eq!(a,b);
        assert_eq!(CSHandler::<u8,_>::resolve(&int,&a),"foo");
        let par : InternedCSName = CSHandler::<u8,InternedCSName>::par(&int);
        assert_eq!(CSHandler::<u8,_>::new(&mut int,"par"),par);
        let cc = &*DEFAULT_SCHEME_U8;
        let bang = CSHandler::<u8,_>::new(&mut int,"!");
        assert_eq!(CSName::<u8>::display(&a,&int,cc,Some(b'\\')).to_string(),"\\foo ");
        assert_eq!(CSName::<u8>::display(&bang,&int,cc,Some(b'\\')).to_string(),"\\!");
        let empty : InternedCSName = CSHandler::<u8,InternedCSName>::empty_str(&int);
        assert_eq!(CSName::<u8>::display(&empty,&int,cc,None).to_string(),"csnameendcsname ");
    }
}
