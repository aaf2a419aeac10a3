/*! A [Token] is either a [control sequence](CSName) or a pair of a [character](Character) and a
[`CommandCode`].

The canonical representation is the enum [`StandardToken`]; the engine is generic over the [`Token`]
trait so that more compact representations can be plugged in. With [`InternedCSName`](control_sequences::InternedCSName)s,
[`StandardToken`] is `Copy`.
 */

use std::fmt::Write;
use crate::tex::catcodes::{CategoryCodeScheme, CommandCode};
use crate::tex::characters::Character;
use crate::tex::tokens::control_sequences::CSName;

pub mod control_sequences;
pub mod token_lists;

/// Shorthand for the [`CSHandler`](control_sequences::CSHandler) of a token type.
pub type CSHandlerOf<T> = <<T as Token>::CS as CSName<<T as Token>::Char>>::Handler;

/// Trait for tokens. Two [`Space`](CommandCode::Space) tokens are always considered equal,
/// regardless of their character.
pub trait Token:Clone+Eq+'static+std::fmt::Debug+Sized {
    /// The control sequence name type.
    type CS : CSName<Self::Char>;
    /// The character type.
    type Char : Character;
    /// Converts to the canonical enum representation.
    fn to_enum(&self) -> StandardToken<Self::Char,Self::CS>;
    fn from_cs(cs:Self::CS) -> Self;
    fn space() -> Self;
    fn noexpand_marker() -> Self;
    /// An argument slot; `i` needs to be in the range `0..=8`.
    fn argument_marker(i:u8) -> Self;
    fn eof() -> Self;
    fn from_char_cat(c:Self::Char,cat:CommandCode) -> Self;

    fn char_value(&self) -> Option<Self::Char> {
        match self.to_enum() {
            StandardToken::Character(c, _) => Some(c),
            _ => None
        }
    }
    /// [`CommandCode::Escape`] for control sequences.
    fn command_code(&self) -> CommandCode {
        match self.to_enum() {
            StandardToken::ControlSequence(_) => CommandCode::Escape,
            StandardToken::Character(_, cat) => cat
        }
    }
    fn is_cs_or_active(&self) -> bool {
        matches!(self.to_enum(),StandardToken::ControlSequence(_) | StandardToken::Character(_, CommandCode::Active))
    }
    fn is_cs(&self,name:&Self::CS) -> bool {
        match self.to_enum() {
            StandardToken::ControlSequence(cs) => cs == *name,
            _ => false
        }
    }
    /// The number (`0..=8`) of an argument marker.
    fn is_argument_marker(&self) -> Option<u8> {
        match self.to_enum() {
            StandardToken::Character(c, CommandCode::Argument) => c.try_into().ok(),
            _ => None
        }
    }
    fn is_noexpand_marker(&self) -> bool {
        matches!(self.to_enum(),StandardToken::Character(_, CommandCode::Noexpand))
    }
    fn is_begin_group(&self) -> bool {
        matches!(self.to_enum(),StandardToken::Character(_, CommandCode::BeginGroup))
    }
    fn is_end_group(&self) -> bool {
        matches!(self.to_enum(),StandardToken::Character(_, CommandCode::EndGroup))
    }
    fn is_space(&self) -> bool {
        matches!(self.to_enum(),StandardToken::Character(_, CommandCode::Space))
    }
    fn is_param(&self) -> bool {
        matches!(self.to_enum(),StandardToken::Character(_, CommandCode::Parameter))
    }
    fn is_eof(&self) -> bool {
        matches!(self.to_enum(),StandardToken::Character(_, CommandCode::EOF))
    }
    /// Writes the token as TeX would print it: control sequences via
    /// [`CSName::display_fmt`], character tokens as their character.
    fn display_fmt<W:Write>(&self, int:&CSHandlerOf<Self>, cc:&CategoryCodeScheme<Self::Char>, escapechar:Option<Self::Char>, f: &mut W) -> std::fmt::Result {
        match self.to_enum() {
            StandardToken::Character(_,CommandCode::Space) => f.write_char(' '),
            StandardToken::Character(c,CommandCode::Argument) => {
                let u : u64 = c.into();
                write!(f,"#{}",u + 1)
            }
            StandardToken::Character(_,CommandCode::EOF) => Ok(()),
            StandardToken::Character(c,_) => { c.display_fmt(f); Ok(()) }
            StandardToken::ControlSequence(cs) => cs.display_fmt(int,cc,escapechar,f)
        }
    }
    /// A wrapper implementing [`Display`](std::fmt::Display) via [`display_fmt`](Self::display_fmt).
    fn display<'a>(&'a self, int:&'a CSHandlerOf<Self>, cc:&'a CategoryCodeScheme<Self::Char>, escapechar:Option<Self::Char>) -> DisplayToken<'a,Self> {
        DisplayToken { tk:self, int, cc, escapechar }
    }
}

pub struct DisplayToken<'a,T:Token> {
    tk:&'a T,
    int:&'a CSHandlerOf<T>,
    cc:&'a CategoryCodeScheme<T::Char>,
    escapechar:Option<T::Char>
}
impl<'a,T:Token> std::fmt::Display for DisplayToken<'a,T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.tk.display_fmt(self.int,self.cc,self.escapechar,f)
    }
}

/** The canonical [`Token`] representation. `Copy` iff the [`CSName`] is. */
#[derive(Clone,Copy,Eq,Debug)]
pub enum StandardToken<Char:Character,CS: CSName<Char>> {
    ControlSequence(CS),
    Character(Char,CommandCode)
}
impl<Char:Character,CS: CSName<Char>> PartialEq for StandardToken<Char,CS> {
    fn eq(&self,other:&Self) -> bool {
        match (self,other) {
            (StandardToken::ControlSequence(a), StandardToken::ControlSequence(b)) => a==b,
            (StandardToken::Character(_, CommandCode::Space), StandardToken::Character(_, CommandCode::Space)) => true,
            (StandardToken::Character(a1, a2), StandardToken::Character(b1, b2)) => a1==b1 && a2==b2,
            _ => false
        }
    }
}
impl<Char:Character,CS: CSName<Char>> Token for StandardToken<Char,CS> {
    type CS = CS;
    type Char = Char;
    #[inline(always)]
    fn to_enum(&self) -> StandardToken<Char,CS> { self.clone() }
    fn from_cs(cs:CS) -> Self { StandardToken::ControlSequence(cs) }
    fn space() -> Self { StandardToken::Character(Char::from(32), CommandCode::Space) }
    fn eof() -> Self { StandardToken::Character(Char::from(0), CommandCode::EOF) }
    fn from_char_cat(c:Char,cat:CommandCode) -> Self { StandardToken::Character(c, cat) }
    fn noexpand_marker() -> Self { StandardToken::Character(Char::from(32),CommandCode::Noexpand) }
    fn argument_marker(i: u8) -> Self { StandardToken::Character(Char::from(i),CommandCode::Argument) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Ptr;
    type T = StandardToken<u8,Ptr<str>>;

    #[test]
    fn token_equality() {
        assert_eq!(T::space(),T::from_char_cat(b'\t',CommandCode::Space));
        assert_ne!(T::from_char_cat(b'a',CommandCode::Letter),T::from_char_cat(b'a',CommandCode::Other));
        assert_eq!(T::from_cs("foo".into()),T::from_cs("foo".into()));
        assert_eq!(T::argument_marker(3).is_argument_marker(),Some(3));
        assert!(T::eof().is_eof());
        assert!(T::from_char_cat(b'~',CommandCode::Active).is_cs_or_active());
    }
}
