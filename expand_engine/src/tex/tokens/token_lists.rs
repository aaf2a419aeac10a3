/*! Token lists, and conversions between tokens and strings. */
use std::fmt::{Display, Write};
use crate::tex::catcodes::{CategoryCodeScheme, CommandCode};
use crate::tex::characters::Character;
use crate::tex::tokens::{CSHandlerOf, StandardToken, Token};
use crate::utils::Ptr;

/// An immutable, cheaply clonable list of [`Token`]s, e.g. a macro body or the contents of a `\toks` register.
#[derive(Clone,Debug,PartialEq)]
pub struct TokenList<T:Token>(pub Ptr<[T]>);
impl<T:Token> TokenList<T> {
    #[inline(always)]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    #[inline(always)]
    pub fn len(&self) -> usize { self.0.len() }
    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_,T> { self.0.iter() }
    /// A helper implementing [`Display`] for the list, printing macro parameter characters and
    /// argument markers the way `\meaning` and `\show` do.
    pub fn display<'a>(&'a self, int:&'a CSHandlerOf<T>, cc:&'a CategoryCodeScheme<T::Char>, escapechar:Option<T::Char>, double_par:bool) -> TokenListDisplay<'a,T> {
        TokenListDisplay { ls:&self.0, int, cc, escapechar, double_par }
    }
}
impl<T:Token> Default for TokenList<T> {
    fn default() -> Self { TokenList(Ptr::from(Vec::new())) }
}
impl<T:Token> From<Vec<T>> for TokenList<T> {
    fn from(value: Vec<T>) -> Self { TokenList(value.into()) }
}
impl<T:Token> std::ops::Deref for TokenList<T> {
    type Target = [T];
    fn deref(&self) -> &[T] { &self.0 }
}

/// [`Display`] for a slice of tokens; see [`TokenList::display`].
pub struct TokenListDisplay<'a,T:Token> {
    ls:&'a [T],
    int:&'a CSHandlerOf<T>,
    cc:&'a CategoryCodeScheme<T::Char>,
    escapechar:Option<T::Char>,
    double_par:bool
}
impl<'a,T:Token> TokenListDisplay<'a,T> {
    pub fn from_slice(ls:&'a [T], int:&'a CSHandlerOf<T>, cc:&'a CategoryCodeScheme<T::Char>, escapechar:Option<T::Char>, double_par:bool) -> Self {
        TokenListDisplay { ls, int, cc, escapechar, double_par }
    }
}
impl<'a,T:Token> Display for TokenListDisplay<'a,T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for t in self.ls {
            match t.to_enum() {
                StandardToken::Character(c,CommandCode::Parameter) if self.double_par => {
                    c.display_fmt(f);
                    c.display_fmt(f);
                }
                _ => t.display_fmt(self.int,self.cc,self.escapechar,f)?
            }
        }
        Ok(())
    }
}

/** Turns written characters into tokens, e.g. for `\number`, `\string` or `\the`: spaces become
[`Space`](CommandCode::Space) tokens, everything else [`Other`](CommandCode::Other) tokens.

```rust
use std::fmt::Write;
use expand_engine::tex::tokens::{StandardToken,Token};
use expand_engine::tex::tokens::token_lists::CharWrite;
use expand_engine::tex::catcodes::CommandCode;
use expand_engine::utils::Ptr;
type T = StandardToken<u8,Ptr<str>>;

let mut v : Vec<T> = Vec::new();
write!(CharWrite::new(|t| v.push(t)),"-1 2").unwrap();
assert_eq!(v.len(),4);
assert_eq!(v[2].command_code(),CommandCode::Space);
```
*/
pub struct CharWrite<T:Token,F:FnMut(T)>(F,std::marker::PhantomData<T>);
impl<T:Token,F:FnMut(T)> CharWrite<T,F> {
    pub fn new(f:F) -> Self { CharWrite(f,std::marker::PhantomData) }
    /// Pushes a single character.
    pub fn push_char(&mut self,c:T::Char) {
        if c.to_usize() == 32 {
            (self.0)(T::space())
        } else {
            (self.0)(T::from_char_cat(c,CommandCode::Other))
        }
    }
}
impl<T:Token,F:FnMut(T)> Write for CharWrite<T,F> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        for c in s.chars() {
            match T::Char::from_char(c) {
                Some(c) => self.push_char(c),
                None => {
                    let mut buf = [0u8;4];
                    for b in c.encode_utf8(&mut buf).bytes() {
                        self.push_char(T::Char::from(b))
                    }
                }
            }
        }
        Ok(())
    }
}

/// Converts tokens to a string the way `\message` and `\write` do.
pub fn tokens_to_string<T:Token>(ls:&[T], int:&CSHandlerOf<T>, cc:&CategoryCodeScheme<T::Char>, escapechar:Option<T::Char>) -> String {
    TokenListDisplay::from_slice(ls,int,cc,escapechar,false).to_string()
}
