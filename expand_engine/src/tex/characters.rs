/*! Characters and lines of input text. */
use std::fmt::{Debug, Display};
use crate::tex::catcodes::{CategoryCode, CategoryCodeScheme};

/** A single character of input. Plain TeX works on bytes, which is the only implementation
    provided here; the engine itself is generic over this trait. */
pub trait Character: Sized + Eq + Copy + Display + Debug + From<u8> + TryInto<u8> + TryFrom<u64> + Into<u64> + Ord + std::hash::Hash + Default + 'static {
    /// Maps characters to other data, e.g. a [`CategoryCodeScheme`].
    type CharMap<A:Clone + Default> : CharacterMap<Self,A>;
    /// minimal value (`0` for `u8`)
    const MIN: Self;
    /// maximal value (`255` for `u8`)
    const MAX: Self;
    /// Converts a line of raw bytes into characters.
    fn convert(input:Vec<u8>) -> TextLine<Self>;

    /// Writes this character, using the `^^` notation for unprintable ones.
    fn display_fmt<W:std::fmt::Write>(&self, target:&mut W);

    /// A wrapper implementing [`Display`] via [`display_fmt`](Self::display_fmt).
    fn display(&self) -> DisplayableCharacter<Self> { DisplayableCharacter(*self) }

    /// Like [`display`](Self::display) for an optional character, e.g. the current `\escapechar`.
    fn displayable_opt(c:Option<Self>) -> DisplayableCharacterOpt<Self> { DisplayableCharacterOpt(c) }

    /// The [`CategoryCodeScheme`] INITEX starts with.
    fn starting_catcode_scheme() -> CategoryCodeScheme<Self>;

    /// The character with the given code point, if representable. Control sequence names are stored
    /// as strings whose `char`s are code points of this type.
    fn from_char(c:char) -> Option<Self> {
        Self::try_from(c as u64).ok()
    }
    /// The code point of this character as a `char`.
    fn to_char(&self) -> char {
        let u : u64 = (*self).into();
        char::from_u32(u as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
    /// The numeric value of this character.
    fn to_usize(&self) -> usize {
        let u : u64 = (*self).into();
        u as usize
    }
}

/// Helper structure to display a [`Character`] in a `format!` or `write!` macro.
pub struct DisplayableCharacter<C:Character>(C);
impl<C:Character> Display for DisplayableCharacter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.display_fmt(f);
        Ok(())
    }
}

/// Displays an optional [`Character`]; nothing is written for [`None`].
pub struct DisplayableCharacterOpt<C:Character>(Option<C>);
impl<C:Character> Display for DisplayableCharacterOpt<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(c) = self.0 { c.display_fmt(f) }
        Ok(())
    }
}

/** A total map from characters `C` to values `A`. For `u8`, this is simply `[A;256]`. */
pub trait CharacterMap<C:Character,A:Default>:Clone {
    fn get(&self,c:C) -> &A;
    fn get_mut(&mut self,c:C) -> &mut A;
    fn default() -> Self;
}

impl Character for u8 {
    type CharMap<A:Clone + Default> = [A;256];
    const MIN: Self = 0;
    const MAX: Self = 255;

    fn convert(input:Vec<u8>) -> TextLine<Self> { input.into() }

    #[allow(unused_must_use)]
    fn display_fmt<W:std::fmt::Write>(&self, target:&mut W) {
        match *self {
            b if (32..127).contains(&b) => { target.write_char(b as char); }
            b if b < 64 => { target.write_str("^^"); target.write_char((b + 64) as char); }
            b if b < 128 => { target.write_str("^^"); target.write_char((b - 64) as char); }
            b => { write!(target,"^^{:02x}",b); }
        }
    }

    fn starting_catcode_scheme() -> [CategoryCode;256] {
        *super::catcodes::STARTING_SCHEME_U8
    }
}

impl <A:Clone+Default> CharacterMap<u8,A> for [A;256] {
    #[inline(always)]
    fn get(&self,c: u8) -> &A { &self[c as usize] }
    #[inline(always)]
    fn get_mut(&mut self,c: u8) -> &mut A { &mut self[c as usize] }
    fn default() -> Self {
        array_init::array_init(|_| A::default())
    }
}

/// A single line of characters, without the line break.
pub type TextLine<C> = Box<[C]>;

/// A source of lines, e.g. a file or a string.
pub trait TextLineSource<C:Character> {
    /// returns the next line, or `None` at the end.
    fn get_line(&mut self) -> Option<TextLine<C>>;
}

/// Splits a byte iterator into lines at `\n` (dropping a preceding `\r`) and strips trailing spaces,
/// as TeX does when reading a line.
pub fn split_lines<C:Character,I:Iterator<Item=u8>>(iter:I) -> Vec<TextLine<C>> {
    let mut lines = Vec::new();
    let mut curr = Vec::new();
    for b in iter {
        if b == b'\n' {
            lines.push(C::convert(trim_line(std::mem::take(&mut curr))));
        } else {
            curr.push(b);
        }
    }
    if !curr.is_empty() {
        lines.push(C::convert(trim_line(curr)));
    }
    lines
}

/// Removes a trailing `\r` and trailing spaces from a raw line.
pub fn trim_line(mut line:Vec<u8>) -> Vec<u8> {
    if let Some(b'\r') = line.last() { line.pop(); }
    while let Some(b' ') = line.last() { line.pop(); }
    line
}

/// Lines of an in-memory string.
pub struct StringLineSource<C:Character> {
    lines:std::vec::IntoIter<TextLine<C>>
}
impl<C:Character> From<Vec<TextLine<C>>> for StringLineSource<C> {
    fn from(lines: Vec< TextLine<C>>) -> Self { Self { lines:lines.into_iter() } }
}
impl<C:Character> TextLineSource<C> for StringLineSource<C> {
    fn get_line(&mut self) -> Option<TextLine<C>> {
        self.lines.next()
    }
}
impl<C:Character> From<&str> for StringLineSource<C> {
    fn from(s: &str) -> Self { split_lines(s.as_bytes().iter().copied()).into() }
}
impl<C:Character> From<String> for StringLineSource<C> {
    fn from(s: String) -> Self { split_lines(s.into_bytes().into_iter()).into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn lines_and_display() {
        let mut src: StringLineSource<u8> = "a b  \r\n\nc".into();
        assert_eq!(&*src.get_line().unwrap(),b"a b");
        assert_eq!(&*src.get_line().unwrap(),b"");
        assert_eq!(&*src.get_line().unwrap(),b"c");
        assert!(src.get_line().is_none());
        assert_eq!(13u8.display().to_string(),"^^M");
        assert_eq!(200u8.display().to_string(),"^^c8");
        assert_eq!(u8::from_char('A'),Some(65));
        assert_eq!(u8::from_char('€'),None);
    }
}
