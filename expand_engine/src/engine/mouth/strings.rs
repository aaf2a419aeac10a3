/*! Tokenizer for TeX input, from files or strings.
*/
use crate::tex::catcodes::{CategoryCode, CategoryCodeScheme, CommandCode};
use crate::tex::characters::{Character, CharacterMap, TextLine, TextLineSource};
use crate::tex::tokens::control_sequences::CSHandler;
use crate::tex::tokens::{CSHandlerOf, Token};

/// An [`InputTokenizer`] is in one of three states
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum MouthState {
    /// Beginning of line
    NewLine,
    /// After a space (or control word)
    SkipBlank,
    /// In the middle of a line
    MidLine
}

/// A character with category code [`Invalid`](CategoryCode::Invalid) was encountered (and skipped).
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub struct InvalidCharacter<C:Character>(pub C);

/** Takes a [`TextLineSource`] and lazily turns it into [`Token`]s, given the current
 [`CategoryCodeScheme`] and `\endlinechar` at each step.

  *Example:*
```rust
use expand_engine::engine::mouth::strings::InputTokenizer;
use expand_engine::tex::tokens::{StandardToken,Token};
use expand_engine::tex::catcodes::{DEFAULT_SCHEME_U8,CommandCode};
use expand_engine::tex::characters::StringLineSource;
use expand_engine::utils::Ptr;

type T = StandardToken<u8,Ptr<str>>;
let mut cs_handler = ();
let cc = &*DEFAULT_SCHEME_U8;

let input: StringLineSource<u8> = "\\foo   \n  \n   {a}{!}".into();
let mut tokenizer = InputTokenizer::new(input);
let eol = Some(b'\r');
let next : T = tokenizer.get_next(&mut cs_handler,cc,eol).unwrap().unwrap(); // \foo
assert!(matches!(next,T::ControlSequence(s) if &*s == "foo"));
let next : T = tokenizer.get_next(&mut cs_handler,cc,eol).unwrap().unwrap(); // empty line => \par
assert!(matches!(next,T::ControlSequence(s) if &*s == "par"));
for code in [CommandCode::BeginGroup,CommandCode::Letter,CommandCode::EndGroup,CommandCode::BeginGroup,
        CommandCode::Other,CommandCode::EndGroup,CommandCode::Space] {
    let next : T = tokenizer.get_next(&mut cs_handler,cc,eol).unwrap().unwrap();
    assert_eq!(next.command_code(),code);
}
assert!(tokenizer.get_next::<T>(&mut cs_handler,cc,eol).unwrap().is_none());
```
*/
pub struct InputTokenizer<C:Character,S:TextLineSource<C>> {
    state : MouthState,
    line : usize,
    col : usize,
    current_line:TextLine<C>,
    source:S,
    eof:bool,
    ended:bool,
    tempstr:Vec<C>
}

impl<C:Character,S:TextLineSource<C>> InputTokenizer<C,S> {
    pub fn new(mut source:S) -> Self {
        let (current_line,eof) = match source.get_line() {
            Some(l) => (l,false),
            None => (TextLine::default(),true)
        };
        Self {
            state: MouthState::NewLine,
            line: 1,
            col: 0,
            current_line,
            source,
            eof,
            ended:false,
            tempstr:Vec::new()
        }
    }
    /// The current line
    #[inline(always)]
    pub fn line(&self) -> usize { self.line }
    /// The current column
    #[inline(always)]
    pub fn column(&self) -> usize { self.col + 1 }
    /// Whether the end of the input has been reached.
    #[inline(always)]
    pub fn eof(&self) -> bool { self.eof }
    pub fn state(&self) -> MouthState { self.state }

    /// `\endinput`: the current line is finished normally, then the input ends.
    pub fn endinput(&mut self) { self.ended = true }

    #[inline(always)]
    fn get_char(&mut self) -> Option<C> {
        let next = self.current_line.get(self.col).copied();
        if next.is_some() { self.col += 1 }
        next
    }

    /// The next [`Token`], or `None` at the end of the input.
    pub fn get_next<T:Token<Char=C>>(&mut self, handler: &mut CSHandlerOf<T>, cc: &CategoryCodeScheme<C>, endline: Option<C>) -> Result<Option<T>,InvalidCharacter<C>> { loop {
        match self.get_char() {
            None if self.eof => return Ok(None),
            None => if let Some(t) = self.end_of_line::<T>(handler, cc, endline) {
                return Ok(Some(t))
            }
            Some(c) => if let Some(t) = self.check_char::<T>(handler, cc, endline, c)? {
                return Ok(Some(t))
            }
        }
    }}

    fn next_line(&mut self) {
        if !self.ended {
            if let Some(next) = self.source.get_line() {
                self.current_line = next;
                self.line += 1;
                self.col = 0;
                return
            }
        }
        self.eof = true;
        self.col = self.current_line.len();
    }

    /// The (logical) `\endlinechar` at the end of the current line.
    fn end_of_line<T:Token<Char=C>>(&mut self, handler: &mut CSHandlerOf<T>, cc: &CategoryCodeScheme<C>, endline: Option<C>) -> Option<T> {
        let state = self.state;
        self.next_line();
        self.state = MouthState::NewLine;
        let c = endline?;
        Self::line_end_token::<T>(handler, cc, c, state)
    }

    fn line_end_token<T:Token<Char=C>>(handler: &mut CSHandlerOf<T>, cc: &CategoryCodeScheme<C>, c:C, state:MouthState) -> Option<T> {
        use CategoryCode::*;
        match cc.get(c) {
            EOL => match state {
                MouthState::NewLine => Some(T::from_cs(handler.par())),
                MouthState::SkipBlank => None,
                MouthState::MidLine => Some(T::space())
            }
            Space if state == MouthState::MidLine => Some(T::space()),
            Space | Ignored | Invalid | Comment => None,
            Escape => Some(T::from_cs(handler.empty_str())),
            o => Some(T::from_char_cat(c,(*o).into()))
        }
    }

    fn check_char<T:Token<Char=C>>(&mut self, handler:&mut CSHandlerOf<T>, cc:&CategoryCodeScheme<C>, endline:Option<C>, c:C) -> Result<Option<T>,InvalidCharacter<C>> {
        use CategoryCode::*;
        match cc.get(c) {
            EOL => {
                // the rest of the line is discarded
                let state = self.state;
                self.next_line();
                self.state = MouthState::NewLine;
                Ok(Self::line_end_token::<T>(handler, cc, c, state))
            }
            Space if self.state == MouthState::MidLine => {
                self.state = MouthState::SkipBlank;
                Ok(Some(T::space()))
            }
            Space | Ignored => Ok(None),
            Comment => {
                self.next_line();
                self.state = MouthState::NewLine;
                Ok(None)
            }
            Invalid => Err(InvalidCharacter(c)),
            Escape => Ok(Some(self.get_escape::<T>(handler, cc, endline))),
            Superscript => match self.maybe_superscript(c) {
                Some(c) => self.check_char::<T>(handler, cc, endline, c),
                None => {
                    self.state = MouthState::MidLine;
                    Ok(Some(T::from_char_cat(c,CommandCode::Superscript)))
                }
            }
            o => {
                self.state = MouthState::MidLine;
                Ok(Some(T::from_char_cat(c,(*o).into())))
            }
        }
    }

    fn get_escape<T:Token<Char=C>>(&mut self, handler:&mut CSHandlerOf<T>, cc:&CategoryCodeScheme<C>, endline:Option<C>) -> T {
        let name = match self.get_char() {
            None => {
                // escape character at the end of the line
                self.next_line();
                self.state = MouthState::NewLine;
                match endline {
                    None => handler.empty_str(),
                    Some(c) => handler.from_chars(&[c])
                }
            },
            Some(next) => self.check_escape::<T>(handler, cc, next)
        };
        T::from_cs(name)
    }

    fn check_escape<T:Token<Char=C>>(&mut self, handler:&mut CSHandlerOf<T>, cc:&CategoryCodeScheme<C>, next:C) -> T::CS {
        match cc.get(next) {
            CategoryCode::Superscript => match self.maybe_superscript(next) {
                Some(c) => self.check_escape::<T>(handler, cc, c),
                None => {
                    self.state = MouthState::MidLine;
                    handler.from_chars(&[next])
                }
            }
            CategoryCode::Letter => self.get_cs_name::<T>(handler, cc, next),
            CategoryCode::Space => {
                self.state = MouthState::SkipBlank;
                handler.from_chars(&[next])
            }
            _ => {
                self.state = MouthState::MidLine;
                handler.from_chars(&[next])
            }
        }
    }

    fn get_cs_name<T:Token<Char=C>>(&mut self, handler:&mut CSHandlerOf<T>, cc:&CategoryCodeScheme<C>, first:C) -> T::CS {
        self.tempstr.clear();
        self.tempstr.push(first);
        self.state = MouthState::SkipBlank;
        while let Some(next) = self.get_char() {
            match cc.get(next) {
                CategoryCode::Letter => self.tempstr.push(next),
                CategoryCode::Superscript => {
                    let curr = self.col;
                    match self.maybe_superscript(next) {
                        Some(c) if *cc.get(c) == CategoryCode::Letter => self.tempstr.push(c),
                        _ => {
                            self.col = curr - 1;
                            break
                        }
                    }
                }
                _ => {
                    self.col -= 1;
                    break
                }
            }
        }
        handler.from_chars(&self.tempstr)
    }

    fn hex_value(c:C) -> Option<u8> {
        match c.to_usize() {
            d @ 48..=57 => Some(d as u8 - 48),
            d @ 97..=102 => Some(d as u8 - 87),
            _ => None
        }
    }

    /// `^^` notation: `^^` followed by two lowercase hex digits denotes that character;
    /// `^^` followed by a character `c < 128` denotes `c+64` or `c-64`. The first superscript
    /// character has already been consumed.
    fn maybe_superscript(&mut self, sup:C) -> Option<C> {
        match self.current_line.get(self.col..) {
            Some([s, a, b, ..]) if *s == sup && Self::hex_value(*a).is_some() && Self::hex_value(*b).is_some() => {
                let v = Self::hex_value(*a)? * 16 + Self::hex_value(*b)?;
                self.col += 3;
                Some(C::from(v))
            }
            Some([s, a, ..]) if *s == sup && a.to_usize() < 128 => {
                let u = a.to_usize() as u8;
                self.col += 2;
                Some(C::from(if u < 64 { u + 64 } else { u - 64 }))
            }
            _ => None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tex::catcodes::DEFAULT_SCHEME_U8;
    use crate::tex::characters::StringLineSource;
    use crate::tex::tokens::StandardToken;
    use crate::utils::Ptr;
    type T = StandardToken<u8,Ptr<str>>;

    fn tokenize(s:&str) -> Vec<T> {
        let mut tk = InputTokenizer::new(StringLineSource::from(s));
        let mut ret = Vec::new();
        while let Ok(Some(t)) = tk.get_next::<T>(&mut (),&DEFAULT_SCHEME_U8,Some(b'\r')) {
            ret.push(t)
        }
        ret
    }

    #[test]
    fn states() {
        // spaces after control words are skipped, space runs collapse
        let v = tokenize("\\a   b  c");
        assert_eq!(v.len(),5);
        assert!(matches!(&v[0],T::ControlSequence(s) if &**s == "a"));
        assert!(v[2].is_space());
        assert!(v[4].is_space());
        // leading spaces skipped, comments swallow the line end
        let v = tokenize("   x% comment\ny");
        assert_eq!(v.len(),3);
        assert_eq!(v[0].char_value(),Some(b'x'));
        assert_eq!(v[1].char_value(),Some(b'y'));
        // control symbols do not skip blanks; `\ ` does
        let v = tokenize("\\! a\\ b");
        assert_eq!(v.len(),6);
        assert!(v[1].is_space());
        assert!(matches!(&v[3],T::ControlSequence(s) if &**s == " "));
        assert_eq!(v[4].char_value(),Some(b'b'));
    }

    #[test]
    fn superscripts_and_line_ends() {
        let v = tokenize("^^41^^5a\\^^4d");
        assert_eq!(v[0].char_value(),Some(b'A'));
        assert_eq!(v[1].char_value(),Some(b'Z'));
        // `^^4d` is `M`, a letter
        assert!(matches!(&v[2],T::ControlSequence(s) if &**s == "M"));
        let v = tokenize("a\\\nb");
        assert!(matches!(&v[1],T::ControlSequence(s) if &**s == "\r"));
        assert_eq!(v[2].char_value(),Some(b'b'));
        let v = tokenize("a\n\n\nb");
        assert!(matches!(&v[2],T::ControlSequence(s) if &**s == "par"));
        assert!(matches!(&v[3],T::ControlSequence(s) if &**s == "par"));
    }

    #[test]
    fn invalid_characters() {
        let mut tk = InputTokenizer::new(StringLineSource::from("a\u{7f}b"));
        let cc = &*DEFAULT_SCHEME_U8;
        assert!(tk.get_next::<T>(&mut (),cc,None).unwrap().is_some());
        assert_eq!(tk.get_next::<T>(&mut (),cc,None).unwrap_err(),InvalidCharacter(127));
        assert_eq!(tk.get_next::<T>(&mut (),cc,None).unwrap().unwrap().char_value(),Some(b'b'));
    }
}
