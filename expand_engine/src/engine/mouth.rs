/*! The [`Mouth`] is the source of [`Token`]s to be processed by the engine: a stack of
    [`TokenSource`]s, the topmost of which is read from first.

    Sources are either tokenizers over strings or files, or token lists that have already been
    processed (macro expansions, tokens pushed back). A token list source is popped as soon as its
    last token has been taken, so that a macro calling itself at the very end of its expansion does
    not grow the stack. A string or file source emits one [`EOF`](crate::tex::catcodes::CommandCode::EOF)
    token when it ends and is popped (closing the file); after the last source is gone,
    [`get_next`](Mouth::get_next) returns `None`.
 */
pub mod strings;

use crate::engine::{EngineAux, EngineTypes};
use crate::engine::filesystem::{File, FileLines};
use crate::engine::mouth::strings::{InputTokenizer, InvalidCharacter};
use crate::engine::state::State;
use crate::engine::utils::events::{MouthEvents, SourceEvent, SourceKind};
use crate::engine::utils::outputs::Outputs;
use crate::tex::characters::{Character, StringLineSource};
use crate::tex::tokens::Token;
use crate::tex::tokens::token_lists::TokenList;
use crate::utils::errors::{ErrorKind, SourcePosition, TeXError, TeXResult};

/// An entry in the [`Mouth`]'s stack.
pub enum TokenSource<ET:EngineTypes> {
    /// A tokenizer over a string.
    String(InputTokenizer<ET::Char,StringLineSource<ET::Char>>),
    /// A tokenizer over an open file; the file is closed when the source is dropped.
    File{ tokenizer:InputTokenizer<ET::Char,FileLines<ET::Char>>, name:String },
    /// Tokens in *reverse* order.
    Vec(Vec<ET::Token>),
    /// A shared token list and the position of the next token.
    Expansion{ list:TokenList<ET::Token>, pos:usize }
}
impl<ET:EngineTypes> TokenSource<ET> {
    fn kind(&self) -> SourceKind {
        match self {
            TokenSource::String(_) => SourceKind::String,
            TokenSource::File{..} => SourceKind::File,
            _ => SourceKind::Tokens
        }
    }
    fn name(&self) -> Option<String> {
        match self {
            TokenSource::File{name,..} => Some(name.clone()),
            _ => None
        }
    }
}

/// The stack of [`TokenSource`]s.
pub struct Mouth<ET:EngineTypes> {
    inputs:Vec<TokenSource<ET>>,
    max_depth:usize,
    /// Listeners for sources being pushed, popped, ended and closed.
    pub events:MouthEvents
}
impl<ET:EngineTypes> Mouth<ET> {
    /// A new, empty mouth allowing at most `max_depth` nested sources.
    pub fn new(max_depth:usize) -> Self {
        Mouth { inputs:Vec::new(), max_depth, events:MouthEvents::default() }
    }
    /// The number of sources currently on the stack.
    pub fn depth(&self) -> usize { self.inputs.len() }
    pub fn is_empty(&self) -> bool { self.inputs.is_empty() }

    fn event(&self,source:&TokenSource<ET>) -> SourceEvent {
        SourceEvent { kind:source.kind(), name:source.name(), depth:self.inputs.len() }
    }

    fn push_source(&mut self,source:TokenSource<ET>) -> TeXResult<()> {
        if self.inputs.len() >= self.max_depth {
            return Err(TeXError::new(ErrorKind::ExpansionTooDeep(self.max_depth)))
        }
        self.inputs.push(source);
        if !self.events.push.is_empty() {
            if let Some(ev) = self.inputs.last().map(|s| self.event(s)) {
                self.events.push.fire(&ev);
            }
        }
        Ok(())
    }

    /// Pushes a string to be tokenized.
    pub fn push_string(&mut self,s:&str) -> TeXResult<()> {
        let src : StringLineSource<ET::Char> = s.into();
        self.push_source(TokenSource::String(InputTokenizer::new(src)))
    }

    /// Opens `file` and pushes it.
    pub fn push_file(&mut self,file:&ET::File,aux:&mut EngineAux<ET>) -> TeXResult<()> {
        let lines = file.lines()?;
        let name = file.path().display().to_string();
        aux.outputs.file_open(&name);
        self.push_source(TokenSource::File{ tokenizer:InputTokenizer::new(lines), name })
    }

    /// Pushes a shared token list, e.g. the expansion of a macro without parameters.
    pub fn push_exp(&mut self,list:&TokenList<ET::Token>) -> TeXResult<()> {
        if list.is_empty() { return Ok(()) }
        self.push_source(TokenSource::Expansion{ list:list.clone(), pos:0 })
    }

    /// Pushes a vector of tokens (in reading order).
    pub fn push_vec(&mut self,mut v:Vec<ET::Token>) -> TeXResult<()> {
        if v.is_empty() { return Ok(()) }
        v.reverse();
        self.push_source(TokenSource::Vec(v))
    }

    /// Pushes a vector of tokens given in *reverse* reading order.
    pub fn push_reversed(&mut self,v:Vec<ET::Token>) -> TeXResult<()> {
        if v.is_empty() { return Ok(()) }
        self.push_source(TokenSource::Vec(v))
    }

    /// Puts a token back, to be returned by the next call to [`get_next`](Self::get_next).
    pub fn requeue(&mut self,t:ET::Token) {
        match self.inputs.last_mut() {
            Some(TokenSource::Vec(v)) => v.push(t),
            _ => self.inputs.push(TokenSource::Vec(vec!(t)))
        }
    }

    fn pop_source(&mut self,aux:&mut EngineAux<ET>) {
        if let Some(src) = self.inputs.pop() {
            let ev = self.event(&src);
            match src {
                TokenSource::File{name,..} => {
                    aux.outputs.file_close(&name);
                    self.events.close.fire(&ev);
                }
                TokenSource::Vec(v) => aux.memory.return_token_vec(v),
                _ => ()
            }
            self.events.pop.fire(&ev);
        }
    }

    fn invalid(c:ET::Char) -> TeXError {
        TeXError::new(ErrorKind::InvalidCharacter(c.display().to_string()))
    }

    /// The next token, or `None` if all sources are exhausted. Errors are lexical and recoverable:
    /// the offending character has been skipped.
    pub fn get_next(&mut self,aux:&mut EngineAux<ET>,state:&ET::State) -> TeXResult<Option<ET::Token>> {
        loop {
            match self.inputs.last_mut() {
                None => return Ok(None),
                Some(TokenSource::Vec(v)) => {
                    let next = v.pop();
                    if v.is_empty() { self.pop_source(aux) }
                    if let Some(t) = next { return Ok(Some(t)) }
                }
                Some(TokenSource::Expansion{list,pos}) => {
                    let next = list.get(*pos).cloned();
                    *pos += 1;
                    if *pos >= list.len() { self.pop_source(aux) }
                    if let Some(t) = next { return Ok(Some(t)) }
                }
                Some(TokenSource::String(tk)) => {
                    match tk.get_next::<ET::Token>(aux.memory.cs_interner_mut(),state.get_catcode_scheme(),state.get_endline_char()) {
                        Ok(Some(t)) => return Ok(Some(t)),
                        Err(InvalidCharacter(c)) => return Err(Self::invalid(c)),
                        Ok(None) => return Ok(Some(self.end_source(aux)))
                    }
                }
                Some(TokenSource::File{tokenizer,..}) => {
                    match tokenizer.get_next::<ET::Token>(aux.memory.cs_interner_mut(),state.get_catcode_scheme(),state.get_endline_char()) {
                        Ok(Some(t)) => return Ok(Some(t)),
                        Err(InvalidCharacter(c)) => return Err(Self::invalid(c)),
                        Ok(None) => return Ok(Some(self.end_source(aux)))
                    }
                }
            }
        }
    }

    fn end_source(&mut self,aux:&mut EngineAux<ET>) -> ET::Token {
        if let Some(src) = self.inputs.last() {
            let ev = self.event(src);
            self.events.eof.fire(&ev);
        }
        self.pop_source(aux);
        ET::Token::eof()
    }

    /// `\endinput`: the innermost file ends after the current line.
    pub fn endinput(&mut self) {
        for s in self.inputs.iter_mut().rev() {
            if let TokenSource::File{tokenizer,..} = s {
                tokenizer.endinput();
                return
            }
        }
    }

    /// Drops all sources, closing all files.
    pub fn finish(&mut self,aux:&mut EngineAux<ET>) {
        while !self.inputs.is_empty() { self.pop_source(aux) }
    }

    /// The position in the innermost file or string being read.
    pub fn current_position(&self) -> Option<SourcePosition> {
        self.inputs.iter().rev().find_map(|s| match s {
            TokenSource::File{tokenizer,name} => Some(SourcePosition {
                file:Some(name.clone()), line:tokenizer.line(), column:tokenizer.column()
            }),
            TokenSource::String(tk) => Some(SourcePosition { file:None, line:tk.line(), column:tk.column() }),
            _ => None
        })
    }

    /// The current line number, or `0`.
    pub fn line_number(&self) -> usize {
        self.current_position().map(|p| p.line).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use crate::engine::{DefaultEngine, TeXEngine};
    use crate::engine::utils::events::SourceKind;
    use crate::tex::tokens::Token;
    use crate::tests::test_utils::TestEngineTypes;
    use crate::utils::Ptr;

    #[test]
    fn token_sources() {
        let mut engine = DefaultEngine::<TestEngineTypes>::new();
        let pushed = Ptr::new(RefCell::new(Vec::new()));
        let p = pushed.clone();
        engine.mouth.events.push.register(move |e| p.borrow_mut().push(e.kind));
        engine.mouth.push_string("ab").unwrap();
        let mut refs = engine.get_engine_refs();
        let a = refs.mouth.get_next(refs.aux,refs.state).unwrap().unwrap();
        assert_eq!(a.char_value(),Some(b'a'));
        refs.mouth.requeue(a.clone());
        assert_eq!(refs.mouth.depth(),2);
        assert_eq!(refs.mouth.get_next(refs.aux,refs.state).unwrap(),Some(a));
        // requeued tokens are popped eagerly
        assert_eq!(refs.mouth.depth(),1);
        assert_eq!(refs.mouth.get_next(refs.aux,refs.state).unwrap().unwrap().char_value(),Some(b'b'));
        // end of line
        assert!(refs.mouth.get_next(refs.aux,refs.state).unwrap().unwrap().is_space());
        assert!(refs.mouth.get_next(refs.aux,refs.state).unwrap().unwrap().is_eof());
        assert!(refs.mouth.get_next(refs.aux,refs.state).unwrap().is_none());
        assert_eq!(&*pushed.borrow(),&[SourceKind::String]);
    }

    #[test]
    fn depth_limit() {
        let mut engine = DefaultEngine::<TestEngineTypes>::new();
        for _ in 0..engine.aux.config.max_expansion_depth {
            engine.mouth.push_string("a").unwrap();
        }
        let err = engine.mouth.push_string("a").unwrap_err();
        assert!(err.is_fatal());
    }
}
