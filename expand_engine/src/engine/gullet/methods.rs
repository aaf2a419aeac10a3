//! Reading larger syntactic units from the input: keywords, balanced token lists, control sequence
//! names and file names.
use crate::commands::{PrimitiveCommand, ResolvedToken, TeXCommand};
use crate::commands::primitives::PRIMITIVES;
use crate::engine::{EngineReferences, EngineTypes};
use crate::engine::state::State;
use crate::tex::catcodes::CommandCode;
use crate::tex::characters::Character;
use crate::tex::tokens::{StandardToken, Token};
use crate::tex::tokens::control_sequences::CSHandler;
use crate::tex::tokens::token_lists::tokens_to_string;
use crate::utils::errors::{ErrorKind, TeXResult};

impl<ET:EngineTypes> EngineReferences<'_,ET> {
    /// Skips space tokens, expanding.
    pub fn skip_spaces(&mut self) -> TeXResult<()> {
        while let Some((t,r)) = self.get_next_unexpandable()? {
            if !matches!(r,ResolvedToken::Tk{code:CommandCode::Space,..}) {
                self.mouth.requeue(t);
                break
            }
        }
        Ok(())
    }

    /// Skips spaces and an optional `=`.
    pub fn skip_eq(&mut self) -> TeXResult<()> {
        self.skip_spaces()?;
        if let Some((t,r)) = self.get_next_unexpandable()? {
            match r {
                ResolvedToken::Tk{char,code:CommandCode::Other} if char.to_usize() == b'=' as usize => (),
                _ => self.mouth.requeue(t)
            }
        }
        Ok(())
    }

    /// Reads the keyword `kw` (case-insensitively, with expansion). Spaces before the keyword are
    /// skipped; if the keyword is not found, all other tokens read are put back.
    pub fn read_keyword(&mut self,kw:&str) -> TeXResult<bool> {
        let kw = kw.as_bytes();
        let mut read = self.aux.memory.get_token_vec();
        while read.len() < kw.len() {
            let (t,r) = match self.get_next_unexpandable()? {
                Some(p) => p,
                None => break
            };
            match r {
                ResolvedToken::Tk{char,code} if code != CommandCode::Space &&
                    char.to_char().to_ascii_lowercase() == kw[read.len()] as char => read.push(t),
                ResolvedToken::Tk{code:CommandCode::Space,..} if read.is_empty() => (),
                _ => {
                    self.mouth.requeue(t);
                    break
                }
            }
        }
        if read.len() == kw.len() {
            self.aux.memory.return_token_vec(read);
            return Ok(true)
        }
        while let Some(t) = read.pop() { self.mouth.requeue(t) }
        self.aux.memory.return_token_vec(read);
        Ok(false)
    }

    /// Reads a control sequence (or active character) token without expansion, skipping spaces.
    /// Reports [`MissingCS`](ErrorKind::MissingCS) and returns `None` otherwise.
    pub fn read_control_sequence(&mut self) -> TeXResult<Option<ET::Token>> {
        loop {
            match self.get_next()? {
                None => {
                    self.error(ErrorKind::MissingCS)?;
                    return Ok(None)
                }
                Some(t) if t.is_space() => continue,
                Some(t) if t.is_cs_or_active() => return Ok(Some(t)),
                Some(t) => {
                    self.error(ErrorKind::MissingCS)?;
                    self.mouth.requeue(t);
                    return Ok(None)
                }
            }
        }
    }

    /// Reads a `{`, expanding and skipping spaces and `\relax`. Reports
    /// [`Missing`](ErrorKind::Missing) and puts the offending token back otherwise.
    pub fn read_left_brace(&mut self) -> TeXResult<bool> {
        while let Some((t,r)) = self.get_next_unexpandable()? {
            match r {
                ResolvedToken::Tk{code:CommandCode::BeginGroup,..} |
                ResolvedToken::Cmd(Some(TeXCommand::Char{code:CommandCode::BeginGroup,..})) => return Ok(true),
                ResolvedToken::Tk{code:CommandCode::Space,..} |
                ResolvedToken::Cmd(Some(TeXCommand::Primitive{cmd:PrimitiveCommand::Relax,..})) => (),
                _ => {
                    self.error(ErrorKind::Missing("{".to_string()))?;
                    self.mouth.requeue(t);
                    return Ok(false)
                }
            }
        }
        self.error(ErrorKind::Missing("{".to_string()))?;
        Ok(false)
    }

    /// Reads tokens without expansion up to the `}` matching an already consumed `{`.
    pub fn read_until_endgroup(&mut self,origin:&ET::Token,v:&mut Vec<ET::Token>) -> TeXResult<()> {
        let mut depth = 0usize;
        loop {
            match self.get_next()? {
                None => return self.unexpected_eof(origin),
                Some(t) if t.is_eof() => return self.unexpected_eof(origin),
                Some(t) if t.is_begin_group() => {
                    depth += 1;
                    v.push(t)
                }
                Some(t) if t.is_end_group() => {
                    if depth == 0 { return Ok(()) }
                    depth -= 1;
                    v.push(t)
                }
                Some(t) => v.push(t)
            }
        }
    }

    /// Reads tokens up to the `}` matching an already consumed `{`, expanding the way `\edef` does:
    /// protected macros and tokens marked by `\noexpand` are kept, the result of `\the` is not expanded
    /// further. If `for_def` is set, parameter tokens in the result of `\the` are doubled, so that
    /// they survive parsing as a macro body.
    pub fn expand_until_endgroup(&mut self,origin:&ET::Token,v:&mut Vec<ET::Token>,for_def:bool) -> TeXResult<()> {
        let mut depth = 0usize;
        loop {
            let t = match self.get_next_raw()? {
                None => return self.unexpected_eof(origin),
                Some(t) => t
            };
            if t.is_eof() { return self.unexpected_eof(origin) }
            if t.is_noexpand_marker() {
                match self.get_next_raw()? {
                    None => return self.unexpected_eof(origin),
                    Some(t) => v.push(t)
                }
                continue
            }
            match self.resolve(&t) {
                ResolvedToken::Tk{code:CommandCode::BeginGroup,..} => {
                    depth += 1;
                    v.push(t)
                }
                ResolvedToken::Tk{code:CommandCode::EndGroup,..} => {
                    if depth == 0 { return Ok(()) }
                    depth -= 1;
                    v.push(t)
                }
                ResolvedToken::Cmd(Some(TeXCommand::Primitive{name,cmd:PrimitiveCommand::Expandable(f)})) if name == PRIMITIVES.the => {
                    if for_def {
                        let mut res = self.aux.memory.get_token_vec();
                        f(self,&mut res,t)?;
                        for t in res.drain(..) {
                            if t.is_param() { v.push(t.clone()) }
                            v.push(t)
                        }
                        self.aux.memory.return_token_vec(res);
                    } else { f(self,v,t)? }
                }
                ResolvedToken::Cmd(Some(cmd)) if cmd.is_expandable(false) => self.expand(t,cmd)?,
                ResolvedToken::Cmd(None) => {
                    let name = self.display_token(&t);
                    self.error(ErrorKind::Undefined(name.trim_end().to_string()))?
                }
                _ => v.push(t)
            }
        }
    }

    /// Reads a braced token list, e.g. the argument of `\message`; expanded if `expand` is set. An
    /// empty list is returned if no `{` follows.
    pub fn read_general_text(&mut self,origin:&ET::Token,expand:bool) -> TeXResult<Vec<ET::Token>> {
        let mut v = self.aux.memory.get_token_vec();
        if self.read_left_brace()? {
            if expand { self.expand_until_endgroup(origin,&mut v,false)? } else { self.read_until_endgroup(origin,&mut v)? }
        }
        Ok(v)
    }

    fn unexpected_eof(&mut self,origin:&ET::Token) -> TeXResult<()> {
        let name = self.display_token(origin);
        self.error(ErrorKind::UnexpectedEOF(name.trim_end().to_string()))
    }

    /// Converts tokens to a string the way `\message` prints them.
    pub fn tokens_to_string(&self,v:&[ET::Token]) -> String {
        tokens_to_string(v,self.aux.memory.cs_interner(),self.state.get_catcode_scheme(),self.state.get_escape_char())
    }

    /// Reads the name of a control sequence up to `\endcsname`, expanding (`\csname`).
    pub fn read_csname(&mut self) -> TeXResult<ET::CSName> {
        let mut chars : Vec<ET::Char> = Vec::new();
        loop {
            match self.get_next_unexpandable()? {
                None => {
                    let esc = self.state.get_escape_char();
                    self.error(ErrorKind::UnexpectedEOF(PRIMITIVES.endcsname.display(esc).to_string()))?;
                    break
                }
                Some((_,ResolvedToken::Tk{char,..})) => chars.push(char),
                Some((_,ResolvedToken::Cmd(Some(TeXCommand::Primitive{name,..})))) if name == PRIMITIVES.endcsname => break,
                Some((t,_)) => {
                    let esc = self.state.get_escape_char();
                    self.error(ErrorKind::Missing(PRIMITIVES.endcsname.display(esc).to_string()))?;
                    self.mouth.requeue(t);
                    break
                }
            }
        }
        Ok(self.aux.memory.cs_interner_mut().from_chars(&chars))
    }

    /// Reads a file or font name: characters up to the next space (which is consumed) or
    /// non-character token (which is put back), expanding. Spaces before the name are skipped.
    pub fn read_file_name(&mut self) -> TeXResult<String> {
        self.skip_spaces()?;
        let mut name = String::new();
        while let Some((t,r)) = self.get_next_unexpandable()? {
            match r {
                ResolvedToken::Tk{code:CommandCode::Space,..} => break,
                ResolvedToken::Tk{char,..} => name.push(char.to_char()),
                _ => {
                    self.mouth.requeue(t);
                    break
                }
            }
        }
        Ok(name)
    }

    /// The name of a control sequence token (without escape character), or the character of any other
    /// token.
    pub fn token_name(&self,t:&ET::Token) -> String {
        match t.to_enum() {
            StandardToken::ControlSequence(cs) => self.aux.memory.cs_interner().resolve(&cs).to_string(),
            StandardToken::Character(c,_) => c.to_char().to_string()
        }
    }
}
