/*! The [`Gullet`] reads tokens from the [`Mouth`](crate::engine::mouth::Mouth), expands macros and
    expandable primitives and evaluates conditionals, so that the
    [`Stomach`](crate::engine::stomach::Stomach) only ever sees unexpandable commands.

    All of its operations are methods on [`EngineReferences`], since expanding requires access to
    every other component; the [`Gullet`] struct itself only holds the stack of currently open
    conditionals.
*/
pub mod methods;
pub mod numeric_methods;

use std::marker::PhantomData;
use arrayvec::ArrayVec;
use crate::commands::{ActiveConditional, Macro, PrimitiveCommand, ResolvedToken, TeXCommand};
use crate::commands::primitives::{PrimitiveIdentifier, PRIMITIVES};
use crate::engine::{EngineReferences, EngineTypes};
use crate::engine::state::State;
use crate::engine::utils::outputs::Outputs;
use crate::tex::catcodes::CommandCode;
use crate::tex::tokens::{StandardToken, Token};
use crate::tex::tokens::control_sequences::CSHandler;
use crate::tex::tokens::token_lists::TokenListDisplay;
use crate::utils::errors::{ErrorKind, TeXResult};

/// The state of the gullet: the currently open conditionals, innermost last.
pub struct Gullet<ET:EngineTypes> {
    pub conditionals:Vec<ActiveConditional>,
    phantom:PhantomData<ET>
}
impl<ET:EngineTypes> Default for Gullet<ET> {
    fn default() -> Self { Gullet { conditionals:Vec::new(), phantom:PhantomData } }
}

/// What ended a skipped conditional branch.
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum BranchEnd { Else, Or, Fi }

/// How a token behaves while skipping a conditional branch.
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
enum SkipRole { If, Else, Or, Fi }

impl<ET:EngineTypes> EngineReferences<'_,ET> {
    /// The next token from the [`Mouth`](crate::engine::mouth::Mouth), without expansion. Lexical errors
    /// are reported and the offending character skipped.
    pub fn get_next_raw(&mut self) -> TeXResult<Option<ET::Token>> {
        loop {
            match self.mouth.get_next(self.aux,self.state) {
                Ok(r) => return Ok(r),
                Err(e) => self.report(e)?
            }
        }
    }
    /// The next token without expansion, dropping `\noexpand` markers.
    pub fn get_next(&mut self) -> TeXResult<Option<ET::Token>> {
        loop {
            match self.get_next_raw()? {
                Some(t) if t.is_noexpand_marker() => continue,
                o => return Ok(o)
            }
        }
    }

    /// Resolves a token to its current meaning.
    pub fn resolve(&self,t:&ET::Token) -> ResolvedToken<ET> {
        match t.to_enum() {
            StandardToken::Character(c,CommandCode::Active) => ResolvedToken::Cmd(self.state.get_ac_command(c).cloned()),
            StandardToken::Character(char,code) => ResolvedToken::Tk{char,code},
            StandardToken::ControlSequence(cs) => ResolvedToken::Cmd(self.state.get_command(&cs).cloned())
        }
    }

    /// Expands tokens for as long as possible and returns the next unexpandable token together with
    /// its meaning, or `None` if the input is exhausted. A token following a `\noexpand` marker is
    /// returned as `\relax` if it would otherwise be expanded. Undefined control sequences are reported
    /// and skipped.
    pub fn get_next_unexpandable(&mut self) -> TeXResult<Option<(ET::Token,ResolvedToken<ET>)>> {
        loop {
            let t = match self.get_next_raw()? {
                None => return Ok(None),
                Some(t) => t
            };
            if t.is_noexpand_marker() {
                let t = match self.get_next_raw()? {
                    None => return Ok(None),
                    Some(t) => t
                };
                return Ok(Some(match self.resolve(&t) {
                    ResolvedToken::Cmd(Some(c)) if c.is_expandable(true) => (t,ResolvedToken::Cmd(Some(TeXCommand::relax()))),
                    ResolvedToken::Cmd(None) => (t,ResolvedToken::Cmd(Some(TeXCommand::relax()))),
                    r => (t,r)
                }))
            }
            match self.resolve(&t) {
                ResolvedToken::Cmd(Some(cmd)) if cmd.is_expandable(true) => self.expand(t,cmd)?,
                ResolvedToken::Cmd(None) => {
                    let name = self.display_token(&t);
                    self.error(ErrorKind::Undefined(name.trim_end().to_string()))?
                }
                r => return Ok(Some((t,r)))
            }
        }
    }

    /// Expands `t`, which has meaning `cmd`. Unexpandable commands are ignored.
    pub fn expand(&mut self,t:ET::Token,cmd:TeXCommand<ET>) -> TeXResult<()> {
        match cmd {
            TeXCommand::Macro(m) => self.expand_macro(t,&m),
            TeXCommand::Primitive{name,cmd:PrimitiveCommand::Conditional(f)} => {
                self.trace_command(&t,2);
                self.do_conditional(name,t,f)
            }
            TeXCommand::Primitive{cmd:PrimitiveCommand::Expandable(f),..} => {
                self.trace_command(&t,2);
                let mut v = self.aux.memory.get_token_vec();
                f(self,&mut v,t)?;
                if v.is_empty() {
                    self.aux.memory.return_token_vec(v);
                    Ok(())
                } else { self.mouth.push_vec(v) }
            }
            TeXCommand::Primitive{cmd:PrimitiveCommand::SimpleExpandable(f),..} => {
                self.trace_command(&t,2);
                f(self,t)
            }
            _ => Ok(())
        }
    }

    /// With `\tracingcommands` at least `level`, logs `{\foo}`.
    pub(crate) fn trace_command(&self,t:&ET::Token,level:i32) {
        if self.state.get_primitive_int(PRIMITIVES.tracingcommands) >= level {
            let s = self.display_token(t);
            self.aux.outputs.write_neg1(format_args!("{{{}}}",s.trim_end()));
        }
    }

    /// Expands the macro `m`, called via `t`: reads its arguments and pushes the expansion.
    pub fn expand_macro(&mut self,t:ET::Token,m:&Macro<ET::Token>) -> TeXResult<()> {
        let tracing = self.state.get_primitive_int(PRIMITIVES.tracingmacros) > 0;
        if tracing {
            let int = self.aux.memory.cs_interner();
            let cc = self.state.get_catcode_scheme();
            let esc = self.state.get_escape_char();
            self.aux.outputs.write_neg1(format_args!("{}{}->{}",
                t.display(int,cc,esc),
                m.signature.params.display(int,cc,esc,false),
                m.expansion.display(int,cc,esc,true)
            ));
        }
        if m.signature.params.is_empty() {
            return self.mouth.push_exp(&m.expansion)
        }
        let mut args : ArrayVec<Vec<ET::Token>,9> = ArrayVec::new();
        for _ in 0..m.signature.arity { args.push(self.aux.memory.get_token_vec()) }
        if !self.read_arguments(&t,m,&mut args)? {
            for a in args { self.aux.memory.return_token_vec(a) }
            return Ok(())
        }
        if tracing {
            let int = self.aux.memory.cs_interner();
            let cc = self.state.get_catcode_scheme();
            let esc = self.state.get_escape_char();
            for (i,a) in args.iter().enumerate() {
                self.aux.outputs.write_neg1(format_args!("#{}<-{}",i + 1,TokenListDisplay::from_slice(a,int,cc,esc,false)));
            }
        }
        if m.signature.arity == 0 {
            return self.mouth.push_exp(&m.expansion)
        }
        let mut result = self.aux.memory.get_token_vec();
        for tk in m.expansion.iter() {
            match tk.is_argument_marker() {
                Some(i) => match args.get(i as usize) {
                    Some(a) => result.extend(a.iter().cloned()),
                    None => result.push(tk.clone())
                },
                None => result.push(tk.clone())
            }
        }
        for a in args { self.aux.memory.return_token_vec(a) }
        self.mouth.push_vec(result)
    }

    /// Reads the arguments of `m` into `args`. Returns `false` if the call had to be dropped after
    /// an error.
    fn read_arguments(&mut self,t:&ET::Token,m:&Macro<ET::Token>,args:&mut ArrayVec<Vec<ET::Token>,9>) -> TeXResult<bool> {
        let params = &m.signature.params;
        let mut i = 0;
        while i < params.len() && params[i].is_argument_marker().is_none() {
            let next = match self.get_arg_token(t,m.long)? {
                None => return Ok(false),
                Some(n) => n
            };
            if next != params[i] {
                let name = self.display_token(t);
                self.error(ErrorKind::DoesNotMatchDefinition(name))?;
                return Ok(false)
            }
            i += 1;
        }
        while i < params.len() {
            let idx = params[i].is_argument_marker().unwrap_or(0) as usize;
            i += 1;
            let start = i;
            while i < params.len() && params[i].is_argument_marker().is_none() { i += 1 }
            let delim = &params[start..i];
            let arg = match args.get_mut(idx) {
                Some(a) => a,
                None => return Ok(false)
            };
            let ok = if delim.is_empty() {
                self.read_undelimited_argument(t,m.long,arg)?
            } else {
                self.read_delimited_argument(t,m.long,delim,arg)?
            };
            if !ok { return Ok(false) }
        }
        Ok(true)
    }

    /// The next token of a macro argument; `None` (after reporting) if the argument ran away.
    fn get_arg_token(&mut self,t:&ET::Token,long:bool) -> TeXResult<Option<ET::Token>> {
        match self.get_next()? {
            None => {
                let name = self.display_token(t);
                self.error(ErrorKind::RunawayArgument(name))?;
                Ok(None)
            }
            Some(n) if n.is_eof() => {
                let name = self.display_token(t);
                self.error(ErrorKind::RunawayArgument(name))?;
                Ok(None)
            }
            Some(n) if !long && n.is_cs(&self.aux.memory.cs_interner().par()) => {
                let name = self.display_token(t);
                self.error(ErrorKind::ParagraphEnded(name))?;
                self.mouth.requeue(n);
                Ok(None)
            }
            Some(n) => Ok(Some(n))
        }
    }

    fn read_undelimited_argument(&mut self,t:&ET::Token,long:bool,arg:&mut Vec<ET::Token>) -> TeXResult<bool> {
        loop {
            let next = match self.get_arg_token(t,long)? {
                None => return Ok(false),
                Some(n) => n
            };
            if next.is_space() { continue }
            if next.is_begin_group() {
                return self.read_balanced_argument(t,long,arg)
            }
            if next.is_end_group() {
                let name = self.display_token(t);
                self.error(ErrorKind::ExtraEndGroup(format!("}}, or forgotten argument of {}",name)))?;
                self.mouth.requeue(next);
                return Ok(false)
            }
            arg.push(next);
            return Ok(true)
        }
    }

    /// Reads up to and excluding the `}` matching an already consumed `{`.
    fn read_balanced_argument(&mut self,t:&ET::Token,long:bool,arg:&mut Vec<ET::Token>) -> TeXResult<bool> {
        let mut depth = 0usize;
        loop {
            let next = match self.get_arg_token(t,long)? {
                None => return Ok(false),
                Some(n) => n
            };
            if next.is_begin_group() { depth += 1 }
            else if next.is_end_group() {
                if depth == 0 { return Ok(true) }
                depth -= 1;
            }
            arg.push(next);
        }
    }

    fn read_delimited_argument(&mut self,t:&ET::Token,long:bool,delim:&[ET::Token],arg:&mut Vec<ET::Token>) -> TeXResult<bool> {
        let ends_with_brace = delim.last().map(|d| d.is_begin_group()).unwrap_or(false);
        let mut depth = 0usize;
        loop {
            let next = match self.get_arg_token(t,long)? {
                None => return Ok(false),
                Some(n) => n
            };
            if next.is_begin_group() {
                arg.push(next);
                if depth == 0 && ends_with_brace && arg.ends_with(delim) { break }
                depth += 1;
                continue
            }
            if next.is_end_group() {
                if depth == 0 {
                    let name = self.display_token(t);
                    self.error(ErrorKind::ExtraEndGroup(format!("}}, or forgotten argument of {}",name)))?;
                    self.mouth.requeue(next);
                    return Ok(false)
                }
                depth -= 1;
                arg.push(next);
                continue
            }
            arg.push(next);
            if depth == 0 && arg.ends_with(delim) { break }
        }
        arg.truncate(arg.len() - delim.len());
        strip_braces(arg);
        Ok(true)
    }

    fn skip_role(&self,t:&ET::Token) -> Option<SkipRole> {
        let cmd = match t.to_enum() {
            StandardToken::Character(c,CommandCode::Active) => self.state.get_ac_command(c),
            StandardToken::ControlSequence(cs) => self.state.get_command(&cs),
            _ => return None
        };
        match cmd {
            Some(TeXCommand::Primitive{cmd:PrimitiveCommand::Conditional(_),..}) => Some(SkipRole::If),
            Some(TeXCommand::Primitive{name,..}) if *name == PRIMITIVES.ifcase => Some(SkipRole::If),
            Some(TeXCommand::Primitive{name,..}) if *name == PRIMITIVES.else_ => Some(SkipRole::Else),
            Some(TeXCommand::Primitive{name,..}) if *name == PRIMITIVES.or => Some(SkipRole::Or),
            Some(TeXCommand::Primitive{name,..}) if *name == PRIMITIVES.fi => Some(SkipRole::Fi),
            _ => None
        }
    }

    /// Skips tokens without expansion until an `\else`, `\or` (if `stop_at_else` is set) or `\fi`
    /// of the current nesting level. Returns `None` if the input ends first.
    pub fn skip_branch(&mut self,stop_at_else:bool) -> TeXResult<Option<BranchEnd>> {
        let mut depth = 0usize;
        while let Some(t) = self.get_next_raw()? {
            match self.skip_role(&t) {
                Some(SkipRole::If) => depth += 1,
                Some(SkipRole::Fi) if depth == 0 => return Ok(Some(BranchEnd::Fi)),
                Some(SkipRole::Fi) => depth -= 1,
                Some(SkipRole::Else) if depth == 0 && stop_at_else => return Ok(Some(BranchEnd::Else)),
                Some(SkipRole::Or) if depth == 0 && stop_at_else => return Ok(Some(BranchEnd::Or)),
                _ => ()
            }
        }
        Ok(None)
    }

    fn incomplete_conditional(&mut self,name:PrimitiveIdentifier) -> TeXResult<()> {
        self.gullet.conditionals.pop();
        let esc = self.state.get_escape_char();
        self.error(ErrorKind::UnexpectedEOF(format!("{}",name.display(esc))))
    }

    /// Evaluates the conditional `name` via `f` and continues with the appropriate branch.
    pub fn do_conditional(&mut self,name:PrimitiveIdentifier,t:ET::Token,f:fn(&mut EngineReferences<ET>,ET::Token) -> TeXResult<bool>) -> TeXResult<()> {
        let idx = self.gullet.conditionals.len();
        self.gullet.conditionals.push(ActiveConditional::Unfinished(name));
        let b = f(self,t)?;
        log::trace!("conditional {} evaluated to {}",name.name(),b);
        if b {
            if let Some(c) = self.gullet.conditionals.get_mut(idx) { *c = ActiveConditional::True(name) }
            return Ok(())
        }
        loop {
            match self.skip_branch(true)? {
                None => return self.incomplete_conditional(name),
                Some(BranchEnd::Fi) => {
                    self.gullet.conditionals.truncate(idx);
                    return Ok(())
                }
                Some(BranchEnd::Else) => {
                    self.gullet.conditionals.truncate(idx + 1);
                    if let Some(c) = self.gullet.conditionals.get_mut(idx) { *c = ActiveConditional::Else(name) }
                    return Ok(())
                }
                Some(BranchEnd::Or) => {
                    let esc = self.state.get_escape_char();
                    self.error(ErrorKind::ExtraConditional(PRIMITIVES.or.display(esc).to_string()))?
                }
            }
        }
    }

    /// `\ifcase`: selects the `n`-th `\or` branch, or the `\else` branch.
    pub fn do_ifcase(&mut self) -> TeXResult<()> {
        let idx = self.gullet.conditionals.len();
        self.gullet.conditionals.push(ActiveConditional::Unfinished(PRIMITIVES.ifcase));
        let n = self.read_int()?;
        self.gullet.conditionals.truncate(idx + 1);
        log::trace!("ifcase {}",n);
        // a negative number matches no \or, only the \else branch
        let mut remaining = n;
        while remaining != 0 {
            match self.skip_branch(true)? {
                None => return self.incomplete_conditional(PRIMITIVES.ifcase),
                Some(BranchEnd::Fi) => {
                    self.gullet.conditionals.truncate(idx);
                    return Ok(())
                }
                Some(BranchEnd::Else) => {
                    if let Some(c) = self.gullet.conditionals.get_mut(idx) { *c = ActiveConditional::Else(PRIMITIVES.ifcase) }
                    return Ok(())
                }
                Some(BranchEnd::Or) if remaining > 0 => remaining -= 1,
                Some(BranchEnd::Or) => ()
            }
        }
        if let Some(c) = self.gullet.conditionals.get_mut(idx) { *c = ActiveConditional::Case(n) }
        Ok(())
    }

    /// `\else`, `\or` and `\fi` outside of skipped text.
    pub fn do_conditional_end(&mut self,end:BranchEnd,t:ET::Token) -> TeXResult<()> {
        let current = self.gullet.conditionals.last().copied();
        let extra = match (end,current) {
            (_,Some(ActiveConditional::Unfinished(_))) => {
                // the test is still being read; terminate it first
                self.mouth.requeue(t);
                self.mouth.requeue(ET::Token::noexpand_marker());
                return Ok(())
            }
            (BranchEnd::Fi,Some(_)) => {
                self.gullet.conditionals.pop();
                return Ok(())
            }
            (BranchEnd::Else,Some(ActiveConditional::True(_) | ActiveConditional::Case(_))) |
            (BranchEnd::Or,Some(ActiveConditional::Case(_))) => false,
            _ => true
        };
        if extra {
            let name = self.display_token(&t);
            return self.error(ErrorKind::ExtraConditional(name.trim_end().to_string()))
        }
        match self.skip_branch(false)? {
            None => {
                let name = self.gullet.conditionals.last().map(|c| c.name()).unwrap_or(PRIMITIVES.fi);
                self.incomplete_conditional(name)
            }
            Some(_) => {
                self.gullet.conditionals.pop();
                Ok(())
            }
        }
    }
}

/// Removes one pair of braces enclosing all of `arg`, if present.
fn strip_braces<T:Token>(arg:&mut Vec<T>) {
    if arg.len() < 2 || !arg[0].is_begin_group() || !arg[arg.len() - 1].is_end_group() { return }
    let mut depth = 0usize;
    for (i,t) in arg.iter().enumerate() {
        if t.is_begin_group() { depth += 1 }
        else if t.is_end_group() {
            depth -= 1;
            if depth == 0 && i != arg.len() - 1 { return }
        }
    }
    arg.pop();
    arg.remove(0);
}

#[cfg(test)]
mod tests {
    use super::strip_braces;
    use crate::tex::catcodes::CommandCode;
    use crate::tex::tokens::{StandardToken, Token};
    use crate::utils::Ptr;
    type T = StandardToken<u8,Ptr<str>>;

    fn toks(s:&str) -> Vec<T> {
        s.bytes().map(|b| match b {
            b'{' => T::from_char_cat(b,CommandCode::BeginGroup),
            b'}' => T::from_char_cat(b,CommandCode::EndGroup),
            b => T::from_char_cat(b,CommandCode::Letter)
        }).collect()
    }

    #[test]
    fn braces() {
        let mut a = toks("{ab}");
        strip_braces(&mut a);
        assert_eq!(a,toks("ab"));
        let mut b = toks("{a}{b}");
        strip_braces(&mut b);
        assert_eq!(b,toks("{a}{b}"));
        let mut c = toks("{{a}}");
        strip_braces(&mut c);
        assert_eq!(c,toks("{a}"));
    }
}
