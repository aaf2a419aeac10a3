//! Helpers shared by several primitives: parsing macro definitions, assigning meanings to control
//! sequences and active characters, `\the` and register arithmetic.
use std::fmt::Write;
use crate::commands::{Macro, MacroSignature, PrimitiveCommand, ResolvedToken, TeXCommand};
use crate::commands::primitives::{PrimitiveIdentifier, PRIMITIVES};
use crate::engine::{EngineReferences, EngineTypes};
use crate::engine::fontsystem::Font;
use crate::engine::gullet::numeric_methods::InternalValue;
use crate::engine::state::State;
use crate::tex::catcodes::CommandCode;
use crate::tex::characters::Character;
use crate::tex::numerics::{Dim32, MAX_DIM};
use crate::tex::tokens::{StandardToken, Token};
use crate::tex::tokens::token_lists::CharWrite;
use crate::utils::errors::{ErrorKind, TeXResult};

/// Builds a [`Macro`] from the tokens of its parameter text and replacement text.
pub struct MacroParser<T:Token> {
    arity:u8,
    params:Vec<T>,
    inparam:bool,
    ends_with_brace:Option<T>,
    exp:Vec<T>
}
impl<T:Token> Default for MacroParser<T> {
    fn default() -> Self { Self::new() }
}
impl<T:Token> MacroParser<T> {
    pub fn new() -> Self {
        MacroParser { arity:0, params:Vec::new(), inparam:false, ends_with_brace:None, exp:Vec::new() }
    }

    fn digit(t:&T) -> Option<u8> {
        let c = t.char_value()?;
        if t.command_code() != CommandCode::Other { return None }
        let u = c.to_usize();
        if (49..=57).contains(&u) { Some((u - 48) as u8) } else { None }
    }

    /// Processes a token of the parameter text. Returns `Ok(false)` at the `{` that ends it (which is
    /// not part of the parameter text unless preceded by `#`), `Err` if parameters are not numbered
    /// consecutively.
    pub fn do_signature_token(&mut self,t:T) -> Result<bool,()> {
        if t.is_begin_group() {
            if self.inparam {
                self.inparam = false;
                self.params.push(t.clone());
                self.ends_with_brace = Some(t);
            }
            return Ok(false)
        }
        if self.inparam {
            self.inparam = false;
            return match Self::digit(&t) {
                Some(n) if n == self.arity + 1 => {
                    self.params.push(T::argument_marker(self.arity));
                    self.arity += 1;
                    Ok(true)
                }
                _ => Err(())
            }
        }
        if t.is_param() {
            self.inparam = true;
        } else {
            self.params.push(t);
        }
        Ok(true)
    }

    /// Processes a token of the replacement text. `#n` becomes an argument marker, `##` a single
    /// parameter token. An illegal `#n` is kept literally and `Err` returned.
    pub fn do_expansion_token(&mut self,t:T) -> Result<(),()> {
        if self.inparam {
            self.inparam = false;
            if t.is_param() {
                self.exp.push(t);
                return Ok(())
            }
            return match Self::digit(&t) {
                Some(n) if n <= self.arity => {
                    self.exp.push(T::argument_marker(n - 1));
                    Ok(())
                }
                _ => {
                    self.exp.push(t);
                    Err(())
                }
            }
        }
        if t.is_param() {
            self.inparam = true;
        } else {
            self.exp.push(t);
        }
        Ok(())
    }

    /// Finishes the macro. A `#{` at the end of the parameter text is re-inserted at the end of the
    /// replacement text.
    pub fn close(mut self,long:bool,outer:bool,protected:bool) -> Macro<T> {
        if let Some(b) = self.ends_with_brace.take() { self.exp.push(b) }
        Macro {
            protected, long, outer,
            expansion:self.exp.into(),
            signature:MacroSignature{ arity:self.arity, params:self.params.into() }
        }
    }
}

impl<ET:EngineTypes> EngineReferences<'_,ET> {
    /// Sets the meaning of a control sequence or active character token.
    pub fn set_meaning(&mut self,t:&ET::Token,cmd:Option<TeXCommand<ET>>,globally:bool) {
        match t.to_enum() {
            StandardToken::ControlSequence(cs) => self.state.set_command(self.aux,cs,cmd,globally),
            StandardToken::Character(c,_) => self.state.set_ac_command(self.aux,c,cmd,globally)
        }
    }

    /// The current meaning of `t` as a command; characters are represented as
    /// [`TeXCommand::Char`].
    pub fn meaning_of(&self,t:&ET::Token) -> Option<TeXCommand<ET>> {
        match self.resolve(t) {
            ResolvedToken::Tk{char,code} => Some(TeXCommand::Char{char,code}),
            ResolvedToken::Cmd(c) => c
        }
    }

    /// Appends the result of `\the` (invoked via `t`) to `v`.
    pub fn the_tokens(&mut self,t:&ET::Token,v:&mut Vec<ET::Token>) -> TeXResult<()> {
        let (next,r) = match self.get_next_unexpandable()? {
            Some(p) => p,
            None => {
                let name = self.display_token(t);
                return self.error(ErrorKind::UnexpectedEOF(name.trim_end().to_string()))
            }
        };
        let cmd = match r {
            ResolvedToken::Cmd(Some(cmd)) => cmd,
            _ => return self.cant_use_after_the(&next)
        };
        match cmd {
            TeXCommand::ToksRegister(i) => v.extend(self.state.get_toks_register(i).iter().cloned()),
            TeXCommand::Primitive{name,cmd:PrimitiveCommand::PrimitiveToks} =>
                v.extend(self.state.get_primitive_toks(name).iter().cloned()),
            TeXCommand::Primitive{name,..} if name == PRIMITIVES.toks => {
                let i = self.read_register_index()?;
                v.extend(self.state.get_toks_register(i).iter().cloned())
            }
            TeXCommand::Font(f) => v.push(ET::Token::from_cs(f.name().clone())),
            TeXCommand::Primitive{cmd:PrimitiveCommand::FontCmd{read,..},..} => {
                let f = read(self,next)?;
                v.push(ET::Token::from_cs(f.name().clone()))
            }
            cmd => match self.read_internal(&next,&cmd)? {
                Some(val) => {
                    let mut w = CharWrite::new(|t| v.push(t));
                    let _ = match val {
                        InternalValue::Int(i) => write!(w,"{}",i),
                        InternalValue::Dim(d) => write!(w,"{}",d),
                        InternalValue::Skip(s) => write!(w,"{}",s)
                    };
                }
                None => return self.cant_use_after_the(&next)
            }
        }
        Ok(())
    }

    fn cant_use_after_the(&mut self,t:&ET::Token) -> TeXResult<()> {
        let name = self.display_token(t);
        let esc = self.state.get_escape_char();
        self.error(ErrorKind::CantUse(name.trim_end().to_string(),format!("after {}",PRIMITIVES.the.display(esc))))
    }

    /// Reads a register or parameter that can be the target of `\advance`, `\multiply` or `\divide`.
    pub fn read_quantity(&mut self,origin:&ET::Token) -> TeXResult<Option<Quantity>> {
        let (t,r) = match self.get_next_unexpandable()? {
            Some(p) => p,
            None => {
                let name = self.display_token(origin);
                self.error(ErrorKind::UnexpectedEOF(name.trim_end().to_string()))?;
                return Ok(None)
            }
        };
        Ok(Some(match r {
            ResolvedToken::Cmd(Some(TeXCommand::IntRegister(i))) => Quantity::IntRegister(i),
            ResolvedToken::Cmd(Some(TeXCommand::DimRegister(i))) => Quantity::DimRegister(i),
            ResolvedToken::Cmd(Some(TeXCommand::SkipRegister(i))) => Quantity::SkipRegister(i),
            ResolvedToken::Cmd(Some(TeXCommand::Primitive{name,cmd:PrimitiveCommand::PrimitiveInt})) => Quantity::PrimitiveInt(name),
            ResolvedToken::Cmd(Some(TeXCommand::Primitive{name,cmd:PrimitiveCommand::PrimitiveDim})) => Quantity::PrimitiveDim(name),
            ResolvedToken::Cmd(Some(TeXCommand::Primitive{name,cmd:PrimitiveCommand::PrimitiveSkip})) => Quantity::PrimitiveSkip(name),
            ResolvedToken::Cmd(Some(TeXCommand::Primitive{name,..})) if name == PRIMITIVES.count => Quantity::IntRegister(self.read_register_index()?),
            ResolvedToken::Cmd(Some(TeXCommand::Primitive{name,..})) if name == PRIMITIVES.dimen => Quantity::DimRegister(self.read_register_index()?),
            ResolvedToken::Cmd(Some(TeXCommand::Primitive{name,..})) if name == PRIMITIVES.skip => Quantity::SkipRegister(self.read_register_index()?),
            _ => {
                let name = self.display_token(&t);
                let oname = self.display_token(origin);
                self.error(ErrorKind::CantUse(name.trim_end().to_string(),format!("after {}",oname.trim_end())))?;
                return Ok(None)
            }
        }))
    }

    /// `\advance`, `\multiply` and `\divide`.
    pub fn do_arithmetic(&mut self,t:&ET::Token,op:Arithmetic,globally:bool) -> TeXResult<()> {
        let q = match self.read_quantity(t)? {
            Some(q) => q,
            None => return Ok(())
        };
        self.read_keyword("by")?;
        let old = q.get(self);
        let new = match (op,old) {
            (Arithmetic::Advance,InternalValue::Int(o)) => {
                let n = self.read_int()?;
                o.checked_add(n).map(InternalValue::Int)
            }
            (Arithmetic::Advance,InternalValue::Dim(o)) => {
                let n = self.read_dim()?;
                let r = o.0 as i64 + n.0 as i64;
                if r.abs() > MAX_DIM as i64 { None } else { Some(InternalValue::Dim(Dim32(r as i32))) }
            }
            (Arithmetic::Advance,InternalValue::Skip(o)) => {
                let n = self.read_skip()?;
                o.checked_add(n).map(InternalValue::Skip)
            }
            (Arithmetic::Multiply,o) => {
                let n = self.read_int()?;
                match o {
                    InternalValue::Int(o) => o.checked_mul(n).map(InternalValue::Int),
                    InternalValue::Dim(o) => o.scale(n,1).filter(|d| d.0.abs() <= MAX_DIM).map(InternalValue::Dim),
                    InternalValue::Skip(o) => o.scale(n,1).map(InternalValue::Skip)
                }
            }
            (Arithmetic::Divide,o) => {
                let n = self.read_int()?;
                match o {
                    InternalValue::Int(o) => o.checked_div(n).map(InternalValue::Int),
                    InternalValue::Dim(o) => o.scale(1,n).map(InternalValue::Dim),
                    InternalValue::Skip(o) => o.scale(1,n).map(InternalValue::Skip)
                }
            }
        };
        match new {
            Some(v) => q.set(self,v,globally),
            None => self.error(ErrorKind::ArithmeticOverflow)?
        }
        Ok(())
    }
}

/// `\advance`, `\multiply` or `\divide`.
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum Arithmetic { Advance, Multiply, Divide }

/// A numeric register or parameter.
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum Quantity {
    IntRegister(usize),
    DimRegister(usize),
    SkipRegister(usize),
    PrimitiveInt(PrimitiveIdentifier),
    PrimitiveDim(PrimitiveIdentifier),
    PrimitiveSkip(PrimitiveIdentifier)
}
impl Quantity {
    pub fn get<ET:EngineTypes>(&self,engine:&EngineReferences<ET>) -> InternalValue {
        let state = &*engine.state;
        match self {
            Quantity::IntRegister(i) => InternalValue::Int(state.get_int_register(*i)),
            Quantity::DimRegister(i) => InternalValue::Dim(state.get_dim_register(*i)),
            Quantity::SkipRegister(i) => InternalValue::Skip(state.get_skip_register(*i)),
            Quantity::PrimitiveInt(n) => InternalValue::Int(state.get_primitive_int(*n)),
            Quantity::PrimitiveDim(n) => InternalValue::Dim(state.get_primitive_dim(*n)),
            Quantity::PrimitiveSkip(n) => InternalValue::Skip(state.get_primitive_skip(*n))
        }
    }
    /// Assigns `v`, which has the type returned by [`get`](Self::get).
    pub fn set<ET:EngineTypes>(&self,engine:&mut EngineReferences<ET>,v:InternalValue,globally:bool) {
        let aux = &*engine.aux;
        match (self,v) {
            (Quantity::IntRegister(i),InternalValue::Int(v)) => engine.state.set_int_register(aux,*i,v,globally),
            (Quantity::DimRegister(i),InternalValue::Dim(v)) => engine.state.set_dim_register(aux,*i,v,globally),
            (Quantity::SkipRegister(i),InternalValue::Skip(v)) => engine.state.set_skip_register(aux,*i,v,globally),
            (Quantity::PrimitiveInt(n),InternalValue::Int(v)) => engine.state.set_primitive_int(aux,*n,v,globally),
            (Quantity::PrimitiveDim(n),InternalValue::Dim(v)) => engine.state.set_primitive_dim(aux,*n,v,globally),
            (Quantity::PrimitiveSkip(n),InternalValue::Skip(v)) => engine.state.set_primitive_skip(aux,*n,v,globally),
            _ => ()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MacroParser;
    use crate::tex::catcodes::CommandCode;
    use crate::tex::tokens::{StandardToken, Token};
    use crate::utils::Ptr;
    type T = StandardToken<u8,Ptr<str>>;

    fn tk(c:u8,code:CommandCode) -> T { T::from_char_cat(c,code) }

    #[test]
    fn parser() {
        let mut p = MacroParser::<T>::new();
        assert_eq!(p.do_signature_token(tk(b'#',CommandCode::Parameter)),Ok(true));
        assert_eq!(p.do_signature_token(tk(b'1',CommandCode::Other)),Ok(true));
        assert_eq!(p.do_signature_token(tk(b'.',CommandCode::Other)),Ok(true));
        assert_eq!(p.do_signature_token(tk(b'{',CommandCode::BeginGroup)),Ok(false));
        assert!(p.do_expansion_token(tk(b'#',CommandCode::Parameter)).is_ok());
        assert!(p.do_expansion_token(tk(b'2',CommandCode::Other)).is_err());
        let m = p.close(false,false,false);
        assert_eq!(m.signature.arity,1);
        assert_eq!(m.signature.params.len(),2);
        assert_eq!(m.expansion.len(),1);
    }
}
