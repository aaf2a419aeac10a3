/*! What a control sequence or active character can be bound to: a [`TeXCommand`]. Primitives are
    plain data ([`PrimitiveCommand`] variants holding `fn` pointers), user definitions are [`Macro`]s.
*/

use std::fmt::{Display, Formatter};
use either::Either;
use crate::commands::methods::MacroParser;
use crate::commands::primitives::{PrimitiveIdentifier, PRIMITIVES};
use crate::engine::{EngineReferences, EngineTypes};
use crate::engine::fontsystem::Font;
use crate::engine::mouth::strings::InputTokenizer;
use crate::tex::catcodes::{CategoryCodeScheme, CommandCode};
use crate::tex::characters::{Character, StringLineSource};
use crate::tex::nodes::{BoxType, TeXBox};
use crate::tex::numerics::{Dim32, Skip};
use crate::tex::tokens::{CSHandlerOf, Token};
use crate::tex::tokens::control_sequences::CSName;
use crate::tex::tokens::token_lists::TokenList;
use crate::utils::errors::TeXResult;

pub mod primitives;
pub mod methods;
pub mod tex;

/// The result of looking a [`Token`] up in the current state.
#[derive(Clone,Debug)]
pub enum ResolvedToken<ET:EngineTypes> {
    /// A non-active character.
    Tk{char:ET::Char,code:CommandCode},
    /// A control sequence or active character and its current binding; `None` if undefined.
    Cmd(Option<TeXCommand<ET>>),
}

/// An entry of the conditional stack, i.e. an `\if...` whose `\fi` has not been seen yet.
#[derive(Copy,Clone,Eq,PartialEq,Debug)]
pub enum ActiveConditional {
    /// The test is still being evaluated.
    Unfinished(PrimitiveIdentifier),
    /// `\ifcase`, in the branch selected by the number.
    Case(i32),
    /// In the true branch.
    True(PrimitiveIdentifier),
    /// In the `\else` branch.
    Else(PrimitiveIdentifier),
}
impl ActiveConditional {
    /// Which primitive opened the conditional.
    pub fn name(&self) -> PrimitiveIdentifier {
        match self {
            ActiveConditional::Unfinished(n) => *n,
            ActiveConditional::Case(_) => PRIMITIVES.ifcase,
            ActiveConditional::True(n) => *n,
            ActiveConditional::Else(n) => *n,
        }
    }
}

/// The binding of a control sequence or active character.
#[derive(Clone,Debug)]
pub enum TeXCommand<ET:EngineTypes> {
    Macro(Macro<ET::Token>),
    /// `\let` to a non-active character token.
    Char{char:ET::Char,code:CommandCode},
    /// `\chardef`
    CharDef(ET::Char),
    /// `\font` (or `\let` to a font identifier).
    Font(ET::Font),
    /// `\countdef`
    IntRegister(usize),
    /// `\dimendef`
    DimRegister(usize),
    /// `\skipdef`
    SkipRegister(usize),
    /// `\toksdef`
    ToksRegister(usize),
    /// A primitive, possibly under another name after `\let`.
    Primitive{name:PrimitiveIdentifier,cmd:PrimitiveCommand<ET>},
}
impl<ET:EngineTypes> TeXCommand<ET> {
    /// `\relax`
    pub fn relax() -> Self {
        TeXCommand::Primitive{name:PRIMITIVES.relax,cmd:PrimitiveCommand::Relax}
    }
    /// Whether the command is expanded in the gullet. Protected macros are expanded only if
    /// `protected` is true, i.e. not while building expanded token lists (`\edef`, `\message`, ...).
    pub fn is_expandable(&self,protected:bool) -> bool {
        match self {
            TeXCommand::Macro(m) => protected || !m.protected,
            TeXCommand::Primitive{cmd:PrimitiveCommand::Conditional(_)|PrimitiveCommand::Expandable(_)|PrimitiveCommand::SimpleExpandable(_),..} => true,
            _ => false
        }
    }
    /// `\meaning`, as a [`Display`]able.
    pub fn meaning<'a>(&'a self, int:&'a CSHandlerOf<ET::Token>, cc:&'a CategoryCodeScheme<ET::Char>, escapechar:Option<ET::Char>) -> Meaning<'a,ET> {
        Meaning{cmd:self,int,cc,escapechar}
    }
    /// Whether two commands have the same meaning in the sense of `\ifx`.
    pub fn same_meaning(&self,other:&Self) -> bool {
        use TeXCommand::*;
        match (self,other) {
            (Macro(a),Macro(b)) => a.long == b.long && a.outer == b.outer && a.protected == b.protected &&
                a.signature.params == b.signature.params && a.expansion == b.expansion,
            (Char{char:c1,code:k1},Char{char:c2,code:k2}) => c1 == c2 && k1 == k2,
            (CharDef(a),CharDef(b)) => a == b,
            (Font(a),Font(b)) => a.filename() == b.filename() && a.at_size() == b.at_size(),
            (IntRegister(a),IntRegister(b)) | (DimRegister(a),DimRegister(b)) |
            (SkipRegister(a),SkipRegister(b)) | (ToksRegister(a),ToksRegister(b)) => a == b,
            (Primitive{name:a,..},Primitive{name:b,..}) => a == b,
            _ => false
        }
    }
}

/// The behaviour of a primitive. Every function receives the engine and the token that invoked it.
#[derive(Copy,Clone,Debug)]
pub enum PrimitiveCommand<ET:EngineTypes> {
    /// Evaluates the test of an `\if...`.
    Conditional(fn(&mut EngineReferences<ET>,ET::Token) -> TeXResult<bool>),
    /// Appends its expansion to the given vector, which is then pushed back to the input (`\number`).
    Expandable(fn(&mut EngineReferences<ET>,&mut Vec<ET::Token>,ET::Token) -> TeXResult<()>),
    /// Expands by manipulating the input directly (`\csname`, `\input`, `\fi`).
    SimpleExpandable(fn(&mut EngineReferences<ET>,ET::Token) -> TeXResult<()>),
    /// Executed by the stomach (`\message`, `\par`, `\begingroup`).
    Unexpandable(fn(&mut EngineReferences<ET>,ET::Token) -> TeXResult<()>),
    /// Like [`Unexpandable`](PrimitiveCommand::Unexpandable), but accepts prefixes and triggers
    /// `\afterassignment`. The flag requests a global assignment.
    Assignment(fn(&mut EngineReferences<ET>,ET::Token,bool) -> TeXResult<()>),
    /// An internal integer (`\count`); `read` is used where a number is expected, `assign` in the
    /// stomach.
    Int {
        read:fn(&mut EngineReferences<ET>,ET::Token) -> TeXResult<i32>,
        assign:Option<fn(&mut EngineReferences<ET>,ET::Token,bool) -> TeXResult<()>>
    },
    /// An internal dimension (`\dimen`, `\wd`).
    Dim {
        read:fn(&mut EngineReferences<ET>,ET::Token) -> TeXResult<Dim32>,
        assign:Option<fn(&mut EngineReferences<ET>,ET::Token,bool) -> TeXResult<()>>
    },
    /// Internal glue (`\skip`).
    Skip {
        read:fn(&mut EngineReferences<ET>,ET::Token) -> TeXResult<Skip>,
        assign:Option<fn(&mut EngineReferences<ET>,ET::Token,bool) -> TeXResult<()>>
    },
    /// An internal font (`\font`, `\nullfont`).
    FontCmd {
        read:fn(&mut EngineReferences<ET>,ET::Token) -> TeXResult<ET::Font>,
        assign:Option<fn(&mut EngineReferences<ET>,ET::Token,bool) -> TeXResult<()>>
    },
    /// Produces a box: either a finished one taken from a register (`\box`, `\copy`) or the
    /// specification of one to be opened (`\hbox to 5pt{`).
    Box(fn(&mut EngineReferences<ET>,ET::Token) -> TeXResult<Either<Option<TeXBox<ET>>,BoxSpec>>),
    /// Integer parameters (`\tracingmacros`), stored in the state under the primitive's identifier.
    PrimitiveInt,
    PrimitiveDim,
    PrimitiveSkip,
    /// Token list parameters (`\everypar`).
    PrimitiveToks,
    Relax,
}

/// A box about to be opened, e.g. by `\hbox to 10pt{`.
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub struct BoxSpec {
    pub btype:BoxType,
    /// The width (`\hbox`) or height (`\vbox`) given by `to`.
    pub to:Option<Dim32>
}

/// See [`TeXCommand::meaning`].
pub struct Meaning<'a,ET:EngineTypes>{
    cmd:&'a TeXCommand<ET>,
    int:&'a CSHandlerOf<ET::Token>,
    cc:&'a CategoryCodeScheme<ET::Char>,
    escapechar:Option<ET::Char>
}
impl<'a,ET:EngineTypes> Display for Meaning<'a,ET> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let esc = ET::Char::displayable_opt(self.escapechar);
        match self.cmd {
            TeXCommand::Macro(m) => m.meaning(self.int,self.cc,self.escapechar).fmt(f),
            TeXCommand::Char{char,code} => code_meaning(*char,*code,f),
            TeXCommand::CharDef(c) => write!(f,"{}char\"{:X}",esc,Into::<u64>::into(*c)),
            TeXCommand::Font(fnt) => {
                write!(f,"select font {}",fnt.filename())?;
                if fnt.at_size() != fnt.design_size() { write!(f," at {}",fnt.at_size())?; }
                Ok(())
            }
            TeXCommand::IntRegister(i) => write!(f,"{}count{}",esc,i),
            TeXCommand::DimRegister(i) => write!(f,"{}dimen{}",esc,i),
            TeXCommand::SkipRegister(i) => write!(f,"{}skip{}",esc,i),
            TeXCommand::ToksRegister(i) => write!(f,"{}toks{}",esc,i),
            TeXCommand::Primitive{name,..} => write!(f,"{}",name.display(self.escapechar)),
        }
    }
}

/// The meaning of a character token, e.g. `the letter a` or `begin-group character {`.
pub fn code_meaning<C:Character>(char:C,code:CommandCode,f:&mut Formatter<'_>) -> std::fmt::Result {
    match code.category() {
        Some(cc) => {
            write!(f,"{} ",cc.meaning_name())?;
            char.display_fmt(f);
            Ok(())
        }
        None => f.write_str("\\relax")
    }
}

/// The parameter text of a macro, e.g. `#1.#2`.
#[derive(Clone,Debug)]
pub struct MacroSignature<T:Token> {
    pub arity:u8,
    /// Delimiter tokens interleaved with argument markers. A trailing `#{` is stored as `{`.
    pub params:TokenList<T>
}

/// A user definition (`\def` and friends).
#[derive(Clone,Debug)]
pub struct Macro<T:Token> {
    /// Not expanded inside `\edef`, `\message` and the like.
    pub protected:bool,
    /// Arguments may contain `\par`.
    pub long:bool,
    pub outer:bool,
    /// The replacement text; argument references are stored as argument markers.
    pub expansion:TokenList<T>,
    pub signature:MacroSignature<T>
}
impl<T:Token> Macro<T> {
    /// Tokenizes parameter text and replacement text under `cc` and parses them as `\def` would.
    /// Fails on malformed parameter text.
    pub fn new<Sig:AsRef<str>,Exp:AsRef<str>>(int:&mut CSHandlerOf<T>,cc:&CategoryCodeScheme<T::Char>,sig:Sig,exp:Exp) -> Result<Self,()> {
        let mut parser = MacroParser::new();
        let sig = sig.as_ref();
        if !sig.is_empty() {
            let sigsrc: StringLineSource<T::Char> = sig.into();
            let mut sigsrc = InputTokenizer::new(sigsrc);
            while let Some(t) = sigsrc.get_next::<T>(int,cc,None).map_err(|_|())? {
                if !parser.do_signature_token(t)? { break }
            }
        }
        let exp = exp.as_ref();
        let expsrc: StringLineSource<T::Char> = exp.into();
        let mut expsrc = InputTokenizer::new(expsrc);
        while let Some(t) = expsrc.get_next::<T>(int,cc,None).map_err(|_|())? {
            parser.do_expansion_token(t)?
        }
        Ok(parser.close(false,false,false))
    }

    /// `macro:#1->...`, preceded by prefixes.
    pub fn meaning<'a>(&'a self, int:&'a CSHandlerOf<T>, cc:&'a CategoryCodeScheme<T::Char>, escapechar:Option<T::Char>) -> MacroMeaning<'a,T> {
        MacroMeaning{cmd:self,int,cc,escapechar}
    }
}

/// See [`Macro::meaning`].
pub struct MacroMeaning<'a,T:Token>{
    cmd:&'a Macro<T>,
    int:&'a CSHandlerOf<T>,
    cc:&'a CategoryCodeScheme<T::Char>,
    escapechar:Option<T::Char>
}
impl<'a,T:Token> Display for MacroMeaning<'a,T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let esc = T::Char::displayable_opt(self.escapechar);
        if self.cmd.protected { write!(f,"{}protected ",esc)?; }
        if self.cmd.long { write!(f,"{}long ",esc)?; }
        if self.cmd.outer { write!(f,"{}outer ",esc)?; }
        write!(f,"macro:{}->{}",
               self.cmd.signature.params.display(self.int,self.cc,self.escapechar,false),
               self.cmd.expansion.display(self.int,self.cc,self.escapechar,true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tex::catcodes::DEFAULT_SCHEME_U8;
    use crate::tex::tokens::StandardToken;
    use crate::utils::Ptr;
    type T = StandardToken<u8,Ptr<str>>;

    #[test]
    fn macro_meaning() {
        let cc = &*DEFAULT_SCHEME_U8;
        let m = Macro::<T>::new(&mut (),cc,"#1.#2","(#1,#2)##").unwrap();
        assert_eq!(m.signature.arity,2);
        assert_eq!(m.meaning(&(),cc,Some(b'\\')).to_string(),"macro:#1.#2->(#1,#2)##");
        assert!(Macro::<T>::new(&mut (),cc,"#2","").is_err());
        assert!(Macro::<T>::new(&mut (),cc,"#1","#2").is_err());
        let b = Macro::<T>::new(&mut (),cc,"#1#{","[#1]").unwrap();
        assert_eq!(b.meaning(&(),cc,Some(b'\\')).to_string(),"macro:#1{->[#1]{");
    }
}
