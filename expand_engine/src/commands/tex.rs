//! The primitive commands of TeX implemented by this engine; see [`register_tex_primitives`].
use std::fmt::Write;
use chrono::{Datelike, Timelike};
use either::Either;
use crate::commands::{BoxSpec, PrimitiveCommand, ResolvedToken, TeXCommand};
use crate::commands::methods::{Arithmetic, MacroParser};
use crate::commands::primitives::*;
use crate::engine::{EngineReferences, EngineTypes, TeXEngine};
use crate::engine::config::InteractionMode;
use crate::engine::filesystem::FileSystem;
use crate::engine::fontsystem::{Font, FontSystem};
use crate::engine::gullet::BranchEnd;
use crate::engine::state::{GroupType, State};
use crate::engine::stomach::{BoxTarget, Prefixes};
use crate::engine::utils::outputs::Outputs;
use crate::tex::catcodes::{CategoryCode, CommandCode};
use crate::tex::characters::{Character, CharacterMap};
use crate::tex::nodes::{BoxType, Node, TeXBox};
use crate::tex::numerics::{Dim32, Skip};
use crate::tex::tokens::{StandardToken, Token};
use crate::tex::tokens::control_sequences::CSHandler;
use crate::tex::tokens::token_lists::CharWrite;
use crate::utils::errors::{ErrorKind, TeXResult};

fn eof_error<ET:EngineTypes>(engine:&mut EngineReferences<ET>,t:&ET::Token) -> TeXResult<()> {
    let name = engine.display_token(t);
    engine.error(ErrorKind::UnexpectedEOF(name.trim_end().to_string()))
}

/// The next token without expansion; reports the end of the input as occurring while scanning `t`.
fn next_or_eof<ET:EngineTypes>(engine:&mut EngineReferences<ET>,t:&ET::Token) -> TeXResult<Option<ET::Token>> {
    match engine.get_next()? {
        Some(n) if !n.is_eof() => Ok(Some(n)),
        _ => {
            eof_error(engine,t)?;
            Ok(None)
        }
    }
}

// grouping ------------------------------------------------------------------------------------

pub fn begingroup<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    let line = engine.mouth.line_number();
    engine.state.push(engine.aux,GroupType::ControlSequence,line);
    Ok(())
}

pub fn endgroup<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    match engine.state.get_group_type() {
        GroupType::ControlSequence => engine.state.pop(engine.aux,engine.mouth),
        _ => {
            let name = engine.display_token(&tk);
            engine.error(ErrorKind::ExtraEndGroup(name.trim_end().to_string()))
        }
    }
}

pub fn aftergroup<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    if let Some(t) = next_or_eof(engine,&tk)? { engine.state.aftergroup(t) }
    Ok(())
}

pub fn afterassignment<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    if let Some(t) = next_or_eof(engine,&tk)? { engine.stomach.afterassignment = Some(t) }
    Ok(())
}

pub fn global<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    engine.stomach.prefixes.global = true;
    Ok(())
}
pub fn long<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    engine.stomach.prefixes.long = true;
    Ok(())
}
pub fn protected<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    engine.stomach.prefixes.protected = true;
    Ok(())
}
pub fn outer<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    engine.stomach.prefixes.outer = true;
    Ok(())
}

// definitions ---------------------------------------------------------------------------------

/// `\def` and friends: reads the control sequence, the parameter text and the replacement text
/// (expanded if `expand` is set).
fn do_def<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token,globally:bool,expand:bool) -> TeXResult<()> {
    let Prefixes{long,outer,protected,..} = engine.stomach.prefixes;
    engine.stomach.prefixes = Prefixes::default();
    let cs = match engine.read_control_sequence()? {
        Some(cs) => cs,
        None => return Ok(())
    };
    let mut parser = MacroParser::new();
    loop {
        let t = match next_or_eof(engine,&tk)? {
            Some(t) => t,
            None => return Ok(())
        };
        match parser.do_signature_token(t) {
            Ok(true) => (),
            Ok(false) => break,
            Err(()) => {
                let name = engine.display_token(&cs);
                engine.error(ErrorKind::IllegalParameterNumber(name.trim_end().to_string()))?
            }
        }
    }
    let mut body = engine.aux.memory.get_token_vec();
    if expand {
        engine.expand_until_endgroup(&tk,&mut body,true)?
    } else {
        engine.read_until_endgroup(&tk,&mut body)?
    }
    for t in body.drain(..) {
        if parser.do_expansion_token(t).is_err() {
            let name = engine.display_token(&cs);
            engine.error(ErrorKind::IllegalParameterNumber(name.trim_end().to_string()))?
        }
    }
    engine.aux.memory.return_token_vec(body);
    let m = parser.close(long,outer,protected);
    log::trace!("defining {}",engine.display_token(&cs).trim_end());
    engine.set_meaning(&cs,Some(TeXCommand::Macro(m)),globally);
    Ok(())
}

pub fn def<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token,globally:bool) -> TeXResult<()> {
    do_def(engine,tk,globally,false)
}
pub fn gdef<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token,_globally:bool) -> TeXResult<()> {
    do_def(engine,tk,true,false)
}
pub fn edef<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token,globally:bool) -> TeXResult<()> {
    do_def(engine,tk,globally,true)
}
pub fn xdef<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token,_globally:bool) -> TeXResult<()> {
    do_def(engine,tk,true,true)
}

pub fn let_<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token,globally:bool) -> TeXResult<()> {
    let cs = match engine.read_control_sequence()? {
        Some(cs) => cs,
        None => return Ok(())
    };
    let mut next = next_or_eof(engine,&tk)?;
    while matches!(&next,Some(t) if t.is_space()) { next = next_or_eof(engine,&tk)? }
    if let Some(t) = &next {
        if t.command_code() == CommandCode::Other && t.char_value().map(|c| c.to_usize()) == Some(b'=' as usize) {
            next = next_or_eof(engine,&tk)?;
            if matches!(&next,Some(t) if t.is_space()) { next = next_or_eof(engine,&tk)? }
        }
    }
    if let Some(t) = next {
        let cmd = engine.meaning_of(&t);
        engine.set_meaning(&cs,cmd,globally);
    }
    Ok(())
}

pub fn futurelet<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token,globally:bool) -> TeXResult<()> {
    let cs = match engine.read_control_sequence()? {
        Some(cs) => cs,
        None => return Ok(())
    };
    let first = match next_or_eof(engine,&tk)? {
        Some(t) => t,
        None => return Ok(())
    };
    let second = match next_or_eof(engine,&tk)? {
        Some(t) => t,
        None => {
            engine.mouth.requeue(first);
            return Ok(())
        }
    };
    let cmd = engine.meaning_of(&second);
    engine.set_meaning(&cs,cmd,globally);
    engine.mouth.requeue(second);
    engine.mouth.requeue(first);
    Ok(())
}

/// `\chardef`, `\countdef` etc.: the control sequence is `\relax` while the number is read.
fn shorthand_def<ET:EngineTypes>(engine:&mut EngineReferences<ET>,globally:bool,f:fn(&mut EngineReferences<ET>) -> TeXResult<TeXCommand<ET>>) -> TeXResult<()> {
    let cs = match engine.read_control_sequence()? {
        Some(cs) => cs,
        None => return Ok(())
    };
    engine.set_meaning(&cs,Some(TeXCommand::relax()),globally);
    engine.skip_eq()?;
    let cmd = f(engine)?;
    engine.set_meaning(&cs,Some(cmd),globally);
    Ok(())
}

pub fn chardef<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    shorthand_def(engine,globally,|e| Ok(TeXCommand::CharDef(e.read_char_code()?)))
}
pub fn countdef<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    shorthand_def(engine,globally,|e| Ok(TeXCommand::IntRegister(e.read_register_index()?)))
}
pub fn dimendef<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    shorthand_def(engine,globally,|e| Ok(TeXCommand::DimRegister(e.read_register_index()?)))
}
pub fn skipdef<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    shorthand_def(engine,globally,|e| Ok(TeXCommand::SkipRegister(e.read_register_index()?)))
}
pub fn toksdef<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    shorthand_def(engine,globally,|e| Ok(TeXCommand::ToksRegister(e.read_register_index()?)))
}

// expansion -----------------------------------------------------------------------------------

pub fn expandafter<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    let first = match next_or_eof(engine,&tk)? {
        Some(t) => t,
        None => return Ok(())
    };
    let second = match next_or_eof(engine,&tk)? {
        Some(t) => t,
        None => {
            engine.mouth.requeue(first);
            return Ok(())
        }
    };
    match engine.resolve(&second) {
        ResolvedToken::Cmd(Some(cmd)) if cmd.is_expandable(true) => engine.expand(second,cmd)?,
        ResolvedToken::Cmd(None) => {
            let name = engine.display_token(&second);
            engine.error(ErrorKind::Undefined(name.trim_end().to_string()))?
        }
        _ => engine.mouth.requeue(second)
    }
    engine.mouth.requeue(first);
    Ok(())
}

pub fn noexpand<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    if let Some(t) = next_or_eof(engine,&tk)? {
        engine.mouth.requeue(t);
        engine.mouth.requeue(ET::Token::noexpand_marker());
    }
    Ok(())
}

pub fn csname<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    let name = engine.read_csname()?;
    if engine.state.get_command(&name).is_none() {
        engine.state.set_command(engine.aux,name.clone(),Some(TeXCommand::relax()),false);
    }
    engine.mouth.requeue(ET::Token::from_cs(name));
    Ok(())
}

pub fn endcsname<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    let name = engine.display_token(&tk);
    engine.error(ErrorKind::ExtraEndGroup(name.trim_end().to_string()))
}

pub fn string<ET:EngineTypes>(engine:&mut EngineReferences<ET>,exp:&mut Vec<ET::Token>,tk:ET::Token) -> TeXResult<()> {
    let t = match next_or_eof(engine,&tk)? {
        Some(t) => t,
        None => return Ok(())
    };
    let mut w = CharWrite::new(|t| exp.push(t));
    match t.to_enum() {
        StandardToken::ControlSequence(cs) => {
            if let Some(c) = engine.state.get_escape_char() { w.push_char(c) }
            let _ = w.write_str(engine.aux.memory.cs_interner().resolve(&cs));
        }
        StandardToken::Character(c,_) => w.push_char(c)
    }
    Ok(())
}

pub fn number<ET:EngineTypes>(engine:&mut EngineReferences<ET>,exp:&mut Vec<ET::Token>,_tk:ET::Token) -> TeXResult<()> {
    let i = engine.read_int()?;
    let _ = write!(CharWrite::new(|t| exp.push(t)),"{}",i);
    Ok(())
}

const ROMAN: &[(u8, i32)] = &[(b'm', 0),(b'd', 2),(b'c', 5),(b'l', 2),(b'x', 5),(b'v', 2),(b'i', 5)];

/// The lowercase roman numeral for `n`; empty for `n <= 0`.
pub fn roman_numeral(mut n:i32) -> String {
    let mut ret = String::new();
    if n <= 0 { return ret }
    let mut v = 1000;
    let mut j = 0;
    loop {
        while n >= v {
            ret.push(ROMAN[j].0 as char);
            n -= v;
        }
        if n <= 0 { return ret }
        let mut k = j + 1;
        let mut u = v / ROMAN[k].1;
        if ROMAN[k].1 == 2 {
            k += 1;
            u /= ROMAN[k].1;
        }
        if n + u >= v {
            ret.push(ROMAN[k].0 as char);
            n += u;
        } else {
            j += 1;
            v /= ROMAN[j].1;
        }
    }
}

pub fn romannumeral<ET:EngineTypes>(engine:&mut EngineReferences<ET>,exp:&mut Vec<ET::Token>,_tk:ET::Token) -> TeXResult<()> {
    let n = engine.read_int()?;
    let _ = CharWrite::new(|t| exp.push(t)).write_str(&roman_numeral(n));
    Ok(())
}

pub fn the<ET:EngineTypes>(engine:&mut EngineReferences<ET>,exp:&mut Vec<ET::Token>,tk:ET::Token) -> TeXResult<()> {
    engine.the_tokens(&tk,exp)
}

pub fn meaning<ET:EngineTypes>(engine:&mut EngineReferences<ET>,exp:&mut Vec<ET::Token>,tk:ET::Token) -> TeXResult<()> {
    let t = match next_or_eof(engine,&tk)? {
        Some(t) => t,
        None => return Ok(())
    };
    let s = meaning_string(engine,&t);
    let _ = CharWrite::new(|t| exp.push(t)).write_str(&s);
    Ok(())
}

/// The meaning of `t` as printed by `\meaning`.
fn meaning_string<ET:EngineTypes>(engine:&EngineReferences<ET>,t:&ET::Token) -> String {
    let esc = engine.state.get_escape_char();
    match engine.meaning_of(t) {
        None => format!("{}undefined",ET::Char::displayable_opt(esc)),
        Some(cmd) => cmd.meaning(engine.aux.memory.cs_interner(),engine.state.get_catcode_scheme(),esc).to_string()
    }
}

pub fn jobname<ET:EngineTypes>(engine:&mut EngineReferences<ET>,exp:&mut Vec<ET::Token>,_tk:ET::Token) -> TeXResult<()> {
    let _ = CharWrite::new(|t| exp.push(t)).write_str(&engine.aux.jobname);
    Ok(())
}

/// Reads a font identifier (`\nullfont`, a control sequence defined by `\font`, or `\font` itself for
/// the current font). Reports an error and returns the null font otherwise.
fn read_font<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:&ET::Token) -> TeXResult<ET::Font> {
    match engine.get_next_unexpandable()? {
        Some((_,ResolvedToken::Cmd(Some(TeXCommand::Font(f))))) => Ok(f),
        Some((t,ResolvedToken::Cmd(Some(TeXCommand::Primitive{cmd:PrimitiveCommand::FontCmd{read,..},..})))) => read(engine,t),
        Some((t,_)) => {
            engine.error(ErrorKind::Missing("font identifier".to_string()))?;
            engine.mouth.requeue(t);
            Ok(engine.fontsystem.null())
        }
        None => {
            eof_error(engine,tk)?;
            Ok(engine.fontsystem.null())
        }
    }
}

pub fn fontname<ET:EngineTypes>(engine:&mut EngineReferences<ET>,exp:&mut Vec<ET::Token>,tk:ET::Token) -> TeXResult<()> {
    let font = read_font(engine,&tk)?;
    let mut w = CharWrite::new(|t| exp.push(t));
    let _ = if font.at_size() != font.design_size() {
        write!(w,"{} at {}",font.filename(),font.at_size())
    } else {
        write!(w,"{}",font.filename())
    };
    Ok(())
}

fn change_case<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token,upper:bool) -> TeXResult<()> {
    let mut v = engine.read_general_text(&tk,false)?;
    for t in v.iter_mut() {
        if let StandardToken::Character(c,cc) = t.to_enum() {
            let n = if upper { engine.state.get_uccode(c) } else { engine.state.get_lccode(c) };
            if n.to_usize() != 0 { *t = ET::Token::from_char_cat(n,cc) }
        }
    }
    engine.mouth.push_vec(v)
}

pub fn uppercase<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    change_case(engine,tk,true)
}
pub fn lowercase<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    change_case(engine,tk,false)
}

// conditionals --------------------------------------------------------------------------------

pub fn iftrue<ET:EngineTypes>(_engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<bool> { Ok(true) }
pub fn iffalse<ET:EngineTypes>(_engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<bool> { Ok(false) }

/// Reads one of `<`, `=`, `>` (after spaces); reports an error and assumes `=` otherwise.
fn read_relation<ET:EngineTypes>(engine:&mut EngineReferences<ET>) -> TeXResult<std::cmp::Ordering> {
    use std::cmp::Ordering;
    engine.skip_spaces()?;
    match engine.get_next_unexpandable()? {
        Some((_,ResolvedToken::Tk{char,code:CommandCode::Other})) if char.to_usize() == b'<' as usize => Ok(Ordering::Less),
        Some((_,ResolvedToken::Tk{char,code:CommandCode::Other})) if char.to_usize() == b'=' as usize => Ok(Ordering::Equal),
        Some((_,ResolvedToken::Tk{char,code:CommandCode::Other})) if char.to_usize() == b'>' as usize => Ok(Ordering::Greater),
        o => {
            engine.error(ErrorKind::Missing("= ".to_string()))?;
            if let Some((t,_)) = o { engine.mouth.requeue(t) }
            Ok(Ordering::Equal)
        }
    }
}

pub fn ifnum<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<bool> {
    let a = engine.read_int()?;
    let rel = read_relation(engine)?;
    let b = engine.read_int()?;
    Ok(a.cmp(&b) == rel)
}

pub fn ifdim<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<bool> {
    let a = engine.read_dim()?;
    let rel = read_relation(engine)?;
    let b = engine.read_dim()?;
    Ok(a.cmp(&b) == rel)
}

pub fn ifodd<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<bool> {
    Ok(engine.read_int()? % 2 != 0)
}

pub fn ifx<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<bool> {
    let a = match next_or_eof(engine,&tk)? { Some(t) => t, None => return Ok(false) };
    let b = match next_or_eof(engine,&tk)? { Some(t) => t, None => return Ok(false) };
    Ok(match (engine.meaning_of(&a),engine.meaning_of(&b)) {
        (None,None) => true,
        (Some(a),Some(b)) => a.same_meaning(&b),
        _ => false
    })
}

/// The character code and category of the next token after expansion, as compared by `\if` and
/// `\ifcat`; `None` for control sequences that are not `\let` to a character.
fn read_if_token<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:&ET::Token) -> TeXResult<(Option<ET::Char>,Option<CommandCode>)> {
    Ok(match engine.get_next_unexpandable()? {
        None => {
            eof_error(engine,tk)?;
            (None,None)
        }
        Some((_,ResolvedToken::Tk{char,code})) => (Some(char),Some(code)),
        Some((_,ResolvedToken::Cmd(Some(TeXCommand::Char{char,code})))) => (Some(char),Some(code)),
        Some((t,_)) => match t.to_enum() {
            StandardToken::Character(c,CommandCode::Active) => (Some(c),Some(CommandCode::Active)),
            _ => (None,None)
        }
    })
}

pub fn if_<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<bool> {
    let (a,_) = read_if_token(engine,&tk)?;
    let (b,_) = read_if_token(engine,&tk)?;
    Ok(a == b)
}

pub fn ifcat<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<bool> {
    let (_,a) = read_if_token(engine,&tk)?;
    let (_,b) = read_if_token(engine,&tk)?;
    Ok(a == b)
}

pub fn ifdefined<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<bool> {
    Ok(match next_or_eof(engine,&tk)? {
        Some(t) => engine.meaning_of(&t).is_some(),
        None => false
    })
}

pub fn ifcsname<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<bool> {
    let name = engine.read_csname()?;
    Ok(engine.state.get_command(&name).is_some())
}

pub fn ifcase<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    engine.do_ifcase()
}
pub fn else_<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    engine.do_conditional_end(BranchEnd::Else,tk)
}
pub fn or<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    engine.do_conditional_end(BranchEnd::Or,tk)
}
pub fn fi<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    engine.do_conditional_end(BranchEnd::Fi,tk)
}

// registers -----------------------------------------------------------------------------------

pub fn count_get<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<i32> {
    let idx = engine.read_register_index()?;
    Ok(engine.state.get_int_register(idx))
}
pub fn count_set<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    let idx = engine.read_register_index()?;
    engine.skip_eq()?;
    let v = engine.read_int()?;
    engine.state.set_int_register(engine.aux,idx,v,globally);
    Ok(())
}

pub fn dimen_get<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<Dim32> {
    let idx = engine.read_register_index()?;
    Ok(engine.state.get_dim_register(idx))
}
pub fn dimen_set<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    let idx = engine.read_register_index()?;
    engine.skip_eq()?;
    let v = engine.read_dim()?;
    engine.state.set_dim_register(engine.aux,idx,v,globally);
    Ok(())
}

pub fn skip_get<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<Skip> {
    let idx = engine.read_register_index()?;
    Ok(engine.state.get_skip_register(idx))
}
pub fn skip_set<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    let idx = engine.read_register_index()?;
    engine.skip_eq()?;
    let v = engine.read_skip()?;
    engine.state.set_skip_register(engine.aux,idx,v,globally);
    Ok(())
}

pub fn toks<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token,globally:bool) -> TeXResult<()> {
    let idx = engine.read_register_index()?;
    engine.skip_eq()?;
    let v = engine.read_toks_value(&tk)?;
    engine.state.set_toks_register(engine.aux,idx,v,globally);
    Ok(())
}

pub fn advance<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token,globally:bool) -> TeXResult<()> {
    engine.do_arithmetic(&tk,Arithmetic::Advance,globally)
}
pub fn multiply<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token,globally:bool) -> TeXResult<()> {
    engine.do_arithmetic(&tk,Arithmetic::Multiply,globally)
}
pub fn divide<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token,globally:bool) -> TeXResult<()> {
    engine.do_arithmetic(&tk,Arithmetic::Divide,globally)
}

pub fn catcode_get<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<i32> {
    let c = engine.read_char_code()?;
    Ok(u8::from(*engine.state.get_catcode_scheme().get(c)) as i32)
}
pub fn catcode_set<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    let c = engine.read_char_code()?;
    engine.skip_eq()?;
    let v = engine.read_code(0,15)?;
    if let Ok(cc) = CategoryCode::try_from(v as u8) {
        engine.state.set_catcode(engine.aux,c,cc,globally);
    }
    Ok(())
}

pub fn lccode_get<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<i32> {
    let c = engine.read_char_code()?;
    Ok(engine.state.get_lccode(c).to_usize() as i32)
}
pub fn lccode_set<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    let c = engine.read_char_code()?;
    engine.skip_eq()?;
    let lc = engine.read_char_code()?;
    engine.state.set_lccode(engine.aux,c,lc,globally);
    Ok(())
}

pub fn uccode_get<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<i32> {
    let c = engine.read_char_code()?;
    Ok(engine.state.get_uccode(c).to_usize() as i32)
}
pub fn uccode_set<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    let c = engine.read_char_code()?;
    engine.skip_eq()?;
    let uc = engine.read_char_code()?;
    engine.state.set_uccode(engine.aux,c,uc,globally);
    Ok(())
}

/// An optional character as an integer parameter: `-1` for none.
fn char_param<C:Character>(c:Option<C>) -> i32 {
    c.map(|c| c.to_usize() as i32).unwrap_or(-1)
}
/// Reads an integer for `\escapechar` and friends; values that are not characters mean none.
fn read_char_param<ET:EngineTypes>(engine:&mut EngineReferences<ET>) -> TeXResult<Option<ET::Char>> {
    engine.skip_eq()?;
    let i = engine.read_int()?;
    if i < 0 { return Ok(None) }
    Ok(ET::Char::try_from(i as u64).ok())
}

pub fn escapechar_get<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<i32> {
    Ok(char_param(engine.state.get_escape_char()))
}
pub fn escapechar_set<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    let c = read_char_param(engine)?;
    engine.state.set_escape_char(engine.aux,c,globally);
    Ok(())
}
pub fn endlinechar_get<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<i32> {
    Ok(char_param(engine.state.get_endline_char()))
}
pub fn endlinechar_set<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    let c = read_char_param(engine)?;
    engine.state.set_endline_char(engine.aux,c,globally);
    Ok(())
}
pub fn newlinechar_get<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<i32> {
    Ok(char_param(engine.state.get_newline_char()))
}
pub fn newlinechar_set<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    let c = read_char_param(engine)?;
    engine.state.set_newline_char(engine.aux,c,globally);
    Ok(())
}

pub fn time<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<i32> {
    let t = &engine.aux.start_time;
    Ok((t.hour() * 60 + t.minute()) as i32)
}
pub fn day<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<i32> {
    Ok(engine.aux.start_time.day() as i32)
}
pub fn month<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<i32> {
    Ok(engine.aux.start_time.month() as i32)
}
pub fn year<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<i32> {
    Ok(engine.aux.start_time.year())
}

// boxes ---------------------------------------------------------------------------------------

pub fn setbox<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token,globally:bool) -> TeXResult<()> {
    let idx = engine.read_register_index()?;
    engine.skip_eq()?;
    match engine.get_next_unexpandable()? {
        Some((t,ResolvedToken::Cmd(Some(TeXCommand::Primitive{cmd:PrimitiveCommand::Box(f),..})))) => match f(engine,t)? {
            Either::Left(b) => engine.state.set_box_register(engine.aux,idx,b,globally),
            Either::Right(spec) => engine.open_box(spec,BoxTarget::Register{idx,global:globally})
        }
        Some((t,_)) => {
            engine.error(ErrorKind::Missing("box".to_string()))?;
            engine.mouth.requeue(t)
        }
        None => eof_error(engine,&tk)?
    }
    Ok(())
}

pub fn box_<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<Either<Option<TeXBox<ET>>,BoxSpec>> {
    let idx = engine.read_register_index()?;
    Ok(Either::Left(engine.state.take_box_register(idx)))
}
pub fn copy<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<Either<Option<TeXBox<ET>>,BoxSpec>> {
    let idx = engine.read_register_index()?;
    Ok(Either::Left(engine.state.get_box_register(idx).cloned()))
}

fn read_box_spec<ET:EngineTypes>(engine:&mut EngineReferences<ET>,btype:BoxType) -> TeXResult<Either<Option<TeXBox<ET>>,BoxSpec>> {
    let to = if engine.read_keyword("to")? {
        Some(engine.read_dim()?)
    } else {
        // natural dimensions are used; there is no glue setting
        if engine.read_keyword("spread")? { engine.read_dim()?; }
        None
    };
    engine.read_left_brace()?;
    Ok(Either::Right(BoxSpec{btype,to}))
}
pub fn hbox<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<Either<Option<TeXBox<ET>>,BoxSpec>> {
    read_box_spec(engine,BoxType::Horizontal)
}
pub fn vbox<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<Either<Option<TeXBox<ET>>,BoxSpec>> {
    read_box_spec(engine,BoxType::Vertical)
}

pub fn wd_get<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<Dim32> {
    let idx = engine.read_register_index()?;
    Ok(engine.box_dimension(idx,TeXBox::width))
}
pub fn wd_set<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,_globally:bool) -> TeXResult<()> {
    let idx = engine.read_register_index()?;
    engine.skip_eq()?;
    let d = engine.read_dim()?;
    if let Some(b) = engine.state.get_box_register_mut(idx) { b.assigned_width = Some(d) }
    Ok(())
}
pub fn ht_get<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<Dim32> {
    let idx = engine.read_register_index()?;
    Ok(engine.box_dimension(idx,TeXBox::height))
}
pub fn ht_set<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,_globally:bool) -> TeXResult<()> {
    let idx = engine.read_register_index()?;
    engine.skip_eq()?;
    let d = engine.read_dim()?;
    if let Some(b) = engine.state.get_box_register_mut(idx) { b.assigned_height = Some(d) }
    Ok(())
}
pub fn dp_get<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<Dim32> {
    let idx = engine.read_register_index()?;
    Ok(engine.box_dimension(idx,TeXBox::depth))
}
pub fn dp_set<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,_globally:bool) -> TeXResult<()> {
    let idx = engine.read_register_index()?;
    engine.skip_eq()?;
    let d = engine.read_dim()?;
    if let Some(b) = engine.state.get_box_register_mut(idx) { b.assigned_depth = Some(d) }
    Ok(())
}

// output --------------------------------------------------------------------------------------

/// Whether material currently goes into a vertical box.
fn in_vertical<ET:EngineTypes>(engine:&EngineReferences<ET>) -> bool {
    engine.stomach.lists.last().map(|b| b.spec.btype == BoxType::Vertical).unwrap_or(false)
}

pub fn par<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    if let Some(f) = engine.paragraph_flag() { *f = false }
    engine.push_node(Node::Par);
    Ok(())
}

pub fn char_<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    if engine.start_paragraph(&tk)? { return Ok(()) }
    let char = engine.read_char_code()?;
    let font = engine.state.get_current_font().clone();
    engine.push_node(Node::Char{char,font});
    Ok(())
}

pub fn hskip<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    if engine.start_paragraph(&tk)? { return Ok(()) }
    let skip = engine.read_skip()?;
    engine.push_node(Node::Glue{skip,vertical:false});
    Ok(())
}
pub fn vskip<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    let skip = engine.read_skip()?;
    engine.push_node(Node::Glue{skip,vertical:true});
    Ok(())
}

pub fn kern<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    let dim = engine.read_dim()?;
    let vertical = in_vertical(engine);
    engine.push_node(Node::Kern{dim,vertical});
    Ok(())
}

pub fn penalty<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    let i = engine.read_int()?;
    engine.push_node(Node::Penalty(i));
    Ok(())
}

fn rule<ET:EngineTypes>(engine:&mut EngineReferences<ET>,vertical:bool) -> TeXResult<()> {
    let (mut width,mut height,mut depth) = (None,None,None);
    loop {
        if engine.read_keyword("width")? { width = Some(engine.read_dim()?) }
        else if engine.read_keyword("height")? { height = Some(engine.read_dim()?) }
        else if engine.read_keyword("depth")? { depth = Some(engine.read_dim()?) }
        else { break }
    }
    engine.push_node(Node::Rule{width,height,depth,vertical});
    Ok(())
}
pub fn hrule<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    rule(engine,true)
}
pub fn vrule<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    rule(engine,false)
}

pub fn mark<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    let v = engine.read_general_text(&tk,true)?;
    engine.push_node(Node::Mark(v.into()));
    Ok(())
}

pub fn special<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    let v = engine.read_general_text(&tk,true)?;
    let s = engine.tokens_to_string(&v);
    engine.aux.memory.return_token_vec(v);
    engine.push_node(Node::Special(s));
    Ok(())
}

// fonts ---------------------------------------------------------------------------------------

pub fn font_get<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<ET::Font> {
    Ok(engine.state.get_current_font().clone())
}

pub fn font_set<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token,globally:bool) -> TeXResult<()> {
    let t = match engine.read_control_sequence()? {
        Some(t) => t,
        None => return Ok(())
    };
    engine.set_meaning(&t,Some(TeXCommand::relax()),globally);
    engine.skip_eq()?;
    let name = engine.read_file_name()?;
    let at = if engine.read_keyword("at")? {
        Some(engine.read_dim()?)
    } else if engine.read_keyword("scaled")? {
        // negative values are scale factors
        Some(Dim32(-engine.read_code(1,32768)?))
    } else { None };
    let cs = match t.to_enum() {
        StandardToken::ControlSequence(cs) => cs,
        StandardToken::Character(c,_) => engine.aux.memory.cs_interner_mut().from_chars(&[c])
    };
    let font = match engine.fontsystem.new_font(&name,at,cs,&mut *engine.filesystem) {
        Ok(f) => f,
        Err(e) => {
            engine.report(e)?;
            engine.fontsystem.null()
        }
    };
    engine.set_meaning(&t,Some(TeXCommand::Font(font)),globally);
    Ok(())
}

// messages ------------------------------------------------------------------------------------

pub fn message<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    let v = engine.read_general_text(&tk,true)?;
    let s = engine.tokens_to_string(&v);
    engine.aux.memory.return_token_vec(v);
    engine.aux.outputs.message(s);
    Ok(())
}

pub fn errmessage<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    let v = engine.read_general_text(&tk,true)?;
    let s = engine.tokens_to_string(&v);
    engine.aux.memory.return_token_vec(v);
    engine.error(ErrorKind::ErrMessage(s))
}

pub fn show<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    let t = match next_or_eof(engine,&tk)? {
        Some(t) => t,
        None => return Ok(())
    };
    let meaning = meaning_string(engine,&t);
    if t.is_cs_or_active() {
        let name = engine.display_token(&t);
        engine.aux.outputs.write_16(format_args!("> {}={}.",name.trim_end(),meaning));
    } else {
        engine.aux.outputs.write_16(format_args!("> {}.",meaning));
    }
    Ok(())
}

pub fn showthe<ET:EngineTypes>(engine:&mut EngineReferences<ET>,tk:ET::Token) -> TeXResult<()> {
    let mut v = engine.aux.memory.get_token_vec();
    engine.the_tokens(&tk,&mut v)?;
    let s = engine.tokens_to_string(&v);
    engine.aux.memory.return_token_vec(v);
    engine.aux.outputs.write_16(format_args!("> {}.",s));
    Ok(())
}

// interaction and job control -----------------------------------------------------------------

fn set_interaction<ET:EngineTypes>(engine:&mut EngineReferences<ET>,mode:InteractionMode) -> TeXResult<()> {
    log::debug!("interaction mode: {:?}",mode);
    engine.aux.interaction = mode;
    Ok(())
}
pub fn batchmode<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    set_interaction(engine,InteractionMode::Batch)
}
pub fn nonstopmode<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    set_interaction(engine,InteractionMode::Nonstop)
}
pub fn scrollmode<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    set_interaction(engine,InteractionMode::Scroll)
}
pub fn errorstopmode<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    set_interaction(engine,InteractionMode::ErrorStop)
}

pub fn input<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    let name = engine.read_file_name()?;
    match engine.filesystem.find_input(&name) {
        Some(f) => engine.mouth.push_file(&f,engine.aux),
        None => engine.error(ErrorKind::FileNotFound(name))
    }
}

pub fn endinput<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    engine.mouth.endinput();
    Ok(())
}

pub fn end<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    engine.stomach.end = true;
    Ok(())
}

pub fn ignorespaces<ET:EngineTypes>(engine:&mut EngineReferences<ET>,_tk:ET::Token) -> TeXResult<()> {
    engine.skip_spaces()
}

/// Registers all primitives and binds `\nullfont`.
pub fn register_tex_primitives<E:TeXEngine>(engine:&mut E) {
    register(engine,"relax",PrimitiveCommand::Relax);

    register_unexpandable(engine,"begingroup",begingroup);
    register_unexpandable(engine,"endgroup",endgroup);
    register_unexpandable(engine,"aftergroup",aftergroup);
    register_unexpandable(engine,"afterassignment",afterassignment);
    register_unexpandable(engine,"global",global);
    register_unexpandable(engine,"long",long);
    register_unexpandable(engine,"protected",protected);
    register_unexpandable(engine,"outer",outer);

    register_assignment(engine,"def",def);
    register_assignment(engine,"gdef",gdef);
    register_assignment(engine,"edef",edef);
    register_assignment(engine,"xdef",xdef);
    register_assignment(engine,"let",let_);
    register_assignment(engine,"futurelet",futurelet);
    register_assignment(engine,"chardef",chardef);
    register_assignment(engine,"countdef",countdef);
    register_assignment(engine,"dimendef",dimendef);
    register_assignment(engine,"skipdef",skipdef);
    register_assignment(engine,"toksdef",toksdef);
    register_assignment(engine,"toks",toks);
    register_assignment(engine,"advance",advance);
    register_assignment(engine,"multiply",multiply);
    register_assignment(engine,"divide",divide);
    register_assignment(engine,"setbox",setbox);

    register_simple_expandable(engine,"expandafter",expandafter);
    register_simple_expandable(engine,"noexpand",noexpand);
    register_simple_expandable(engine,"csname",csname);
    register_simple_expandable(engine,"input",input);
    register_simple_expandable(engine,"endinput",endinput);
    register_simple_expandable(engine,"ifcase",ifcase);
    register_simple_expandable(engine,"else",else_);
    register_simple_expandable(engine,"or",or);
    register_simple_expandable(engine,"fi",fi);
    register_unexpandable(engine,"endcsname",endcsname);

    register_expandable(engine,"string",string);
    register_expandable(engine,"number",number);
    register_expandable(engine,"romannumeral",romannumeral);
    register_expandable(engine,"the",the);
    register_expandable(engine,"meaning",meaning);
    register_expandable(engine,"jobname",jobname);
    register_expandable(engine,"fontname",fontname);
    register_unexpandable(engine,"uppercase",uppercase);
    register_unexpandable(engine,"lowercase",lowercase);

    register_conditional(engine,"iftrue",iftrue);
    register_conditional(engine,"iffalse",iffalse);
    register_conditional(engine,"ifnum",ifnum);
    register_conditional(engine,"ifdim",ifdim);
    register_conditional(engine,"ifodd",ifodd);
    register_conditional(engine,"ifx",ifx);
    register_conditional(engine,"if",if_);
    register_conditional(engine,"ifcat",ifcat);
    register_conditional(engine,"ifdefined",ifdefined);
    register_conditional(engine,"ifcsname",ifcsname);

    register_int(engine,"count",count_get,Some(count_set));
    register_dim(engine,"dimen",dimen_get,Some(dimen_set));
    register_skip(engine,"skip",skip_get,Some(skip_set));
    register_int(engine,"catcode",catcode_get,Some(catcode_set));
    register_int(engine,"lccode",lccode_get,Some(lccode_set));
    register_int(engine,"uccode",uccode_get,Some(uccode_set));
    register_int(engine,"escapechar",escapechar_get,Some(escapechar_set));
    register_int(engine,"endlinechar",endlinechar_get,Some(endlinechar_set));
    register_int(engine,"newlinechar",newlinechar_get,Some(newlinechar_set));
    register_int(engine,"time",time,None);
    register_int(engine,"day",day,None);
    register_int(engine,"month",month,None);
    register_int(engine,"year",year,None);
    register_dim(engine,"wd",wd_get,Some(wd_set));
    register_dim(engine,"ht",ht_get,Some(ht_set));
    register_dim(engine,"dp",dp_get,Some(dp_set));

    register_primitive_int(engine,&["globaldefs","tracingmacros","tracinggroups","tracingassigns",
        "tracingrestores","tracingcommands","tracingonline","mag"]);
    register_primitive_dim(engine,&["hsize","vsize","parindent"]);
    register_primitive_skip(engine,&["baselineskip","parskip"]);
    register_primitive_toks(engine,&["everyjob","everypar"]);

    register_box(engine,"box",box_);
    register_box(engine,"copy",copy);
    register_box(engine,"hbox",hbox);
    register_box(engine,"vbox",vbox);

    register_unexpandable(engine,"par",par);
    register_unexpandable(engine,"char",char_);
    register_unexpandable(engine,"hskip",hskip);
    register_unexpandable(engine,"vskip",vskip);
    register_unexpandable(engine,"kern",kern);
    register_unexpandable(engine,"penalty",penalty);
    register_unexpandable(engine,"hrule",hrule);
    register_unexpandable(engine,"vrule",vrule);
    register_unexpandable(engine,"mark",mark);
    register_unexpandable(engine,"special",special);

    register_font(engine,"font",font_get,Some(font_set));

    register_unexpandable(engine,"message",message);
    register_unexpandable(engine,"errmessage",errmessage);
    register_unexpandable(engine,"show",show);
    register_unexpandable(engine,"showthe",showthe);

    register_unexpandable(engine,"batchmode",batchmode);
    register_unexpandable(engine,"nonstopmode",nonstopmode);
    register_unexpandable(engine,"scrollmode",scrollmode);
    register_unexpandable(engine,"errorstopmode",errorstopmode);

    register_unexpandable(engine,"end",end);
    register_unexpandable(engine,"ignorespaces",ignorespaces);

    let mut refs = engine.get_engine_refs();
    refs.state.set_primitive_int(refs.aux,PRIMITIVES.mag,1000,true);
    let null = refs.fontsystem.null();
    let cs = null.name().clone();
    refs.state.set_command(refs.aux,cs,Some(TeXCommand::Font(null)),true);
    log::debug!("{} primitives registered",PRIMITIVES.len());
}

#[cfg(test)]
mod tests {
    use super::roman_numeral;

    #[test]
    fn roman() {
        assert_eq!(roman_numeral(1984),"mcmlxxxiv");
        assert_eq!(roman_numeral(4),"iv");
        assert_eq!(roman_numeral(9),"ix");
        assert_eq!(roman_numeral(0),"");
        assert_eq!(roman_numeral(-5),"");
    }
}
