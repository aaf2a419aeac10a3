//! Reading integers, dimensions and glue from the input, with TeX's syntax: optional signs, octal
//! (`'`), hexadecimal (`"`) and character (`` ` ``) constants, decimal fractions, units and internal
//! quantities (registers and parameters) in place of literal values.
use crate::commands::{PrimitiveCommand, ResolvedToken, TeXCommand};
use crate::engine::{EngineReferences, EngineTypes};
use crate::engine::state::State;
use crate::tex::catcodes::CommandCode;
use crate::tex::characters::Character;
use crate::tex::numerics::{attach_unit, Dim32, MAX_DIM, PHYSICAL_UNITS, round_decimals, Skip, StretchShrink, unit_ratio, UNITY};
use crate::tex::tokens::{StandardToken, Token};
use crate::tex::tokens::control_sequences::CSHandler;
use crate::utils::errors::{ErrorKind, TeXResult};

/// The value of an internal quantity, e.g. `\count0` or `\baselineskip`.
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum InternalValue { Int(i32), Dim(Dim32), Skip(Skip) }
impl InternalValue {
    /// Coerced to an integer; dimensions in scaled points.
    pub fn as_int(&self) -> i32 {
        match self {
            InternalValue::Int(i) => *i,
            InternalValue::Dim(d) => d.0,
            InternalValue::Skip(s) => s.base.0
        }
    }
}

/// A number as it occurs before a unit.
enum Factor { Decimal(i32,i32), Dim(Dim32), Skip(Skip) }

fn is<C:Character>(c:C,b:u8) -> bool { c.to_usize() == b as usize }

fn digit_value<C:Character>(c:C,code:CommandCode,radix:u32) -> Option<u32> {
    let u = c.to_usize();
    if u > 127 { return None }
    let ch = u as u8 as char;
    match code {
        CommandCode::Other => ch.to_digit(radix).filter(|_| !ch.is_ascii_lowercase()),
        CommandCode::Letter if radix == 16 && ('A'..='F').contains(&ch) => ch.to_digit(16),
        _ => None
    }
}

impl<ET:EngineTypes> EngineReferences<'_,ET> {
    /// The value of `cmd` (invoked via `t`) if it is an internal quantity.
    pub fn read_internal(&mut self,t:&ET::Token,cmd:&TeXCommand<ET>) -> TeXResult<Option<InternalValue>> {
        Ok(Some(match cmd {
            TeXCommand::CharDef(c) => InternalValue::Int(c.to_usize() as i32),
            TeXCommand::IntRegister(i) => InternalValue::Int(self.state.get_int_register(*i)),
            TeXCommand::DimRegister(i) => InternalValue::Dim(self.state.get_dim_register(*i)),
            TeXCommand::SkipRegister(i) => InternalValue::Skip(self.state.get_skip_register(*i)),
            TeXCommand::Primitive{cmd:PrimitiveCommand::Int{read,..},..} => InternalValue::Int(read(self,t.clone())?),
            TeXCommand::Primitive{cmd:PrimitiveCommand::Dim{read,..},..} => InternalValue::Dim(read(self,t.clone())?),
            TeXCommand::Primitive{cmd:PrimitiveCommand::Skip{read,..},..} => InternalValue::Skip(read(self,t.clone())?),
            TeXCommand::Primitive{name,cmd:PrimitiveCommand::PrimitiveInt} => InternalValue::Int(self.state.get_primitive_int(*name)),
            TeXCommand::Primitive{name,cmd:PrimitiveCommand::PrimitiveDim} => InternalValue::Dim(self.state.get_primitive_dim(*name)),
            TeXCommand::Primitive{name,cmd:PrimitiveCommand::PrimitiveSkip} => InternalValue::Skip(self.state.get_primitive_skip(*name)),
            _ => return Ok(None)
        }))
    }

    fn missing_number(&mut self,t:Option<ET::Token>) -> TeXResult<()> {
        self.error(ErrorKind::MissingNumber)?;
        if let Some(t) = t { self.mouth.requeue(t) }
        Ok(())
    }

    /// Consumes one space token if it comes next (after expansion).
    pub fn read_optional_space(&mut self) -> TeXResult<()> {
        if let Some((t,r)) = self.get_next_unexpandable()? {
            if !matches!(r,ResolvedToken::Tk{code:CommandCode::Space,..}) { self.mouth.requeue(t) }
        }
        Ok(())
    }

    /// Reads an integer.
    pub fn read_int(&mut self) -> TeXResult<i32> {
        let mut negative = false;
        loop {
            let (t,r) = match self.get_next_unexpandable()? {
                Some(p) => p,
                None => {
                    self.missing_number(None)?;
                    return Ok(0)
                }
            };
            let sign = move |i:i32| if negative { -i } else { i };
            match r {
                ResolvedToken::Tk{code:CommandCode::Space,..} => (),
                ResolvedToken::Tk{char,code:CommandCode::Other} if is(char,b'-') => negative = !negative,
                ResolvedToken::Tk{char,code:CommandCode::Other} if is(char,b'+') => (),
                ResolvedToken::Tk{char,code:CommandCode::Other} if is(char,b'\'') => return Ok(sign(self.read_radix(8,None)?)),
                ResolvedToken::Tk{char,code:CommandCode::Other} if is(char,b'"') => return Ok(sign(self.read_radix(16,None)?)),
                ResolvedToken::Tk{char,code:CommandCode::Other} if is(char,b'`') => return Ok(sign(self.read_char_constant()?)),
                ResolvedToken::Tk{char,code} if digit_value(char,code,10).is_some() => {
                    let first = digit_value(char,code,10);
                    return Ok(sign(self.read_radix(10,first)?))
                }
                ResolvedToken::Cmd(Some(cmd)) => match self.read_internal(&t,&cmd)? {
                    Some(v) => return Ok(sign(v.as_int())),
                    None => {
                        self.missing_number(Some(t))?;
                        return Ok(0)
                    }
                },
                _ => {
                    self.missing_number(Some(t))?;
                    return Ok(0)
                }
            }
        }
    }

    /// Reads the digits of a number in the given radix, optionally starting with an already consumed
    /// digit, and one optional space after them. Values beyond `2^31-1` are reported and clamped.
    fn read_radix(&mut self,radix:u32,first:Option<u32>) -> TeXResult<i32> {
        let mut any = first.is_some();
        let mut val = first.unwrap_or(0) as i64;
        let mut too_big = false;
        while let Some((t,r)) = self.get_next_unexpandable()? {
            match r {
                ResolvedToken::Tk{char,code} => match digit_value(char,code,radix) {
                    Some(d) => {
                        any = true;
                        val = val * radix as i64 + d as i64;
                        if val > i32::MAX as i64 {
                            too_big = true;
                            val = i32::MAX as i64;
                        }
                    }
                    None => {
                        if code != CommandCode::Space { self.mouth.requeue(t) }
                        break
                    }
                },
                _ => {
                    self.mouth.requeue(t);
                    break
                }
            }
        }
        if !any {
            self.missing_number(None)?;
            return Ok(0)
        }
        if too_big { self.error(ErrorKind::NumberTooBig)? }
        Ok(val as i32)
    }

    /// `` `a `` or `` `\a ``: the character code, followed by one optional space.
    fn read_char_constant(&mut self) -> TeXResult<i32> {
        let t = match self.get_next()? {
            Some(t) => t,
            None => {
                self.missing_number(None)?;
                return Ok(0)
            }
        };
        let v = match t.to_enum() {
            StandardToken::Character(c,_) => c.to_usize() as i32,
            StandardToken::ControlSequence(cs) => {
                let name = self.aux.memory.cs_interner().resolve(&cs);
                let mut chars = name.chars();
                match (chars.next(),chars.next()) {
                    (Some(c),None) => c as i32,
                    _ => {
                        self.missing_number(Some(t))?;
                        return Ok(0)
                    }
                }
            }
        };
        self.read_optional_space()?;
        Ok(v)
    }

    /// Reads a register index in `0..=255`; out of range values are reported and replaced by `0`.
    pub fn read_register_index(&mut self) -> TeXResult<usize> {
        let i = self.read_int()?;
        if !(0..=255).contains(&i) {
            self.error(ErrorKind::BadRegister(i as i64))?;
            return Ok(0)
        }
        Ok(i as usize)
    }

    /// Reads an integer in `min..=max`; out of range values are reported and replaced by `0`.
    pub fn read_code(&mut self,min:i32,max:i32) -> TeXResult<i32> {
        let i = self.read_int()?;
        if i < min || i > max {
            self.error(ErrorKind::InvalidCode{value:i as i64,min:min as i64,max:max as i64})?;
            return Ok(0)
        }
        Ok(i)
    }

    /// Reads a character code, i.e. an integer that is a valid [`Character`].
    pub fn read_char_code(&mut self) -> TeXResult<ET::Char> {
        let i = self.read_int()?;
        match ET::Char::try_from(i as u64) {
            Ok(c) if i >= 0 => Ok(c),
            _ => {
                self.error(ErrorKind::InvalidCode{value:i as i64,min:0,max:255})?;
                Ok(ET::Char::default())
            }
        }
    }

    /// Reads digits with an optional decimal point (`.` or `,`); returns the integer part and the
    /// fractional part in units of `2^-16`.
    fn read_decimal(&mut self) -> TeXResult<(i32,i32)> {
        let mut int : i64 = 0;
        let mut digits : Vec<u8> = Vec::new();
        let mut in_fraction = false;
        while let Some((t,r)) = self.get_next_unexpandable()? {
            match r {
                ResolvedToken::Tk{char,code:CommandCode::Other} if !in_fraction && (is(char,b'.') || is(char,b',')) =>
                    in_fraction = true,
                ResolvedToken::Tk{char,code} if digit_value(char,code,10).is_some() => {
                    let d = digit_value(char,code,10).unwrap_or(0);
                    if in_fraction {
                        if digits.len() < 17 { digits.push(d as u8) }
                    } else {
                        int = (int * 10 + d as i64).min(i32::MAX as i64)
                    }
                }
                _ => {
                    self.mouth.requeue(t);
                    break
                }
            }
        }
        Ok((int as i32,round_decimals(&digits)))
    }

    fn read_factor(&mut self) -> TeXResult<(bool,Factor)> {
        let mut negative = false;
        loop {
            let (t,r) = match self.get_next_unexpandable()? {
                Some(p) => p,
                None => {
                    self.missing_number(None)?;
                    return Ok((false,Factor::Decimal(0,0)))
                }
            };
            match r {
                ResolvedToken::Tk{code:CommandCode::Space,..} => (),
                ResolvedToken::Tk{char,code:CommandCode::Other} if is(char,b'-') => negative = !negative,
                ResolvedToken::Tk{char,code:CommandCode::Other} if is(char,b'+') => (),
                ResolvedToken::Tk{char,code:CommandCode::Other} if is(char,b'.') || is(char,b',') || digit_value(char,CommandCode::Other,10).is_some() => {
                    self.mouth.requeue(t);
                    let (i,f) = self.read_decimal()?;
                    return Ok((negative,Factor::Decimal(i,f)))
                }
                ResolvedToken::Tk{char,code:CommandCode::Other} if is(char,b'\'') || is(char,b'"') || is(char,b'`') => {
                    self.mouth.requeue(t);
                    let i = self.read_int()?;
                    return Ok((negative,Factor::Decimal(i,0)))
                }
                ResolvedToken::Cmd(Some(cmd)) => return Ok((negative,match self.read_internal(&t,&cmd)? {
                    Some(InternalValue::Int(i)) => Factor::Decimal(i,0),
                    Some(InternalValue::Dim(d)) => Factor::Dim(d),
                    Some(InternalValue::Skip(s)) => Factor::Skip(s),
                    None => {
                        self.missing_number(Some(t))?;
                        Factor::Decimal(0,0)
                    }
                })),
                _ => {
                    self.missing_number(Some(t))?;
                    return Ok((false,Factor::Decimal(0,0)))
                }
            }
        }
    }

    fn checked_dim(&mut self,d:Option<i64>,negative:bool) -> TeXResult<Dim32> {
        let v = match d {
            Some(v) if v.abs() <= MAX_DIM as i64 => v as i32,
            _ => {
                self.error(ErrorKind::DimensionTooLarge)?;
                MAX_DIM
            }
        };
        Ok(Dim32(if negative { -v } else { v }))
    }

    /// Reads the unit following the number `int.frac`.
    fn read_unit(&mut self,int:i32,frac:i32,negative:bool) -> TeXResult<Dim32> {
        self.skip_spaces()?;
        if let Some((t,r)) = self.get_next_unexpandable()? {
            match r {
                ResolvedToken::Cmd(Some(cmd)) => match self.read_internal(&t,&cmd)? {
                    Some(InternalValue::Dim(Dim32(v)) | InternalValue::Skip(Skip{base:Dim32(v),..})) => {
                        let r = (v as i64) * (int as i64) + (v as i64) * (frac as i64) / (UNITY as i64);
                        return self.checked_dim(Some(r),negative)
                    }
                    Some(InternalValue::Int(_)) => {
                        self.error(ErrorKind::IllegalUnit)?;
                        let d = attach_unit(int,frac,(1,1)).map(|d| d.0 as i64);
                        return self.checked_dim(d,negative)
                    }
                    None => self.mouth.requeue(t)
                },
                _ => self.mouth.requeue(t)
            }
        }
        // font-relative units are always relative to a font without dimensions
        if self.read_keyword("em")? || self.read_keyword("ex")? {
            self.read_optional_space()?;
            return Ok(Dim32::ZERO)
        }
        // \mag is fixed at 1000, so true units are the same as the others
        self.read_keyword("true")?;
        for u in PHYSICAL_UNITS {
            if self.read_keyword(u)? {
                self.read_optional_space()?;
                let d = if u == "sp" { Some(int as i64) } else {
                    unit_ratio(u).and_then(|r| attach_unit(int,frac,r)).map(|d| d.0 as i64)
                };
                return self.checked_dim(d,negative)
            }
        }
        self.error(ErrorKind::IllegalUnit)?;
        let d = attach_unit(int,frac,(1,1)).map(|d| d.0 as i64);
        self.checked_dim(d,negative)
    }

    /// Reads a dimension.
    pub fn read_dim(&mut self) -> TeXResult<Dim32> {
        match self.read_factor()? {
            (negative,Factor::Decimal(i,f)) => self.read_unit(i,f,negative),
            (negative,Factor::Dim(d)) => Ok(if negative { -d } else { d }),
            (negative,Factor::Skip(s)) => Ok(if negative { -s.base } else { s.base })
        }
    }

    /// Reads glue: a dimension with optional `plus` and `minus` components, which may be of order
    /// `fil`, `fill` or `filll`.
    pub fn read_skip(&mut self) -> TeXResult<Skip> {
        let base = match self.read_factor()? {
            (negative,Factor::Skip(s)) => return Ok(if negative { -s } else { s }),
            (negative,Factor::Dim(d)) => if negative { -d } else { d },
            (negative,Factor::Decimal(i,f)) => self.read_unit(i,f,negative)?
        };
        let stretch = if self.read_keyword("plus")? { Some(self.read_stretch_shrink()?) } else { None };
        let shrink = if self.read_keyword("minus")? { Some(self.read_stretch_shrink()?) } else { None };
        Ok(Skip::new(base,stretch,shrink))
    }

    fn read_stretch_shrink(&mut self) -> TeXResult<StretchShrink> {
        let (negative,(int,frac)) = match self.read_factor()? {
            (negative,Factor::Dim(d)) => return Ok(StretchShrink::Dim(if negative { -d } else { d })),
            (negative,Factor::Skip(s)) => return Ok(StretchShrink::Dim(if negative { -s.base } else { s.base })),
            (negative,Factor::Decimal(i,f)) => (negative,(i,f))
        };
        if self.read_keyword("fil")? {
            let mut order = 0;
            while order < 2 && self.read_keyword("l")? { order += 1 }
            self.read_optional_space()?;
            let v = attach_unit(int,frac,(1,1)).map(|d| d.0 as i64);
            let v = self.checked_dim(v,negative)?.0;
            return Ok(match order {
                0 => StretchShrink::Fil(v),
                1 => StretchShrink::Fill(v),
                _ => StretchShrink::Filll(v)
            })
        }
        Ok(StretchShrink::Dim(self.read_unit(int,frac,negative)?))
    }
}

#[cfg(test)]
mod tests {
    use super::digit_value;
    use crate::tex::catcodes::CommandCode;

    #[test]
    fn digits() {
        assert_eq!(digit_value(b'7',CommandCode::Other,8),Some(7));
        assert_eq!(digit_value(b'8',CommandCode::Other,8),None);
        assert_eq!(digit_value(b'F',CommandCode::Letter,16),Some(15));
        assert_eq!(digit_value(b'f',CommandCode::Letter,16),None);
        assert_eq!(digit_value(b'5',CommandCode::Letter,10),None);
    }
}
