/*! Numerical quantities: dimensions ([`Dim32`], in scaled points) and glue ([`Skip`]).
    Integers are plain `i32`s.

    Arithmetic on dimensions is fixed-point throughout, following TeX's conventions so that
    values read, computed and printed agree with TeX to the scaled point.
*/

use std::fmt::{Display, Formatter};
use std::ops::{Add, Neg, Sub};

/// `2^16`, i.e. one point in scaled points.
pub const UNITY : i32 = 65536;
/// The largest legal dimension, `16383.99999pt`.
pub const MAX_DIM : i32 = 0x3FFF_FFFF;

/// A dimension in scaled points (`1pt = 65536sp`).
#[derive(Copy,Clone,PartialEq,Eq,PartialOrd,Ord,Hash,Debug,Default)]
pub struct Dim32(pub i32);
impl Dim32 {
    pub const ZERO : Dim32 = Dim32(0);
    /// Whole points.
    pub fn from_pt(pt:i32) -> Self { Dim32(pt * UNITY) }
    /// Multiplies by `times` and divides by `div`, rounding towards zero; `None` on overflow or
    /// division by zero.
    pub fn scale(&self,times:i32,div:i32) -> Option<Self> {
        if div == 0 { return None }
        let r = (self.0 as i64) * (times as i64) / (div as i64);
        i32::try_from(r).ok().map(Dim32)
    }
    /// Prints `num` as a decimal fraction of [`UNITY`], with the shortest representation that
    /// reads back to the same value, followed by `unit`.
    pub fn display_num(num:i32,unit:&str,f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = num as i64;
        if s < 0 {
            f.write_str("-")?;
            s = -s;
        }
        let unity = UNITY as i64;
        write!(f,"{}.",s / unity)?;
        s = 10 * (s % unity) + 5;
        let mut delta = 10i64;
        loop {
            if delta > unity { s = s + 0o100000 - 50000 }
            write!(f,"{}",s / unity)?;
            s = 10 * (s % unity);
            delta *= 10;
            if s <= delta { break }
        }
        f.write_str(unit)
    }
}
impl Add for Dim32 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Dim32(self.0.wrapping_add(rhs.0)) }
}
impl Sub for Dim32 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { Dim32(self.0.wrapping_sub(rhs.0)) }
}
impl Neg for Dim32 {
    type Output = Self;
    fn neg(self) -> Self { Dim32(-self.0) }
}
impl std::iter::Sum for Dim32 {
    fn sum<I: Iterator<Item=Self>>(iter: I) -> Self {
        iter.fold(Dim32::ZERO,|a,b| a + b)
    }
}
impl Display for Dim32 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Self::display_num(self.0,"pt",f)
    }
}

/// The stretch or shrink component of [`Skip`]: finite, or of order `fil`, `fill` or `filll`
/// (with the factor in units of [`UNITY`]).
#[derive(Copy,Clone,PartialEq,Eq,Hash,Debug)]
pub enum StretchShrink { Dim(Dim32), Fil(i32), Fill(i32), Filll(i32) }
impl StretchShrink {
    /// The keyword suffixes for the infinite orders.
    pub const UNITS : [&'static str;3] = ["fil","fill","filll"];
    fn value(&self) -> i32 {
        match self {
            StretchShrink::Dim(d) => d.0,
            StretchShrink::Fil(i) | StretchShrink::Fill(i) | StretchShrink::Filll(i) => *i
        }
    }
    fn map(self,f:impl Fn(i32) -> i32) -> Self {
        match self {
            StretchShrink::Dim(d) => StretchShrink::Dim(Dim32(f(d.0))),
            StretchShrink::Fil(i) => StretchShrink::Fil(f(i)),
            StretchShrink::Fill(i) => StretchShrink::Fill(f(i)),
            StretchShrink::Filll(i) => StretchShrink::Filll(f(i)),
        }
    }
    fn try_map(self,f:impl Fn(i32) -> Option<i32>) -> Option<Self> {
        Some(match self {
            StretchShrink::Dim(d) => StretchShrink::Dim(Dim32(f(d.0)?)),
            StretchShrink::Fil(i) => StretchShrink::Fil(f(i)?),
            StretchShrink::Fill(i) => StretchShrink::Fill(f(i)?),
            StretchShrink::Filll(i) => StretchShrink::Filll(f(i)?),
        })
    }
}
impl Display for StretchShrink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StretchShrink::Dim(d) => Dim32::display_num(d.0,"pt",f),
            StretchShrink::Fil(i) => Dim32::display_num(*i,"fil",f),
            StretchShrink::Fill(i) => Dim32::display_num(*i,"fill",f),
            StretchShrink::Filll(i) => Dim32::display_num(*i,"filll",f),
        }
    }
}

/// Glue: a natural size with optional stretch and shrink.
#[derive(Copy,Clone,PartialEq,Eq,Hash,Debug,Default)]
pub struct Skip {
    pub base:Dim32,
    pub stretch:Option<StretchShrink>,
    pub shrink:Option<StretchShrink>
}
impl Skip {
    pub fn new(base:Dim32,stretch:Option<StretchShrink>,shrink:Option<StretchShrink>) -> Self {
        // zero components are normalized away so that `0pt plus 0pt` equals `0pt`
        let stretch = stretch.filter(|s| s.value() != 0);
        let shrink = shrink.filter(|s| s.value() != 0);
        Skip { base, stretch, shrink }
    }
    /// Componentwise multiplication by `times/div` (`\multiply`, `\divide`); `None` on division by
    /// zero or if a component leaves the range of [`MAX_DIM`].
    pub fn scale(&self,times:i32,div:i32) -> Option<Self> {
        if div == 0 { return None }
        let f = |i:i32| bounded((i as i64) * (times as i64) / (div as i64));
        let base = bounded(self.base.0 as i64 * times as i64 / div as i64)?;
        Some(Skip::new(Dim32(base),Self::map_opt(self.stretch,f)?,Self::map_opt(self.shrink,f)?))
    }
    /// Componentwise sum (`\advance`); `None` if a component leaves the range of [`MAX_DIM`].
    pub fn checked_add(self,rhs:Self) -> Option<Self> {
        let base = bounded(self.base.0 as i64 + rhs.base.0 as i64)?;
        Some(Skip::new(Dim32(base),Self::add_component(self.stretch,rhs.stretch)?,Self::add_component(self.shrink,rhs.shrink)?))
    }
    fn map_opt(s:Option<StretchShrink>,f:impl Fn(i32) -> Option<i32>) -> Option<Option<StretchShrink>> {
        match s {
            None => Some(None),
            Some(s) => s.try_map(f).map(Some)
        }
    }
    fn add_component(a:Option<StretchShrink>,b:Option<StretchShrink>) -> Option<Option<StretchShrink>> {
        use StretchShrink::*;
        let sum = |a:i32,b:i32| bounded(a as i64 + b as i64);
        Some(match (a,b) {
            (None,o) | (o,None) => o,
            (Some(Dim(a)),Some(Dim(b))) => Some(Dim(Dim32(sum(a.0,b.0)?))),
            (Some(Fil(a)),Some(Fil(b))) => Some(Fil(sum(a,b)?)),
            (Some(Fill(a)),Some(Fill(b))) => Some(Fill(sum(a,b)?)),
            (Some(Filll(a)),Some(Filll(b))) => Some(Filll(sum(a,b)?)),
            // the higher order wins
            (Some(a),Some(b)) => if Self::order(&a) > Self::order(&b) { Some(a) } else { Some(b) }
        })
    }
    fn order(s:&StretchShrink) -> u8 {
        match s {
            StretchShrink::Dim(_) => 0,
            StretchShrink::Fil(_) => 1,
            StretchShrink::Fill(_) => 2,
            StretchShrink::Filll(_) => 3
        }
    }
}
impl Neg for Skip {
    type Output = Self;
    fn neg(self) -> Self {
        Skip::new(-self.base,self.stretch.map(|s| s.map(|i| -i)),self.shrink.map(|s| s.map(|i| -i)))
    }
}
impl Display for Skip {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f,"{}",self.base)?;
        if let Some(s) = &self.stretch { write!(f," plus {}",s)?; }
        if let Some(s) = &self.shrink { write!(f," minus {}",s)?; }
        Ok(())
    }
}

fn bounded(v:i64) -> Option<i32> {
    if v.abs() > MAX_DIM as i64 { None } else { i32::try_from(v).ok() }
}

/// A physical unit: `(num,denom)` such that `1unit = num/denom pt`.
pub fn unit_ratio(unit:&str) -> Option<(i32,i32)> {
    Some(match unit {
        "pt" => (1,1),
        "in" => (7227,100),
        "pc" => (12,1),
        "cm" => (7227,254),
        "mm" => (7227,2540),
        "bp" => (7227,7200),
        "dd" => (1238,1157),
        "cc" => (14856,1157),
        _ => return None
    })
}
/// The physical units in the order they are tried when reading a dimension.
pub const PHYSICAL_UNITS : [&str;9] = ["pt","in","pc","cm","mm","bp","dd","cc","sp"];

/// Converts up to 17 decimal digits after the decimal point into a fraction of [`UNITY`], rounded.
pub fn round_decimals(digits:&[u8]) -> i32 {
    let mut a : i32 = 0;
    for d in digits.iter().take(17).rev() {
        a = (a + (*d as i32) * 0o400000) / 10;
    }
    (a + 1) / 2
}

/// `(x*n)/d` with the remainder, computed without overflow; `None` if the result exceeds
/// [`MAX_DIM`]. `x` may be negative, `n` and `d` must be positive.
pub fn xn_over_d(x:i32,n:i32,d:i32) -> Option<(i32,i32)> {
    let neg = x < 0;
    let x = (x as i64).abs();
    let prod = x * (n as i64);
    let q = prod / (d as i64);
    let r = prod % (d as i64);
    if q > MAX_DIM as i64 { return None }
    if neg { Some((-(q as i32),-(r as i32))) } else { Some((q as i32,r as i32)) }
}

/// The dimension `int.frac unit`, where `frac` is a fraction of [`UNITY`] as returned by
/// [`round_decimals`]. `None` if the result is too large.
pub fn attach_unit(int:i32,frac:i32,(num,denom):(i32,i32)) -> Option<Dim32> {
    let (mut int,mut frac) = (int,frac);
    if (num,denom) != (1,1) {
        let (q,r) = xn_over_d(int,num,denom)?;
        let f = ((num as i64) * (frac as i64) + 65536i64 * (r as i64)) / (denom as i64);
        int = q + (f / 65536) as i32;
        frac = (f % 65536) as i32;
    }
    if int >= 0o40000 { return None }
    Some(Dim32(int * UNITY + frac))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printing() {
        assert_eq!(Dim32(0).to_string(),"0.0pt");
        assert_eq!(Dim32::from_pt(1).to_string(),"1.0pt");
        assert_eq!(Dim32(-98304).to_string(),"-1.5pt");
        assert_eq!(Dim32(1).to_string(),"0.00002pt");
        let sk = Skip::new(Dim32::from_pt(3),Some(StretchShrink::Fil(UNITY)),Some(StretchShrink::Dim(Dim32::from_pt(1))));
        assert_eq!(sk.to_string(),"3.0pt plus 1.0fil minus 1.0pt");
    }

    #[test]
    fn units() {
        let d = attach_unit(1,0,unit_ratio("in").unwrap()).unwrap();
        assert_eq!(d.to_string(),"72.26999pt");
        // 2.5pt
        let d = attach_unit(2,round_decimals(&[5]),(1,1)).unwrap();
        assert_eq!(d,Dim32(163840));
        assert!(attach_unit(20000,0,(1,1)).is_none());
    }

    #[test]
    fn glue_arithmetic() {
        let a = Skip::new(Dim32::from_pt(1),Some(StretchShrink::Dim(Dim32::from_pt(2))),None);
        let b = Skip::new(Dim32::from_pt(1),Some(StretchShrink::Fil(UNITY)),None);
        let c = a.checked_add(b).unwrap();
        assert_eq!(c.base,Dim32::from_pt(2));
        assert_eq!(c.stretch,Some(StretchShrink::Fil(UNITY)));
        assert_eq!(a.scale(3,1).unwrap().to_string(),"3.0pt plus 6.0pt");
        assert!(a.scale(1,0).is_none());
        let big = Skip::new(Dim32::from_pt(16000),Some(StretchShrink::Fil(16000 * UNITY)),None);
        assert!(big.checked_add(big).is_none());
        assert!(big.scale(2,1).is_none());
        let fil = Skip::new(Dim32::ZERO,Some(StretchShrink::Fil(16000 * UNITY)),None);
        assert!(fil.checked_add(fil).is_none());
        assert!(fil.scale(-1,1).is_some());
    }
}
