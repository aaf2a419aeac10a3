/*! Fonts are opaque handles for the engine: `\font\x=cmr10 at 12pt` loads a font via a
    [`FontSystem`], and the current font is attached to every character [`Node`](crate::tex::nodes::Node).

    Metric data is none of the engine's business; [`DefaultFontSystem`] only reads the checksum and
    design size from the header of a `.tfm` file.
*/

use std::fmt::Debug;
use crate::engine::filesystem::{File, FileSystem};
use crate::tex::numerics::Dim32;
use crate::utils::errors::{ErrorKind, TeXError, TeXResult};
use crate::utils::Ptr;

/// A loaded font.
pub trait Font:Clone+Debug {
    /// The control sequence name type of identifiers.
    type CS:Clone+Debug;
    /// The control sequence the font was defined with, e.g. `\tenrm`.
    fn name(&self) -> &Self::CS;
    /// The font file name, e.g. `cmr10`.
    fn filename(&self) -> &str;
    fn checksum(&self) -> u32;
    fn design_size(&self) -> Dim32;
    /// The size the font is used at; the design size unless loaded with `at` or `scaled`.
    fn at_size(&self) -> Dim32;
}

/// Loads [`Font`]s.
pub trait FontSystem:Clone+Debug {
    type CS:Clone+Debug;
    type Font:Font<CS=Self::CS>;
    /// A new font system; `nullfont` is the identifier of `\nullfont`.
    fn new(nullfont:Self::CS) -> Self;
    /// `\nullfont`
    fn null(&self) -> Self::Font;
    /// Loads the font `name` (with `.tfm` appended unless present) as identifier `cs`. `at` is the
    /// size the font is requested at; negative values `-n` mean "scaled n" (in thousandths).
    fn new_font<F:FileSystem>(&mut self,name:&str,at:Option<Dim32>,cs:Self::CS,fs:&mut F) -> TeXResult<Self::Font>;
}

#[derive(Debug)]
pub struct FontInfo<CS> {
    pub name:CS,
    pub filename:String,
    pub checksum:u32,
    pub design_size:Dim32,
    pub at:Dim32
}

/// A shared [`FontInfo`].
#[derive(Clone,Debug)]
pub struct DefaultFont<CS>(Ptr<FontInfo<CS>>);
impl<CS:Clone+Debug> Font for DefaultFont<CS> {
    type CS = CS;
    fn name(&self) -> &CS { &self.0.name }
    fn filename(&self) -> &str { &self.0.filename }
    fn checksum(&self) -> u32 { self.0.checksum }
    fn design_size(&self) -> Dim32 { self.0.design_size }
    fn at_size(&self) -> Dim32 { self.0.at }
}
impl<CS> PartialEq for DefaultFont<CS> {
    fn eq(&self, other: &Self) -> bool { Ptr::ptr_eq(&self.0,&other.0) }
}

/// Reads checksum and design size from `.tfm` headers.
#[derive(Clone,Debug)]
pub struct DefaultFontSystem<CS> {
    null:DefaultFont<CS>
}
/// Parses the checksum and the design size (a fix_word in units of `2^-20pt`) from the first
/// two header words of a TFM file.
pub fn tfm_header(bytes:&[u8]) -> Option<(u32,Dim32)> {
    let word = |i:usize| -> Option<u32> {
        bytes.get(i..i+4).map(|b| u32::from_be_bytes([b[0],b[1],b[2],b[3]]))
    };
    // lh, the header length in words, is the second halfword
    let lh = u16::from_be_bytes([*bytes.get(2)?,*bytes.get(3)?]);
    if lh < 2 { return None }
    let checksum = word(24)?;
    let ds = word(28)? as i32;
    if ds <= 0 { return None }
    Some((checksum,Dim32(ds >> 4)))
}

impl<CS:Clone+Debug> FontSystem for DefaultFontSystem<CS> {
    type CS = CS;
    type Font = DefaultFont<CS>;
    fn new(nullfont:CS) -> Self {
        DefaultFontSystem { null:DefaultFont(Ptr::new(FontInfo {
            name:nullfont,
            filename:"nullfont".to_string(),
            checksum:0,
            design_size:Dim32::ZERO,
            at:Dim32::ZERO
        }))}
    }
    fn null(&self) -> DefaultFont<CS> { self.null.clone() }
    fn new_font<F:FileSystem>(&mut self, name: &str, at: Option<Dim32>, cs: CS, fs: &mut F) -> TeXResult<DefaultFont<CS>> {
        let path = if name.ends_with(".tfm") { name.to_string() } else { format!("{}.tfm",name) };
        let file = fs.get(&path);
        if !file.exists() {
            return Err(TeXError::new(ErrorKind::FontNotLoadable(name.to_string(),"Metric (TFM) file not found".to_string())))
        }
        let bytes = file.read_bytes()?;
        let (checksum,design_size) = tfm_header(&bytes)
            .ok_or_else(|| TeXError::new(ErrorKind::FontNotLoadable(name.to_string(),"Bad metric (TFM) file".to_string())))?;
        let at = match at {
            None => design_size,
            Some(Dim32(s)) if s < 0 => design_size.scale(-s,1000).unwrap_or(design_size),
            Some(d) => d
        };
        log::debug!("Loaded font {} (checksum {:X}, design size {})",name,checksum,design_size);
        Ok(DefaultFont(Ptr::new(FontInfo { name:cs, filename:name.trim_end_matches(".tfm").to_string(), checksum, design_size, at })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use crate::engine::filesystem::VirtualFileSystem;

    fn tfm(checksum:u32,ds_pt:i32) -> Vec<u8> {
        let mut v = vec!(0,20,0,2);
        v.extend([0u8;20]);
        v.extend(checksum.to_be_bytes());
        v.extend((ds_pt << 20).to_be_bytes());
        v
    }

    #[test]
    fn load_fonts() {
        let mut fs = VirtualFileSystem::<u8>::new(PathBuf::from("/fonts"));
        fs.add_file("cmr10.tfm",tfm(0xDEADBEEF,10));
        let mut sys = DefaultFontSystem::new("nullfont".to_string());
        let f = sys.new_font("cmr10",None,"tenrm".to_string(),&mut fs).unwrap();
        assert_eq!(f.checksum(),0xDEADBEEF);
        assert_eq!(f.design_size(),Dim32::from_pt(10));
        assert_eq!(f.at_size(),Dim32::from_pt(10));
        let g = sys.new_font("cmr10",Some(Dim32(-1200)),"twelverm".to_string(),&mut fs).unwrap();
        assert_eq!(g.at_size(),Dim32::from_pt(12));
        assert_eq!(g.filename(),"cmr10");
        let err = sys.new_font("cmr12",None,"x".to_string(),&mut fs).unwrap_err();
        assert!(matches!(err.kind,ErrorKind::FontNotLoadable(..)));
        assert_eq!(sys.null().filename(),"nullfont");
    }
}
