/*! Configuration of an engine instance, fixed at construction time. */

use crate::tex::catcodes::CategoryCode;

/// How the engine reacts to errors; changed at runtime by `\batchmode`, `\nonstopmode`,
/// `\scrollmode` and `\errorstopmode`.
#[derive(Copy,Clone,PartialEq,Eq,Debug,Default)]
pub enum InteractionMode {
    /// Errors are logged, the job continues; no terminal output.
    Batch,
    /// Errors are logged, the job continues.
    #[default]
    Nonstop,
    /// Like [`Nonstop`](InteractionMode::Nonstop); there is no interactive terminal to scroll.
    Scroll,
    /// The first error ends the job.
    ErrorStop
}
impl InteractionMode {
    /// Parses `batch`, `nonstop`, `scroll` or `errorstop` (optionally followed by `mode`).
    pub fn from_name(s:&str) -> Option<Self> {
        match s.trim_end_matches("mode") {
            "batch" => Some(InteractionMode::Batch),
            "nonstop" => Some(InteractionMode::Nonstop),
            "scroll" => Some(InteractionMode::Scroll),
            "errorstop" => Some(InteractionMode::ErrorStop),
            _ => None
        }
    }
}

/** The initial category codes. Characters not mentioned get [`Other`](CategoryCode::Other),
    except for `^^@` ([`Ignored`](CategoryCode::Ignored)), `^^?` ([`Invalid`](CategoryCode::Invalid))
    and the end-of-line character `^^M` ([`EOL`](CategoryCode::EOL)).

    The [`Default`] corresponds to plain TeX.
*/
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct CatcodeConfig {
    pub escape_char:Option<u8>,
    pub comment_char:Option<u8>,
    pub space_chars:Vec<u8>,
    /// Inclusive ranges of letters.
    pub letters:Vec<(u8,u8)>,
    pub begin_group:Option<u8>,
    pub end_group:Option<u8>,
    pub parameter:Option<u8>,
    pub math_shift:Option<u8>,
    pub alignment_tab:Option<u8>,
    pub superscript:Option<u8>,
    pub subscript:Option<u8>,
    pub active:Vec<u8>
}
impl Default for CatcodeConfig {
    fn default() -> Self {
        CatcodeConfig {
            escape_char:Some(b'\\'),
            comment_char:Some(b'%'),
            space_chars:vec!(b' ',b'\t'),
            letters:vec!((b'a',b'z'),(b'A',b'Z')),
            begin_group:Some(b'{'),
            end_group:Some(b'}'),
            parameter:Some(b'#'),
            math_shift:Some(b'$'),
            alignment_tab:Some(b'&'),
            superscript:Some(b'^'),
            subscript:Some(b'_'),
            active:vec!(b'~')
        }
    }
}
impl CatcodeConfig {
    /// The INITEX scheme: only escape, comment, space and letters.
    pub fn initex() -> Self {
        CatcodeConfig {
            escape_char:Some(b'\\'),
            comment_char:Some(b'%'),
            space_chars:vec!(b' '),
            letters:vec!((b'a',b'z'),(b'A',b'Z')),
            begin_group:None, end_group:None, parameter:None, math_shift:None,
            alignment_tab:None, superscript:None, subscript:None,
            active:vec!()
        }
    }
    /// The pairs `(character,category)` this configuration assigns, in order of precedence
    /// (later entries win).
    pub fn assignments(&self) -> Vec<(u8,CategoryCode)> {
        let mut ret = vec!((0,CategoryCode::Ignored),(127,CategoryCode::Invalid),(13,CategoryCode::EOL));
        for (a,b) in &self.letters {
            for c in *a..=*b { ret.push((c,CategoryCode::Letter)) }
        }
        for c in &self.space_chars { ret.push((*c,CategoryCode::Space)) }
        for c in &self.active { ret.push((*c,CategoryCode::Active)) }
        let singles = [
            (self.begin_group,CategoryCode::BeginGroup),
            (self.end_group,CategoryCode::EndGroup),
            (self.math_shift,CategoryCode::MathShift),
            (self.alignment_tab,CategoryCode::AlignmentTab),
            (self.parameter,CategoryCode::Parameter),
            (self.superscript,CategoryCode::Superscript),
            (self.subscript,CategoryCode::Subscript),
            (self.comment_char,CategoryCode::Comment),
            (self.escape_char,CategoryCode::Escape),
        ];
        for (c,cc) in singles {
            if let Some(c) = c { ret.push((c,cc)) }
        }
        ret
    }
}

/// Configuration of an engine instance.
#[derive(Clone,Debug)]
pub struct EngineConfig {
    /// `\jobname`; if empty, derived from the first input file (or `texput` for string input).
    pub jobname:String,
    pub interaction:InteractionMode,
    /// The number of (recoverable) errors after which the job is aborted.
    pub error_limit:usize,
    /// The maximal number of nested input sources (files, macro expansions, ...).
    pub max_expansion_depth:usize,
    pub catcodes:CatcodeConfig,
    /// The initial `\endlinechar`; `None` for a value outside the character range.
    pub endlinechar:Option<u8>,
    /// The initial `\escapechar`.
    pub escapechar:Option<u8>
}
impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            jobname:String::new(),
            interaction:InteractionMode::default(),
            error_limit:100,
            max_expansion_depth:5000,
            catcodes:CatcodeConfig::default(),
            endlinechar:Some(b'\r'),
            escapechar:Some(b'\\')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn catcode_config() {
        let cfg = CatcodeConfig::default();
        let ass = cfg.assignments();
        assert!(ass.contains(&(b'{',CategoryCode::BeginGroup)));
        assert!(ass.contains(&(b'q',CategoryCode::Letter)));
        assert!(!CatcodeConfig::initex().assignments().contains(&(b'#',CategoryCode::Parameter)));
        assert_eq!(InteractionMode::from_name("batchmode"),Some(InteractionMode::Batch));
        assert_eq!(InteractionMode::from_name("errorstop"),Some(InteractionMode::ErrorStop));
        assert_eq!(InteractionMode::from_name("loud"),None);
    }
}
