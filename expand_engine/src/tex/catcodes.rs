/*!
    Category codes classify characters for the tokenizer ([`CategoryCode`]); a [`CategoryCodeScheme`]
    assigns one to every character. Tokens carry a [`CommandCode`] instead, which drops the codes
    that never survive tokenization and adds a few markers the engine uses internally.
*/

use std::fmt::Formatter;
use lazy_static::lazy_static;
use crate::tex::characters::Character;

/** The category code of a character, numbered `0..=15` as in TeX.

Conversion to and from the numeric value goes through [`u8`]:
```rust
use expand_engine::tex::catcodes::CategoryCode;

let num : u8 = CategoryCode::Parameter.into();
assert_eq!(num,6);
assert_eq!(CategoryCode::try_from(14).unwrap(),CategoryCode::Comment);
assert!(CategoryCode::try_from(16).is_err());
```
 */
#[derive(Copy,PartialEq,Eq,Clone,Hash,Default)]
pub enum CategoryCode {
    /// 0, usually `\`
    Escape,
    /// 1, usually `{`
    BeginGroup,
    /// 2, usually `}`
    EndGroup,
    /// 3, usually `$`
    MathShift,
    /// 4, usually `&`
    AlignmentTab,
    /// 5, usually `^^M`
    EOL,
    /// 6, usually `#`
    Parameter,
    /// 7, usually `^`
    Superscript,
    /// 8, usually `_`
    Subscript,
    /// 9, e.g. `^^@`
    Ignored,
    /// 10, usually ` `
    Space,
    /// 11, usually `a-z` and `A-Z`
    Letter,
    /// 12
    #[default]
    Other,
    /// 13, usually `~`
    Active,
    /// 14, usually `%`
    Comment,
    /// 15, e.g. `^^?`
    Invalid
}

impl CategoryCode {
    /// All category codes in numeric order.
    pub const ALL : [CategoryCode;16] = {
        use CategoryCode::*;
        [Escape,BeginGroup,EndGroup,MathShift,AlignmentTab,EOL,Parameter,Superscript,Subscript,
            Ignored,Space,Letter,Other,Active,Comment,Invalid]
    };
    /// The TeX name of the category, as used e.g. by `\show` and `\meaning` (`begin-group character {`).
    pub fn meaning_name(&self) -> &'static str {
        use CategoryCode::*;
        match self {
            Escape => "escape character",
            BeginGroup => "begin-group character",
            EndGroup => "end-group character",
            MathShift => "math shift character",
            AlignmentTab => "alignment tab character",
            EOL => "end-of-line character",
            Parameter => "macro parameter character",
            Superscript => "superscript character",
            Subscript => "subscript character",
            Ignored => "ignored character",
            Space => "blank space",
            Letter => "the letter",
            Other => "the character",
            Active => "active character",
            Comment => "comment character",
            Invalid => "invalid character"
        }
    }
}

impl std::fmt::Debug for CategoryCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self,f)
    }
}
impl std::fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use CategoryCode::*;
        f.write_str(match self {
            Escape => "Escape",
            BeginGroup => "BeginGroup",
            EndGroup => "EndGroup",
            MathShift => "MathShift",
            AlignmentTab => "AlignmentTab",
            EOL => "EOL",
            Parameter => "Parameter",
            Superscript => "Superscript",
            Subscript => "Subscript",
            Ignored => "Ignored",
            Space => "Space",
            Letter => "Letter",
            Other => "Other",
            Active => "Active",
            Comment => "Comment",
            Invalid => "Invalid"
        })
    }
}

impl From<CategoryCode> for u8 {
    fn from(cc: CategoryCode) -> u8 {
        CategoryCode::ALL.iter().position(|c| *c == cc).map(|i| i as u8).unwrap_or(12)
    }
}

impl TryFrom<u8> for CategoryCode {
    type Error = ();
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CategoryCode::ALL.get(value as usize).copied().ok_or(())
    }
}

/** The code of a character token. Equals the [`CategoryCode`] for all categories that can actually
occur in a token, plus three internal markers:

* [`Noexpand`](CommandCode::Noexpand) marks the next token as not to be expanded (`\noexpand`),
* [`Argument`](CommandCode::Argument) is a parameter slot `#n` in a macro body (the character is `n-1`),
* [`EOF`](CommandCode::EOF) signals the end of a file or string input.
*/
#[derive(Copy,Clone,PartialEq,Eq,Hash,Debug)]
pub enum CommandCode {
    Escape,
    BeginGroup,
    EndGroup,
    MathShift,
    AlignmentTab,
    Parameter,
    Superscript,
    Subscript,
    Space,
    Letter,
    Other,
    Active,
    Noexpand,
    Argument,
    EOF
}
impl CommandCode {
    /// Numeric representation; the `0..=13` range agrees with [`CategoryCode`].
    pub fn as_byte(self) -> u8 {
        use CommandCode::*;
        match self {
            Escape => 0,
            BeginGroup => 1,
            EndGroup => 2,
            MathShift => 3,
            AlignmentTab => 4,
            Parameter => 6,
            Superscript => 7,
            Subscript => 8,
            Space => 10,
            Letter => 11,
            Other => 12,
            Active => 13,
            Noexpand => 16,
            Argument => 17,
            EOF => 18
        }
    }
    /// The corresponding [`CategoryCode`], if any.
    pub fn category(self) -> Option<CategoryCode> {
        match self {
            CommandCode::Noexpand | CommandCode::Argument | CommandCode::EOF => None,
            o => CategoryCode::try_from(o.as_byte()).ok()
        }
    }
}
impl From<CategoryCode> for CommandCode {
    /// Categories that never produce tokens (e.g. [`Comment`](CategoryCode::Comment)) are mapped to
    /// [`Other`](CommandCode::Other).
    fn from(value: CategoryCode) -> Self {
        use CategoryCode as C;
        match value {
            C::Escape => CommandCode::Escape,
            C::BeginGroup => CommandCode::BeginGroup,
            C::EndGroup => CommandCode::EndGroup,
            C::MathShift => CommandCode::MathShift,
            C::AlignmentTab => CommandCode::AlignmentTab,
            C::Parameter => CommandCode::Parameter,
            C::Superscript => CommandCode::Superscript,
            C::Subscript => CommandCode::Subscript,
            C::Space => CommandCode::Space,
            C::Letter => CommandCode::Letter,
            C::Active => CommandCode::Active,
            C::EOL | C::Ignored | C::Other | C::Comment | C::Invalid => CommandCode::Other
        }
    }
}
impl TryFrom<u8> for CommandCode {
    type Error = ();
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use CommandCode::*;
        Ok(match value {
            0 => Escape,
            1 => BeginGroup,
            2 => EndGroup,
            3 => MathShift,
            4 => AlignmentTab,
            6 => Parameter,
            7 => Superscript,
            8 => Subscript,
            10 => Space,
            11 => Letter,
            12 => Other,
            13 => Active,
            16 => Noexpand,
            17 => Argument,
            18 => EOF,
            _ => return Err(())
        })
    }
}

/// Assigns a [`CategoryCode`] to every character.
pub type CategoryCodeScheme<C> = <C as Character>::CharMap<CategoryCode>;

lazy_static! {
    /** Everything [`Other`](CategoryCode::Other) except the space character; used for `\string`-like
    conversions of strings into tokens.
     */
    pub static ref OTHER_SCHEME_U8 : CategoryCodeScheme<u8> = {
        let mut catcodes = [CategoryCode::Other;256];
        catcodes[32] = CategoryCode::Space;
        catcodes
    };
    /**
    The scheme INITEX starts with: letters, `\` escape, `%` comment, ` ` space, `^^M` end of line,
    `^^@` ignored, `^^?` invalid, everything else [`Other`](CategoryCode::Other).
    */
    pub static ref STARTING_SCHEME_U8 : CategoryCodeScheme<u8> = {
        let mut catcodes = [CategoryCode::Other;256];
        catcodes[0] = CategoryCode::Ignored;
        catcodes[127] = CategoryCode::Invalid;
        catcodes[92] = CategoryCode::Escape;
        catcodes[32] = CategoryCode::Space;
        catcodes[13] = CategoryCode::EOL;
        catcodes[37] = CategoryCode::Comment;
        for c in catcodes.iter_mut().take(91).skip(65) { *c = CategoryCode::Letter }
        for c in catcodes.iter_mut().take(123).skip(97) { *c = CategoryCode::Letter }
        catcodes
    };
    /**
    The scheme plain TeX establishes: [`STARTING_SCHEME_U8`] plus

    | Character | Category Code |
    |-----------|---------------|
    | `{` `}`   | [`BeginGroup`](CategoryCode::BeginGroup), [`EndGroup`](CategoryCode::EndGroup) |
    | `$`       | [`MathShift`](CategoryCode::MathShift) |
    | `&`       | [`AlignmentTab`](CategoryCode::AlignmentTab) |
    | `#`       | [`Parameter`](CategoryCode::Parameter) |
    | `^` `_`   | [`Superscript`](CategoryCode::Superscript), [`Subscript`](CategoryCode::Subscript) |
    | `~`       | [`Active`](CategoryCode::Active) |
    | `^^I`     | [`Space`](CategoryCode::Space) |
     */
    pub static ref DEFAULT_SCHEME_U8 : CategoryCodeScheme<u8> = {
        let mut catcodes = STARTING_SCHEME_U8.clone();
        catcodes[123] = CategoryCode::BeginGroup;
        catcodes[125] = CategoryCode::EndGroup;
        catcodes[36] = CategoryCode::MathShift;
        catcodes[38] = CategoryCode::AlignmentTab;
        catcodes[35] = CategoryCode::Parameter;
        catcodes[94] = CategoryCode::Superscript;
        catcodes[95] = CategoryCode::Subscript;
        catcodes[126] = CategoryCode::Active;
        catcodes[9] = CategoryCode::Space;
        catcodes
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn command_codes_agree() {
        for cc in CategoryCode::ALL {
            let code : CommandCode = cc.into();
            if let Some(back) = code.category() {
                if !matches!(cc,CategoryCode::EOL | CategoryCode::Ignored | CategoryCode::Comment | CategoryCode::Invalid) {
                    assert_eq!(back,cc);
                }
            }
        }
        assert_eq!(CommandCode::try_from(17),Ok(CommandCode::Argument));
        assert_eq!(DEFAULT_SCHEME_U8[b'{' as usize],CategoryCode::BeginGroup);
        assert_eq!(STARTING_SCHEME_U8[b'{' as usize],CategoryCode::Other);
    }
}
