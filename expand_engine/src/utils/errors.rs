/*! Errors and recovery.

   Every operation that can fail returns a [`TeXResult`]. Errors are reported through a single
   channel ([`EngineReferences::error`](crate::engine::EngineReferences::error)), which logs them,
   counts them and decides, based on the [`InteractionMode`], whether the job continues. If it does,
   the caller recovers locally the way TeX does (skipping a token, assuming `0`, ignoring a brace, ...);
   otherwise the error is propagated with `?` up to the job driver.
 */

use std::fmt::{Display, Formatter};
use crate::engine::config::InteractionMode;

/// Whether an error can be recovered from at all.
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum Severity {
    /// Reported; the job may continue depending on the [`InteractionMode`] and the error count.
    Recoverable,
    /// Always ends the job.
    Fatal
}

/// The broad class of an [`ErrorKind`].
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum ErrorCategory { Lexical, Scope, Expansion, Primitive, Job }

/// A position in an input file or string.
#[derive(Clone,PartialEq,Eq,Debug)]
pub struct SourcePosition {
    /// The file name, or `None` for string input.
    pub file:Option<String>,
    pub line:usize,
    pub column:usize
}
impl Display for SourcePosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f,"{} l.{} c.{}",file,self.line,self.column),
            None => write!(f,"l.{} c.{}",self.line,self.column)
        }
    }
}

/// What went wrong.
#[derive(Clone,PartialEq,Eq,Debug,thiserror::Error)]
pub enum ErrorKind {
    #[error("Text line contains an invalid character ({0})")]
    InvalidCharacter(String),
    #[error("Invalid code ({value}), should be in the range {min}..{max}")]
    InvalidCode{ value:i64, min:i64, max:i64 },
    #[error("Too many }}'s")]
    TooManyCloses,
    #[error("Extra {0}")]
    ExtraEndGroup(String),
    #[error("Extra {0}")]
    ExtraConditional(String),
    #[error("Undefined control sequence {0}")]
    Undefined(String),
    #[error("Runaway argument? File ended while scanning use of {0}")]
    RunawayArgument(String),
    #[error("Runaway argument? Paragraph ended before {0} was complete")]
    ParagraphEnded(String),
    #[error("Use of {0} doesn't match its definition")]
    DoesNotMatchDefinition(String),
    #[error("Expansion too deep (more than {0} nested input levels)")]
    ExpansionTooDeep(usize),
    #[error("Illegal parameter number in definition of {0}")]
    IllegalParameterNumber(String),
    #[error("Missing number, treated as zero")]
    MissingNumber,
    #[error("Illegal unit of measure (pt inserted)")]
    IllegalUnit,
    #[error("Missing control sequence inserted")]
    MissingCS,
    #[error("Missing {0} inserted")]
    Missing(String),
    #[error("Number too big")]
    NumberTooBig,
    #[error("Dimension too large")]
    DimensionTooLarge,
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
    #[error("Bad register code ({0})")]
    BadRegister(i64),
    #[error("You can't use `{0}' {1}")]
    CantUse(String,String),
    #[error("Unexpected end of input while scanning {0}")]
    UnexpectedEOF(String),
    #[error("{0}")]
    ErrMessage(String),
    #[error("I can't find file `{0}'")]
    FileNotFound(String),
    #[error("Font {0} not loadable: {1}")]
    FontNotLoadable(String,String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("That makes {0} errors; please try again")]
    ErrorLimitReached(usize),
    #[error("Emergency stop")]
    EmergencyStop
}
impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        use ErrorKind::*;
        match self {
            InvalidCharacter(_) | InvalidCode{..} => ErrorCategory::Lexical,
            TooManyCloses | ExtraEndGroup(_) | ExtraConditional(_) => ErrorCategory::Scope,
            Undefined(_) | RunawayArgument(_) | ParagraphEnded(_) | DoesNotMatchDefinition(_) |
                ExpansionTooDeep(_) | IllegalParameterNumber(_) => ErrorCategory::Expansion,
            MissingNumber | IllegalUnit | MissingCS | Missing(_) | NumberTooBig | DimensionTooLarge |
                ArithmeticOverflow | BadRegister(_) | CantUse(..) | UnexpectedEOF(_) => ErrorCategory::Primitive,
            ErrMessage(_) | FileNotFound(_) | FontNotLoadable(..) | Io(_) | ErrorLimitReached(_) | EmergencyStop => ErrorCategory::Job
        }
    }
    /// Running out of stack, out of patience or out of input cannot be recovered from.
    pub fn default_severity(&self) -> Severity {
        match self {
            ErrorKind::ExpansionTooDeep(_) | ErrorKind::ErrorLimitReached(_) |
            ErrorKind::EmergencyStop | ErrorKind::Io(_) => Severity::Fatal,
            _ => Severity::Recoverable
        }
    }
}

fn location_suffix(loc:&Option<SourcePosition>) -> String {
    match loc {
        Some(p) => format!("\n{}",p),
        None => String::new()
    }
}

/// An error with its severity and the input position where it occurred.
#[derive(Clone,PartialEq,Eq,Debug,thiserror::Error)]
#[error("! {kind}.{}", location_suffix(.location))]
pub struct TeXError {
    pub kind:ErrorKind,
    pub severity:Severity,
    pub location:Option<SourcePosition>
}
impl TeXError {
    /// A new error with the [default severity](ErrorKind::default_severity) of its kind.
    pub fn new(kind:ErrorKind) -> Self {
        let severity = kind.default_severity();
        TeXError { kind, severity, location:None }
    }
    pub fn fatal(kind:ErrorKind) -> Self {
        TeXError { kind, severity:Severity::Fatal, location:None }
    }
    pub fn at(mut self,location:Option<SourcePosition>) -> Self {
        if self.location.is_none() { self.location = location }
        self
    }
    pub fn is_fatal(&self) -> bool { self.severity == Severity::Fatal }
}
impl From<std::io::Error> for TeXError {
    fn from(e: std::io::Error) -> Self { TeXError::new(ErrorKind::Io(e.to_string())) }
}

/// Result type for all fallible engine operations.
pub type TeXResult<A> = Result<A,TeXError>;

/// Decides whether the job continues after `err` has been reported, given that `errors` errors
/// (including this one) have been reported so far. Returns the error that ends the job otherwise.
pub fn recovery_policy(err:TeXError,mode:InteractionMode,errors:usize,limit:usize) -> TeXResult<()> {
    if err.is_fatal() { return Err(err) }
    if mode == InteractionMode::ErrorStop { return Err(TeXError { severity:Severity::Fatal,..err }) }
    if errors >= limit {
        return Err(TeXError::fatal(ErrorKind::ErrorLimitReached(errors)).at(err.location))
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy() {
        let e = TeXError::new(ErrorKind::Undefined("\\foo".into()));
        assert!(recovery_policy(e.clone(),InteractionMode::Nonstop,1,100).is_ok());
        assert!(recovery_policy(e.clone(),InteractionMode::ErrorStop,1,100).is_err());
        let limit = recovery_policy(e.clone(),InteractionMode::Batch,100,100).unwrap_err();
        assert_eq!(limit.kind,ErrorKind::ErrorLimitReached(100));
        let deep = TeXError::new(ErrorKind::ExpansionTooDeep(10));
        assert!(recovery_policy(deep,InteractionMode::Scroll,1,100).is_err());
        assert_eq!(e.to_string(),"! Undefined control sequence \\foo.");
        assert_eq!(e.kind.category(),ErrorCategory::Expansion);
    }
}
