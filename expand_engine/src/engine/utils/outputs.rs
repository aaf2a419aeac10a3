/*! Where user-visible output of the engine goes: `\message`, error messages, tracing output,
    file open/close notifications.

    The default methods of [`Outputs`] forward everything to the [`log`] facade with fixed
    targets, so a binary decides what to show by configuring its logger.
*/
use std::cell::RefCell;
use std::fmt::Display;

/// The sink for user-visible output.
pub trait Outputs {
    fn new() -> Self;
    /// `\message`
    #[inline(always)]
    fn message<D:Display>(&self,text:D) {
        log::info!(target:"message","{}",text);
    }
    /// Error messages; called once for every error reported.
    #[inline(always)]
    fn errmessage<D:Display>(&self,text:D) {
        log::error!(target:"errmessage","{}",text);
    }
    #[inline(always)]
    fn file_open<D:Display>(&self,text:D) {
        log::info!(target:"file","({}",text);
    }
    #[inline(always)]
    fn file_close<D:Display>(&self,_text:D) {
        log::info!(target:"file",")");
    }
    /// Terminal and log file, e.g. `\show`.
    #[inline(always)]
    fn write_16<D:Display>(&self,text:D) {
        log::info!(target:"write::16","{}",text);
    }
    /// Log file only; tracing output.
    #[inline(always)]
    fn write_neg1<D:Display>(&self,text:D) {
        log::info!(target:"write::-1","{}",text);
    }
}

/// [`Outputs`] that only log.
pub struct LogOutputs;
impl Outputs for LogOutputs {
    fn new() -> Self { Self }
}

/// Which method of [`Outputs`] produced a line.
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum OutputKind { Message, Error, FileOpen, FileClose, Write16, WriteNeg1 }

/// [`Outputs`] that log and additionally keep every line in memory.
#[derive(Default)]
pub struct CollectingOutputs {
    lines:RefCell<Vec<(OutputKind,String)>>
}
impl CollectingOutputs {
    fn push<D:Display>(&self,kind:OutputKind,text:D) {
        self.lines.borrow_mut().push((kind,text.to_string()))
    }
    /// All lines of the given kind so far.
    pub fn get(&self,kind:OutputKind) -> Vec<String> {
        self.lines.borrow().iter().filter(|(k,_)| *k == kind).map(|(_,s)| s.clone()).collect()
    }
    pub fn errors(&self) -> Vec<String> { self.get(OutputKind::Error) }
    pub fn messages(&self) -> Vec<String> { self.get(OutputKind::Message) }
    /// Terminal output and tracing output, in order.
    pub fn log_lines(&self) -> Vec<String> {
        self.lines.borrow().iter()
            .filter(|(k,_)| matches!(k,OutputKind::Write16 | OutputKind::WriteNeg1))
            .map(|(_,s)| s.clone()).collect()
    }
    pub fn clear(&self) { self.lines.borrow_mut().clear() }
}
impl Outputs for CollectingOutputs {
    fn new() -> Self { Self::default() }
    fn message<D:Display>(&self,text:D) {
        log::info!(target:"message","{}",text);
        self.push(OutputKind::Message,text)
    }
    fn errmessage<D:Display>(&self,text:D) {
        log::error!(target:"errmessage","{}",text);
        self.push(OutputKind::Error,text)
    }
    fn file_open<D:Display>(&self,text:D) {
        log::info!(target:"file","({}",text);
        self.push(OutputKind::FileOpen,text)
    }
    fn file_close<D:Display>(&self,text:D) {
        log::info!(target:"file",")");
        self.push(OutputKind::FileClose,text)
    }
    fn write_16<D:Display>(&self,text:D) {
        log::info!(target:"write::16","{}",text);
        self.push(OutputKind::Write16,text)
    }
    fn write_neg1<D:Display>(&self,text:D) {
        log::info!(target:"write::-1","{}",text);
        self.push(OutputKind::WriteNeg1,text)
    }
}
