/*! The control sequence interner and a pool of token buffers. */

use crate::tex::tokens::control_sequences::CSName;
use crate::tex::tokens::token_lists::TokenList;
use crate::tex::tokens::Token;

type Handler<T> = <<T as Token>::CS as CSName<<T as Token>::Char>>::Handler;

/// Owns the [`CSHandler`](crate::tex::tokens::control_sequences::CSHandler) and recycles the
/// `Vec`s used for macro arguments and expansions, which are requested and dropped constantly.
#[derive(Clone)]
pub struct MemoryManager<T: Token> {
    cs_interner: Handler<T>,
    pool: Vec<Vec<T>>,
    empty: TokenList<T>,
}
impl<T: Token> Default for MemoryManager<T> {
    fn default() -> Self {
        MemoryManager { cs_interner: Default::default(), pool: Vec::new(), empty: TokenList::default() }
    }
}
impl<T: Token> MemoryManager<T> {
    /// An empty buffer; hand it back with [`return_token_vec`](Self::return_token_vec) when done.
    pub fn get_token_vec(&mut self) -> Vec<T> {
        self.pool.pop().unwrap_or_default()
    }
    pub fn return_token_vec(&mut self, mut v: Vec<T>) {
        v.clear();
        self.pool.push(v)
    }
    pub fn cs_interner_mut(&mut self) -> &mut Handler<T> { &mut self.cs_interner }
    pub fn cs_interner(&self) -> &Handler<T> { &self.cs_interner }
    /// The shared empty token list every unset token register starts with.
    pub fn empty_list(&self) -> TokenList<T> { self.empty.clone() }
}
