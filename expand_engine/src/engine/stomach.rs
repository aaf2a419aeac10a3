/*! The [`Stomach`] executes what the [`Gullet`](crate::engine::gullet::Gullet) hands it: characters
    become [`Node`]s, braces open and close groups, assignments and other unexpandable primitives
    are executed. Nodes go into the innermost open box, or to the [`Typesetter`] if there is none.
*/
use std::marker::PhantomData;
use either::Either;
use crate::commands::{BoxSpec, PrimitiveCommand, ResolvedToken, TeXCommand};
use crate::commands::primitives::{PrimitiveIdentifier, PRIMITIVES};
use crate::engine::{EngineReferences, EngineTypes};
use crate::engine::state::{GroupType, State};
use crate::tex::catcodes::CommandCode;
use crate::tex::characters::Character;
use crate::tex::nodes::{BoxType, Node, TeXBox, Typesetter};
use crate::tex::numerics::Dim32;
use crate::tex::tokens::token_lists::TokenList;
use crate::utils::errors::{ErrorKind, TeXResult};

/// `\global`, `\long`, `\protected` and `\outer`, as far as they have been read before the command
/// they apply to.
#[derive(Copy,Clone,Default,PartialEq,Eq,Debug)]
pub struct Prefixes {
    pub global:bool,
    pub long:bool,
    pub protected:bool,
    pub outer:bool
}
impl Prefixes {
    pub fn any(&self) -> bool { self.global || self.long || self.protected || self.outer }
}

/// Where a box goes when it is closed.
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum BoxTarget {
    /// Appended to the current list.
    List,
    /// Stored in a box register (`\setbox`).
    Register{ idx:usize, global:bool }
}

/// A box whose contents are currently being built.
#[derive(Clone,Debug)]
pub struct OpenBox<ET:EngineTypes> {
    pub spec:BoxSpec,
    pub children:Vec<Node<ET>>,
    pub target:BoxTarget,
    /// Only meaningful for vertical boxes.
    pub in_paragraph:bool
}

/// The state of the stomach.
pub struct Stomach<ET:EngineTypes> {
    /// The token set by `\afterassignment`.
    pub afterassignment:Option<ET::Token>,
    pub prefixes:Prefixes,
    /// Currently open boxes, innermost last.
    pub lists:Vec<OpenBox<ET>>,
    /// Set by `\end`.
    pub end:bool,
    /// Whether the outer list is inside a paragraph.
    pub in_paragraph:bool,
    phantom:PhantomData<ET>
}
impl<ET:EngineTypes> Default for Stomach<ET> {
    fn default() -> Self {
        Stomach { afterassignment:None, prefixes:Prefixes::default(), lists:Vec::new(), end:false, in_paragraph:false, phantom:PhantomData }
    }
}

fn is_def(name:PrimitiveIdentifier) -> bool {
    name == PRIMITIVES.def || name == PRIMITIVES.edef || name == PRIMITIVES.gdef || name == PRIMITIVES.xdef
}
fn is_prefix(name:PrimitiveIdentifier) -> bool {
    name == PRIMITIVES.global || name == PRIMITIVES.long || name == PRIMITIVES.protected || name == PRIMITIVES.outer
}

impl<ET:EngineTypes> EngineReferences<'_,ET> {
    /// Processes tokens until the input is exhausted or `\end` is encountered.
    pub fn main_loop(&mut self) -> TeXResult<()> {
        while !self.stomach.end {
            match self.get_next_unexpandable()? {
                None => break,
                Some((t,r)) => self.digest(t,r)?
            }
        }
        Ok(())
    }

    /// Adds a node to the innermost open box, or hands it to the [`Typesetter`].
    pub fn push_node(&mut self,node:Node<ET>) {
        match self.stomach.lists.last_mut() {
            Some(b) => b.children.push(node),
            None => self.typesetter.push_node(node)
        }
    }

    /// Whether the current list is inside a paragraph; `None` in a horizontal box, where there are
    /// no paragraphs.
    pub fn paragraph_flag(&mut self) -> Option<&mut bool> {
        match self.stomach.lists.last_mut() {
            None => Some(&mut self.stomach.in_paragraph),
            Some(b) if b.spec.btype == BoxType::Vertical => Some(&mut b.in_paragraph),
            Some(_) => None
        }
    }

    /// Called before horizontal material `t` is added. If this starts a paragraph and `\everypar` is
    /// non-empty, `t` is put back behind the contents of `\everypar` and `true` is returned; the
    /// caller then stops processing `t`.
    pub fn start_paragraph(&mut self,t:&ET::Token) -> TeXResult<bool> {
        match self.paragraph_flag() {
            Some(f) if !*f => *f = true,
            _ => return Ok(false)
        }
        let everypar = self.state.get_primitive_toks(PRIMITIVES.everypar).clone();
        if everypar.is_empty() { return Ok(false) }
        self.mouth.requeue(t.clone());
        self.mouth.push_exp(&everypar)?;
        Ok(true)
    }

    /// Inserts the `\afterassignment` token, if any.
    pub fn after_assignment(&mut self) {
        if let Some(t) = self.stomach.afterassignment.take() {
            self.mouth.requeue(t)
        }
    }

    /// Executes a single unexpandable token.
    pub fn digest(&mut self,t:ET::Token,r:ResolvedToken<ET>) -> TeXResult<()> {
        let cmd = match r {
            ResolvedToken::Tk{char,code} => return self.digest_char(t,char,code),
            ResolvedToken::Cmd(None) => return Ok(()),
            ResolvedToken::Cmd(Some(cmd)) => cmd
        };
        self.trace_command(&t,1);
        match cmd {
            TeXCommand::Char{char,code} => self.digest_char(t,char,code),
            TeXCommand::Primitive{cmd:PrimitiveCommand::Relax,..} => Ok(()),
            TeXCommand::Primitive{name,cmd:PrimitiveCommand::Unexpandable(f)} if is_prefix(name) => f(self,t),
            TeXCommand::Primitive{name,cmd:PrimitiveCommand::Assignment(f)} => {
                let global = self.take_prefixes(&t,is_def(name))?;
                f(self,t,global)?;
                self.after_assignment();
                Ok(())
            }
            TeXCommand::Primitive{cmd:PrimitiveCommand::Int{assign:Some(f),..} | PrimitiveCommand::Dim{assign:Some(f),..} |
                PrimitiveCommand::Skip{assign:Some(f),..} | PrimitiveCommand::FontCmd{assign:Some(f),..},..} => {
                let global = self.take_prefixes(&t,false)?;
                f(self,t,global)?;
                self.after_assignment();
                Ok(())
            }
            TeXCommand::Primitive{cmd:PrimitiveCommand::Int{..} | PrimitiveCommand::Dim{..} |
                PrimitiveCommand::Skip{..} | PrimitiveCommand::FontCmd{..},..} => {
                self.take_prefixes(&t,false)?;
                let name = self.display_token(&t);
                self.error(ErrorKind::CantUse(name.trim_end().to_string(),"here".to_string()))
            }
            TeXCommand::Primitive{cmd:PrimitiveCommand::Unexpandable(f),..} => {
                self.no_prefixes(&t)?;
                f(self,t)
            }
            TeXCommand::Primitive{cmd:PrimitiveCommand::Box(f),..} => {
                self.no_prefixes(&t)?;
                match f(self,t)? {
                    Either::Left(Some(b)) => self.push_node(Node::Box(b)),
                    Either::Left(None) => (),
                    Either::Right(spec) => self.open_box(spec,BoxTarget::List)
                }
                Ok(())
            }
            TeXCommand::CharDef(char) => {
                self.no_prefixes(&t)?;
                if self.start_paragraph(&t)? { return Ok(()) }
                let font = self.state.get_current_font().clone();
                self.push_node(Node::Char{char,font});
                Ok(())
            }
            TeXCommand::Font(f) => {
                let global = self.take_prefixes(&t,false)?;
                self.state.set_current_font(self.aux,f,global);
                self.after_assignment();
                Ok(())
            }
            TeXCommand::IntRegister(idx) => self.assign_value(t,|e,g| {
                let v = e.read_int()?;
                e.state.set_int_register(e.aux,idx,v,g);
                Ok(())
            }),
            TeXCommand::DimRegister(idx) => self.assign_value(t,|e,g| {
                let v = e.read_dim()?;
                e.state.set_dim_register(e.aux,idx,v,g);
                Ok(())
            }),
            TeXCommand::SkipRegister(idx) => self.assign_value(t,|e,g| {
                let v = e.read_skip()?;
                e.state.set_skip_register(e.aux,idx,v,g);
                Ok(())
            }),
            TeXCommand::ToksRegister(idx) => self.assign_value(t.clone(),|e,g| {
                let v = e.read_toks_value(&t)?;
                e.state.set_toks_register(e.aux,idx,v,g);
                Ok(())
            }),
            TeXCommand::Primitive{name,cmd:PrimitiveCommand::PrimitiveInt} => self.assign_value(t,|e,g| {
                let v = e.read_int()?;
                e.state.set_primitive_int(e.aux,name,v,g);
                Ok(())
            }),
            TeXCommand::Primitive{name,cmd:PrimitiveCommand::PrimitiveDim} => self.assign_value(t,|e,g| {
                let v = e.read_dim()?;
                e.state.set_primitive_dim(e.aux,name,v,g);
                Ok(())
            }),
            TeXCommand::Primitive{name,cmd:PrimitiveCommand::PrimitiveSkip} => self.assign_value(t,|e,g| {
                let v = e.read_skip()?;
                e.state.set_primitive_skip(e.aux,name,v,g);
                Ok(())
            }),
            TeXCommand::Primitive{name,cmd:PrimitiveCommand::PrimitiveToks} => self.assign_value(t.clone(),|e,g| {
                let v = e.read_toks_value(&t)?;
                e.state.set_primitive_toks(e.aux,name,v,g);
                Ok(())
            }),
            // only reachable for tokens following a \noexpand marker
            cmd@(TeXCommand::Macro(_) | TeXCommand::Primitive{..}) => self.expand(t,cmd)
        }
    }

    /// An assignment of a value to a register or parameter: `=`, then whatever `read` reads.
    fn assign_value<F:FnOnce(&mut Self,bool) -> TeXResult<()>>(&mut self,t:ET::Token,read:F) -> TeXResult<()> {
        let global = self.take_prefixes(&t,false)?;
        self.skip_eq()?;
        read(self,global)?;
        self.after_assignment();
        Ok(())
    }

    /// Resets the prefixes before an assignment and returns whether it is global. `\long`, `\outer`
    /// and `\protected` are only allowed before definitions.
    fn take_prefixes(&mut self,t:&ET::Token,is_def:bool) -> TeXResult<bool> {
        let p = self.stomach.prefixes;
        if !is_def && (p.long || p.outer || p.protected) {
            self.stomach.prefixes = Prefixes::default();
            let name = self.display_token(t);
            self.error(ErrorKind::CantUse(name.trim_end().to_string(),"after \\long, \\outer or \\protected".to_string()))?;
        }
        if !is_def { self.stomach.prefixes = Prefixes::default() }
        Ok(p.global)
    }

    /// Reports and resets pending prefixes before a command that is not an assignment.
    fn no_prefixes(&mut self,t:&ET::Token) -> TeXResult<()> {
        if self.stomach.prefixes.any() {
            self.stomach.prefixes = Prefixes::default();
            let name = self.display_token(t);
            self.error(ErrorKind::CantUse(name.trim_end().to_string(),"after a prefix".to_string()))?;
        }
        Ok(())
    }

    fn digest_char(&mut self,t:ET::Token,char:ET::Char,code:CommandCode) -> TeXResult<()> {
        match code {
            // spaces between prefixes and the command are allowed
            CommandCode::Space if self.stomach.prefixes.any() => Ok(()),
            CommandCode::Space => {
                self.push_node(Node::Space);
                Ok(())
            }
            CommandCode::BeginGroup => {
                self.no_prefixes(&t)?;
                let line = self.mouth.line_number();
                self.state.push(self.aux,GroupType::Simple,line);
                Ok(())
            }
            CommandCode::EndGroup => {
                self.no_prefixes(&t)?;
                self.end_group()
            }
            CommandCode::Letter | CommandCode::Other | CommandCode::MathShift |
            CommandCode::Superscript | CommandCode::Subscript => {
                self.no_prefixes(&t)?;
                if self.start_paragraph(&t)? { return Ok(()) }
                let font = self.state.get_current_font().clone();
                self.push_node(Node::Char{char,font});
                Ok(())
            }
            CommandCode::Parameter | CommandCode::AlignmentTab => {
                self.no_prefixes(&t)?;
                let name = self.display_token(&t);
                self.error(ErrorKind::CantUse(name,"here".to_string()))
            }
            CommandCode::Escape | CommandCode::Active | CommandCode::Noexpand |
            CommandCode::Argument | CommandCode::EOF => Ok(())
        }
    }

    /// Closes the current group at a `}`; closing a box group finishes the box.
    pub fn end_group(&mut self) -> TeXResult<()> {
        match self.state.get_group_type() {
            GroupType::Simple => self.state.pop(self.aux,self.mouth),
            GroupType::Box(_) => {
                self.state.pop(self.aux,self.mouth)?;
                if let Some(ob) = self.stomach.lists.pop() { self.close_box(ob) }
                Ok(())
            }
            GroupType::ControlSequence => {
                let esc = self.state.get_escape_char();
                self.error(ErrorKind::ExtraEndGroup(format!("}}, or forgotten {}endgroup",ET::Char::displayable_opt(esc))))
            }
            GroupType::Top => self.error(ErrorKind::TooManyCloses)
        }
    }

    /// Opens a new box group; its `{` has already been read.
    pub fn open_box(&mut self,spec:BoxSpec,target:BoxTarget) {
        let line = self.mouth.line_number();
        self.state.push(self.aux,GroupType::Box(spec.btype),line);
        self.stomach.lists.push(OpenBox{ spec, children:Vec::new(), target, in_paragraph:false });
    }

    fn close_box(&mut self,ob:OpenBox<ET>) {
        let mut b = TeXBox::new(ob.spec.btype,ob.children);
        match (ob.spec.btype,ob.spec.to) {
            (BoxType::Horizontal,Some(d)) => b.assigned_width = Some(d),
            (BoxType::Vertical,Some(d)) => b.assigned_height = Some(d),
            _ => ()
        }
        log::debug!("closing box: {} nodes, width {}",b.children.len(),b.width());
        match ob.target {
            BoxTarget::List => self.push_node(Node::Box(b)),
            BoxTarget::Register{idx,global} => self.state.set_box_register(self.aux,idx,Some(b),global)
        }
    }

    /// Reads the value of a token list assignment: a braced list, or a token list register or
    /// parameter whose contents are copied.
    pub fn read_toks_value(&mut self,t:&ET::Token) -> TeXResult<TokenList<ET::Token>> {
        self.skip_spaces()?;
        if let Some((next,r)) = self.get_next_unexpandable()? {
            match r {
                ResolvedToken::Cmd(Some(TeXCommand::ToksRegister(i))) => return Ok(self.state.get_toks_register(i).clone()),
                ResolvedToken::Cmd(Some(TeXCommand::Primitive{name,cmd:PrimitiveCommand::PrimitiveToks})) =>
                    return Ok(self.state.get_primitive_toks(name).clone()),
                ResolvedToken::Cmd(Some(TeXCommand::Primitive{name,..})) if name == PRIMITIVES.toks => {
                    let i = self.read_register_index()?;
                    return Ok(self.state.get_toks_register(i).clone())
                }
                _ => self.mouth.requeue(next)
            }
        }
        let v = self.read_general_text(t,false)?;
        Ok(v.into())
    }

    /// The dimension `\wd`, `\ht` or `\dp` of a box register; zero for a void box.
    pub fn box_dimension(&self,idx:usize,f:fn(&TeXBox<ET>) -> Dim32) -> Dim32 {
        self.state.get_box_register(idx).map(f).unwrap_or(Dim32::ZERO)
    }
}
