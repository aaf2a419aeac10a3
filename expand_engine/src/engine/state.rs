/*! The [`State`] of an engine: every quantity that is subject to TeX's grouping rules.

    Local assignments record the previous value of the changed quantity in the innermost group's
    undo log; closing the group replays the log in reverse. Each quantity is recorded at most once
    per group, so the log restores the value it had when the group was entered. Global assignments
    bypass the log entirely and erase any pending restoration of the same quantity in all groups.

    The bookkeeping is implemented once in [`StateStack`]; implementations of [`State`] only need to
    describe their changes as [`StateChange`]s and go through [`StateChangeTracker::change_field`].
*/

pub mod tex_state;

use std::fmt::{Display, Formatter};
use crate::commands::{PrimitiveCommand, TeXCommand};
use crate::commands::primitives::{PrimitiveIdentifier, PRIMITIVES};
use crate::engine::{EngineAux, EngineTypes};
use crate::engine::mouth::Mouth;
use crate::tex::catcodes::{CategoryCode, CategoryCodeScheme};
use crate::tex::nodes::{BoxType, TeXBox};
use crate::tex::numerics::{Dim32, Skip};
use crate::tex::tokens::token_lists::TokenList;
use crate::utils::errors::TeXResult;

/// The kind of a group on the [`StateStack`].
#[derive(Clone,Copy,Eq,PartialEq,Debug)]
pub enum GroupType {
    /// No group is open.
    Top,
    /// A group opened by a begin-group character, e.g. `{`.
    Simple,
    /// A group opened by `\begingroup` and closed by `\endgroup`.
    ControlSequence,
    /// The contents of an `\hbox` or `\vbox`.
    Box(BoxType),
}
impl Display for GroupType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupType::Top => write!(f, "bottom level"),
            GroupType::Simple => write!(f, "simple"),
            GroupType::ControlSequence => write!(f, "semi simple"),
            GroupType::Box(BoxType::Horizontal) => write!(f, "hbox"),
            GroupType::Box(BoxType::Vertical) => write!(f, "vbox"),
        }
    }
}

/// The state of a TeX engine: category codes, registers, command definitions and so on,
/// together with the group stack.
pub trait State<ET:EngineTypes>:Sized+Clone {
    /// A new state; `nullfont` is the initial current font.
    fn new(nullfont:ET::Font,aux:&mut EngineAux<ET>) -> Self;
    /// Defines the control sequence `\name` as the primitive `cmd`, globally and without tracing.
    fn register_primitive(&mut self,aux:&mut EngineAux<ET>,name:&'static str,cmd:PrimitiveCommand<ET>) -> PrimitiveIdentifier;

    /// The type of the innermost open group, or [`GroupType::Top`].
    fn get_group_type(&self) -> GroupType;
    /// The number of open groups.
    fn get_group_level(&self) -> usize;
    /// Opens a new group.
    fn push(&mut self,aux:&EngineAux<ET>,group_type:GroupType,line_number:usize);
    /// Closes the innermost group, undoing all local changes made in it and inserting the
    /// `\aftergroup` tokens into the `mouth`. Fails with [`TooManyCloses`](crate::utils::errors::ErrorKind::TooManyCloses)
    /// at the top level.
    fn pop(&mut self,aux:&mut EngineAux<ET>,mouth:&mut Mouth<ET>) -> TeXResult<()>;
    /// Schedules `token` to be inserted after the innermost group closes; ignored at the top level.
    fn aftergroup(&mut self,token:ET::Token);

    fn get_current_font(&self) -> &ET::Font;
    fn set_current_font(&mut self,aux:&EngineAux<ET>,fnt:ET::Font,globally:bool);

    fn get_catcode_scheme(&self) -> &CategoryCodeScheme<ET::Char>;
    fn set_catcode(&mut self,aux:&EngineAux<ET>,c:ET::Char,cc:CategoryCode,globally:bool);

    fn get_lccode(&self,c:ET::Char) -> ET::Char;
    fn set_lccode(&mut self,aux:&EngineAux<ET>,c:ET::Char,lc:ET::Char,globally:bool);
    fn get_uccode(&self,c:ET::Char) -> ET::Char;
    fn set_uccode(&mut self,aux:&EngineAux<ET>,c:ET::Char,uc:ET::Char,globally:bool);

    /// `\endlinechar`; `None` if outside the character range.
    fn get_endline_char(&self) -> Option<ET::Char>;
    fn set_endline_char(&mut self,aux:&EngineAux<ET>,c:Option<ET::Char>,globally:bool);
    /// `\escapechar`
    fn get_escape_char(&self) -> Option<ET::Char>;
    fn set_escape_char(&mut self,aux:&EngineAux<ET>,c:Option<ET::Char>,globally:bool);
    /// `\newlinechar`
    fn get_newline_char(&self) -> Option<ET::Char>;
    fn set_newline_char(&mut self,aux:&EngineAux<ET>,c:Option<ET::Char>,globally:bool);

    /// A primitive integer quantity, e.g. `\tracingmacros`; `0` unless assigned.
    fn get_primitive_int(&self,name:PrimitiveIdentifier) -> i32;
    fn set_primitive_int(&mut self,aux:&EngineAux<ET>,name:PrimitiveIdentifier,v:i32,globally:bool);
    fn get_primitive_dim(&self,name:PrimitiveIdentifier) -> Dim32;
    fn set_primitive_dim(&mut self,aux:&EngineAux<ET>,name:PrimitiveIdentifier,v:Dim32,globally:bool);
    fn get_primitive_skip(&self,name:PrimitiveIdentifier) -> Skip;
    fn set_primitive_skip(&mut self,aux:&EngineAux<ET>,name:PrimitiveIdentifier,v:Skip,globally:bool);
    fn get_primitive_toks(&self,name:PrimitiveIdentifier) -> &TokenList<ET::Token>;
    fn set_primitive_toks(&mut self,aux:&EngineAux<ET>,name:PrimitiveIdentifier,v:TokenList<ET::Token>,globally:bool);

    fn get_int_register(&self,idx:usize) -> i32;
    fn set_int_register(&mut self,aux:&EngineAux<ET>,idx:usize,v:i32,globally:bool);
    fn get_dim_register(&self,idx:usize) -> Dim32;
    fn set_dim_register(&mut self,aux:&EngineAux<ET>,idx:usize,v:Dim32,globally:bool);
    fn get_skip_register(&self,idx:usize) -> Skip;
    fn set_skip_register(&mut self,aux:&EngineAux<ET>,idx:usize,v:Skip,globally:bool);
    fn get_toks_register(&self,idx:usize) -> &TokenList<ET::Token>;
    fn set_toks_register(&mut self,aux:&EngineAux<ET>,idx:usize,v:TokenList<ET::Token>,globally:bool);

    fn get_box_register(&self,idx:usize) -> Option<&TeXBox<ET>>;
    /// Mutable access to a box register, e.g. for `\wd`. Changes made this way are not undone
    /// when the current group ends.
    fn get_box_register_mut(&mut self,idx:usize) -> Option<&mut TeXBox<ET>>;
    /// Empties a box register (`\box`), without recording the change in the undo log.
    fn take_box_register(&mut self,idx:usize) -> Option<TeXBox<ET>>;
    fn set_box_register(&mut self,aux:&EngineAux<ET>,idx:usize,v:Option<TeXBox<ET>>,globally:bool);

    /// The current meaning of a control sequence.
    fn get_command(&self,name:&ET::CSName) -> Option<&TeXCommand<ET>>;
    fn set_command(&mut self,aux:&EngineAux<ET>,name:ET::CSName,cmd:Option<TeXCommand<ET>>,globally:bool);
    /// The current meaning of an active character.
    fn get_ac_command(&self,c:ET::Char) -> Option<&TeXCommand<ET>>;
    fn set_ac_command(&mut self,aux:&EngineAux<ET>,c:ET::Char,cmd:Option<TeXCommand<ET>>,globally:bool);
}

/// A change to some quantity of a [`State`], carrying the value to restore.
#[derive(Clone,Debug)]
pub enum StateChange<ET:EngineTypes> {
    Catcode{char:ET::Char,old:CategoryCode},
    LcCode{char:ET::Char,old:ET::Char},
    UcCode{char:ET::Char,old:ET::Char},
    EndlineChar{old:Option<ET::Char>},
    EscapeChar{old:Option<ET::Char>},
    NewlineChar{old:Option<ET::Char>},
    CurrentFont(ET::Font),
    IntRegister{idx:usize,old:i32},
    DimRegister{idx:usize,old:Dim32},
    SkipRegister{idx:usize,old:Skip},
    ToksRegister{idx:usize,old:TokenList<ET::Token>},
    BoxRegister{idx:usize,old:Option<TeXBox<ET>>},
    PrimitiveInt{name:PrimitiveIdentifier,old:i32},
    PrimitiveDim{name:PrimitiveIdentifier,old:Dim32},
    PrimitiveSkip{name:PrimitiveIdentifier,old:Skip},
    PrimitiveToks{name:PrimitiveIdentifier,old:TokenList<ET::Token>},
    Command{name:ET::CSName,old:Option<TeXCommand<ET>>},
    AcCommand{char:ET::Char,old:Option<TeXCommand<ET>>},
}
impl<ET:EngineTypes> StateChange<ET> {
    /// Whether both changes concern the same quantity (regardless of value).
    pub fn equiv(&self,other:&Self) -> bool {
        use StateChange::*;
        match (self,other) {
            (Catcode{char:a,..},Catcode{char:b,..}) |
            (LcCode{char:a,..},LcCode{char:b,..}) |
            (UcCode{char:a,..},UcCode{char:b,..}) |
            (AcCommand{char:a,..},AcCommand{char:b,..}) => a == b,
            (EndlineChar{..},EndlineChar{..}) |
            (EscapeChar{..},EscapeChar{..}) |
            (NewlineChar{..},NewlineChar{..}) |
            (CurrentFont(_),CurrentFont(_)) => true,
            (IntRegister{idx:a,..},IntRegister{idx:b,..}) |
            (DimRegister{idx:a,..},DimRegister{idx:b,..}) |
            (SkipRegister{idx:a,..},SkipRegister{idx:b,..}) |
            (ToksRegister{idx:a,..},ToksRegister{idx:b,..}) |
            (BoxRegister{idx:a,..},BoxRegister{idx:b,..}) => a == b,
            (PrimitiveInt{name:a,..},PrimitiveInt{name:b,..}) |
            (PrimitiveDim{name:a,..},PrimitiveDim{name:b,..}) |
            (PrimitiveSkip{name:a,..},PrimitiveSkip{name:b,..}) |
            (PrimitiveToks{name:a,..},PrimitiveToks{name:b,..}) => a == b,
            (Command{name:a,..},Command{name:b,..}) => a == b,
            _ => false
        }
    }
}

/// A group on the [`StateStack`].
#[derive(Clone,Debug)]
pub struct StackLevel<ET:EngineTypes> {
    pub group_type:GroupType,
    /// Tokens to insert after the group closes.
    pub aftergroup:Vec<ET::Token>,
    /// The undo log, in order of assignment.
    pub changes:Vec<StateChange<ET>>,
    /// Quantities whose restoration was cancelled by a global assignment.
    pub retained:Vec<StateChange<ET>>,
}

/// The group stack with the undo log of every open group.
#[derive(Clone,Debug)]
pub struct StateStack<ET:EngineTypes> {
    pub stack:Vec<StackLevel<ET>>,
}
impl<ET:EngineTypes> Default for StateStack<ET> {
    fn default() -> Self { StateStack { stack:Vec::new() } }
}
impl<ET:EngineTypes> StateStack<ET> {
    pub fn push(&mut self,group_type:GroupType) {
        self.stack.push(StackLevel { group_type, aftergroup:Vec::new(), changes:Vec::new(), retained:Vec::new() })
    }
    pub fn pop(&mut self) -> Option<StackLevel<ET>> { self.stack.pop() }
    /// Records a local change in the innermost group, unless that group already holds a value to
    /// restore for the same quantity. At the top level there is nothing to restore.
    pub fn add_change_locally(&mut self,change:StateChange<ET>) {
        if let Some(lvl) = self.stack.last_mut() {
            if !lvl.changes.iter().any(|c| c.equiv(&change)) {
                lvl.changes.push(change)
            }
        }
    }
    /// Cancels every pending restoration of the changed quantity.
    pub fn add_change_globally(&mut self,change:StateChange<ET>) {
        for lvl in self.stack.iter_mut() {
            let len = lvl.changes.len();
            lvl.changes.retain(|c| !c.equiv(&change));
            if len != lvl.changes.len() && !lvl.retained.iter().any(|c| c.equiv(&change)) {
                lvl.retained.push(change.clone())
            }
        }
    }
}

/// Implemented by [`State`]s that use a [`StateStack`] for their undo logs.
pub trait StateChangeTracker<ET:EngineTypes>:State<ET> {
    fn stack(&mut self) -> &mut StateStack<ET>;
    /// Performs a change via `f`, which gets whether the change is global and returns the
    /// [`StateChange`] to undo it. A nonzero `\globaldefs` overrides `globally`.
    fn change_field<F:FnOnce(&mut Self,bool) -> StateChange<ET>>(&mut self,globally:bool,f:F) {
        let globaldefs = self.get_primitive_int(PRIMITIVES.globaldefs);
        let globally = if globaldefs == 0 { globally } else { globaldefs > 0 };
        let change = f(self,globally);
        if globally {
            self.stack().add_change_globally(change)
        } else {
            self.stack().add_change_locally(change)
        }
    }
}
