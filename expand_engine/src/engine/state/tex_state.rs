/*! Implementation of a plain TeX [`State`]. */
use std::fmt::Write;
use crate::commands::{PrimitiveCommand, TeXCommand};
use crate::commands::primitives::{PrimitiveIdentifier, PRIMITIVES};
use crate::engine::{EngineAux, EngineTypes};
use crate::engine::fontsystem::Font;
use crate::engine::mouth::Mouth;
use crate::engine::state::{GroupType, State, StateChange, StateChangeTracker, StateStack};
use crate::engine::utils::outputs::Outputs;
use crate::tex::catcodes::{CategoryCode, CategoryCodeScheme};
use crate::tex::characters::{Character, CharacterMap};
use crate::tex::nodes::{BoxType, TeXBox};
use crate::tex::numerics::{Dim32, Skip};
use crate::tex::tokens::control_sequences::CSHandler;
use crate::tex::tokens::token_lists::TokenList;
use crate::utils::HMap;
use crate::utils::errors::{ErrorKind, TeXError, TeXResult};

const REGISTERS: usize = 256;

fn slot<A:Clone>(v:&mut Vec<A>,idx:usize,default:A) -> &mut A {
    if idx >= v.len() { v.resize(idx + 1,default) }
    &mut v[idx]
}

/// Default implementation of a plain TeX [`State`].
#[derive(Clone)]
pub struct DefaultState<ET:EngineTypes> {
    stack:StateStack<ET>,
    catcodes: CategoryCodeScheme<ET::Char>,
    lccodes: <ET::Char as Character>::CharMap<ET::Char>,
    uccodes: <ET::Char as Character>::CharMap<ET::Char>,
    primitive_ints: HMap<PrimitiveIdentifier,i32>,
    primitive_dims: HMap<PrimitiveIdentifier,Dim32>,
    primitive_skips: HMap<PrimitiveIdentifier,Skip>,
    primitive_toks: HMap<PrimitiveIdentifier,TokenList<ET::Token>>,
    int_register:Vec<i32>,
    dim_register:Vec<Dim32>,
    skip_register:Vec<Skip>,
    toks_register:Vec<TokenList<ET::Token>>,
    box_register:Vec<Option<TeXBox<ET>>>,
    pub commands:HMap<ET::CSName,TeXCommand<ET>>,
    ac_commands:<ET::Char as Character>::CharMap<Option<TeXCommand<ET>>>,
    endline_char:Option<ET::Char>,
    escape_char:Option<ET::Char>,
    newline_char:Option<ET::Char>,
    current_font:ET::Font,
    empty_list:TokenList<ET::Token>,
}
impl<ET:EngineTypes> DefaultState<ET> {
    fn tracing_assigns(&self) -> bool { self.get_primitive_int(PRIMITIVES.tracingassigns) > 0 }
    fn tracing_restores(&self) -> bool { self.get_primitive_int(PRIMITIVES.tracingrestores) > 0 }
    fn tracing_groups(&self) -> bool { self.get_primitive_int(PRIMITIVES.tracinggroups) > 0 }

    /// Sets a command without recording the change or tracing it.
    pub fn set_command_direct(&mut self, name:ET::CSName, cmd: Option<TeXCommand<ET>>) {
        match cmd {
            None => self.commands.remove(&name),
            Some(c) => self.commands.insert(name,c)
        };
    }

    fn char_num(c:Option<ET::Char>) -> i64 {
        match c {
            None => -1,
            Some(c) => c.to_usize() as i64
        }
    }

    fn box_summary(&self,b:&Option<TeXBox<ET>>,s:&mut String) {
        let esc = ET::Char::displayable_opt(self.escape_char);
        let _ = match b {
            None => write!(s,"void"),
            Some(b) => write!(s,"{}{}({}+{})x{}",esc,
                              if b.btype == BoxType::Horizontal {"hbox"} else {"vbox"},
                              b.height(),b.depth(),b.width())
        };
    }

    /// Displays the quantity a [`StateChange`] refers to together with the value it carries, as in
    /// `\count10=5`, for tracing.
    pub fn display_change(&self,aux:&EngineAux<ET>,change:&StateChange<ET>) -> String {
        let esc = ET::Char::displayable_opt(self.escape_char);
        let int = aux.memory.cs_interner();
        let mut s = String::new();
        let _ = match change {
            StateChange::Catcode{char,old} => write!(s,"{}catcode{}={}",esc,char.to_usize(),u8::from(*old)),
            StateChange::LcCode{char,old} => write!(s,"{}lccode{}={}",esc,char.to_usize(),old.to_usize()),
            StateChange::UcCode{char,old} => write!(s,"{}uccode{}={}",esc,char.to_usize(),old.to_usize()),
            StateChange::EndlineChar{old} => write!(s,"{}endlinechar={}",esc,Self::char_num(*old)),
            StateChange::EscapeChar{old} => write!(s,"{}escapechar={}",esc,Self::char_num(*old)),
            StateChange::NewlineChar{old} => write!(s,"{}newlinechar={}",esc,Self::char_num(*old)),
            StateChange::CurrentFont(f) => write!(s,"current font={}{}",esc,int.resolve(f.name())),
            StateChange::IntRegister{idx,old} => write!(s,"{}count{}={}",esc,idx,old),
            StateChange::DimRegister{idx,old} => write!(s,"{}dimen{}={}",esc,idx,old),
            StateChange::SkipRegister{idx,old} => write!(s,"{}skip{}={}",esc,idx,old),
            StateChange::ToksRegister{idx,old} => write!(s,"{}toks{}={}",esc,idx,
                                                        old.display(int,&self.catcodes,self.escape_char,false)),
            StateChange::BoxRegister{idx,old} => {
                let _ = write!(s,"{}box{}=",esc,idx);
                self.box_summary(old,&mut s);
                Ok(())
            }
            StateChange::PrimitiveInt{name,old} => write!(s,"{}={}",name.display(self.escape_char),old),
            StateChange::PrimitiveDim{name,old} => write!(s,"{}={}",name.display(self.escape_char),old),
            StateChange::PrimitiveSkip{name,old} => write!(s,"{}={}",name.display(self.escape_char),old),
            StateChange::PrimitiveToks{name,old} => write!(s,"{}={}",name.display(self.escape_char),
                                                          old.display(int,&self.catcodes,self.escape_char,false)),
            StateChange::Command{name,old} => {
                let _ = write!(s,"{}{}=",esc,int.resolve(name));
                match old {
                    None => write!(s,"undefined"),
                    Some(c) => write!(s,"{}",c.meaning(int,&self.catcodes,self.escape_char))
                }
            }
            StateChange::AcCommand{char,old} => {
                let _ = write!(s,"{}=",char.display());
                match old {
                    None => write!(s,"undefined"),
                    Some(c) => write!(s,"{}",c.meaning(int,&self.catcodes,self.escape_char))
                }
            }
        };
        s
    }

    /// The current value of the quantity `key` refers to.
    pub fn snapshot(&self,key:&StateChange<ET>) -> StateChange<ET> {
        match key {
            StateChange::Catcode{char,..} => StateChange::Catcode{char:*char,old:*self.catcodes.get(*char)},
            StateChange::LcCode{char,..} => StateChange::LcCode{char:*char,old:*self.lccodes.get(*char)},
            StateChange::UcCode{char,..} => StateChange::UcCode{char:*char,old:*self.uccodes.get(*char)},
            StateChange::EndlineChar{..} => StateChange::EndlineChar{old:self.endline_char},
            StateChange::EscapeChar{..} => StateChange::EscapeChar{old:self.escape_char},
            StateChange::NewlineChar{..} => StateChange::NewlineChar{old:self.newline_char},
            StateChange::CurrentFont(_) => StateChange::CurrentFont(self.current_font.clone()),
            StateChange::IntRegister{idx,..} => StateChange::IntRegister{idx:*idx,old:self.get_int_register(*idx)},
            StateChange::DimRegister{idx,..} => StateChange::DimRegister{idx:*idx,old:self.get_dim_register(*idx)},
            StateChange::SkipRegister{idx,..} => StateChange::SkipRegister{idx:*idx,old:self.get_skip_register(*idx)},
            StateChange::ToksRegister{idx,..} => StateChange::ToksRegister{idx:*idx,old:self.get_toks_register(*idx).clone()},
            StateChange::BoxRegister{idx,..} => StateChange::BoxRegister{idx:*idx,old:self.get_box_register(*idx).cloned()},
            StateChange::PrimitiveInt{name,..} => StateChange::PrimitiveInt{name:*name,old:self.get_primitive_int(*name)},
            StateChange::PrimitiveDim{name,..} => StateChange::PrimitiveDim{name:*name,old:self.get_primitive_dim(*name)},
            StateChange::PrimitiveSkip{name,..} => StateChange::PrimitiveSkip{name:*name,old:self.get_primitive_skip(*name)},
            StateChange::PrimitiveToks{name,..} => StateChange::PrimitiveToks{name:*name,old:self.get_primitive_toks(*name).clone()},
            StateChange::Command{name,..} => StateChange::Command{name:name.clone(),old:self.commands.get(name).cloned()},
            StateChange::AcCommand{char,..} => StateChange::AcCommand{char:*char,old:self.ac_commands.get(*char).clone()},
        }
    }

    fn restore(&mut self,change:StateChange<ET>) {
        match change {
            StateChange::Catcode{char,old} => *self.catcodes.get_mut(char) = old,
            StateChange::LcCode{char,old} => *self.lccodes.get_mut(char) = old,
            StateChange::UcCode{char,old} => *self.uccodes.get_mut(char) = old,
            StateChange::EndlineChar{old} => self.endline_char = old,
            StateChange::EscapeChar{old} => self.escape_char = old,
            StateChange::NewlineChar{old} => self.newline_char = old,
            StateChange::CurrentFont(f) => self.current_font = f,
            StateChange::IntRegister{idx,old} => *slot(&mut self.int_register,idx,0) = old,
            StateChange::DimRegister{idx,old} => *slot(&mut self.dim_register,idx,Dim32::ZERO) = old,
            StateChange::SkipRegister{idx,old} => *slot(&mut self.skip_register,idx,Skip::default()) = old,
            StateChange::ToksRegister{idx,old} => *slot(&mut self.toks_register,idx,self.empty_list.clone()) = old,
            StateChange::BoxRegister{idx,old} => *slot(&mut self.box_register,idx,None) = old,
            StateChange::PrimitiveInt{name,old} => { self.primitive_ints.insert(name,old); }
            StateChange::PrimitiveDim{name,old} => { self.primitive_dims.insert(name,old); }
            StateChange::PrimitiveSkip{name,old} => { self.primitive_skips.insert(name,old); }
            StateChange::PrimitiveToks{name,old} => { self.primitive_toks.insert(name,old); }
            StateChange::Command{name,old} => self.set_command_direct(name,old),
            StateChange::AcCommand{char,old} => *self.ac_commands.get_mut(char) = old,
        }
    }

    /// Performs an assignment via `f`, which returns the previous value, and traces it if
    /// `\tracingassigns` is positive.
    fn assign<F:FnOnce(&mut Self) -> StateChange<ET>>(&mut self,aux:&EngineAux<ET>,globally:bool,f:F) {
        self.change_field(globally,|s,g| {
            let trace = s.tracing_assigns();
            let change = f(s);
            if trace {
                let old = s.display_change(aux,&change);
                let new = s.display_change(aux,&s.snapshot(&change));
                if old == new {
                    aux.outputs.write_neg1(format_args!("{{{}reassigning {}}}",if g {"globally "} else {""},old));
                } else {
                    aux.outputs.write_neg1(format_args!("{{{}changing {}}}",if g {"globally "} else {""},old));
                    aux.outputs.write_neg1(format_args!("{{into {}}}",new));
                }
            }
            change
        })
    }
}

impl<ET:EngineTypes> StateChangeTracker<ET> for DefaultState<ET> {
    fn stack(&mut self) -> &mut StateStack<ET> { &mut self.stack }
}

impl<ET:EngineTypes> State<ET> for DefaultState<ET> {
    fn new(nullfont:ET::Font,aux:&mut EngineAux<ET>) -> Self {
        let mut catcodes = ET::Char::starting_catcode_scheme();
        for (c,cc) in aux.config.catcodes.assignments() {
            *catcodes.get_mut(ET::Char::from(c)) = cc;
        }
        let mut lccodes: <ET::Char as Character>::CharMap<ET::Char> = CharacterMap::default();
        let mut uccodes: <ET::Char as Character>::CharMap<ET::Char> = CharacterMap::default();
        for i in b'a'..=b'z' {
            let upper = i - 32;
            *uccodes.get_mut(i.into()) = upper.into();
            *uccodes.get_mut(upper.into()) = upper.into();
            *lccodes.get_mut(i.into()) = i.into();
            *lccodes.get_mut(upper.into()) = i.into();
        }
        let empty_list = aux.memory.empty_list();
        Self {
            stack: StateStack::default(),
            catcodes, lccodes, uccodes,
            primitive_ints: HMap::default(),
            primitive_dims: HMap::default(),
            primitive_skips: HMap::default(),
            primitive_toks: HMap::default(),
            int_register: vec![0;REGISTERS],
            dim_register: vec![Dim32::ZERO;REGISTERS],
            skip_register: vec![Skip::default();REGISTERS],
            toks_register: vec![empty_list.clone();REGISTERS],
            box_register: vec![None;REGISTERS],
            commands: HMap::default(),
            ac_commands: CharacterMap::default(),
            endline_char: aux.config.endlinechar.map(ET::Char::from),
            escape_char: aux.config.escapechar.map(ET::Char::from),
            newline_char: None,
            current_font: nullfont,
            empty_list,
        }
    }

    fn register_primitive(&mut self,aux:&mut EngineAux<ET>,name:&'static str,cmd:PrimitiveCommand<ET>) -> PrimitiveIdentifier {
        let id = PRIMITIVES.get(name);
        let cs = CSHandler::<ET::Char,ET::CSName>::new(aux.memory.cs_interner_mut(),name);
        self.commands.insert(cs,TeXCommand::Primitive{name:id,cmd});
        id
    }

    fn get_group_type(&self) -> GroupType {
        self.stack.stack.last().map(|lvl| lvl.group_type).unwrap_or(GroupType::Top)
    }
    fn get_group_level(&self) -> usize { self.stack.stack.len() }

    fn push(&mut self,aux:&EngineAux<ET>,group_type:GroupType,line_number:usize) {
        self.stack.push(group_type);
        if self.tracing_groups() {
            aux.outputs.write_neg1(format_args!(
                "{{entering {} group (level {}) at line {}}}",group_type,
                self.stack.stack.len(), line_number
            ))
        }
    }

    fn pop(&mut self,aux:&mut EngineAux<ET>,mouth:&mut Mouth<ET>) -> TeXResult<()> {
        let len = self.stack.stack.len();
        let traceg = self.tracing_groups();
        let trace = self.tracing_restores();
        let lvl = match self.stack.pop() {
            Some(lvl) => lvl,
            None => return Err(TeXError::new(ErrorKind::TooManyCloses))
        };
        if traceg {
            aux.outputs.write_neg1(format_args!(
                "{{leaving {} group (level {}) at line {}}}",lvl.group_type,
                len, mouth.line_number()
            ))
        }
        for c in lvl.changes.into_iter().rev() {
            if trace {
                aux.outputs.write_neg1(format_args!("{{restoring {}}}",self.display_change(aux,&c)));
            }
            self.restore(c);
        }
        if trace {
            for r in &lvl.retained {
                aux.outputs.write_neg1(format_args!("{{retaining {}}}",self.display_change(aux,&self.snapshot(r))));
            }
        }
        mouth.push_vec(lvl.aftergroup)
    }

    fn aftergroup(&mut self,token:ET::Token) {
        if let Some(lvl) = self.stack.stack.last_mut() {
            lvl.aftergroup.push(token)
        }
    }

    fn get_current_font(&self) -> &ET::Font { &self.current_font }
    fn set_current_font(&mut self,aux:&EngineAux<ET>,fnt:ET::Font,globally:bool) {
        self.assign(aux,globally,|s| StateChange::CurrentFont(std::mem::replace(&mut s.current_font,fnt)))
    }

    fn get_catcode_scheme(&self) -> &CategoryCodeScheme<ET::Char> { &self.catcodes }
    fn set_catcode(&mut self,aux:&EngineAux<ET>,c:ET::Char,cc:CategoryCode,globally:bool) {
        self.assign(aux,globally,|s| StateChange::Catcode{char:c,old:std::mem::replace(s.catcodes.get_mut(c),cc)})
    }

    fn get_lccode(&self,c:ET::Char) -> ET::Char { *self.lccodes.get(c) }
    fn set_lccode(&mut self,aux:&EngineAux<ET>,c:ET::Char,lc:ET::Char,globally:bool) {
        self.assign(aux,globally,|s| StateChange::LcCode{char:c,old:std::mem::replace(s.lccodes.get_mut(c),lc)})
    }
    fn get_uccode(&self,c:ET::Char) -> ET::Char { *self.uccodes.get(c) }
    fn set_uccode(&mut self,aux:&EngineAux<ET>,c:ET::Char,uc:ET::Char,globally:bool) {
        self.assign(aux,globally,|s| StateChange::UcCode{char:c,old:std::mem::replace(s.uccodes.get_mut(c),uc)})
    }

    fn get_endline_char(&self) -> Option<ET::Char> { self.endline_char }
    fn set_endline_char(&mut self,aux:&EngineAux<ET>,c:Option<ET::Char>,globally:bool) {
        self.assign(aux,globally,|s| StateChange::EndlineChar{old:std::mem::replace(&mut s.endline_char,c)})
    }
    fn get_escape_char(&self) -> Option<ET::Char> { self.escape_char }
    fn set_escape_char(&mut self,aux:&EngineAux<ET>,c:Option<ET::Char>,globally:bool) {
        self.assign(aux,globally,|s| StateChange::EscapeChar{old:std::mem::replace(&mut s.escape_char,c)})
    }
    fn get_newline_char(&self) -> Option<ET::Char> { self.newline_char }
    fn set_newline_char(&mut self,aux:&EngineAux<ET>,c:Option<ET::Char>,globally:bool) {
        self.assign(aux,globally,|s| StateChange::NewlineChar{old:std::mem::replace(&mut s.newline_char,c)})
    }

    fn get_primitive_int(&self,name:PrimitiveIdentifier) -> i32 {
        self.primitive_ints.get(&name).copied().unwrap_or(0)
    }
    fn set_primitive_int(&mut self,aux:&EngineAux<ET>,name:PrimitiveIdentifier,v:i32,globally:bool) {
        self.assign(aux,globally,|s| StateChange::PrimitiveInt{name,old:s.primitive_ints.insert(name,v).unwrap_or(0)})
    }
    fn get_primitive_dim(&self,name:PrimitiveIdentifier) -> Dim32 {
        self.primitive_dims.get(&name).copied().unwrap_or(Dim32::ZERO)
    }
    fn set_primitive_dim(&mut self,aux:&EngineAux<ET>,name:PrimitiveIdentifier,v:Dim32,globally:bool) {
        self.assign(aux,globally,|s| StateChange::PrimitiveDim{name,old:s.primitive_dims.insert(name,v).unwrap_or(Dim32::ZERO)})
    }
    fn get_primitive_skip(&self,name:PrimitiveIdentifier) -> Skip {
        self.primitive_skips.get(&name).copied().unwrap_or_default()
    }
    fn set_primitive_skip(&mut self,aux:&EngineAux<ET>,name:PrimitiveIdentifier,v:Skip,globally:bool) {
        self.assign(aux,globally,|s| StateChange::PrimitiveSkip{name,old:s.primitive_skips.insert(name,v).unwrap_or_default()})
    }
    fn get_primitive_toks(&self,name:PrimitiveIdentifier) -> &TokenList<ET::Token> {
        self.primitive_toks.get(&name).unwrap_or(&self.empty_list)
    }
    fn set_primitive_toks(&mut self,aux:&EngineAux<ET>,name:PrimitiveIdentifier,v:TokenList<ET::Token>,globally:bool) {
        self.assign(aux,globally,|s| {
            let old = s.primitive_toks.insert(name,v).unwrap_or_else(|| s.empty_list.clone());
            StateChange::PrimitiveToks{name,old}
        })
    }

    fn get_int_register(&self,idx:usize) -> i32 { self.int_register.get(idx).copied().unwrap_or(0) }
    fn set_int_register(&mut self,aux:&EngineAux<ET>,idx:usize,v:i32,globally:bool) {
        self.assign(aux,globally,|s| StateChange::IntRegister{idx,old:std::mem::replace(slot(&mut s.int_register,idx,0),v)})
    }
    fn get_dim_register(&self,idx:usize) -> Dim32 { self.dim_register.get(idx).copied().unwrap_or(Dim32::ZERO) }
    fn set_dim_register(&mut self,aux:&EngineAux<ET>,idx:usize,v:Dim32,globally:bool) {
        self.assign(aux,globally,|s| StateChange::DimRegister{idx,old:std::mem::replace(slot(&mut s.dim_register,idx,Dim32::ZERO),v)})
    }
    fn get_skip_register(&self,idx:usize) -> Skip { self.skip_register.get(idx).copied().unwrap_or_default() }
    fn set_skip_register(&mut self,aux:&EngineAux<ET>,idx:usize,v:Skip,globally:bool) {
        self.assign(aux,globally,|s| StateChange::SkipRegister{idx,old:std::mem::replace(slot(&mut s.skip_register,idx,Skip::default()),v)})
    }
    fn get_toks_register(&self,idx:usize) -> &TokenList<ET::Token> {
        self.toks_register.get(idx).unwrap_or(&self.empty_list)
    }
    fn set_toks_register(&mut self,aux:&EngineAux<ET>,idx:usize,v:TokenList<ET::Token>,globally:bool) {
        self.assign(aux,globally,|s| {
            let empty = s.empty_list.clone();
            StateChange::ToksRegister{idx,old:std::mem::replace(slot(&mut s.toks_register,idx,empty),v)}
        })
    }

    fn get_box_register(&self,idx:usize) -> Option<&TeXBox<ET>> {
        self.box_register.get(idx).and_then(|b| b.as_ref())
    }
    fn get_box_register_mut(&mut self,idx:usize) -> Option<&mut TeXBox<ET>> {
        self.box_register.get_mut(idx).and_then(|b| b.as_mut())
    }
    fn take_box_register(&mut self,idx:usize) -> Option<TeXBox<ET>> {
        self.box_register.get_mut(idx).and_then(|b| b.take())
    }
    fn set_box_register(&mut self,aux:&EngineAux<ET>,idx:usize,v:Option<TeXBox<ET>>,globally:bool) {
        self.assign(aux,globally,|s| StateChange::BoxRegister{idx,old:std::mem::replace(slot(&mut s.box_register,idx,None),v)})
    }

    fn get_command(&self,name:&ET::CSName) -> Option<&TeXCommand<ET>> { self.commands.get(name) }
    fn set_command(&mut self,aux:&EngineAux<ET>,name:ET::CSName,cmd:Option<TeXCommand<ET>>,globally:bool) {
        self.assign(aux,globally,|s| {
            let old = match cmd {
                None => s.commands.remove(&name),
                Some(c) => s.commands.insert(name.clone(),c)
            };
            StateChange::Command{name,old}
        })
    }
    fn get_ac_command(&self,c:ET::Char) -> Option<&TeXCommand<ET>> { self.ac_commands.get(c).as_ref() }
    fn set_ac_command(&mut self,aux:&EngineAux<ET>,c:ET::Char,cmd:Option<TeXCommand<ET>>,globally:bool) {
        self.assign(aux,globally,|s| StateChange::AcCommand{char:c,old:std::mem::replace(s.ac_commands.get_mut(c),cmd)})
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::{DefaultEngine, TeXEngine};
    use crate::engine::state::{GroupType, State};
    use crate::engine::utils::outputs::Outputs;
    use crate::commands::primitives::PRIMITIVES;
    use crate::tex::catcodes::CategoryCode;
    use crate::tests::test_utils::TestEngineTypes;

    #[test]
    fn undo_logs() {
        let mut engine = DefaultEngine::<TestEngineTypes>::new();
        let mut refs = engine.get_engine_refs();
        refs.state.set_int_register(refs.aux,1,5,false);
        refs.state.push(refs.aux,GroupType::Simple,1);
        refs.state.set_int_register(refs.aux,1,6,false);
        refs.state.set_int_register(refs.aux,1,7,false);
        refs.state.set_int_register(refs.aux,2,3,true);
        refs.state.set_catcode(refs.aux,b'@',CategoryCode::Letter,false);
        assert_eq!(refs.state.get_group_level(),1);
        refs.state.pop(refs.aux,refs.mouth).unwrap();
        assert_eq!(refs.state.get_int_register(1),5);
        assert_eq!(refs.state.get_int_register(2),3);
        assert_eq!(*crate::tex::characters::CharacterMap::get(refs.state.get_catcode_scheme(),b'@'),CategoryCode::Other);
        assert_eq!(refs.state.get_group_type(),GroupType::Top);
        assert!(refs.state.pop(refs.aux,refs.mouth).is_err());
    }

    #[test]
    fn global_cancels_restore() {
        let mut engine = DefaultEngine::<TestEngineTypes>::new();
        let mut refs = engine.get_engine_refs();
        refs.state.push(refs.aux,GroupType::Simple,1);
        refs.state.push(refs.aux,GroupType::Simple,1);
        refs.state.set_int_register(refs.aux,0,1,false);
        refs.state.set_int_register(refs.aux,0,2,true);
        refs.state.pop(refs.aux,refs.mouth).unwrap();
        assert_eq!(refs.state.get_int_register(0),2);
        refs.state.pop(refs.aux,refs.mouth).unwrap();
        assert_eq!(refs.state.get_int_register(0),2);
    }

    #[test]
    fn globaldefs_and_tracing() {
        let mut engine = DefaultEngine::<TestEngineTypes>::new();
        let mut refs = engine.get_engine_refs();
        refs.state.set_primitive_int(refs.aux,PRIMITIVES.tracingassigns,1,false);
        refs.state.set_primitive_int(refs.aux,PRIMITIVES.tracingrestores,1,false);
        refs.state.set_primitive_int(refs.aux,PRIMITIVES.tracinggroups,1,false);
        refs.aux.outputs.clear();
        refs.state.push(refs.aux,GroupType::Simple,3);
        refs.state.set_int_register(refs.aux,4,10,false);
        refs.state.pop(refs.aux,refs.mouth).unwrap();
        assert_eq!(refs.aux.outputs.log_lines(),vec!(
            "{entering simple group (level 1) at line 3}".to_string(),
            "{changing \\count4=0}".to_string(),
            "{into \\count4=10}".to_string(),
            "{leaving simple group (level 1) at line 0}".to_string(),
            "{restoring \\count4=0}".to_string(),
        ));
        refs.state.set_primitive_int(refs.aux,PRIMITIVES.globaldefs,1,false);
        refs.state.push(refs.aux,GroupType::Simple,1);
        refs.state.set_int_register(refs.aux,4,10,false);
        refs.state.pop(refs.aux,refs.mouth).unwrap();
        assert_eq!(refs.state.get_int_register(4),10);
    }
}
