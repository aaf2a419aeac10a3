/*! A TeX engine combines all the necessary components into a struct capable of compiling a TeX file,
    or a string, into a stream of [`Node`](crate::tex::nodes::Node)s.

    The components are:
    * [`Mouth`](mouth::Mouth): the stack of input sources, producing [`Token`]s.
    * [`Gullet`](gullet::Gullet): expands macros and expandable primitives, and evaluates conditionals.
    * [`Stomach`](stomach::Stomach): executes unexpandable commands and hands the resulting material to
      the [`Typesetter`].
    * [`State`](state::State): everything that is subject to grouping.
    * [`EngineAux`]: memory management, outputs, error bookkeeping, job data and configuration.
    * [`FileSystem`] and [`FontSystem`].

    The types of all of these are bundled in an [`EngineTypes`] implementation; [`DefaultEngine`] owns
    one instance of each and [`EngineReferences`] borrows all of them at once, which is what every
    primitive command receives.
*/

use std::fmt::Debug;
use chrono::{DateTime, Local};
use crate::commands::primitives::PRIMITIVES;
use crate::engine::config::{EngineConfig, InteractionMode};
use crate::engine::filesystem::{File, FileSystem, PhysicalFile, PhysicalFileSystem};
use crate::engine::fontsystem::{DefaultFont, DefaultFontSystem, Font, FontSystem};
use crate::engine::gullet::Gullet;
use crate::engine::mouth::Mouth;
use crate::engine::state::State;
use crate::engine::state::tex_state::DefaultState;
use crate::engine::stomach::Stomach;
use crate::engine::utils::memory::MemoryManager;
use crate::engine::utils::outputs::{LogOutputs, Outputs};
use crate::tex::characters::Character;
use crate::tex::nodes::{Typesetter, VecTypesetter};
use crate::tex::tokens::control_sequences::{CSHandler, CSName, InternedCSName};
use crate::tex::tokens::{StandardToken, Token};
use crate::utils::errors::{ErrorKind, recovery_policy, TeXError, TeXResult};

pub mod config;
pub mod filesystem;
pub mod fontsystem;
pub mod gullet;
pub mod mouth;
pub mod state;
pub mod stomach;
pub mod utils;

/**
The types used by a TeX engine. Every component of an engine is generic over an implementation of
this trait, which fixes the character type, the token representation, the file and font systems,
where output goes and the [`State`] implementation.
*/
pub trait EngineTypes:Sized+Copy+Clone+Debug+'static {
    type Char:Character;
    type CSName:CSName<Self::Char>;
    type Token:Token<Char=Self::Char,CS=Self::CSName>;
    type File:File<Char=Self::Char>;
    type FileSystem:FileSystem<File=Self::File>;
    type Font:Font<CS=Self::CSName>;
    type FontSystem:FontSystem<Font=Self::Font,CS=Self::CSName>;
    type Outputs:Outputs;
    type Typesetter:Typesetter<Self>+Default;
    type State:State<Self>;
}

/// Auxiliary components of an engine that are not subject to grouping.
pub struct EngineAux<ET:EngineTypes> {
    /// Interned control sequence names and reusable buffers.
    pub memory:MemoryManager<ET::Token>,
    /// Where messages, errors and tracing output go.
    pub outputs:ET::Outputs,
    /// The number of errors reported so far.
    pub error_count:usize,
    /// The current interaction mode; starts as configured and is changed by `\batchmode` etc.
    pub interaction:InteractionMode,
    /// `\jobname`
    pub jobname:String,
    /// The time the job started, for `\time`, `\day`, `\month` and `\year`.
    pub start_time:DateTime<Local>,
    pub config:EngineConfig,
}
impl<ET:EngineTypes> EngineAux<ET> {
    pub fn new(config:EngineConfig) -> Self {
        EngineAux {
            memory:MemoryManager::default(),
            outputs:ET::Outputs::new(),
            error_count:0,
            interaction:config.interaction,
            jobname:config.jobname.clone(),
            start_time:Local::now(),
            config
        }
    }
}

/// Mutable references to all components of an engine.
pub struct EngineReferences<'et,ET:EngineTypes> {
    pub state:&'et mut ET::State,
    pub aux:&'et mut EngineAux<ET>,
    pub mouth:&'et mut Mouth<ET>,
    pub gullet:&'et mut Gullet<ET>,
    pub stomach:&'et mut Stomach<ET>,
    pub filesystem:&'et mut ET::FileSystem,
    pub fontsystem:&'et mut ET::FontSystem,
    pub typesetter:&'et mut ET::Typesetter,
}

impl<ET:EngineTypes> EngineReferences<'_,ET> {
    /// Reports an error of the given kind; see [`report`](Self::report).
    pub fn error(&mut self,kind:ErrorKind) -> TeXResult<()> {
        self.report(TeXError::new(kind))
    }
    /// Reports an error: attaches the current input position, counts it and logs it. Returns `Ok(())`
    /// if the job continues, in which case the caller recovers locally; the error that ends the job
    /// otherwise.
    pub fn report(&mut self,err:TeXError) -> TeXResult<()> {
        let err = err.at(self.mouth.current_position());
        if err.is_fatal() { return Err(err) }
        self.aux.error_count += 1;
        match recovery_policy(err.clone(),self.aux.interaction,self.aux.error_count,self.aux.config.error_limit) {
            Ok(()) => {
                self.aux.outputs.errmessage(&err);
                Ok(())
            }
            Err(e) => {
                if e.kind != err.kind { self.aux.outputs.errmessage(&err) }
                Err(e)
            }
        }
    }
    /// Displays a token the way TeX prints it, e.g. in error messages.
    pub fn display_token(&self,t:&ET::Token) -> String {
        t.display(self.aux.memory.cs_interner(),self.state.get_catcode_scheme(),self.state.get_escape_char()).to_string()
    }
    /// Displays a control sequence name (with escape character).
    pub fn display_cs(&self,cs:&ET::CSName) -> String {
        cs.display(self.aux.memory.cs_interner(),self.state.get_catcode_scheme(),self.state.get_escape_char()).to_string()
    }

    /// Runs the main loop until the input is exhausted or `\end` is encountered. Fatal errors are
    /// logged; all input sources are closed and the [`Typesetter`] is finished in any case.
    pub fn run(&mut self) -> TeXResult<()> {
        let everyjob = self.state.get_primitive_toks(PRIMITIVES.everyjob).clone();
        let mut res = self.mouth.push_exp(&everyjob);
        if res.is_ok() { res = self.main_loop() }
        if let Err(e) = &mut res {
            *e = e.clone().at(self.mouth.current_position());
            self.aux.outputs.errmessage(&*e);
        } else if self.state.get_group_level() > 0 {
            self.aux.outputs.write_16(format_args!(
                "(\\end occurred inside a group at level {})",self.state.get_group_level()
            ));
        }
        self.mouth.finish(self.aux);
        self.typesetter.finish();
        res
    }
}

/// A TeX engine.
pub trait TeXEngine:Sized {
    type Types:EngineTypes;
    /// Borrows all components at once.
    fn get_engine_refs(&mut self) -> EngineReferences<'_,Self::Types>;

    /// Processes the string `s` as the main input.
    fn do_string(&mut self,s:&str) -> TeXResult<()> {
        let mut refs = self.get_engine_refs();
        log::debug!("Running string input");
        if refs.aux.jobname.is_empty() { refs.aux.jobname = "texput".to_string() }
        refs.aux.start_time = Local::now();
        refs.mouth.push_string(s)?;
        refs.run()
    }

    /// Processes the file `path` as the main input. The working directory becomes the file's
    /// directory, and `\jobname` defaults to the file's name.
    fn do_file<S:AsRef<str>>(&mut self,path:S) -> TeXResult<()> {
        let mut refs = self.get_engine_refs();
        log::debug!("Running file {}",path.as_ref());
        let file = match refs.filesystem.find_input(path.as_ref()) {
            Some(f) => f,
            None => return Err(TeXError::fatal(ErrorKind::FileNotFound(path.as_ref().to_string())))
        };
        if refs.aux.jobname.is_empty() { refs.aux.jobname = file.stem() }
        if let Some(parent) = file.path().parent() {
            refs.filesystem.set_pwd(parent.to_path_buf());
        }
        refs.aux.start_time = Local::now();
        refs.mouth.push_file(&file,refs.aux)?;
        refs.run()
    }
}

/// Default implementation of a [`TeXEngine`], owning all of its components.
pub struct DefaultEngine<ET:EngineTypes> {
    pub aux:EngineAux<ET>,
    pub state:ET::State,
    pub filesystem:ET::FileSystem,
    pub fontsystem:ET::FontSystem,
    pub mouth:Mouth<ET>,
    pub gullet:Gullet<ET>,
    pub stomach:Stomach<ET>,
    pub typesetter:ET::Typesetter,
}
impl<ET:EngineTypes> DefaultEngine<ET> {
    /// A new engine with the [default configuration](EngineConfig::default) and all primitives registered.
    pub fn new() -> Self { Self::with_config(EngineConfig::default()) }
    pub fn with_config(config:EngineConfig) -> Self {
        let mut aux = EngineAux::new(config);
        let nullfont = CSHandler::<ET::Char,ET::CSName>::new(aux.memory.cs_interner_mut(),"nullfont");
        let fontsystem = ET::FontSystem::new(nullfont);
        let state = ET::State::new(fontsystem.null(),&mut aux);
        let mouth = Mouth::new(aux.config.max_expansion_depth);
        let mut engine = DefaultEngine {
            state, fontsystem,
            filesystem:ET::FileSystem::new(crate::utils::PWD.to_path_buf()),
            mouth,
            gullet:Gullet::default(),
            stomach:Stomach::default(),
            typesetter:ET::Typesetter::default(),
            aux
        };
        crate::commands::tex::register_tex_primitives(&mut engine);
        engine
    }
}
impl<ET:EngineTypes> TeXEngine for DefaultEngine<ET> {
    type Types = ET;
    fn get_engine_refs(&mut self) -> EngineReferences<'_,ET> {
        EngineReferences {
            state:&mut self.state,
            aux:&mut self.aux,
            mouth:&mut self.mouth,
            gullet:&mut self.gullet,
            stomach:&mut self.stomach,
            filesystem:&mut self.filesystem,
            fontsystem:&mut self.fontsystem,
            typesetter:&mut self.typesetter,
        }
    }
}

/// Plain TeX on bytes: interned control sequences, files from disk, output to the [`log`] facade
/// and all nodes collected in a [`VecTypesetter`].
#[derive(Copy,Clone,Debug)]
pub struct DefaultPlainTeXEngineTypes;
impl EngineTypes for DefaultPlainTeXEngineTypes {
    type Char = u8;
    type CSName = InternedCSName;
    type Token = StandardToken<u8,InternedCSName>;
    type File = PhysicalFile<u8>;
    type FileSystem = PhysicalFileSystem<u8>;
    type Font = DefaultFont<InternedCSName>;
    type FontSystem = DefaultFontSystem<InternedCSName>;
    type Outputs = LogOutputs;
    type Typesetter = VecTypesetter<Self>;
    type State = DefaultState<Self>;
}

