#![forbid(unsafe_code)]

use std::fmt::Display;
use std::process::ExitCode;
use ansi_term::Color::{Blue, Red, White, Yellow};
use clap::Parser;
use expand_engine::engine::{DefaultEngine, EngineTypes, TeXEngine};
use expand_engine::engine::config::{EngineConfig, InteractionMode};
use expand_engine::engine::filesystem::{PhysicalFile, PhysicalFileSystem};
use expand_engine::engine::fontsystem::{DefaultFont, DefaultFontSystem};
use expand_engine::engine::state::tex_state::DefaultState;
use expand_engine::engine::utils::outputs::Outputs;
use expand_engine::tex::nodes::VecTypesetter;
use expand_engine::tex::tokens::StandardToken;
use expand_engine::tex::tokens::control_sequences::InternedCSName;

/// Prints everything the job says to stderr; stdout is reserved for the typeset text.
struct TerminalOutputs;
impl Outputs for TerminalOutputs {
    fn new() -> Self { TerminalOutputs }
    fn message<D:Display>(&self,text:D) {
        eprint!("{}",Yellow.paint(text.to_string()))
    }
    fn errmessage<D:Display>(&self,text:D) {
        eprintln!("\n{}",Red.paint(text.to_string()))
    }
    fn file_open<D:Display>(&self,text:D) {
        eprint!("{}",Blue.paint(format!("({}",text)))
    }
    fn file_close<D:Display>(&self,_text:D) {
        eprint!("{}",Blue.paint(")"))
    }
    fn write_16<D:Display>(&self,text:D) {
        eprintln!("{}",White.paint(text.to_string()))
    }
    fn write_neg1<D:Display>(&self,text:D) {
        log::info!(target:"write::-1","{}",text)
    }
}

#[derive(Copy,Clone,Debug)]
struct CliTypes;
impl EngineTypes for CliTypes {
    type Char = u8;
    type CSName = InternedCSName;
    type Token = StandardToken<u8,InternedCSName>;
    type File = PhysicalFile<u8>;
    type FileSystem = PhysicalFileSystem<u8>;
    type Font = DefaultFont<InternedCSName>;
    type FontSystem = DefaultFontSystem<InternedCSName>;
    type Outputs = TerminalOutputs;
    type Typesetter = VecTypesetter<Self>;
    type State = DefaultState<Self>;
}

#[derive(Parser,Debug)]
#[clap(author, version, about, long_about = None)]
struct Parameters {
    /// Input file (tex)
    #[clap(short, long)]
    input: Option<String>,

    /// Input string (tex); used if no input file is given
    #[clap(short, long)]
    text: Option<String>,

    /// \jobname; defaults to the input file's name, or `texput`
    #[clap(short, long)]
    jobname: Option<String>,

    /// batch, nonstop, scroll or errorstop
    #[clap(long, default_value = "nonstop")]
    interaction: String,

    /// number of errors after which the job is aborted
    #[clap(long, default_value_t = 100)]
    error_limit: usize,

    /// maximal nesting of input sources
    #[clap(long, default_value_t = 5000)]
    max_depth: usize,

    /// verbose
    #[clap(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> ExitCode {
    let params = Parameters::parse();
    let level = if params.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn };
    let _ = env_logger::builder().filter_level(level).try_init();

    let interaction = match InteractionMode::from_name(&params.interaction) {
        Some(i) => i,
        None => {
            eprintln!("{}",Red.paint(format!("Unknown interaction mode: {}",params.interaction)));
            return ExitCode::from(2)
        }
    };
    let config = EngineConfig {
        jobname:params.jobname.unwrap_or_default(),
        interaction,
        error_limit:params.error_limit,
        max_expansion_depth:params.max_depth,
        ..EngineConfig::default()
    };
    let mut engine = DefaultEngine::<CliTypes>::with_config(config);
    let res = match (params.input,params.text) {
        (Some(file),_) => engine.do_file(file),
        (None,Some(text)) => engine.do_string(&text),
        (None,None) => {
            eprintln!("{}",Red.paint("No input given; use --input or --text"));
            return ExitCode::from(2)
        }
    };
    println!("{}",engine.typesetter.text().trim_end());

    let errors = engine.aux.error_count;
    match res {
        Ok(()) if errors == 0 => ExitCode::SUCCESS,
        Ok(()) => {
            eprintln!("{}",Yellow.paint(format!("Job {} finished with {} error(s)",engine.aux.jobname,errors)));
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}",Red.paint(format!("Job {} aborted after {} error(s): {}",engine.aux.jobname,errors,e.kind)));
            ExitCode::FAILURE
        }
    }
}
