#[doc(hidden)]
#[cfg(any(test,doctest))]
#[allow(dead_code)]
pub mod test_utils {
    use crate::engine::{DefaultEngine, EngineTypes};
    use crate::engine::filesystem::{VirtualFile, VirtualFileSystem};
    use crate::engine::fontsystem::{DefaultFont, DefaultFontSystem};
    use crate::engine::state::tex_state::DefaultState;
    use crate::engine::utils::outputs::CollectingOutputs;
    use crate::tex::nodes::VecTypesetter;
    use crate::tex::tokens::StandardToken;
    use crate::tex::tokens::control_sequences::InternedCSName;

    #[macro_export]
    macro_rules! measure {
        ($key:ident:$x:expr) => {{
            let measure_start = std::time::Instant::now();
            let ret = $x;
            log::warn!(target:stringify!($key),"Finished after {:?}",measure_start.elapsed());
            ret
        }};
    }

    #[allow(unused_must_use)]
    pub fn trace() {
        env_logger::builder().filter_level(log::LevelFilter::Trace).try_init();
    }
    #[allow(unused_must_use)]
    pub fn debug() {
        env_logger::builder().filter_level(log::LevelFilter::Debug).try_init();
    }
    #[allow(unused_must_use)]
    pub fn info() {
        env_logger::builder().filter_level(log::LevelFilter::Info).try_init();
    }
    #[allow(unused_must_use)]
    pub fn warn() {
        env_logger::builder().filter_level(log::LevelFilter::Warn).try_init();
    }
    #[allow(unused_must_use)]
    pub fn error() {
        env_logger::builder().filter_level(log::LevelFilter::Error).try_init();
    }

    /// Bytes, in-memory files, collected outputs and nodes.
    #[derive(Copy,Clone,Debug)]
    pub struct TestEngineTypes;
    impl EngineTypes for TestEngineTypes {
        type Char = u8;
        type CSName = InternedCSName;
        type Token = StandardToken<u8,InternedCSName>;
        type File = VirtualFile<u8>;
        type FileSystem = VirtualFileSystem<u8>;
        type Font = DefaultFont<InternedCSName>;
        type FontSystem = DefaultFontSystem<InternedCSName>;
        type Outputs = CollectingOutputs;
        type Typesetter = VecTypesetter<Self>;
        type State = DefaultState<Self>;
    }
    pub type TestEngine = DefaultEngine<TestEngineTypes>;

    /// A minimal `.tfm` file: just the header words with checksum and design size.
    pub fn tfm(checksum:u32,design_size_pt:i32) -> Vec<u8> {
        let mut v = vec!(0,20,0,2);
        v.extend([0u8;20]);
        v.extend(checksum.to_be_bytes());
        v.extend((design_size_pt << 20).to_be_bytes());
        v
    }
}


#[cfg(test)]
mod tests {
    use crate::tests::test_utils::*;
    use crate::prelude::*;
    use crate::measure;
    use crate::engine::config::{EngineConfig, InteractionMode};
    use crate::engine::fontsystem::Font;
    use crate::engine::utils::outputs::OutputKind;
    use crate::tex::nodes::Node;
    use crate::tex::numerics::Dim32;
    use crate::utils::errors::{ErrorKind, TeXResult};
    use log::*;

    fn run(s:&str) -> (TestEngine,TeXResult<()>) {
        let mut engine = TestEngine::new();
        let res = engine.do_string(s);
        (engine,res)
    }
    fn text(s:&str) -> String {
        let (engine,res) = run(s);
        if let Err(e) = res { panic!("{}",e) }
        assert!(engine.aux.outputs.errors().is_empty(),"{:?}",engine.aux.outputs.errors());
        engine.typesetter.text().trim_end().to_string()
    }

    #[test]
    fn tokenizer() {
        debug();
        use crate::engine::mouth::strings::InputTokenizer;
        use crate::tex::catcodes::DEFAULT_SCHEME_U8;
        use crate::utils::Ptr;
        use crate::tex::characters::StringLineSource;

        type T = StandardToken<u8,Ptr<str>>;
        let mut cs_handler = ();
        let cc = &DEFAULT_SCHEME_U8;

        let string = "\\foo   \n  \n   {a}{!}";
        let input: StringLineSource<u8> = string.into();
        let mut tokenizer = InputTokenizer::new(input);
        let eol = Some(b'\r');
        let next = tokenizer.get_next(&mut cs_handler,cc,None); // \foo
        assert!(matches!(next,Ok(Some(T::ControlSequence(s))) if &*s == "foo"));
        let next = tokenizer.get_next(&mut cs_handler,cc,eol); // \par
        assert!(matches!(next,Ok(Some(T::ControlSequence(s))) if &*s == "par"));
        let next : T = tokenizer.get_next(&mut cs_handler,cc,eol).unwrap().unwrap(); // {
        assert_eq!(next.command_code(), CommandCode::BeginGroup);
        let next : T = tokenizer.get_next(&mut cs_handler,cc,eol).unwrap().unwrap(); // a
        assert_eq!(next.command_code(), CommandCode::Letter);
        let next : T = tokenizer.get_next(&mut cs_handler,cc,eol).unwrap().unwrap(); // }
        assert_eq!(next.command_code(), CommandCode::EndGroup);
        let next : T = tokenizer.get_next(&mut cs_handler,cc,eol).unwrap().unwrap(); // {
        assert_eq!(next.command_code(), CommandCode::BeginGroup);
        let next : T = tokenizer.get_next(&mut cs_handler,cc,eol).unwrap().unwrap(); // !
        assert_eq!(next.command_code(), CommandCode::Other);
        let next : T = tokenizer.get_next(&mut cs_handler,cc,eol).unwrap().unwrap(); // }
        assert_eq!(next.command_code(), CommandCode::EndGroup);
        let next : T = tokenizer.get_next(&mut cs_handler,cc,eol).unwrap().unwrap(); // end of line => space
        assert_eq!(next.command_code(), CommandCode::Space);
        assert!(tokenizer.get_next::<T>(&mut cs_handler,cc,eol).unwrap().is_none()); // EOF
    }

    #[test]
    fn hello_hello() {
        debug();
        let (mut engine,res) = run(r"\def\hi{Hello}{\let\x=\hi \x} \hi");
        res.unwrap();
        assert_eq!(engine.typesetter.text().trim_end(),"Hello Hello");
        let x = CSHandler::<u8,_>::new(engine.aux.memory.cs_interner_mut(),"x");
        assert!(engine.state.get_command(&x).is_none());
        assert!(engine.typesetter.finished);
    }

    #[test]
    fn scope_restore() {
        let (engine,res) = run(r"\count1=5 {\count1=6 \global\count2=3 \dimen0=2pt}");
        res.unwrap();
        assert_eq!(engine.state.get_int_register(1),5);
        assert_eq!(engine.state.get_int_register(2),3);
        assert_eq!(engine.state.get_dim_register(0),Dim32::ZERO);
        assert_eq!(engine.state.get_group_level(),0);
    }

    #[test]
    fn catcodes_in_groups() {
        let (engine,res) = run(r"{\catcode`\@=11 \def\a@b{x}\a@b}");
        res.unwrap();
        assert_eq!(*engine.state.get_catcode_scheme().get(b'@'),CategoryCode::Other);
        assert_eq!(engine.typesetter.text().trim_end(),"x");
    }

    #[test]
    fn macro_arguments() {
        assert_eq!(text(r"\def\foo#1{(#1)}\foo{a{b}c}"),"(abc)");
        assert_eq!(text(r"\def\foo#1{\def\r{#1}}\foo{a{b}c}\meaning\r"),"macro:->a{b}c");
        assert_eq!(text(r"\def\foo#1.{\def\r{#1}}\foo{a}{b}.\meaning\r"),"macro:->{a}{b}");
        assert_eq!(text(r"\def\foo#1.#2!{[#1|#2]}\foo x.{y}!"),"[x|y]");
        assert_eq!(text(r"\def\foo#1#2{#2#1}\foo ab"),"ba");
        assert_eq!(text(r"\def\foo#1#{[#1]}\foo x{y}"),"[x]y");
    }

    #[test]
    fn paragraph_in_argument() {
        let (engine,res) = run("\\def\\foo#1{#1}\\foo{a\n\nb}");
        res.unwrap();
        assert!(engine.aux.outputs.errors().iter().any(|e| e.contains("Paragraph ended")));
        let (engine,res) = run("\\long\\def\\foo#1{#1}\\foo{a\n\nb}");
        res.unwrap();
        assert!(engine.aux.outputs.errors().is_empty());
        assert_eq!(engine.typesetter.text().trim_end(),"a \n\nb");
    }

    #[test]
    fn countdown() { measure!(countdown: {
        assert_eq!(text(r"\count1=3 \def\loop{\ifnum\count1>0 \the\count1\advance\count1 by -1 \expandafter\loop\fi}\loop"),"321");
    })}

    #[test]
    fn undefined() {
        let (engine,res) = run(r"a\undefined b");
        res.unwrap();
        assert_eq!(engine.typesetter.text().trim_end(),"ab");
        let errors = engine.aux.outputs.errors();
        assert_eq!(errors.len(),1);
        assert!(errors[0].contains("Undefined control sequence \\undefined"));
        assert_eq!(engine.aux.error_count,1);
    }

    #[test]
    fn error_stop() {
        let mut engine = TestEngine::with_config(EngineConfig{interaction:InteractionMode::ErrorStop,..EngineConfig::default()});
        let err = engine.do_string(r"a\undefined b").unwrap_err();
        assert!(matches!(err.kind,ErrorKind::Undefined(_)));
        assert_eq!(engine.typesetter.text(),"a");
        assert!(engine.mouth.is_empty());
    }

    #[test]
    fn error_limit() {
        let mut engine = TestEngine::with_config(EngineConfig{error_limit:3,..EngineConfig::default()});
        let err = engine.do_string(r"\u\u\u\u\u").unwrap_err();
        assert_eq!(err.kind,ErrorKind::ErrorLimitReached(3));
    }

    #[test]
    fn expansion_depth() {
        let mut engine = TestEngine::with_config(EngineConfig{max_expansion_depth:100,..EngineConfig::default()});
        let err = engine.do_string(r"\def\a{\a x}\a").unwrap_err();
        assert!(matches!(err.kind,ErrorKind::ExpansionTooDeep(_)));
        assert!(engine.mouth.is_empty());
    }

    #[test]
    fn edef() {
        assert_eq!(text(r"\def\a{x}\edef\b{\a\a}\def\a{y}\b"),"xx");
        assert_eq!(text(r"\count1=7 \edef\c{\the\count1}\count1=8 \c"),"7");
        assert_eq!(text(r"\def\a{x}\edef\b{\noexpand\a\a}\def\a{y}\b"),"yx");
        assert_eq!(text(r"\toks0={#}\edef\b{\the\toks0}\meaning\b"),"macro:->##");
        let (engine,res) = run(r"{\def\a{x}\xdef\b{\a}}\b");
        res.unwrap();
        assert_eq!(engine.typesetter.text().trim_end(),"x");
    }

    #[test]
    fn expandafter_and_csname() {
        assert_eq!(text(r"\expandafter\def\csname foo\endcsname{bar}\foo"),"bar");
        assert_eq!(text(r"\def\a{\b}\def\b{c}\expandafter\def\a{d}\b"),"d");
        assert_eq!(text(r"\ifcsname nothere\endcsname Y\else N\fi\csname nothere\endcsname\ifcsname nothere\endcsname Y\else N\fi"),"NY");
    }

    #[test]
    fn conditionals() {
        assert_eq!(text(r"\def\a{x}\def\b{x}\ifcase 2 a\or b\or c\else d\fi\ifx\a\b T\else F\fi\if aaY\fi\ifnum 3<2 N\else E\fi"),"cTYE");
        assert_eq!(text(r"\ifcase 5 a\or b\else z\fi\ifodd 3 o\fi\iftrue t\fi\iffalse f\fi"),"zot");
        assert_eq!(text(r"\ifcase -1 zero\or one\else neg\fi"),"neg");
        assert_eq!(text(r"\ifcase -3 zero\or one\or two\fi."),".");
        assert_eq!(text(r"\ifcase 0 zero\or one\else neg\fi"),"zero");
        assert_eq!(text(r"\ifdim 1pt<2pt\relax Z\fi\ifcat abC\fi\ifdefined\relax D\fi\ifdefined\nothing U\fi"),"ZCD");
        assert_eq!(text(r"\iftrue\iffalse a\else b\fi\else c\fi"),"b");
        assert_eq!(text(r"\ifx\undefinedA\undefinedB S\fi"),"S");
    }

    #[test]
    fn extra_fi() {
        let (engine,res) = run(r"a\fi b");
        res.unwrap();
        assert!(engine.aux.outputs.errors()[0].contains("Extra \\fi"));
        assert_eq!(engine.typesetter.text().trim_end(),"ab");
    }

    #[test]
    fn the_and_meaning() {
        assert_eq!(text(r"\dimen0=1.5pt \the\dimen0"),"1.5pt");
        assert_eq!(text(r"\def\a#1{x#1}\meaning\a"),"macro:#1->x#1");
        assert_eq!(text(r"\meaning a"),"the letter a");
        assert_eq!(text(r"\skip3=1pt plus 2fil minus 3pt\the\skip3"),"1.0pt plus 2.0fil minus 3.0pt");
        assert_eq!(text(r"\count1=-42 \the\count1"),"-42");
        let (engine,res) = run(r"\show\relax\showthe\count0");
        res.unwrap();
        assert_eq!(engine.aux.outputs.get(OutputKind::Write16),vec!("> \\relax=\\relax.".to_string(),"> 0.".to_string()));
    }

    #[test]
    fn strings_and_numbers() {
        assert_eq!(text(r"\uppercase{ab}\romannumeral 1984 \number 007 \string\foo"),"ABmcmlxxxiv7\\foo");
        assert_eq!(text(r"\lowercase{XyZ}\number`\a"),"xyz97");
        assert_eq!(text(r#"\number'17 \number"1F"#),"1531");
        assert_eq!(text(r"\escapechar=-1 \string\foo"),"foo");
    }

    #[test]
    fn arithmetic() {
        assert_eq!(text(r"\count1=7 \multiply\count1 by 3 \divide\count1 2 \the\count1"),"10");
        assert_eq!(text(r"\dimen1=1pt \advance\dimen1 by 0.5pt \multiply\dimen1 2 \the\dimen1"),"3.0pt");
        let (engine,res) = run(r"\divide\count1 0");
        res.unwrap();
        assert!(engine.aux.outputs.errors()[0].contains("Arithmetic overflow"));
    }

    #[test]
    fn glue_overflow() {
        let (engine,res) = run(r"\skip0=0pt plus 16000fil \advance\skip0 by \skip0 \advance\skip0 by \skip0 \the\skip0");
        res.unwrap();
        assert_eq!(engine.aux.outputs.errors().len(),2);
        assert!(engine.aux.outputs.errors()[0].contains("Arithmetic overflow"));
        assert_eq!(engine.typesetter.text().trim(),"0.0pt plus 16000.0fil");

        let (engine,res) = run(r"\skip0=16000pt \advance\skip0 by \skip0 \the\skip0");
        res.unwrap();
        assert!(engine.aux.outputs.errors()[0].contains("Arithmetic overflow"));
        assert_eq!(engine.typesetter.text().trim(),"16000.0pt");

        let (engine,res) = run(r"\skip0=1pt plus 9000pt \multiply\skip0 by 2 \the\skip0");
        res.unwrap();
        assert_eq!(engine.aux.outputs.errors().len(),1);
        assert_eq!(engine.typesetter.text().trim(),"1.0pt plus 9000.0pt");
        assert_eq!(text(r"\skip0=1pt plus 2fil \advance\skip0 by 1pt plus 1fil \the\skip0"),"2.0pt plus 3.0fil");
    }

    #[test]
    fn shorthands() {
        assert_eq!(text(r"\chardef\c=65 \c\countdef\n=3 \n=4 \the\count3"),"A4");
        assert_eq!(text(r"\dimendef\d=2 \d=3pt \the\dimen2\toksdef\t=1 \t={xy}\the\toks1"),"3.0ptxy");
        assert_eq!(text(r"\chardef\c=66 \meaning\c"),"\\char\"42");
    }

    #[test]
    fn let_and_futurelet() {
        assert_eq!(text(r"\let\a= b\a"),"b");
        assert_eq!(text(r"\def\p{\ifx\n a A\else B\fi}\futurelet\n\p a"),"Aa");
        assert_eq!(text(r"\let\r=\relax \ifx\r\relax R\fi"),"R");
    }

    #[test]
    fn groups_and_aftergroup() {
        assert_eq!(text(r"\def\x{X}{\aftergroup\x a}b"),"aXb");
        assert_eq!(text(r"\begingroup\count1=9 \endgroup\the\count1"),"0");
        assert_eq!(text(r"\def\x{X}\afterassignment\x\count1=2 y"),"Xy");
        let (engine,res) = run(r"\endgroup}");
        res.unwrap();
        let errors = engine.aux.outputs.errors();
        assert!(errors[0].contains("Extra \\endgroup"));
        assert!(errors[1].contains("Too many }'s"));
    }

    #[test]
    fn boxes() {
        let (engine,res) = run(r"\setbox1=\hbox{ab}\wd1=5pt \the\wd1 \box1\setbox2=\vbox to 3pt{c}\the\ht2");
        res.unwrap();
        assert_eq!(engine.typesetter.text().trim_end(),"5.0ptab3.0pt");
        assert!(engine.state.get_box_register(1).is_none());
        assert_eq!(engine.state.get_box_register(2).map(|b| b.children.len()),Some(1));
        assert!(engine.typesetter.nodes.iter().any(|n| matches!(n,Node::Box(b) if b.width() == Dim32::from_pt(5))));
        assert_eq!(text(r"\setbox0=\hbox{x}\copy0\copy0\box0\box0"),"xxx");
    }

    #[test]
    fn material() {
        let (engine,res) = run(r"\hskip 3pt plus 1fil\kern2pt\penalty-100\hrule width 1pt\special{a b}\mark{\romannumeral3}\char98\par");
        res.unwrap();
        let nodes = &engine.typesetter.nodes;
        assert!(matches!(nodes[0],Node::Glue{vertical:false,..}));
        assert!(matches!(nodes[1],Node::Kern{dim,vertical:false} if dim == Dim32::from_pt(2)));
        assert!(matches!(nodes[2],Node::Penalty(-100)));
        assert!(matches!(nodes[3],Node::Rule{width:Some(w),height:None,vertical:true,..} if w == Dim32::from_pt(1)));
        assert!(matches!(&nodes[4],Node::Special(s) if s == "a b"));
        assert!(matches!(&nodes[5],Node::Mark(m) if m.len() == 3));
        assert!(matches!(nodes[6],Node::Char{char:b'b',..}));
        assert!(matches!(nodes[7],Node::Par));
    }

    #[test]
    fn everypar() {
        assert_eq!(text("\\everypar{P}\n\nab").trim_start(),"Pab");
        assert_eq!(text(r"\everypar{[}a\par b\par\char99"),"[a\n\n[b\n\n[c");
        assert_eq!(text(r"\everypar{[}\hbox{ab}"),"ab");
        assert_eq!(text(r"\everypar{[}\vbox{a\par b}"),"[a\n\n[b");
        let (engine,res) = run(r"\everypar{\count1=7 }\hskip 1pt");
        res.unwrap();
        assert_eq!(engine.state.get_int_register(1),7);
        assert!(matches!(engine.typesetter.nodes[0],Node::Glue{vertical:false,..}));
    }

    #[test]
    fn fonts() {
        let mut engine = TestEngine::new();
        engine.filesystem.add_file("cmr10.tfm",tfm(0xCAFE,10));
        engine.do_string(r"\font\x=cmr10 at 12pt \x A\fontname\x\font\y=cmr10 scaled 2000 \fontname\y").unwrap();
        assert_eq!(engine.typesetter.text().trim_end(),"Acmr10 at 12.0ptcmr10 at 20.0pt");
        match &engine.typesetter.nodes[0] {
            Node::Char{font,..} => {
                assert_eq!(font.filename(),"cmr10");
                assert_eq!(font.at_size(),Dim32::from_pt(12));
            }
            n => panic!("unexpected node {:?}",n)
        }
        let (engine,res) = run(r"\font\z=nothere \z a\fontname\z");
        res.unwrap();
        assert!(engine.aux.outputs.errors()[0].contains("nothere"));
        assert_eq!(engine.typesetter.text().trim_end(),"anullfont");
    }

    #[test]
    fn input_files() {
        let mut engine = TestEngine::new();
        engine.filesystem.add_file("sub.tex","inner\\endinput\nignored\n");
        engine.do_string(r"a\input sub b\input missing").unwrap();
        assert_eq!(engine.typesetter.text().trim_end(),"ainnerb");
        assert_eq!(engine.aux.outputs.get(OutputKind::FileOpen).len(),1);
        assert!(engine.aux.outputs.errors()[0].contains("missing"));
    }

    #[test]
    fn messages() {
        let (engine,res) = run(r"\message{hi \the\count0}\errmessage{oops}");
        res.unwrap();
        assert_eq!(engine.aux.outputs.messages(),vec!("hi 0".to_string()));
        assert!(engine.aux.outputs.errors()[0].contains("oops"));
    }

    #[test]
    fn tracing() {
        let (engine,res) = run(r"\tracingmacros=1 \def\a#1{x}\a y");
        res.unwrap();
        let lines = engine.aux.outputs.log_lines();
        assert_eq!(lines,vec!("\\a #1->x".to_string(),"#1<-y".to_string()));
    }

    #[test]
    fn job_info() {
        let (engine,res) = run(r"\jobname\end ignored");
        res.unwrap();
        assert_eq!(engine.typesetter.text().trim_end(),"texput");
        let (engine,res) = run(r"\the\year");
        res.unwrap();
        info!("year: {}",engine.typesetter.text());
        assert_eq!(engine.typesetter.text().trim_end(),chrono::Datelike::year(&engine.aux.start_time).to_string());
    }

    #[test]
    fn interaction_modes() {
        let (engine,res) = run(r"\batchmode a");
        res.unwrap();
        assert_eq!(engine.aux.interaction,InteractionMode::Batch);
        let mut engine = TestEngine::new();
        let err = engine.do_string(r"\errorstopmode\undefined").unwrap_err();
        assert!(matches!(err.kind,ErrorKind::Undefined(_)));
    }
}
