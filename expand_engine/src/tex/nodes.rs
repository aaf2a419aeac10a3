/*! The output of the engine: [`Node`]s handed to a [`Typesetter`].

    The engine does not lay anything out; it only emits structured material in the order primitives
    produce it. Boxes (`\hbox`, `\vbox`) collect their contents in a [`TeXBox`] first.
*/
use std::fmt::Write;
use crate::engine::EngineTypes;
use crate::engine::fontsystem::Font;
use crate::tex::characters::Character;
use crate::tex::numerics::{Dim32, Skip};
use crate::tex::tokens::token_lists::TokenList;

/// A horizontal or vertical box.
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum BoxType { Horizontal, Vertical }

/// A single piece of typesetting material.
#[derive(Clone,Debug)]
pub enum Node<ET:EngineTypes> {
    /// A character in the current font.
    Char{ char:ET::Char, font:ET::Font },
    /// An interword space.
    Space,
    /// `\hskip`, `\vskip`
    Glue{ skip:Skip, vertical:bool },
    /// `\kern`
    Kern{ dim:Dim32, vertical:bool },
    /// `\hrule` (vertical) or `\vrule`; unspecified dimensions are running.
    Rule{ width:Option<Dim32>, height:Option<Dim32>, depth:Option<Dim32>, vertical:bool },
    Penalty(i32),
    /// `\mark` with its (expanded) token list.
    Mark(TokenList<ET::Token>),
    /// `\special`
    Special(String),
    /// End of a paragraph.
    Par,
    Box(TeXBox<ET>)
}
impl<ET:EngineTypes> Node<ET> {
    /// The natural width of this node in horizontal mode.
    pub fn width(&self) -> Dim32 {
        match self {
            Node::Kern{dim,vertical:false} => *dim,
            Node::Glue{skip,vertical:false} => skip.base,
            Node::Rule{width,vertical:false,..} => width.unwrap_or(Dim32(26214)),
            Node::Rule{width,vertical:true,..} => width.unwrap_or(Dim32::ZERO),
            Node::Box(b) => b.width(),
            _ => Dim32::ZERO
        }
    }
    /// The natural height of this node.
    pub fn height(&self) -> Dim32 {
        match self {
            Node::Rule{height,vertical:true,..} => height.unwrap_or(Dim32(26214)),
            Node::Rule{height,..} => height.unwrap_or(Dim32::ZERO),
            Node::Box(b) => b.height(),
            _ => Dim32::ZERO
        }
    }
    /// The natural depth of this node.
    pub fn depth(&self) -> Dim32 {
        match self {
            Node::Rule{depth,..} => depth.unwrap_or(Dim32::ZERO),
            Node::Box(b) => b.depth(),
            _ => Dim32::ZERO
        }
    }
    /// The extent of this node along the main axis of a vertical list.
    fn vertical_extent(&self) -> Dim32 {
        match self {
            Node::Kern{dim,vertical:true} => *dim,
            Node::Glue{skip,vertical:true} => skip.base,
            n => n.height() + n.depth()
        }
    }
    /// Appends the plain text content of this node to `s`.
    pub fn write_text(&self,s:&mut String) {
        match self {
            Node::Char{char,..} => s.push(char.to_char()),
            Node::Space => s.push(' '),
            Node::Par => s.push_str("\n\n"),
            Node::Box(b) => for c in &b.children { c.write_text(s) },
            _ => ()
        }
    }
}

/// A box with its contents and (possibly assigned) dimensions.
#[derive(Clone,Debug)]
pub struct TeXBox<ET:EngineTypes> {
    pub btype:BoxType,
    pub children:Vec<Node<ET>>,
    /// Set via `\wd`; the natural width otherwise.
    pub assigned_width:Option<Dim32>,
    pub assigned_height:Option<Dim32>,
    pub assigned_depth:Option<Dim32>
}
impl<ET:EngineTypes> TeXBox<ET> {
    pub fn new(btype:BoxType,children:Vec<Node<ET>>) -> Self {
        TeXBox { btype, children, assigned_width:None, assigned_height:None, assigned_depth:None }
    }
    pub fn width(&self) -> Dim32 {
        self.assigned_width.unwrap_or_else(|| match self.btype {
            BoxType::Horizontal => self.children.iter().map(|c| c.width()).sum(),
            BoxType::Vertical => self.children.iter().map(|c| c.width()).max().unwrap_or_default()
        })
    }
    pub fn height(&self) -> Dim32 {
        self.assigned_height.unwrap_or_else(|| match self.btype {
            BoxType::Horizontal => self.children.iter().map(|c| c.height()).max().unwrap_or_default(),
            BoxType::Vertical => {
                let total : Dim32 = self.children.iter().map(|c| c.vertical_extent()).sum();
                total - self.children.last().map(|c| c.depth()).unwrap_or_default()
            }
        })
    }
    pub fn depth(&self) -> Dim32 {
        self.assigned_depth.unwrap_or_else(|| match self.btype {
            BoxType::Horizontal => self.children.iter().map(|c| c.depth()).max().unwrap_or_default(),
            BoxType::Vertical => self.children.last().map(|c| c.depth()).unwrap_or_default()
        })
    }
}

/// The downstream consumer of the engine's output.
pub trait Typesetter<ET:EngineTypes> {
    /// Receives the next top-level node.
    fn push_node(&mut self,node:Node<ET>);
    /// Called once at the end of a job (normally or after an error).
    fn finish(&mut self) {}
}

/// A [`Typesetter`] that simply collects all nodes.
pub struct VecTypesetter<ET:EngineTypes> {
    pub nodes:Vec<Node<ET>>,
    pub finished:bool
}
impl<ET:EngineTypes> Default for VecTypesetter<ET> {
    fn default() -> Self { VecTypesetter { nodes:Vec::new(), finished:false } }
}
impl<ET:EngineTypes> VecTypesetter<ET> {
    /// The plain text content of all nodes so far.
    pub fn text(&self) -> String {
        let mut s = String::new();
        for n in &self.nodes { n.write_text(&mut s) }
        s
    }
    /// A terse one-line-per-node rendering.
    pub fn outline(&self) -> String {
        let mut s = String::new();
        for n in &self.nodes {
            let _ = match n {
                Node::Char{char,font} => writeln!(s,"char {} ({})",char.display(),font.filename()),
                Node::Space => writeln!(s,"space"),
                Node::Glue{skip,vertical} => writeln!(s,"{} {}",if *vertical {"vskip"} else {"hskip"},skip),
                Node::Kern{dim,..} => writeln!(s,"kern {}",dim),
                Node::Rule{vertical,..} => writeln!(s,"{}",if *vertical {"hrule"} else {"vrule"}),
                Node::Penalty(p) => writeln!(s,"penalty {}",p),
                Node::Mark(_) => writeln!(s,"mark"),
                Node::Special(sp) => writeln!(s,"special {}",sp),
                Node::Par => writeln!(s,"par"),
                Node::Box(b) => writeln!(s,"box {:?} ({} nodes, width {})",b.btype,b.children.len(),b.width()),
            };
        }
        s
    }
}
impl<ET:EngineTypes> Typesetter<ET> for VecTypesetter<ET> {
    fn push_node(&mut self, node: Node<ET>) { self.nodes.push(node) }
    fn finish(&mut self) { self.finished = true }
}
