/*! Core data structures: [`CategoryCode`](catcodes::CategoryCode)s, [`Token`](tokens::Token)s,
    numerical quantities and output [`Node`](nodes::Node)s.*/
pub mod catcodes;
pub mod characters;
pub mod nodes;
pub mod numerics;
pub mod tokens;
