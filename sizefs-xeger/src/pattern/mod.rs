//! The Xeger pattern parser (C1) and its expansion logic.

mod ast;
mod parser;

pub(crate) use ast::{Expression, Node, Pattern};

use rand::Rng;

use crate::error::Result;

impl Pattern {
    /// Parse `text` against the Xeger grammar, using `rng` to sample any
    /// `*`/`+`/`?` multiplier rings and set-member rings as they're built.
    pub fn parse<R>(text: &[u8], max_random: u32, rng: &mut R) -> Result<Pattern>
    where
        R: Rng + ?Sized,
    {
        parser::parse(text, max_random, rng)
    }

    /// Expand every top-level expression once, appending the result to
    /// `sink`. This is one "emission step" (C3): each sub-expression is
    /// expanded according to its multiplier, and every `*`/`+`/`?`
    /// multiplier and set choice is resampled independently.
    pub(crate) fn emit_once(&mut self, sink: &mut Vec<u8>) {
        for expression in &mut self.expressions {
            expression.emit(sink);
        }
    }
}

impl Expression {
    fn emit(&mut self, sink: &mut Vec<u8>) {
        let count = match &mut self.multiplier {
            None => 1,
            Some(multiplier) => multiplier.count(),
        };
        for _ in 0..count {
            self.node.emit(sink);
        }
    }
}

impl Node {
    fn emit(&mut self, sink: &mut Vec<u8>) {
        match self {
            Node::Sequence(bytes) => sink.extend_from_slice(bytes),
            Node::Set(set) => {
                let idx = set.pick.next() as usize;
                sink.push(set.members[idx]);
            }
            Node::Group(pattern) => pattern.emit_once(sink),
        }
    }
}
