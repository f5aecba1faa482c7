//! Parser for the path-expression subset used against HTML documents.
//!
//! ```text
//! path      := '/' | '/' relative | '//' relative | relative
//! relative  := step (('/' | '//') step)*
//! step      := '.' | '..' | '@' name | '@*' | (axis '::')? test predicate*
//! test      := name | '*' | 'text()' | 'node()'
//! predicate := '[' (number | 'last()' | operand (('=' | '!=') literal)?
//!                  | 'contains(' operand ',' literal ')') ']'
//! operand   := '@' name | 'text()'
//! ```

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    pub absolute: bool,
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Predicate>,
}

impl Step {
    fn new(axis: Axis, test: NodeTest) -> Self {
        Self {
            axis,
            test,
            predicates: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Parent,
    SelfNode,
    Attribute,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeTest {
    Name(String),
    Any,
    Text,
    Node,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Attr(String),
    Text,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    Position(usize),
    Last,
    Exists(Operand),
    Equals(Operand, String),
    NotEquals(Operand, String),
    Contains(Operand, String),
}

pub fn parse(expr: &str) -> Result<Path> {
    let mut parser = Parser {
        src: expr,
        pos: 0,
    };
    parser.path()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", token)))
        }
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::XPath {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn path(&mut self) -> Result<Path> {
        self.skip_ws();
        let mut steps = Vec::new();
        let absolute = if self.eat("//") {
            steps.push(Step::new(Axis::DescendantOrSelf, NodeTest::Node));
            true
        } else if self.eat("/") {
            self.skip_ws();
            if self.rest().is_empty() {
                return Ok(Path {
                    absolute: true,
                    steps,
                });
            }
            true
        } else {
            false
        };

        steps.push(self.step()?);
        loop {
            self.skip_ws();
            if self.rest().is_empty() {
                break;
            }
            if self.eat("//") {
                steps.push(Step::new(Axis::DescendantOrSelf, NodeTest::Node));
            } else if !self.eat("/") {
                return Err(self.error("expected `/` between steps"));
            }
            steps.push(self.step()?);
        }

        Ok(Path { absolute, steps })
    }

    fn step(&mut self) -> Result<Step> {
        self.skip_ws();
        if self.eat("..") {
            return Ok(Step::new(Axis::Parent, NodeTest::Node));
        }
        if self.eat(".") {
            return Ok(Step::new(Axis::SelfNode, NodeTest::Node));
        }

        let (axis, test) = if self.eat("@") {
            (Axis::Attribute, self.node_test()?)
        } else {
            let start = self.pos;
            let name = self.name();
            if !name.is_empty() && self.eat("::") {
                let axis = match name {
                    "child" => Axis::Child,
                    "descendant" => Axis::Descendant,
                    "descendant-or-self" => Axis::DescendantOrSelf,
                    "parent" => Axis::Parent,
                    "self" => Axis::SelfNode,
                    "attribute" => Axis::Attribute,
                    other => {
                        self.pos = start;
                        return Err(self.error(format!("unsupported axis `{}`", other)));
                    }
                };
                (axis, self.node_test()?)
            } else {
                self.pos = start;
                (Axis::Child, self.node_test()?)
            }
        };

        let mut step = Step::new(axis, test);
        loop {
            self.skip_ws();
            if !self.eat("[") {
                break;
            }
            let predicate = self.predicate()?;
            self.skip_ws();
            self.expect("]")?;
            step.predicates.push(predicate);
        }
        Ok(step)
    }

    fn node_test(&mut self) -> Result<NodeTest> {
        if self.eat("*") {
            return Ok(NodeTest::Any);
        }
        if self.eat("text()") {
            return Ok(NodeTest::Text);
        }
        if self.eat("node()") {
            return Ok(NodeTest::Node);
        }
        let name = self.name();
        if name.is_empty() {
            return Err(self.error("expected a name test"));
        }
        Ok(NodeTest::Name(name.to_string()))
    }

    fn name(&mut self) -> &'a str {
        let rest = self.rest();
        let mut end = 0;
        for (i, c) in rest.char_indices() {
            let ok = if i == 0 {
                c.is_alphabetic() || c == '_'
            } else {
                c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
            };
            if !ok {
                break;
            }
            end = i + c.len_utf8();
        }
        self.pos += end;
        &rest[..end]
    }

    fn predicate(&mut self) -> Result<Predicate> {
        self.skip_ws();
        if matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            let digits: String = self.rest().chars().take_while(char::is_ascii_digit).collect();
            let n: usize = digits
                .parse()
                .map_err(|_| self.error("position out of range"))?;
            if n == 0 {
                return Err(self.error("positions start at 1"));
            }
            self.pos += digits.len();
            return Ok(Predicate::Position(n));
        }
        if self.eat("last()") {
            return Ok(Predicate::Last);
        }
        if self.eat("contains(") {
            self.skip_ws();
            let operand = self.operand()?;
            self.skip_ws();
            self.expect(",")?;
            self.skip_ws();
            let needle = self.literal()?;
            self.skip_ws();
            self.expect(")")?;
            return Ok(Predicate::Contains(operand, needle));
        }

        let operand = self.operand()?;
        self.skip_ws();
        if self.eat("!=") {
            self.skip_ws();
            Ok(Predicate::NotEquals(operand, self.literal()?))
        } else if self.eat("=") {
            self.skip_ws();
            Ok(Predicate::Equals(operand, self.literal()?))
        } else {
            Ok(Predicate::Exists(operand))
        }
    }

    fn operand(&mut self) -> Result<Operand> {
        if self.eat("@") {
            let name = self.name();
            if name.is_empty() {
                return Err(self.error("expected an attribute name"));
            }
            Ok(Operand::Attr(name.to_string()))
        } else if self.eat("text()") {
            Ok(Operand::Text)
        } else {
            Err(self.error("expected `@name` or `text()`"))
        }
    }

    fn literal(&mut self) -> Result<String> {
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("expected a quoted string")),
        };
        let body = &self.rest()[1..];
        match body.find(quote) {
            Some(end) => {
                let value = body[..end].to_string();
                self.pos += end + 2;
                Ok(value)
            }
            None => Err(self.error("unterminated string")),
        }
    }
}
