//! Recursive-descent parser for JVM descriptors and generic signatures.
//!
//! Produces a syntax tree that still carries type-variable names; scope
//! resolution happens in the normalizer.

use crate::errors::{ApiScanError, Result};

/// Array dimensions the class-file format allows.
pub(crate) const MAX_ARRAY_DIMENSIONS: u32 = 255;

/// Deepest `<...>` nesting accepted in a single signature.
pub(crate) const MAX_TYPE_ARGUMENT_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SigType {
    /// Descriptor letter: `B C D F I J S Z` or `V`
    Primitive(char),
    /// Outer-to-inner segments, each with its own type arguments
    Class(Vec<ClassSegment>),
    Var(String),
    Array { dims: u32, element: Box<SigType> },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClassSegment {
    pub name: String,
    pub args: Vec<SigArg>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SigArg {
    Star,
    Exact(SigType),
    Extends(SigType),
    Super(SigType),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SigTypeParam {
    pub name: String,
    pub class_bound: Option<SigType>,
    pub interface_bounds: Vec<SigType>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClassSig {
    pub type_params: Vec<SigTypeParam>,
    pub superclass: SigType,
    pub interfaces: Vec<SigType>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MethodSig {
    pub type_params: Vec<SigTypeParam>,
    pub params: Vec<SigType>,
    pub result: SigType,
    pub throws: Vec<SigType>,
}

/// Parse a single type: a field descriptor, a field signature, or `V`.
pub(crate) fn parse_type(input: &str) -> Result<SigType> {
    let mut p = Parser::new(input);
    let ty = if p.peek() == Some('V') {
        p.bump();
        SigType::Primitive('V')
    } else {
        p.java_type()?
    };
    p.finish()?;
    Ok(ty)
}

pub(crate) fn parse_class_signature(input: &str) -> Result<ClassSig> {
    let mut p = Parser::new(input);
    let type_params = p.type_params_opt()?;
    let superclass = p.class_type()?;
    let mut interfaces = Vec::new();
    while p.peek().is_some() {
        interfaces.push(p.class_type()?);
    }
    Ok(ClassSig {
        type_params,
        superclass,
        interfaces,
    })
}

pub(crate) fn parse_method_signature(input: &str) -> Result<MethodSig> {
    let mut p = Parser::new(input);
    let type_params = p.type_params_opt()?;
    p.expect('(')?;
    let mut params = Vec::new();
    while p.peek() != Some(')') {
        if p.peek().is_none() {
            return Err(p.error("unterminated parameter list"));
        }
        params.push(p.java_type()?);
    }
    p.expect(')')?;
    let result = if p.peek() == Some('V') {
        p.bump();
        SigType::Primitive('V')
    } else {
        p.java_type()?
    };
    let mut throws = Vec::new();
    while p.peek() == Some('^') {
        p.bump();
        throws.push(match p.peek() {
            Some('T') => p.type_var()?,
            _ => p.class_type()?,
        });
    }
    p.finish()?;
    Ok(MethodSig {
        type_params,
        params,
        result,
        throws,
    })
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
    nesting: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
            nesting: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> ApiScanError {
        ApiScanError::MalformedSignature {
            qualified_name: String::new(),
            signature: self.input.to_string(),
            reason: format!("{} at offset {}", reason.into(), self.pos),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn expect(&mut self, want: char) -> Result<()> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => {
                self.pos -= 1;
                Err(self.error(format!("expected '{}', found '{}'", want, c)))
            }
            None => Err(self.error(format!(
                "expected '{}', found end of input",
                want
            ))),
        }
    }

    fn finish(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(self.error(format!("unexpected trailing '{}'", c))),
        }
    }

    /// Identifier up to (not including) any of `stops`.
    fn identifier(&mut self, stops: &[char]) -> Result<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("empty identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn java_type(&mut self) -> Result<SigType> {
        match self.peek() {
            Some(c @ ('B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z')) => {
                self.bump();
                Ok(SigType::Primitive(c))
            }
            Some(_) => self.reference_type(),
            None => Err(self.error("expected a type, found end of input")),
        }
    }

    fn reference_type(&mut self) -> Result<SigType> {
        match self.peek() {
            Some('L') => self.class_type(),
            Some('T') => self.type_var(),
            Some('[') => {
                let mut dims = 0u32;
                while self.peek() == Some('[') {
                    if dims == MAX_ARRAY_DIMENSIONS {
                        return Err(self.error(format!(
                            "array type exceeds {} dimensions",
                            MAX_ARRAY_DIMENSIONS
                        )));
                    }
                    self.bump();
                    dims += 1;
                }
                let element = Box::new(self.java_type()?);
                Ok(SigType::Array { dims, element })
            }
            Some(c) => Err(self.error(format!(
                "unexpected '{}' where a reference type was expected",
                c
            ))),
            None => Err(self.error("expected a reference type, found end of input")),
        }
    }

    fn class_type(&mut self) -> Result<SigType> {
        self.expect('L')?;
        let mut segments = Vec::new();
        let name = self.identifier(&['<', '.', ';', '>', ':', '['])?;
        let args = self.type_args_opt()?;
        segments.push(ClassSegment { name, args });
        while self.peek() == Some('.') {
            self.bump();
            let name = self.identifier(&['<', '.', ';', '/', '>', ':', '['])?;
            let args = self.type_args_opt()?;
            segments.push(ClassSegment { name, args });
        }
        match self.peek() {
            Some(';') => {
                self.bump();
                Ok(SigType::Class(segments))
            }
            Some(c) => Err(self.error(format!(
                "expected ';' closing class type, found '{}'",
                c
            ))),
            None => Err(self.error("unterminated class type")),
        }
    }

    fn type_var(&mut self) -> Result<SigType> {
        self.expect('T')?;
        let name = self.identifier(&[';', '<', '>', '.', '/', ':', '['])?;
        self.expect(';')?;
        Ok(SigType::Var(name))
    }

    fn type_args_opt(&mut self) -> Result<Vec<SigArg>> {
        if self.peek() != Some('<') {
            return Ok(Vec::new());
        }
        if self.nesting == MAX_TYPE_ARGUMENT_NESTING {
            return Err(self.error(format!(
                "type arguments nested deeper than {}",
                MAX_TYPE_ARGUMENT_NESTING
            )));
        }
        self.bump();
        self.nesting += 1;
        let mut args = Vec::new();
        loop {
            match self.peek() {
                Some('>') => break,
                Some('*') => {
                    self.bump();
                    args.push(SigArg::Star);
                }
                Some('+') => {
                    self.bump();
                    args.push(SigArg::Extends(self.reference_type()?));
                }
                Some('-') => {
                    self.bump();
                    args.push(SigArg::Super(self.reference_type()?));
                }
                Some(_) => args.push(SigArg::Exact(self.reference_type()?)),
                None => return Err(self.error("unterminated type argument list")),
            }
        }
        self.bump();
        self.nesting -= 1;
        if args.is_empty() {
            return Err(self.error("empty type argument list"));
        }
        Ok(args)
    }

    fn type_params_opt(&mut self) -> Result<Vec<SigTypeParam>> {
        if self.peek() != Some('<') {
            return Ok(Vec::new());
        }
        self.bump();
        let mut params = Vec::new();
        while self.peek() != Some('>') {
            if self.peek().is_none() {
                return Err(self.error("unterminated type parameter list"));
            }
            let name = self.identifier(&[':', '>', ';', '<', '/', '.', '['])?;
            self.expect(':')?;
            let class_bound = match self.peek() {
                Some('L' | 'T' | '[') => Some(self.reference_type()?),
                _ => None,
            };
            let mut interface_bounds = Vec::new();
            while self.peek() == Some(':') {
                self.bump();
                interface_bounds.push(self.reference_type()?);
            }
            params.push(SigTypeParam {
                name,
                class_bound,
                interface_bounds,
            });
        }
        self.bump();
        if params.is_empty() {
            return Err(self.error("empty type parameter list"));
        }
        Ok(params)
    }
}
