use std::fmt;

use anyhow::{Result, anyhow, bail};

use crate::val::{TypeInfo, TypeResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMode {
    In,
    Out,
    InOut,
}

impl ParamMode {
    /// Whether the script argument is read before the call.
    #[inline]
    pub fn reads(self) -> bool {
        matches!(self, ParamMode::In | ParamMode::InOut)
    }

    /// Whether the argument is written back after the call.
    #[inline]
    pub fn writes(self) -> bool {
        matches!(self, ParamMode::Out | ParamMode::InOut)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParamMode::In => "in",
            ParamMode::Out => "out",
            ParamMode::InOut => "inout",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerParam {
    pub mode: ParamMode,
    pub ty: TypeInfo,
}

/// Declared parameters and return type of an extension handler.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerSignature {
    pub params: Vec<HandlerParam>,
    pub returns: TypeInfo,
}

impl HandlerSignature {
    pub fn new(params: Vec<HandlerParam>, returns: TypeInfo) -> Self {
        Self { params, returns }
    }

    /// Parse `"(in number, inout optional string, out list) -> any"`. A
    /// parameter without a mode is `in`; a missing return type is `any`.
    pub fn parse(text: &str, resolver: &dyn TypeResolver) -> Result<Self> {
        let text = text.trim();
        let rest = text
            .strip_prefix('(')
            .ok_or_else(|| anyhow!("signature must start with '(': {}", text))?;
        let close = rest
            .find(')')
            .ok_or_else(|| anyhow!("unterminated parameter list: {}", text))?;
        let (params_text, tail) = (&rest[..close], rest[close + 1..].trim());

        let mut params = Vec::new();
        if !params_text.trim().is_empty() {
            for part in params_text.split(',') {
                params.push(parse_param(part.trim(), resolver)?);
            }
        }

        let returns = if tail.is_empty() {
            TypeInfo::Any
        } else {
            let ret = tail
                .strip_prefix("->")
                .ok_or_else(|| anyhow!("expected '->' before return type: {}", text))?;
            parse_type(ret, resolver)?
        };
        Ok(Self { params, returns })
    }
}

fn parse_param(text: &str, resolver: &dyn TypeResolver) -> Result<HandlerParam> {
    if text.is_empty() {
        bail!("empty parameter declaration");
    }
    let (head, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let mode = match head.to_ascii_lowercase().as_str() {
        "in" => Some(ParamMode::In),
        "out" => Some(ParamMode::Out),
        "inout" => Some(ParamMode::InOut),
        _ => None,
    };
    match mode {
        Some(mode) => Ok(HandlerParam {
            mode,
            ty: parse_type(rest, resolver)?,
        }),
        None => Ok(HandlerParam {
            mode: ParamMode::In,
            ty: parse_type(text, resolver)?,
        }),
    }
}

fn parse_type(text: &str, resolver: &dyn TypeResolver) -> Result<TypeInfo> {
    TypeInfo::parse(text, resolver).ok_or_else(|| anyhow!("unknown type '{}'", text.trim()))
}

impl fmt::Display for HandlerSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", param.mode.as_str(), param.ty)?;
        }
        write!(f, ") -> {}", self.returns)
    }
}
