//! Token types produced by the lexical scanner.
//!
//! The scanner itself lives outside this crate; the parser only consumes a
//! finite token stream terminated by [`TokenKind::Eof`].

use crate::grammar::Symbol;
use std::fmt;

/// The kind of a scanned token.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Plus,
    PlusPlus,
    PlusAssign,
    Minus,
    MinusMinus,
    MinusAssign,
    Arrow,
    Star,
    StarAssign,
    Slash,
    SlashAssign,
    Percent,
    PercentAssign,
    Ampersand,
    AmpersandAmpersand,
    Pipe,
    PipePipe,
    Caret,
    Bang,
    Question,
    Colon,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Assign,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    Void,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Signed,
    Unsigned,
    Auto,
    Register,
    Static,
    Extern,
    Typedef,
    Goto,
    Continue,
    Break,
    Return,
    For,
    Do,
    While,
    If,
    Else,
    Switch,
    Case,
    Default,
    Enum,
    Struct,
    Union,
    Const,
    Volatile,
    Identifier,
    IntegerConstant,
    CharacterConstant,
    StringLiteral,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(terminal_symbol(*self).name())
    }
}

/// A scanned token: a kind, plus the source text for the kinds that carry
/// one (identifiers and literals).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Self { kind, text: None }
    }

    pub fn with_text(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: Some(text.into()),
        }
    }
}

impl From<TokenKind> for Token {
    fn from(kind: TokenKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => f.write_str(text),
            None => fmt::Display::fmt(&self.kind, f),
        }
    }
}

/// Map a token kind to the grammar terminal it stands for.
pub fn terminal_symbol(kind: TokenKind) -> Symbol {
    match kind {
        TokenKind::Plus => Symbol::Plus,
        TokenKind::PlusPlus => Symbol::PlusPlus,
        TokenKind::PlusAssign => Symbol::PlusAssign,
        TokenKind::Minus => Symbol::Minus,
        TokenKind::MinusMinus => Symbol::MinusMinus,
        TokenKind::MinusAssign => Symbol::MinusAssign,
        TokenKind::Arrow => Symbol::Arrow,
        TokenKind::Star => Symbol::Star,
        TokenKind::StarAssign => Symbol::StarAssign,
        TokenKind::Slash => Symbol::Slash,
        TokenKind::SlashAssign => Symbol::SlashAssign,
        TokenKind::Percent => Symbol::Percent,
        TokenKind::PercentAssign => Symbol::PercentAssign,
        TokenKind::Ampersand => Symbol::Ampersand,
        TokenKind::AmpersandAmpersand => Symbol::AmpersandAmpersand,
        TokenKind::Pipe => Symbol::Pipe,
        TokenKind::PipePipe => Symbol::PipePipe,
        TokenKind::Caret => Symbol::Caret,
        TokenKind::Bang => Symbol::Bang,
        TokenKind::Question => Symbol::Question,
        TokenKind::Colon => Symbol::Colon,
        TokenKind::Semicolon => Symbol::Semicolon,
        TokenKind::Comma => Symbol::Comma,
        TokenKind::Dot => Symbol::Dot,
        TokenKind::Ellipsis => Symbol::Ellipsis,
        TokenKind::LParen => Symbol::LParen,
        TokenKind::RParen => Symbol::RParen,
        TokenKind::LBracket => Symbol::LBracket,
        TokenKind::RBracket => Symbol::RBracket,
        TokenKind::LBrace => Symbol::LBrace,
        TokenKind::RBrace => Symbol::RBrace,
        TokenKind::Assign => Symbol::Assign,
        TokenKind::Eq => Symbol::Eq,
        TokenKind::Ne => Symbol::Ne,
        TokenKind::Lt => Symbol::Lt,
        TokenKind::Gt => Symbol::Gt,
        TokenKind::Le => Symbol::Le,
        TokenKind::Ge => Symbol::Ge,
        TokenKind::Shl => Symbol::Shl,
        TokenKind::Shr => Symbol::Shr,
        TokenKind::Void => Symbol::KwVoid,
        TokenKind::Char => Symbol::KwChar,
        TokenKind::Short => Symbol::KwShort,
        TokenKind::Int => Symbol::KwInt,
        TokenKind::Long => Symbol::KwLong,
        TokenKind::Float => Symbol::KwFloat,
        TokenKind::Double => Symbol::KwDouble,
        TokenKind::Signed => Symbol::KwSigned,
        TokenKind::Unsigned => Symbol::KwUnsigned,
        TokenKind::Auto => Symbol::KwAuto,
        TokenKind::Register => Symbol::KwRegister,
        TokenKind::Static => Symbol::KwStatic,
        TokenKind::Extern => Symbol::KwExtern,
        TokenKind::Typedef => Symbol::KwTypedef,
        TokenKind::Goto => Symbol::KwGoto,
        TokenKind::Continue => Symbol::KwContinue,
        TokenKind::Break => Symbol::KwBreak,
        TokenKind::Return => Symbol::KwReturn,
        TokenKind::For => Symbol::KwFor,
        TokenKind::Do => Symbol::KwDo,
        TokenKind::While => Symbol::KwWhile,
        TokenKind::If => Symbol::KwIf,
        TokenKind::Else => Symbol::KwElse,
        TokenKind::Switch => Symbol::KwSwitch,
        TokenKind::Case => Symbol::KwCase,
        TokenKind::Default => Symbol::KwDefault,
        TokenKind::Enum => Symbol::KwEnum,
        TokenKind::Struct => Symbol::KwStruct,
        TokenKind::Union => Symbol::KwUnion,
        TokenKind::Const => Symbol::KwConst,
        TokenKind::Volatile => Symbol::KwVolatile,
        TokenKind::Identifier => Symbol::Identifier,
        TokenKind::IntegerConstant => Symbol::IntegerConstant,
        TokenKind::CharacterConstant => Symbol::CharacterConstant,
        TokenKind::StringLiteral => Symbol::StringLiteral,
        TokenKind::Eof => Symbol::Eoi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Set;

    const ALL_KINDS: &[TokenKind] = &[
        TokenKind::Plus,
        TokenKind::PlusPlus,
        TokenKind::PlusAssign,
        TokenKind::Minus,
        TokenKind::MinusMinus,
        TokenKind::MinusAssign,
        TokenKind::Arrow,
        TokenKind::Star,
        TokenKind::StarAssign,
        TokenKind::Slash,
        TokenKind::SlashAssign,
        TokenKind::Percent,
        TokenKind::PercentAssign,
        TokenKind::Ampersand,
        TokenKind::AmpersandAmpersand,
        TokenKind::Pipe,
        TokenKind::PipePipe,
        TokenKind::Caret,
        TokenKind::Bang,
        TokenKind::Question,
        TokenKind::Colon,
        TokenKind::Semicolon,
        TokenKind::Comma,
        TokenKind::Dot,
        TokenKind::Ellipsis,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LBracket,
        TokenKind::RBracket,
        TokenKind::LBrace,
        TokenKind::RBrace,
        TokenKind::Assign,
        TokenKind::Eq,
        TokenKind::Ne,
        TokenKind::Lt,
        TokenKind::Gt,
        TokenKind::Le,
        TokenKind::Ge,
        TokenKind::Shl,
        TokenKind::Shr,
        TokenKind::Void,
        TokenKind::Char,
        TokenKind::Short,
        TokenKind::Int,
        TokenKind::Long,
        TokenKind::Float,
        TokenKind::Double,
        TokenKind::Signed,
        TokenKind::Unsigned,
        TokenKind::Auto,
        TokenKind::Register,
        TokenKind::Static,
        TokenKind::Extern,
        TokenKind::Typedef,
        TokenKind::Goto,
        TokenKind::Continue,
        TokenKind::Break,
        TokenKind::Return,
        TokenKind::For,
        TokenKind::Do,
        TokenKind::While,
        TokenKind::If,
        TokenKind::Else,
        TokenKind::Switch,
        TokenKind::Case,
        TokenKind::Default,
        TokenKind::Enum,
        TokenKind::Struct,
        TokenKind::Union,
        TokenKind::Const,
        TokenKind::Volatile,
        TokenKind::Identifier,
        TokenKind::IntegerConstant,
        TokenKind::CharacterConstant,
        TokenKind::StringLiteral,
        TokenKind::Eof,
    ];

    #[test]
    fn adapter_covers_the_terminal_alphabet() {
        let mapped: Set<Symbol> = ALL_KINDS.iter().map(|&k| terminal_symbol(k)).collect();

        // one-to-one: no two kinds share a terminal
        assert_eq!(mapped.len(), ALL_KINDS.len());
        // onto: every terminal symbol is reachable from some token kind
        assert_eq!(mapped.len(), Symbol::TERMINAL_COUNT);
        for symbol in mapped {
            assert!(symbol.is_terminal());
        }

        assert_eq!(terminal_symbol(TokenKind::Eof), Symbol::Eoi);
    }

    #[test]
    fn token_display_prefers_source_text() {
        let x = Token::with_text(TokenKind::Identifier, "x");
        assert_eq!(x.to_string(), "x");
        assert_eq!(Token::new(TokenKind::Identifier).to_string(), "identifier");
        assert_eq!(Token::new(TokenKind::PlusAssign).to_string(), "+=");
    }
}
