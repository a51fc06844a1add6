//! Grammar types.
//!
//! The symbol alphabet is a single closed universe shared by every grammar
//! in this crate: the C terminal set, the K&R nonterminal categories and
//! the reserved `$accept` start symbol. Classification into terminals and
//! nonterminals is positional, so a symbol's discriminant doubles as its
//! column index in the parse table.

use crate::types::Map;
use std::fmt;

macro_rules! symbols {
    (
        terminals { $($t:ident => $t_name:literal,)* }
        nonterminals { $($n:ident => $n_name:literal,)* }
    ) => {
        /// A grammar symbol.
        ///
        /// Terminals come first (with [`Symbol::Eoi`] at index 0), then the
        /// nonterminals, then the reserved start symbol. `symbol as u8` is
        /// therefore a dense index with all terminals below
        /// [`Symbol::TERMINAL_COUNT`].
        #[repr(u8)]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Symbol {
            $($t,)*
            $($n,)*
            /// Reserved start symbol of the augmented grammar.
            Start,
        }

        impl Symbol {
            /// Every symbol, in index order.
            pub const ALL: &'static [Symbol] = &[
                $(Symbol::$t,)*
                $(Symbol::$n,)*
                Symbol::Start,
            ];

            /// Number of terminal symbols, and the index of the first
            /// nonterminal.
            pub const TERMINAL_COUNT: usize = [$(Symbol::$t),*].len();

            /// Total number of symbols.
            pub const COUNT: usize = Self::ALL.len();

            /// The grammar-book spelling of this symbol.
            pub fn name(self) -> &'static str {
                match self {
                    $(Symbol::$t => $t_name,)*
                    $(Symbol::$n => $n_name,)*
                    Symbol::Start => "$accept",
                }
            }
        }
    };
}

symbols! {
    terminals {
        Eoi => "$end",
        Plus => "+",
        PlusPlus => "++",
        PlusAssign => "+=",
        Minus => "-",
        MinusMinus => "--",
        MinusAssign => "-=",
        Arrow => "->",
        Star => "*",
        StarAssign => "*=",
        Slash => "/",
        SlashAssign => "/=",
        Percent => "%",
        PercentAssign => "%=",
        Ampersand => "&",
        AmpersandAmpersand => "&&",
        Pipe => "|",
        PipePipe => "||",
        Caret => "^",
        Bang => "!",
        Question => "?",
        Colon => ":",
        Semicolon => ";",
        Comma => ",",
        Dot => ".",
        Ellipsis => "...",
        LParen => "(",
        RParen => ")",
        LBracket => "[",
        RBracket => "]",
        LBrace => "{",
        RBrace => "}",
        Assign => "=",
        Eq => "==",
        Ne => "!=",
        Lt => "<",
        Gt => ">",
        Le => "<=",
        Ge => ">=",
        Shl => "<<",
        Shr => ">>",
        KwVoid => "void",
        KwChar => "char",
        KwShort => "short",
        KwInt => "int",
        KwLong => "long",
        KwFloat => "float",
        KwDouble => "double",
        KwSigned => "signed",
        KwUnsigned => "unsigned",
        KwAuto => "auto",
        KwRegister => "register",
        KwStatic => "static",
        KwExtern => "extern",
        KwTypedef => "typedef",
        KwGoto => "goto",
        KwContinue => "continue",
        KwBreak => "break",
        KwReturn => "return",
        KwFor => "for",
        KwDo => "do",
        KwWhile => "while",
        KwIf => "if",
        KwElse => "else",
        KwSwitch => "switch",
        KwCase => "case",
        KwDefault => "default",
        KwEnum => "enum",
        KwStruct => "struct",
        KwUnion => "union",
        KwConst => "const",
        KwVolatile => "volatile",
        Identifier => "identifier",
        IntegerConstant => "integer-constant",
        CharacterConstant => "character-constant",
        StringLiteral => "string-literal",
    }
    nonterminals {
        TranslationUnit => "translation-unit",
        ExternalDeclaration => "external-declaration",
        FunctionDefinition => "function-definition",
        Declaration => "declaration",
        DeclarationList => "declaration-list",
        DeclarationSpecifiers => "declaration-specifiers",
        StorageClassSpecifier => "storage-class-specifier",
        TypeSpecifier => "type-specifier",
        TypeQualifier => "type-qualifier",
        StructOrUnionSpecifier => "struct-or-union-specifier",
        StructOrUnion => "struct-or-union",
        StructDeclarationList => "struct-declaration-list",
        StructDeclaration => "struct-declaration",
        SpecifierQualifierList => "specifier-qualifier-list",
        StructDeclaratorList => "struct-declarator-list",
        StructDeclarator => "struct-declarator",
        EnumSpecifier => "enum-specifier",
        EnumeratorList => "enumerator-list",
        Enumerator => "enumerator",
        InitDeclaratorList => "init-declarator-list",
        InitDeclarator => "init-declarator",
        Declarator => "declarator",
        DirectDeclarator => "direct-declarator",
        Pointer => "pointer",
        TypeQualifierList => "type-qualifier-list",
        ParameterTypeList => "parameter-type-list",
        ParameterList => "parameter-list",
        ParameterDeclaration => "parameter-declaration",
        IdentifierList => "identifier-list",
        Initializer => "initializer",
        InitializerList => "initializer-list",
        TypeName => "type-name",
        AbstractDeclarator => "abstract-declarator",
        DirectAbstractDeclarator => "direct-abstract-declarator",
        Statement => "statement",
        LabeledStatement => "labeled-statement",
        ExpressionStatement => "expression-statement",
        CompoundStatement => "compound-statement",
        StatementList => "statement-list",
        SelectionStatement => "selection-statement",
        IterationStatement => "iteration-statement",
        JumpStatement => "jump-statement",
        Expression => "expression",
        AssignmentExpression => "assignment-expression",
        AssignmentOperator => "assignment-operator",
        ConditionalExpression => "conditional-expression",
        ConstantExpression => "constant-expression",
        LogicalOrExpression => "logical-or-expression",
        LogicalAndExpression => "logical-and-expression",
        InclusiveOrExpression => "inclusive-or-expression",
        ExclusiveOrExpression => "exclusive-or-expression",
        AndExpression => "and-expression",
        EqualityExpression => "equality-expression",
        RelationalExpression => "relational-expression",
        ShiftExpression => "shift-expression",
        AdditiveExpression => "additive-expression",
        MultiplicativeExpression => "multiplicative-expression",
        CastExpression => "cast-expression",
        UnaryExpression => "unary-expression",
        UnaryOperator => "unary-operator",
        PostfixExpression => "postfix-expression",
        PrimaryExpression => "primary-expression",
        ArgumentExpressionList => "argument-expression-list",
        Constant => "constant",
    }
}

impl Symbol {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        (self as usize) < Self::TERMINAL_COUNT
    }

    pub fn terminals() -> impl Iterator<Item = Symbol> {
        Self::ALL[..Self::TERMINAL_COUNT].iter().copied()
    }

    pub fn nonterminals() -> impl Iterator<Item = Symbol> {
        Self::ALL[Self::TERMINAL_COUNT..].iter().copied()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of terminal symbols, stored as a bitset over terminal indices.
///
/// Equality is structural: two sets compare equal iff they contain the same
/// terminals. The empty set and the singleton `{$end}` are distinct values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalSet {
    inner: bit_set::BitSet,
}

impl TerminalSet {
    pub fn new() -> Self {
        Self {
            inner: bit_set::BitSet::with_capacity(Symbol::TERMINAL_COUNT),
        }
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.inner.contains(symbol.index())
    }

    /// Add a terminal to the set. Returns `true` if it was not yet present.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        debug_assert!(symbol.is_terminal(), "nonterminal in terminal set");
        self.inner.insert(symbol.index())
    }

    pub fn union_with(&mut self, other: &Self) {
        self.inner.union_with(&other.inner);
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.inner.iter().map(|index| Symbol::ALL[index])
    }
}

impl Default for TerminalSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Symbol> for TerminalSet {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        let mut set = Self::new();
        for symbol in iter {
            set.insert(symbol);
        }
        set
    }
}

impl Extend<Symbol> for TerminalSet {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Symbol>,
    {
        for symbol in iter {
            self.insert(symbol);
        }
    }
}

impl fmt::Display for TerminalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct RuleID {
    raw: u16,
}

impl RuleID {
    /// Reserved ID of the augmented top-level rule `$accept := <start>`.
    pub const ACCEPT: Self = Self::new(0);

    #[inline]
    const fn new(raw: u16) -> Self {
        Self { raw }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.raw as usize
    }
}

impl fmt::Display for RuleID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            &Self::ACCEPT => f.write_str("$accept"),
            Self { raw } => fmt::Display::fmt(raw, f),
        }
    }
}

/// A production rule.
#[derive(Debug, Clone)]
pub struct Rule {
    left: Symbol,
    right: Vec<Symbol>,
}

impl Rule {
    /// The left-hand side of this rule.
    pub fn left(&self) -> Symbol {
        self.left
    }

    /// The right-hand side of this rule.
    pub fn right(&self) -> &[Symbol] {
        &self.right[..]
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :=", self.left)?;
        for symbol in &self.right {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("the start symbol `{0}` is not a nonterminal")]
    StartNotNonterminal(Symbol),

    #[error("the left-hand side `{0}` is not a nonterminal")]
    LeftNotNonterminal(Symbol),

    #[error("the rule for `{0}` has an empty right-hand side")]
    EmptyRightHandSide(Symbol),

    #[error("the reserved symbol `{0}` may not appear in a rule")]
    ReservedSymbol(Symbol),

    #[error("too many rules")]
    TooManyRules,
}

/// The grammar definition used to derive the parser tables.
///
/// Rule 0 is always the augmented `$accept := <start>` rule; user rules
/// follow in definition order. The engine itself is data-driven: any rule
/// set over the fixed alphabet can be turned into a parser, which is what
/// the unit tests do with small grammars.
#[derive(Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
    rules_by_left: Map<Symbol, Vec<RuleID>>,
    start: Symbol,
}

impl Grammar {
    /// Define a grammar from a start symbol and a list of rules.
    pub fn new<I, R>(start: Symbol, rules: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = (Symbol, R)>,
        R: Into<Vec<Symbol>>,
    {
        if start.is_terminal() || start == Symbol::Start {
            return Err(GrammarError::StartNotNonterminal(start));
        }

        let mut all_rules = vec![Rule {
            left: Symbol::Start,
            right: vec![start],
        }];
        for (left, right) in rules {
            let right = right.into();
            if left == Symbol::Start {
                return Err(GrammarError::ReservedSymbol(left));
            }
            if left.is_terminal() {
                return Err(GrammarError::LeftNotNonterminal(left));
            }
            if right.is_empty() {
                return Err(GrammarError::EmptyRightHandSide(left));
            }
            if let Some(&reserved) = right
                .iter()
                .find(|s| matches!(s, Symbol::Start | Symbol::Eoi))
            {
                return Err(GrammarError::ReservedSymbol(reserved));
            }
            all_rules.push(Rule { left, right });
        }

        if all_rules.len() > u16::MAX as usize {
            return Err(GrammarError::TooManyRules);
        }

        let mut rules_by_left: Map<Symbol, Vec<RuleID>> = Map::default();
        for (index, rule) in all_rules.iter().enumerate() {
            rules_by_left
                .entry(rule.left)
                .or_default()
                .push(RuleID::new(index as u16));
        }

        Ok(Self {
            rules: all_rules,
            rules_by_left,
            start,
        })
    }

    /// The start symbol of the unaugmented grammar.
    pub fn start_symbol(&self) -> Symbol {
        self.start
    }

    pub fn rules(&self) -> impl Iterator<Item = (RuleID, &Rule)> + '_ {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, rule)| (RuleID::new(index as u16), rule))
    }

    pub fn rule(&self, id: RuleID) -> &Rule {
        &self.rules[id.index()]
    }

    /// All rules whose left-hand side is `left`.
    pub fn rules_with_left(&self, left: Symbol) -> &[RuleID] {
        self.rules_by_left
            .get(&left)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start_symbol: {}", self.start)?;
        writeln!(f, "rules:")?;
        for (id, rule) in self.rules() {
            writeln!(f, "  [{:>3}] {}", id, rule)?;
        }
        Ok(())
    }
}
