//! The K&R C grammar.
//!
//! A transcription of the reference-manual grammar as a static rule table.
//! The grammar family used here has no empty right-hand sides: every
//! optional position of the book grammar is expanded into explicit
//! variants, so the `for` statement enumerates all eight subsets of its
//! optional clauses and `declaration-specifiers` chains by recursion.
//!
//! Identifiers declared with `typedef` are not fed back to the scanner, so
//! `typedef-name` is not a `type-specifier` here. Apart from the dangling
//! `else`, the table is CLR(1)-clean.

use crate::grammar::{Grammar, Symbol};

macro_rules! rules {
    ($($left:ident := $($right:ident)+;)*) => {
        &[$(
            (Symbol::$left, &[$(Symbol::$right),+] as &[Symbol]),
        )*]
    };
}

static RULES: &[(Symbol, &[Symbol])] = rules! {
    // A13.1 external definitions
    TranslationUnit := ExternalDeclaration;
    TranslationUnit := TranslationUnit ExternalDeclaration;

    ExternalDeclaration := FunctionDefinition;
    ExternalDeclaration := Declaration;

    FunctionDefinition := Declarator CompoundStatement;
    FunctionDefinition := DeclarationSpecifiers Declarator CompoundStatement;
    FunctionDefinition := Declarator DeclarationList CompoundStatement;
    FunctionDefinition := DeclarationSpecifiers Declarator DeclarationList CompoundStatement;

    // A13.2 declarations
    Declaration := DeclarationSpecifiers Semicolon;
    Declaration := DeclarationSpecifiers InitDeclaratorList Semicolon;

    DeclarationList := Declaration;
    DeclarationList := DeclarationList Declaration;

    DeclarationSpecifiers := StorageClassSpecifier;
    DeclarationSpecifiers := StorageClassSpecifier DeclarationSpecifiers;
    DeclarationSpecifiers := TypeSpecifier;
    DeclarationSpecifiers := TypeSpecifier DeclarationSpecifiers;
    DeclarationSpecifiers := TypeQualifier;
    DeclarationSpecifiers := TypeQualifier DeclarationSpecifiers;

    StorageClassSpecifier := KwAuto;
    StorageClassSpecifier := KwRegister;
    StorageClassSpecifier := KwStatic;
    StorageClassSpecifier := KwExtern;
    StorageClassSpecifier := KwTypedef;

    TypeSpecifier := KwVoid;
    TypeSpecifier := KwChar;
    TypeSpecifier := KwShort;
    TypeSpecifier := KwInt;
    TypeSpecifier := KwLong;
    TypeSpecifier := KwFloat;
    TypeSpecifier := KwDouble;
    TypeSpecifier := KwSigned;
    TypeSpecifier := KwUnsigned;
    TypeSpecifier := StructOrUnionSpecifier;
    TypeSpecifier := EnumSpecifier;

    TypeQualifier := KwConst;
    TypeQualifier := KwVolatile;

    StructOrUnionSpecifier := StructOrUnion Identifier LBrace StructDeclarationList RBrace;
    StructOrUnionSpecifier := StructOrUnion LBrace StructDeclarationList RBrace;
    StructOrUnionSpecifier := StructOrUnion Identifier;

    StructOrUnion := KwStruct;
    StructOrUnion := KwUnion;

    StructDeclarationList := StructDeclaration;
    StructDeclarationList := StructDeclarationList StructDeclaration;

    StructDeclaration := SpecifierQualifierList StructDeclaratorList Semicolon;

    SpecifierQualifierList := TypeSpecifier;
    SpecifierQualifierList := TypeSpecifier SpecifierQualifierList;
    SpecifierQualifierList := TypeQualifier;
    SpecifierQualifierList := TypeQualifier SpecifierQualifierList;

    StructDeclaratorList := StructDeclarator;
    StructDeclaratorList := StructDeclaratorList Comma StructDeclarator;

    StructDeclarator := Declarator;
    StructDeclarator := Colon ConstantExpression;
    StructDeclarator := Declarator Colon ConstantExpression;

    EnumSpecifier := KwEnum LBrace EnumeratorList RBrace;
    EnumSpecifier := KwEnum Identifier LBrace EnumeratorList RBrace;
    EnumSpecifier := KwEnum Identifier;

    EnumeratorList := Enumerator;
    EnumeratorList := EnumeratorList Comma Enumerator;

    Enumerator := Identifier;
    Enumerator := Identifier Assign ConstantExpression;

    InitDeclaratorList := InitDeclarator;
    InitDeclaratorList := InitDeclaratorList Comma InitDeclarator;

    InitDeclarator := Declarator;
    InitDeclarator := Declarator Assign Initializer;

    Declarator := Pointer DirectDeclarator;
    Declarator := DirectDeclarator;

    DirectDeclarator := Identifier;
    DirectDeclarator := LParen Declarator RParen;
    DirectDeclarator := DirectDeclarator LBracket RBracket;
    DirectDeclarator := DirectDeclarator LBracket ConstantExpression RBracket;
    DirectDeclarator := DirectDeclarator LParen RParen;
    DirectDeclarator := DirectDeclarator LParen ParameterTypeList RParen;
    DirectDeclarator := DirectDeclarator LParen IdentifierList RParen;

    Pointer := Star;
    Pointer := Star TypeQualifierList;
    Pointer := Star Pointer;
    Pointer := Star TypeQualifierList Pointer;

    TypeQualifierList := TypeQualifier;
    TypeQualifierList := TypeQualifierList TypeQualifier;

    ParameterTypeList := ParameterList;
    ParameterTypeList := ParameterList Comma Ellipsis;

    ParameterList := ParameterDeclaration;
    ParameterList := ParameterList Comma ParameterDeclaration;

    ParameterDeclaration := DeclarationSpecifiers Declarator;
    ParameterDeclaration := DeclarationSpecifiers AbstractDeclarator;
    ParameterDeclaration := DeclarationSpecifiers;

    IdentifierList := Identifier;
    IdentifierList := IdentifierList Comma Identifier;

    Initializer := AssignmentExpression;
    Initializer := LBrace InitializerList RBrace;
    Initializer := LBrace InitializerList Comma RBrace;

    InitializerList := Initializer;
    InitializerList := InitializerList Comma Initializer;

    TypeName := SpecifierQualifierList;
    TypeName := SpecifierQualifierList AbstractDeclarator;

    AbstractDeclarator := Pointer;
    AbstractDeclarator := DirectAbstractDeclarator;
    AbstractDeclarator := Pointer DirectAbstractDeclarator;

    DirectAbstractDeclarator := LParen AbstractDeclarator RParen;
    DirectAbstractDeclarator := LBracket RBracket;
    DirectAbstractDeclarator := LBracket ConstantExpression RBracket;
    DirectAbstractDeclarator := DirectAbstractDeclarator LBracket RBracket;
    DirectAbstractDeclarator := DirectAbstractDeclarator LBracket ConstantExpression RBracket;
    DirectAbstractDeclarator := LParen RParen;
    DirectAbstractDeclarator := LParen ParameterTypeList RParen;
    DirectAbstractDeclarator := DirectAbstractDeclarator LParen RParen;
    DirectAbstractDeclarator := DirectAbstractDeclarator LParen ParameterTypeList RParen;

    // A13.3 statements
    Statement := LabeledStatement;
    Statement := ExpressionStatement;
    Statement := CompoundStatement;
    Statement := SelectionStatement;
    Statement := IterationStatement;
    Statement := JumpStatement;

    LabeledStatement := Identifier Colon Statement;
    LabeledStatement := KwCase ConstantExpression Colon Statement;
    LabeledStatement := KwDefault Colon Statement;

    ExpressionStatement := Semicolon;
    ExpressionStatement := Expression Semicolon;

    CompoundStatement := LBrace RBrace;
    CompoundStatement := LBrace StatementList RBrace;
    CompoundStatement := LBrace DeclarationList RBrace;
    CompoundStatement := LBrace DeclarationList StatementList RBrace;

    StatementList := Statement;
    StatementList := StatementList Statement;

    SelectionStatement := KwIf LParen Expression RParen Statement;
    SelectionStatement := KwIf LParen Expression RParen Statement KwElse Statement;
    SelectionStatement := KwSwitch LParen Expression RParen Statement;

    IterationStatement := KwWhile LParen Expression RParen Statement;
    IterationStatement := KwDo Statement KwWhile LParen Expression RParen Semicolon;
    IterationStatement := KwFor LParen Semicolon Semicolon RParen Statement;
    IterationStatement := KwFor LParen Expression Semicolon Semicolon RParen Statement;
    IterationStatement := KwFor LParen Semicolon Expression Semicolon RParen Statement;
    IterationStatement := KwFor LParen Semicolon Semicolon Expression RParen Statement;
    IterationStatement := KwFor LParen Expression Semicolon Expression Semicolon RParen Statement;
    IterationStatement := KwFor LParen Expression Semicolon Semicolon Expression RParen Statement;
    IterationStatement := KwFor LParen Semicolon Expression Semicolon Expression RParen Statement;
    IterationStatement := KwFor LParen Expression Semicolon Expression Semicolon Expression RParen Statement;

    JumpStatement := KwGoto Identifier Semicolon;
    JumpStatement := KwContinue Semicolon;
    JumpStatement := KwBreak Semicolon;
    JumpStatement := KwReturn Semicolon;
    JumpStatement := KwReturn Expression Semicolon;

    // A13.4 expressions
    Expression := AssignmentExpression;
    Expression := Expression Comma AssignmentExpression;

    AssignmentExpression := ConditionalExpression;
    AssignmentExpression := UnaryExpression AssignmentOperator AssignmentExpression;

    AssignmentOperator := Assign;
    AssignmentOperator := StarAssign;
    AssignmentOperator := SlashAssign;
    AssignmentOperator := PercentAssign;
    AssignmentOperator := PlusAssign;
    AssignmentOperator := MinusAssign;

    ConditionalExpression := LogicalOrExpression;
    ConditionalExpression := LogicalOrExpression Question Expression Colon ConditionalExpression;

    ConstantExpression := ConditionalExpression;

    LogicalOrExpression := LogicalAndExpression;
    LogicalOrExpression := LogicalOrExpression PipePipe LogicalAndExpression;

    LogicalAndExpression := InclusiveOrExpression;
    LogicalAndExpression := LogicalAndExpression AmpersandAmpersand InclusiveOrExpression;

    InclusiveOrExpression := ExclusiveOrExpression;
    InclusiveOrExpression := InclusiveOrExpression Pipe ExclusiveOrExpression;

    ExclusiveOrExpression := AndExpression;
    ExclusiveOrExpression := ExclusiveOrExpression Caret AndExpression;

    AndExpression := EqualityExpression;
    AndExpression := AndExpression Ampersand EqualityExpression;

    EqualityExpression := RelationalExpression;
    EqualityExpression := EqualityExpression Eq RelationalExpression;
    EqualityExpression := EqualityExpression Ne RelationalExpression;

    RelationalExpression := ShiftExpression;
    RelationalExpression := RelationalExpression Lt ShiftExpression;
    RelationalExpression := RelationalExpression Gt ShiftExpression;
    RelationalExpression := RelationalExpression Le ShiftExpression;
    RelationalExpression := RelationalExpression Ge ShiftExpression;

    ShiftExpression := AdditiveExpression;
    ShiftExpression := ShiftExpression Shl AdditiveExpression;
    ShiftExpression := ShiftExpression Shr AdditiveExpression;

    AdditiveExpression := MultiplicativeExpression;
    AdditiveExpression := AdditiveExpression Plus MultiplicativeExpression;
    AdditiveExpression := AdditiveExpression Minus MultiplicativeExpression;

    MultiplicativeExpression := CastExpression;
    MultiplicativeExpression := MultiplicativeExpression Star CastExpression;
    MultiplicativeExpression := MultiplicativeExpression Slash CastExpression;
    MultiplicativeExpression := MultiplicativeExpression Percent CastExpression;

    CastExpression := UnaryExpression;
    CastExpression := LParen TypeName RParen CastExpression;

    UnaryExpression := PostfixExpression;
    UnaryExpression := PlusPlus UnaryExpression;
    UnaryExpression := MinusMinus UnaryExpression;
    UnaryExpression := UnaryOperator CastExpression;

    UnaryOperator := Ampersand;
    UnaryOperator := Star;
    UnaryOperator := Plus;
    UnaryOperator := Minus;
    UnaryOperator := Bang;

    PostfixExpression := PrimaryExpression;
    PostfixExpression := PostfixExpression LBracket Expression RBracket;
    PostfixExpression := PostfixExpression LParen RParen;
    PostfixExpression := PostfixExpression LParen ArgumentExpressionList RParen;
    PostfixExpression := PostfixExpression Dot Identifier;
    PostfixExpression := PostfixExpression Arrow Identifier;
    PostfixExpression := PostfixExpression PlusPlus;
    PostfixExpression := PostfixExpression MinusMinus;

    PrimaryExpression := Identifier;
    PrimaryExpression := Constant;
    PrimaryExpression := StringLiteral;
    PrimaryExpression := LParen Expression RParen;

    ArgumentExpressionList := AssignmentExpression;
    ArgumentExpressionList := ArgumentExpressionList Comma AssignmentExpression;

    Constant := IntegerConstant;
    Constant := CharacterConstant;
};

/// Build the C grammar with `translation-unit` as the start symbol.
pub fn grammar() -> Grammar {
    Grammar::new(
        Symbol::TranslationUnit,
        RULES.iter().map(|&(left, right)| (left, right)),
    )
    .expect("the C rule table is well formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_table_shape() {
        let g = grammar();

        // the accept rule is prepended to the static table
        assert_eq!(g.rules().count(), RULES.len() + 1);
        assert_eq!(g.start_symbol(), Symbol::TranslationUnit);

        // every nonterminal of the alphabet derives something
        for symbol in Symbol::nonterminals() {
            if symbol == Symbol::Start {
                continue;
            }
            assert!(
                !g.rules_with_left(symbol).is_empty(),
                "{} has no rules",
                symbol
            );
        }

        // every right-hand-side nonterminal is defined somewhere
        for (_, rule) in g.rules() {
            for &symbol in rule.right() {
                if !symbol.is_terminal() {
                    assert!(
                        !g.rules_with_left(symbol).is_empty(),
                        "{} is used but never defined",
                        symbol
                    );
                }
            }
        }
    }
}
