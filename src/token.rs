//! Token kinds shared by the lexer and the AST.
//!
//! The set is closed: operators keep their source spelling in `Display`,
//! which error messages rely on. Several kinds double as quote contexts,
//! naming the closer of the construct being parsed (e.g. `RParen` while
//! inside `$(…)`).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Token {
    /// No token; also the top-level quote context.
    #[default]
    Illegal,
    /// End of input, or any token after an error was recorded.
    Eof,
    /// Synthetic marker for a line end with pending here-documents.
    Stopped,

    /// Literal fragment participating in a larger word.
    Lit,
    /// Literal standing alone as a complete word.
    LitWord,

    // Control operators and separators
    And,      // &
    AndAnd,   // &&
    Or,       // |
    OrOr,     // ||
    PipeAmp,  // |&
    Semi,     // ;
    DSemi,    // ;;
    SemiAnd,  // ;&
    DSemiAnd, // ;;&

    // Grouping
    LParen,  // (
    RParen,  // )
    DLParen, // ((
    DRParen, // ))
    LBrace,  // {
    RBrace,  // }
    LBrack,  // [
    RBrack,  // ]

    // Dollar forms, quotes, process substitution
    Dollar,       // $
    DollBrace,    // ${
    DollParen,    // $(
    DollDParen,   // $((
    DollSglQuote, // $'
    DollDblQuote, // $"
    SglQuote,     // '
    DblQuote,     // "
    BckQuote,     // `
    CmdIn,        // <(
    CmdOut,       // >(

    // Redirection operators
    Less,      // <
    Great,     // >
    DLess,     // <<
    DGreat,    // >>
    DLessDash, // <<-
    TLess,     // <<<
    LessAnd,   // <&
    GreatAnd,  // >&
    LessGreat, // <>
    AndGreat,  // &>
    AndDGreat, // &>>

    // Arithmetic operators
    Add,       // +
    Sub,       // -
    Star,      // *
    Slash,     // /  (also the replace opener in ${x/a/b})
    Percent,   // %  (also suffix trim in ${x%a})
    Power,     // **
    Equal,     // ==
    NotEqual,  // !=
    LessEq,    // <=
    GreatEq,   // >=
    Assign,    // =
    AddAssign, // +=
    SubAssign, // -=
    MulAssign, // *=
    QuoAssign, // /=
    RemAssign, // %=
    AndAssign, // &=
    OrAssign,  // |=
    XorAssign, // ^=
    ShlAssign, // <<=
    ShrAssign, // >>=
    Not,       // !
    Inc,       // ++
    Dec,       // --
    Caret,     // ^
    Quest,     // ?
    Colon,     // :
    Comma,     // ,

    // Parameter expansion operators
    Hash,        // #
    DHash,       // ##
    DPercent,    // %%
    DSlash,      // //
    ColonAdd,    // :+
    ColonSub,    // :-
    ColonAssign, // :=
    ColonQuest,  // :?
}

impl Token {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Illegal => "illegal token",
            Self::Eof => "EOF",
            Self::Stopped => "STOPPED",
            Self::Lit => "literal",
            Self::LitWord => "word",
            Self::And => "&",
            Self::AndAnd => "&&",
            Self::Or => "|",
            Self::OrOr => "||",
            Self::PipeAmp => "|&",
            Self::Semi => ";",
            Self::DSemi => ";;",
            Self::SemiAnd => ";&",
            Self::DSemiAnd => ";;&",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::DLParen => "((",
            Self::DRParen => "))",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBrack => "[",
            Self::RBrack => "]",
            Self::Dollar => "$",
            Self::DollBrace => "${",
            Self::DollParen => "$(",
            Self::DollDParen => "$((",
            Self::DollSglQuote => "$'",
            Self::DollDblQuote => "$\"",
            Self::SglQuote => "'",
            Self::DblQuote => "\"",
            Self::BckQuote => "`",
            Self::CmdIn => "<(",
            Self::CmdOut => ">(",
            Self::Less => "<",
            Self::Great => ">",
            Self::DLess => "<<",
            Self::DGreat => ">>",
            Self::DLessDash => "<<-",
            Self::TLess => "<<<",
            Self::LessAnd => "<&",
            Self::GreatAnd => ">&",
            Self::LessGreat => "<>",
            Self::AndGreat => "&>",
            Self::AndDGreat => "&>>",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Power => "**",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessEq => "<=",
            Self::GreatEq => ">=",
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::QuoAssign => "/=",
            Self::RemAssign => "%=",
            Self::AndAssign => "&=",
            Self::OrAssign => "|=",
            Self::XorAssign => "^=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::Not => "!",
            Self::Inc => "++",
            Self::Dec => "--",
            Self::Caret => "^",
            Self::Quest => "?",
            Self::Colon => ":",
            Self::Comma => ",",
            Self::Hash => "#",
            Self::DHash => "##",
            Self::DPercent => "%%",
            Self::DSlash => "//",
            Self::ColonAdd => ":+",
            Self::ColonSub => ":-",
            Self::ColonAssign => ":=",
            Self::ColonQuest => ":?",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
