//! Lexer for Shell Programs
//!
//! Tokenization is context-sensitive: each `next()` consults the quote
//! context and flags the parser wrote before requesting the token. The lexer
//! and parser therefore live on the same struct, and the lexer half below is
//! a pure function of (bytes, cursor, quote context, flags).
//!
//! Contexts fall into three families:
//! - command-like (top level, `$(…)`, backticks, case bodies): blanks are
//!   skipped, operators are munched maximally, literals become `LitWord`
//!   when they stand alone as a word;
//! - content (`"…"`, `$'…'`, replace and expansion words inside `${…}`):
//!   blanks are literal, only the closer and expansion openers are special;
//! - here-doc body: raw lines split at `$`/`` ` `` until the stop word.

use crate::ast::types::Comment;
use crate::parser::parser::Parser;
use crate::parser::types::Mode;
use crate::token::Token;

/// Bytes that end an unquoted word.
pub(crate) fn word_break(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'\t' | b'\n' | b';' | b'&' | b'>' | b'<' | b'|' | b'(' | b')'
    )
}

pub(crate) fn bstr(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl Parser {
    pub(crate) fn peek_byte(&self, off: usize) -> Option<u8> {
        self.src.get(self.npos + off).copied()
    }

    /// A literal directly followed by `>` or `<` is the fd of a redirect.
    pub(crate) fn byte_redir_ahead(&self) -> bool {
        matches!(self.src.get(self.npos), Some(b'>') | Some(b'<'))
    }

    fn op(&mut self, len: usize, tok: Token) {
        self.npos += len;
        self.tok = tok;
    }

    pub(crate) fn record_line(&mut self) {
        self.f.lines.push(self.npos + 1);
    }

    /// Produce the next token under the current quote context and flags.
    pub(crate) fn next(&mut self) {
        if self.tok == Token::Eof {
            return;
        }
        self.spaced = false;
        self.newline = false;
        match self.quote {
            Token::DLess => {
                self.pos = self.npos + 1;
                self.next_hdoc();
                return;
            }
            Token::DblQuote | Token::SglQuote => {
                if self.npos >= self.src.len() {
                    self.pos = self.npos + 1;
                    self.tok = Token::Eof;
                    return;
                }
                self.pos = self.npos + 1;
                self.next_content();
                return;
            }
            Token::Slash | Token::RBrace => {
                // Blanks are content here, but a newline breaks the word.
                while let Some(b'\n') = self.src.get(self.npos).copied() {
                    self.spaced = true;
                    self.newline = true;
                    self.npos += 1;
                    self.record_line();
                }
                if self.npos >= self.src.len() {
                    self.pos = self.npos + 1;
                    self.tok = Token::Eof;
                    return;
                }
                self.pos = self.npos + 1;
                self.next_content();
                return;
            }
            _ => {}
        }
        loop {
            if self.npos >= self.src.len() {
                if !self.heredocs.is_empty() {
                    // Unterminated bodies finalize as what was read (nothing).
                    self.do_heredocs();
                }
                self.pos = self.npos + 1;
                self.tok = Token::Eof;
                return;
            }
            match self.src[self.npos] {
                b' ' | b'\t' | b'\r' => {
                    self.npos += 1;
                    self.spaced = true;
                }
                b'\\' if self.peek_byte(1) == Some(b'\n') => {
                    self.npos += 2;
                    self.record_line();
                }
                b'\n' => {
                    if self.stop_newline {
                        self.stop_newline = false;
                        self.pos = self.npos + 1;
                        self.tok = Token::Stopped;
                        return;
                    }
                    self.spaced = true;
                    self.newline = true;
                    if !self.heredocs.is_empty() {
                        // The newline is left for the drain: its per-entry
                        // skip consumes it, so a body's leading blank line
                        // stays part of the body.
                        self.do_heredocs();
                        if self.tok == Token::Eof {
                            return;
                        }
                    } else {
                        self.npos += 1;
                        self.record_line();
                    }
                }
                b'#' if matches!(
                    self.quote,
                    Token::Illegal | Token::RParen | Token::BckQuote | Token::DSemi
                ) =>
                {
                    let start = self.npos;
                    while self.npos < self.src.len() && self.src[self.npos] != b'\n' {
                        self.npos += 1;
                    }
                    if self.mode.contains(Mode::PARSE_COMMENTS) {
                        let text = bstr(&self.src[start + 1..self.npos]);
                        self.f.comments.push(Comment {
                            hash: start + 1,
                            text,
                        });
                    }
                }
                _ => break,
            }
        }
        self.pos = self.npos + 1;
        self.next_regular();
    }

    // ===========================================================================
    // COMMAND-LIKE, ARITHMETIC AND PARAMETER CONTEXTS
    // ===========================================================================

    fn next_regular(&mut self) {
        let b = self.src[self.npos];
        match self.quote {
            Token::DRParen => return self.next_arith(b),
            Token::LBrace => return self.next_param(b),
            Token::RBrack => return self.next_index(b),
            _ => {}
        }
        match b {
            b'&' => {
                if self.peek_byte(1) == Some(b'&') {
                    self.op(2, Token::AndAnd);
                } else if self.peek_byte(1) == Some(b'>') && self.peek_byte(2) == Some(b'>') {
                    self.op(3, Token::AndDGreat);
                } else if self.peek_byte(1) == Some(b'>') {
                    self.op(2, Token::AndGreat);
                } else {
                    self.op(1, Token::And);
                }
            }
            b'|' => {
                if self.peek_byte(1) == Some(b'|') {
                    self.op(2, Token::OrOr);
                } else if self.peek_byte(1) == Some(b'&') {
                    self.op(2, Token::PipeAmp);
                } else {
                    self.op(1, Token::Or);
                }
            }
            b';' => {
                if self.peek_byte(1) == Some(b';') && self.peek_byte(2) == Some(b'&') {
                    self.op(3, Token::DSemiAnd);
                } else if self.peek_byte(1) == Some(b';') {
                    self.op(2, Token::DSemi);
                } else if self.peek_byte(1) == Some(b'&') {
                    self.op(2, Token::SemiAnd);
                } else {
                    self.op(1, Token::Semi);
                }
            }
            b'(' => {
                if self.peek_byte(1) == Some(b'(') {
                    self.op(2, Token::DLParen);
                } else {
                    self.op(1, Token::LParen);
                }
            }
            b')' => self.op(1, Token::RParen),
            b'<' => {
                if self.peek_byte(1) == Some(b'<') && self.peek_byte(2) == Some(b'<') {
                    self.op(3, Token::TLess);
                } else if self.peek_byte(1) == Some(b'<') && self.peek_byte(2) == Some(b'-') {
                    self.op(3, Token::DLessDash);
                } else if self.peek_byte(1) == Some(b'<') {
                    self.op(2, Token::DLess);
                } else if self.peek_byte(1) == Some(b'&') {
                    self.op(2, Token::LessAnd);
                } else if self.peek_byte(1) == Some(b'>') {
                    self.op(2, Token::LessGreat);
                } else if self.peek_byte(1) == Some(b'(') {
                    self.op(2, Token::CmdIn);
                } else {
                    self.op(1, Token::Less);
                }
            }
            b'>' => {
                if self.peek_byte(1) == Some(b'>') {
                    self.op(2, Token::DGreat);
                } else if self.peek_byte(1) == Some(b'&') {
                    self.op(2, Token::GreatAnd);
                } else if self.peek_byte(1) == Some(b'(') {
                    self.op(2, Token::CmdOut);
                } else {
                    self.op(1, Token::Great);
                }
            }
            b'$' => self.lex_dollar(true),
            b'`' => self.op(1, Token::BckQuote),
            b'"' => self.op(1, Token::DblQuote),
            b'\'' => self.op(1, Token::SglQuote),
            _ => self.lit_command(),
        }
    }

    fn lex_dollar(&mut self, allow_quote_openers: bool) {
        match self.peek_byte(1) {
            Some(b'(') if self.peek_byte(2) == Some(b'(') => self.op(3, Token::DollDParen),
            Some(b'(') => self.op(2, Token::DollParen),
            Some(b'{') => self.op(2, Token::DollBrace),
            Some(b'\'') if allow_quote_openers => self.op(2, Token::DollSglQuote),
            Some(b'"') if allow_quote_openers => self.op(2, Token::DollDblQuote),
            _ => self.op(1, Token::Dollar),
        }
    }

    /// The literal directly after an adjacent `$` is a parameter name: a run
    /// of name bytes, a run of digits, or one special-parameter byte. It
    /// never swallows content past the name, even in contexts where blanks
    /// are literal.
    fn lit_dollar_name(&mut self) -> bool {
        if self.tok != Token::Dollar || self.spaced {
            return false;
        }
        let start = self.npos;
        match self.src.get(self.npos).copied() {
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => {
                while matches!(
                    self.src.get(self.npos).copied(),
                    Some(c) if c.is_ascii_alphanumeric() || c == b'_'
                ) {
                    self.npos += 1;
                }
            }
            Some(c) if c.is_ascii_digit() => {
                while matches!(self.src.get(self.npos).copied(), Some(c) if c.is_ascii_digit()) {
                    self.npos += 1;
                }
            }
            Some(_) => self.npos += 1,
            None => {}
        }
        self.val = bstr(&self.src[start..self.npos]);
        self.tok = Token::Lit;
        true
    }

    /// Literal run in a command-like context. `LitWord` when the run stands
    /// alone as a word, `Lit` when it ends at an adjacent quoted or dollar
    /// part.
    fn lit_command(&mut self) {
        if self.lit_dollar_name() {
            return;
        }
        let mut buf = Vec::new();
        let mut word_end = false;
        loop {
            match self.src.get(self.npos).copied() {
                None => {
                    word_end = true;
                    break;
                }
                Some(b'\\') => match self.peek_byte(1) {
                    Some(b'\n') => {
                        self.npos += 2;
                        self.record_line();
                    }
                    Some(c) => {
                        buf.push(b'\\');
                        buf.push(c);
                        self.npos += 2;
                    }
                    None => {
                        buf.push(b'\\');
                        self.npos += 1;
                    }
                },
                Some(b) if word_break(b) => {
                    word_end = true;
                    break;
                }
                Some(b'$') | Some(b'"') | Some(b'\'') | Some(b'`') => break,
                Some(b) => {
                    buf.push(b);
                    self.npos += 1;
                }
            }
        }
        self.val = bstr(&buf);
        self.tok = if word_end { Token::LitWord } else { Token::Lit };
    }

    fn next_arith(&mut self, b: u8) {
        match b {
            b'+' => match self.peek_byte(1) {
                Some(b'+') => self.op(2, Token::Inc),
                Some(b'=') => self.op(2, Token::AddAssign),
                _ => self.op(1, Token::Add),
            },
            b'-' => match self.peek_byte(1) {
                Some(b'-') => self.op(2, Token::Dec),
                Some(b'=') => self.op(2, Token::SubAssign),
                _ => self.op(1, Token::Sub),
            },
            b'*' => match self.peek_byte(1) {
                Some(b'*') => self.op(2, Token::Power),
                Some(b'=') => self.op(2, Token::MulAssign),
                _ => self.op(1, Token::Star),
            },
            b'/' => match self.peek_byte(1) {
                Some(b'=') => self.op(2, Token::QuoAssign),
                _ => self.op(1, Token::Slash),
            },
            b'%' => match self.peek_byte(1) {
                Some(b'=') => self.op(2, Token::RemAssign),
                _ => self.op(1, Token::Percent),
            },
            b'=' => match self.peek_byte(1) {
                Some(b'=') => self.op(2, Token::Equal),
                _ => self.op(1, Token::Assign),
            },
            b'!' => match self.peek_byte(1) {
                Some(b'=') => self.op(2, Token::NotEqual),
                _ => self.op(1, Token::Not),
            },
            b'<' => match (self.peek_byte(1), self.peek_byte(2)) {
                (Some(b'<'), Some(b'=')) => self.op(3, Token::ShlAssign),
                (Some(b'<'), _) => self.op(2, Token::DLess),
                (Some(b'='), _) => self.op(2, Token::LessEq),
                _ => self.op(1, Token::Less),
            },
            b'>' => match (self.peek_byte(1), self.peek_byte(2)) {
                (Some(b'>'), Some(b'=')) => self.op(3, Token::ShrAssign),
                (Some(b'>'), _) => self.op(2, Token::DGreat),
                (Some(b'='), _) => self.op(2, Token::GreatEq),
                _ => self.op(1, Token::Great),
            },
            b'&' => match self.peek_byte(1) {
                Some(b'&') => self.op(2, Token::AndAnd),
                Some(b'=') => self.op(2, Token::AndAssign),
                _ => self.op(1, Token::And),
            },
            b'|' => match self.peek_byte(1) {
                Some(b'|') => self.op(2, Token::OrOr),
                Some(b'=') => self.op(2, Token::OrAssign),
                _ => self.op(1, Token::Or),
            },
            b'^' => match self.peek_byte(1) {
                Some(b'=') => self.op(2, Token::XorAssign),
                _ => self.op(1, Token::Caret),
            },
            b'?' => self.op(1, Token::Quest),
            b':' => self.op(1, Token::Colon),
            b',' => self.op(1, Token::Comma),
            b'(' => self.op(1, Token::LParen),
            b')' => self.op(1, Token::RParen),
            b';' => self.op(1, Token::Semi),
            b'$' => self.lex_dollar(true),
            b'"' => self.op(1, Token::DblQuote),
            b'\'' => self.op(1, Token::SglQuote),
            b'`' => self.op(1, Token::BckQuote),
            _ => self.lit_arith(),
        }
    }

    fn lit_arith(&mut self) {
        let start = self.npos;
        let mut word_end = false;
        loop {
            match self.src.get(self.npos).copied() {
                None => {
                    word_end = true;
                    break;
                }
                Some(b) if word_break(b) => {
                    word_end = true;
                    break;
                }
                Some(
                    b'+' | b'-' | b'*' | b'/' | b'%' | b'=' | b'^' | b'!' | b'?' | b':' | b','
                    | b'$' | b'"' | b'\'' | b'`',
                ) => break,
                Some(_) => self.npos += 1,
            }
        }
        self.val = bstr(&self.src[start..self.npos]);
        self.tok = if word_end { Token::LitWord } else { Token::Lit };
    }

    fn next_param(&mut self, b: u8) {
        match b {
            b'}' => self.op(1, Token::RBrace),
            b'[' => self.op(1, Token::LBrack),
            b']' => self.op(1, Token::RBrack),
            b':' => match self.peek_byte(1) {
                Some(b'-') => self.op(2, Token::ColonSub),
                Some(b'=') => self.op(2, Token::ColonAssign),
                Some(b'?') => self.op(2, Token::ColonQuest),
                Some(b'+') => self.op(2, Token::ColonAdd),
                _ => self.op(1, Token::Colon),
            },
            b'+' => self.op(1, Token::Add),
            b'-' => self.op(1, Token::Sub),
            b'=' => self.op(1, Token::Assign),
            b'?' => self.op(1, Token::Quest),
            b'#' => match self.peek_byte(1) {
                Some(b'#') => self.op(2, Token::DHash),
                _ => self.op(1, Token::Hash),
            },
            b'%' => match self.peek_byte(1) {
                Some(b'%') => self.op(2, Token::DPercent),
                _ => self.op(1, Token::Percent),
            },
            b'/' => match self.peek_byte(1) {
                Some(b'/') => self.op(2, Token::DSlash),
                _ => self.op(1, Token::Slash),
            },
            b'$' => self.op(1, Token::Dollar),
            b'"' => self.op(1, Token::DblQuote),
            b'\'' => self.op(1, Token::SglQuote),
            b'`' => self.op(1, Token::BckQuote),
            _ => self.lit_param(),
        }
    }

    fn lit_param(&mut self) {
        let start = self.npos;
        loop {
            match self.src.get(self.npos).copied() {
                None => break,
                Some(b) if word_break(b) => break,
                Some(
                    b'}' | b'{' | b'[' | b']' | b':' | b'+' | b'-' | b'=' | b'?' | b'#' | b'%'
                    | b'/' | b'$' | b'"' | b'\'' | b'`',
                ) => break,
                Some(_) => self.npos += 1,
            }
        }
        if self.npos == start {
            // Never emit an empty literal without advancing.
            self.npos += 1;
        }
        self.val = bstr(&self.src[start..self.npos]);
        self.tok = Token::Lit;
    }

    fn next_index(&mut self, b: u8) {
        match b {
            b']' => self.op(1, Token::RBrack),
            b'$' => self.lex_dollar(true),
            b'"' => self.op(1, Token::DblQuote),
            b'\'' => self.op(1, Token::SglQuote),
            b'`' => self.op(1, Token::BckQuote),
            _ => {
                let start = self.npos;
                loop {
                    match self.src.get(self.npos).copied() {
                        None => break,
                        Some(b) if word_break(b) => break,
                        Some(b']' | b'$' | b'"' | b'\'' | b'`') => break,
                        Some(_) => self.npos += 1,
                    }
                }
                if self.npos == start {
                    // Never emit an empty literal without advancing.
                    self.npos += 1;
                }
                self.val = bstr(&self.src[start..self.npos]);
                self.tok = Token::Lit;
            }
        }
    }

    // ===========================================================================
    // CONTENT CONTEXTS
    // ===========================================================================

    fn next_content(&mut self) {
        let b = self.src[self.npos];
        match self.quote {
            Token::SglQuote => {
                if b == b'\'' {
                    self.op(1, Token::SglQuote);
                } else {
                    self.lit_squote();
                }
            }
            Token::DblQuote => match b {
                b'"' => self.op(1, Token::DblQuote),
                b'`' => self.op(1, Token::BckQuote),
                b'$' => self.lex_dollar(false),
                _ => self.lit_dquote(),
            },
            // Slash (replace orig) and RBrace (expansion word) contexts
            _ => match b {
                b'}' => self.op(1, Token::RBrace),
                b'/' if self.quote == Token::Slash => self.op(1, Token::Slash),
                b'"' => self.op(1, Token::DblQuote),
                b'\'' => self.op(1, Token::SglQuote),
                b'`' => self.op(1, Token::BckQuote),
                b'$' => self.lex_dollar(true),
                _ => self.lit_brace_word(),
            },
        }
    }

    fn lit_squote(&mut self) {
        let mut buf = Vec::new();
        loop {
            match self.src.get(self.npos).copied() {
                None | Some(b'\'') => break,
                Some(b'\\') => {
                    buf.push(b'\\');
                    self.npos += 1;
                    if let Some(c) = self.src.get(self.npos).copied() {
                        buf.push(c);
                        self.npos += 1;
                        if c == b'\n' {
                            self.record_line();
                        }
                    }
                }
                Some(b'\n') => {
                    buf.push(b'\n');
                    self.npos += 1;
                    self.record_line();
                }
                Some(b) => {
                    buf.push(b);
                    self.npos += 1;
                }
            }
        }
        self.val = bstr(&buf);
        self.tok = Token::Lit;
    }

    fn lit_dquote(&mut self) {
        if self.lit_dollar_name() {
            return;
        }
        let mut buf = Vec::new();
        loop {
            match self.src.get(self.npos).copied() {
                None | Some(b'"') | Some(b'$') | Some(b'`') => break,
                Some(b'\\') => {
                    buf.push(b'\\');
                    self.npos += 1;
                    if let Some(c) = self.src.get(self.npos).copied() {
                        buf.push(c);
                        self.npos += 1;
                        if c == b'\n' {
                            self.record_line();
                        }
                    }
                }
                Some(b'\n') => {
                    buf.push(b'\n');
                    self.npos += 1;
                    self.record_line();
                }
                Some(b) => {
                    buf.push(b);
                    self.npos += 1;
                }
            }
        }
        self.val = bstr(&buf);
        self.tok = Token::Lit;
    }

    fn lit_brace_word(&mut self) {
        if self.lit_dollar_name() {
            return;
        }
        let stop_slash = self.quote == Token::Slash;
        let mut buf = Vec::new();
        loop {
            match self.src.get(self.npos).copied() {
                None | Some(b'}') | Some(b'$') | Some(b'"') | Some(b'\'') | Some(b'`')
                | Some(b'\n') => break,
                Some(b'/') if stop_slash => break,
                Some(b'\\') => {
                    buf.push(b'\\');
                    self.npos += 1;
                    if let Some(c) = self.src.get(self.npos).copied() {
                        buf.push(c);
                        self.npos += 1;
                        if c == b'\n' {
                            self.record_line();
                        }
                    }
                }
                Some(b) => {
                    buf.push(b);
                    self.npos += 1;
                }
            }
        }
        self.val = bstr(&buf);
        self.tok = Token::Lit;
    }

    // ===========================================================================
    // HERE-DOCUMENT BODIES
    // ===========================================================================

    /// If the line at `npos` equals the stop bytes (after optional leading
    /// tabs for `<<-`), return how many bytes to skip past it.
    fn hdoc_line_is_stop(&self) -> Option<usize> {
        let stop = self.hdoc_stop.as_ref()?;
        let mut i = self.npos;
        if self.hdoc_tabs {
            while self.src.get(i) == Some(&b'\t') {
                i += 1;
            }
        }
        if !self.src[i.min(self.src.len())..].starts_with(stop) {
            return None;
        }
        let j = i + stop.len();
        if j == self.src.len() || self.src[j] == b'\n' {
            Some(j - self.npos)
        } else {
            None
        }
    }

    /// Read the next chunk of a here-doc body: a literal run, an expansion
    /// opener, or the end of the body. Finding the stop line clears the stop
    /// bytes, which is the signal the body is complete.
    fn next_hdoc(&mut self) {
        if self.hdoc_stop.is_none() {
            self.tok = Token::Stopped;
            return;
        }
        let mut at_line_start = self.npos == 0 || self.src[self.npos - 1] == b'\n';
        let mut buf = Vec::new();
        loop {
            if self.npos >= self.src.len() {
                self.hdoc_stop = None;
                break;
            }
            if at_line_start {
                if let Some(skip) = self.hdoc_line_is_stop() {
                    self.npos += skip;
                    self.hdoc_stop = None;
                    break;
                }
            }
            match self.src[self.npos] {
                b'$' | b'`' => {
                    if buf.is_empty() {
                        if self.src[self.npos] == b'`' {
                            self.op(1, Token::BckQuote);
                        } else {
                            self.lex_dollar(false);
                        }
                        return;
                    }
                    break;
                }
                b'\\' if self.npos + 1 < self.src.len() => {
                    buf.push(b'\\');
                    let c = self.src[self.npos + 1];
                    buf.push(c);
                    self.npos += 2;
                    at_line_start = c == b'\n';
                    if at_line_start {
                        self.record_line();
                    }
                }
                b'\n' => {
                    buf.push(b'\n');
                    self.npos += 1;
                    self.record_line();
                    at_line_start = true;
                }
                b => {
                    buf.push(b);
                    self.npos += 1;
                    at_line_start = false;
                }
            }
        }
        if buf.is_empty() {
            self.tok = Token::Stopped;
        } else {
            self.val = bstr(&buf);
            self.tok = Token::Lit;
        }
    }

    // ===========================================================================
    // RAW READS
    // ===========================================================================

    /// Read raw bytes up to (not including) the given delimiter, returning
    /// whether it was found. Used for `'…'` bodies, which bypass the lexer.
    pub(crate) fn read_until(&mut self, delim: u8) -> (Vec<u8>, bool) {
        match self.src[self.npos..].iter().position(|&b| b == delim) {
            Some(i) => (self.src[self.npos..self.npos + i].to_vec(), true),
            None => (self.src[self.npos..].to_vec(), false),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::types::{Command, WordPart};
    use crate::parser::parser::parse;
    use crate::parser::types::Mode;
    use crate::token::Token;

    fn first_call(src: &str) -> crate::ast::types::CallExpr {
        let f = parse(src, "", Mode::default()).expect("parse should succeed");
        match f.stmts[0].cmd.clone().unwrap() {
            Command::Call(c) => c,
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_operator_munch() {
        let f = parse("a && b || c", "", Mode::default()).unwrap();
        let b = match f.stmts[0].cmd.as_ref().unwrap() {
            Command::Binary(b) => b,
            other => panic!("expected binary, got {:?}", other),
        };
        assert_eq!(b.op, Token::AndAnd);
        let inner = match b.y.cmd.as_ref().unwrap() {
            Command::Binary(b) => b,
            other => panic!("expected binary, got {:?}", other),
        };
        assert_eq!(inner.op, Token::OrOr);
    }

    #[test]
    fn test_escaped_operator_stays_literal() {
        let call = first_call("echo \\;");
        assert_eq!(call.args.len(), 2);
        match &call.args[1].parts[0] {
            WordPart::Lit(l) => assert_eq!(l.value, "\\;"),
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_line_continuation_joins_word() {
        let call = first_call("echo ab\\\ncd");
        match &call.args[1].parts[0] {
            WordPart::Lit(l) => assert_eq!(l.value, "abcd"),
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_adjacent_parts_form_one_word() {
        let call = first_call("echo foo\"bar\"'baz'");
        assert_eq!(call.args.len(), 2);
        assert_eq!(call.args[1].parts.len(), 3);
    }

    #[test]
    fn test_spaced_ends_word() {
        let call = first_call("echo \"a\" \"b\"");
        assert_eq!(call.args.len(), 3);
    }

    #[test]
    fn test_newline_inside_quotes_is_content() {
        let f = parse("echo \"a\nb\"", "", Mode::default()).unwrap();
        assert_eq!(f.lines.len(), 2);
        let call = match f.stmts[0].cmd.as_ref().unwrap() {
            Command::Call(c) => c,
            other => panic!("expected call, got {:?}", other),
        };
        match &call.args[1].parts[0] {
            WordPart::Quoted(q) => match &q.parts[0] {
                WordPart::Lit(l) => assert_eq!(l.value, "a\nb"),
                other => panic!("expected literal, got {:?}", other),
            },
            other => panic!("expected quoted, got {:?}", other),
        }
    }

    #[test]
    fn test_comment_not_started_mid_word() {
        let call = first_call("echo a#b");
        match &call.args[1].parts[0] {
            WordPart::Lit(l) => assert_eq!(l.value, "a#b"),
            other => panic!("expected literal, got {:?}", other),
        }
    }
}
