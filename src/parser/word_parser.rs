//! Word and Word Part Parsing
//!
//! A word is a tight concatenation of parts: literals, quoted strings,
//! parameter expansions, command/process substitutions and arithmetic
//! expansions. The parser saves the quote context on entry to any nested
//! construct and restores it on exit, including on error paths.

use crate::ast::types::{
    ArithmExp, CmdSubst, Expansion, Index, Lit, ParamExp, ProcSubst, Quoted, Replace, SglQuoted,
    Word, WordPart,
};
use crate::parser::lexer::{bstr, word_break};
use crate::parser::parser::Parser;
use crate::token::Token;

impl Parser {
    pub(crate) fn get_word(&mut self) -> Word {
        if self.tok == Token::LitWord {
            let w = Word {
                parts: vec![WordPart::Lit(Lit {
                    value_pos: self.pos,
                    value: self.val.clone(),
                })],
            };
            self.next();
            return w;
        }
        Word {
            parts: self.word_parts(),
        }
    }

    pub(crate) fn got_word(&mut self) -> (Word, bool) {
        let w = self.get_word();
        let ok = !w.parts.is_empty();
        (w, ok)
    }

    pub(crate) fn got_lit(&mut self, l: &mut Lit) -> bool {
        l.value_pos = self.pos;
        if self.tok == Token::Lit || self.tok == Token::LitWord {
            l.value = self.val.clone();
            self.next();
            return true;
        }
        false
    }

    pub(crate) fn word_parts(&mut self) -> Vec<WordPart> {
        let mut parts = Vec::new();
        loop {
            let last_lit = self.tok == Token::Lit;
            match self.word_part() {
                Some(p) => parts.push(p),
                None => return parts,
            }
            if self.spaced {
                return parts;
            }
            if self.quote == Token::DLess && self.hdoc_stop.is_none() {
                // The here-doc body has ended; the lexer may still hold its
                // final literal chunk, which belongs to this word. A literal
                // part cannot be followed by another literal chunk here, so
                // append at most once.
                if self.tok == Token::Lit && !last_lit {
                    parts.push(WordPart::Lit(Lit {
                        value_pos: self.pos,
                        value: self.val.clone(),
                    }));
                }
                return parts;
            }
        }
    }

    pub(crate) fn word_part(&mut self) -> Option<WordPart> {
        match self.tok {
            Token::Lit | Token::LitWord => {
                let l = Lit {
                    value_pos: self.pos,
                    value: self.val.clone(),
                };
                self.next();
                Some(WordPart::Lit(l))
            }
            t if t == self.quote => None,
            Token::DollBrace => Some(WordPart::ParamExp(self.param_exp())),
            Token::DollDParen | Token::DLParen => {
                let token = self.tok;
                let left = self.pos;
                let old = self.quote;
                self.quote = Token::DRParen;
                self.next();
                let x = self.arithm_expr(token.as_str(), left, 0, false);
                let right = self.arithm_end(left, old);
                Some(WordPart::ArithmExp(ArithmExp {
                    token,
                    left,
                    right,
                    x,
                }))
            }
            Token::DollParen => {
                let left = self.pos;
                let old = self.quote;
                self.quote = Token::RParen;
                self.next();
                let stmts = self.stmts(&[]);
                self.quote = old;
                let right = self.matched(left, Token::LParen, Token::RParen);
                Some(WordPart::CmdSubst(CmdSubst {
                    left,
                    right,
                    backquotes: false,
                    stmts,
                }))
            }
            Token::Dollar => self.short_param(),
            Token::CmdIn | Token::CmdOut => {
                let op = self.tok;
                let op_pos = self.pos;
                if self.posix_mode() {
                    self.posix_err(op_pos);
                }
                let old = self.quote;
                self.quote = Token::RParen;
                self.next();
                let stmts = self.stmts(&[]);
                self.quote = old;
                let rparen = self.matched(op_pos, op, Token::RParen);
                Some(WordPart::ProcSubst(ProcSubst {
                    op,
                    op_pos,
                    rparen,
                    stmts,
                }))
            }
            Token::SglQuote => {
                let quote = self.pos;
                let (bs, found) = self.read_until(b'\'');
                for &c in &bs {
                    self.npos += 1;
                    if c == b'\n' {
                        self.record_line();
                    }
                }
                if found {
                    self.npos += 1;
                } else {
                    self.pos_err(
                        quote,
                        format!("reached EOF without closing quote {}", Token::SglQuote),
                    );
                }
                let sq = SglQuoted {
                    quote,
                    value: bstr(&bs),
                };
                self.next();
                Some(WordPart::SglQuoted(sq))
            }
            Token::DollSglQuote | Token::DblQuote | Token::DollDblQuote => {
                let quote = self.tok;
                let quote_pos = self.pos;
                if self.posix_mode()
                    && (quote == Token::DollSglQuote || quote == Token::DollDblQuote)
                {
                    self.posix_err(quote_pos);
                }
                let stop = match quote {
                    Token::DollSglQuote => Token::SglQuote,
                    Token::DollDblQuote => Token::DblQuote,
                    t => t,
                };
                let old = self.quote;
                self.quote = stop;
                self.next();
                let parts = self.word_parts();
                self.quote = old;
                if !self.got(stop) {
                    self.quote_err(quote_pos, stop);
                }
                Some(WordPart::Quoted(Quoted {
                    quote,
                    quote_pos,
                    parts,
                }))
            }
            Token::BckQuote => {
                let left = self.pos;
                let old = self.quote;
                self.quote = Token::BckQuote;
                self.next();
                let stmts = self.stmts(&[]);
                self.quote = old;
                let right = self.pos;
                if !self.got(Token::BckQuote) {
                    self.quote_err(left, Token::BckQuote);
                }
                Some(WordPart::CmdSubst(CmdSubst {
                    left,
                    right,
                    backquotes: true,
                    stmts,
                }))
            }
            _ => None,
        }
    }

    /// `$` outside braces: a literal dollar before a word break, a
    /// one-character special parameter, or a short parameter expansion.
    fn short_param(&mut self) -> Option<WordPart> {
        let b = self.src.get(self.npos).copied();
        let literal = match b {
            None => true,
            Some(c) => word_break(c) || c == b'"' || c == b'`',
        };
        if literal {
            let l = Lit {
                value_pos: self.pos,
                value: "$".to_string(),
            };
            self.next();
            return Some(WordPart::Lit(l));
        }
        let mut pe = ParamExp {
            dollar: self.pos,
            short: true,
            ..ParamExp::default()
        };
        let b = b.unwrap();
        if b == b'#' || b == b'$' || b == b'?' {
            self.npos += 1;
            self.pos += 1;
            self.tok = Token::Lit;
            self.val = (b as char).to_string();
        } else {
            let old = self.quote;
            if self.quote == Token::DLess {
                // Do not re-enter here-doc body mode for the name itself.
                self.quote = Token::Illegal;
            }
            self.next();
            self.quote = old;
        }
        self.got_lit(&mut pe.param);
        Some(WordPart::ParamExp(pe))
    }

    /// `${…}`: optional `#` length, required parameter literal, optional
    /// `[…]` index, then a replace or expansion operator with its word.
    pub(crate) fn param_exp(&mut self) -> ParamExp {
        let mut pe = ParamExp {
            dollar: self.pos,
            ..ParamExp::default()
        };
        let old = self.quote;
        self.quote = Token::LBrace;
        self.next();
        pe.length = self.got(Token::Hash);
        if !self.got_param_lit(&mut pe.param) && !pe.length {
            let dollar = pe.dollar;
            self.pos_err(dollar, "parameter expansion requires a literal".to_string());
        }
        if self.tok == Token::RBrace {
            self.quote = old;
            self.next();
            return pe;
        }
        if self.tok == Token::LBrack {
            let lpos = self.pos;
            self.quote = Token::RBrack;
            self.next();
            pe.index = Some(Index {
                word: self.get_word(),
            });
            self.quote = Token::LBrace;
            self.matched(lpos, Token::LBrack, Token::RBrack);
        }
        if self.tok == Token::RBrace {
            self.quote = old;
            self.next();
            return pe;
        }
        if pe.length {
            self.cur_err("can only get length of a simple parameter".to_string());
        }
        if self.tok == Token::Slash || self.tok == Token::DSlash {
            let mut repl = Replace {
                all: self.tok == Token::DSlash,
                ..Replace::default()
            };
            self.quote = Token::Slash;
            self.next();
            repl.orig = self.get_word();
            if self.tok == Token::Slash {
                self.quote = Token::RBrace;
                self.next();
                repl.with = self.get_word();
            }
            pe.repl = Some(repl);
        } else {
            let op = self.tok;
            self.quote = Token::RBrace;
            self.next();
            let word = self.get_word();
            pe.exp = Some(Expansion { op, word });
        }
        self.quote = old;
        self.matched(pe.dollar, Token::DollBrace, Token::RBrace);
        pe
    }

    pub(crate) fn got_param_lit(&mut self, l: &mut Lit) -> bool {
        l.value_pos = self.pos;
        match self.tok {
            Token::Lit | Token::LitWord => l.value = self.val.clone(),
            Token::Dollar => l.value = "$".to_string(),
            Token::Quest => l.value = "?".to_string(),
            _ => return false,
        }
        self.next();
        true
    }

    // ===========================================================================
    // HERE-DOC STOP BYTES
    // ===========================================================================

    /// Concatenate the unquoted bytes of a delimiter word into the scratch
    /// buffer and return a copy; the buffer keeps its capacity for reuse.
    pub(crate) fn unquoted_word_bytes(&mut self, w: &Word) -> Vec<u8> {
        let mut buf = std::mem::take(&mut self.helper_buf);
        buf.clear();
        for part in &w.parts {
            Self::unquoted_word_part(&self.src, &mut buf, part);
        }
        let stop = buf.clone();
        self.helper_buf = buf;
        stop
    }

    fn unquoted_word_part(src: &[u8], buf: &mut Vec<u8>, wp: &WordPart) {
        use crate::ast::types::Node;
        match wp {
            WordPart::Lit(l) => {
                let v = l.value.as_bytes();
                if v.first() == Some(&b'\\') {
                    buf.extend_from_slice(&v[1..]);
                } else {
                    buf.extend_from_slice(v);
                }
            }
            WordPart::SglQuoted(sq) => buf.extend_from_slice(sq.value.as_bytes()),
            WordPart::Quoted(q) => {
                for wp2 in &q.parts {
                    Self::unquoted_word_part(src, buf, wp2);
                }
            }
            wp => {
                // catch-all for unusual delimiters such as parameter or
                // command substitutions: contribute the raw source slice
                let (pos, end) = (wp.pos(), wp.end());
                if pos >= 1 && end >= pos && end - 1 <= src.len() {
                    buf.extend_from_slice(&src[pos - 1..end - 1]);
                }
            }
        }
    }

}
