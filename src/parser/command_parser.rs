//! Simple Commands, Assignments and Redirections
//!
//! Dispatches the first token of a statement body, collects command words
//! and inline redirections, and recognizes assignment candidates by their
//! `name=`/`name+=` literal prefix.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::types::{
    ArrayExpr, Assign, BinaryCmd, CallExpr, Command, Lit, Node, Redirect, Stmt, Word, WordPart,
};
use crate::parser::lexer::bstr;
use crate::parser::parser::Parser;
use crate::parser::types::{is_redirect_op, stop_token, valid_ident};
use crate::token::Token;

impl Parser {
    /// Raw source slice covering a word's span.
    pub(crate) fn word_src(&self, w: &Word) -> String {
        let (pos, end) = (w.pos(), w.end());
        if pos >= 1 && end >= pos && end - 1 <= self.src.len() {
            bstr(&self.src[pos - 1..end - 1])
        } else {
            String::new()
        }
    }

    pub(crate) fn got_stmt_pipe(&mut self, mut s: Stmt) -> Option<Stmt> {
        match self.tok {
            Token::LParen => {
                let sub = self.subshell();
                s.cmd = Some(Command::Subshell(sub));
            }
            Token::LitWord => match self.val.as_str() {
                "}" => {
                    let val = self.val.clone();
                    self.cur_err(format!("{} can only be used to close a block", val));
                }
                "{" => {
                    let b = self.block();
                    s.cmd = Some(Command::Block(b));
                }
                "if" => {
                    let c = self.if_clause();
                    s.cmd = Some(Command::If(c));
                }
                "while" => {
                    let c = self.while_clause();
                    s.cmd = Some(Command::While(c));
                }
                "until" => {
                    let c = self.until_clause();
                    s.cmd = Some(Command::Until(c));
                }
                "for" => {
                    let c = self.for_clause();
                    s.cmd = Some(Command::For(c));
                }
                "case" => {
                    let c = self.case_clause();
                    s.cmd = Some(Command::Case(c));
                }
                "declare" => {
                    let c = self.decl_clause(false);
                    s.cmd = Some(Command::Decl(c));
                }
                "local" => {
                    let c = self.decl_clause(true);
                    s.cmd = Some(Command::Decl(c));
                }
                "eval" => {
                    let c = self.eval_clause();
                    s.cmd = Some(Command::Eval(c));
                }
                "let" => {
                    let c = self.let_clause();
                    s.cmd = Some(Command::Let(c));
                }
                "function" => {
                    let fd = self.bash_func_decl();
                    s.cmd = Some(Command::FuncDecl(Box::new(fd)));
                }
                _ => {
                    let name = Lit {
                        value_pos: self.pos,
                        value: self.val.clone(),
                    };
                    let w = self.get_word();
                    if self.got_same_line(Token::LParen) {
                        let name_pos = name.value_pos;
                        self.follow(name_pos, "foo(", Token::RParen);
                        let fd = self.func_decl(name, name_pos);
                        s.cmd = Some(Command::FuncDecl(Box::new(fd)));
                    } else {
                        let ce = self.call_expr(&mut s, w);
                        s.cmd = Some(Command::Call(ce));
                    }
                }
            },
            Token::Lit
            | Token::DollBrace
            | Token::DollDParen
            | Token::DollParen
            | Token::Dollar
            | Token::CmdIn
            | Token::CmdOut
            | Token::SglQuote
            | Token::DollSglQuote
            | Token::DblQuote
            | Token::DollDblQuote
            | Token::BckQuote
            | Token::DLParen => {
                let w = self.get_word();
                if self.got_same_line(Token::LParen) && self.err.is_none() {
                    let raw = self.word_src(&w);
                    let wpos = w.pos();
                    self.pos_err(wpos, format!("invalid func name: {:?}", raw));
                }
                let ce = self.call_expr(&mut s, w);
                s.cmd = Some(Command::Call(ce));
            }
            _ => {}
        }
        while !self.newline && self.peek_redir() {
            self.do_redirect(&mut s);
        }
        if s.cmd.is_none() && s.redirs.is_empty() && !s.negated && s.assigns.is_empty() {
            return None;
        }
        if self.tok == Token::Or || self.tok == Token::PipeAmp {
            let op = self.tok;
            let op_pos = self.pos;
            if op == Token::PipeAmp && self.posix_mode() {
                self.posix_err(op_pos);
            }
            self.next();
            self.got(Token::Stopped);
            let inner = Stmt {
                position: self.pos,
                ..Stmt::default()
            };
            let y = match self.got_stmt_pipe(inner) {
                Some(y) => y,
                None => {
                    self.follow_err(op_pos, op.as_str(), "a statement");
                    Stmt::default()
                }
            };
            s = Stmt {
                position: s.position,
                cmd: Some(Command::Binary(Box::new(BinaryCmd { op_pos, op, x: s, y }))),
                ..Stmt::default()
            };
        }
        Some(s)
    }

    fn peek_redir(&self) -> bool {
        match self.tok {
            Token::LitWord => self.byte_redir_ahead(),
            t => is_redirect_op(t),
        }
    }

    /// Collect command words and inline redirections until a terminator,
    /// operator, or the closer of the current quote context.
    fn call_expr(&mut self, s: &mut Stmt, w: Word) -> CallExpr {
        let mut ce = CallExpr { args: vec![w] };
        while !self.newline {
            match self.tok {
                Token::Eof
                | Token::Semi
                | Token::And
                | Token::Or
                | Token::AndAnd
                | Token::OrOr
                | Token::PipeAmp
                | Token::DSemi
                | Token::SemiAnd
                | Token::DSemiAnd => return ce,
                t if t == self.quote => return ce,
                Token::Stopped => self.next(),
                Token::LitWord if self.byte_redir_ahead() => self.do_redirect(s),
                Token::Lit
                | Token::LitWord
                | Token::DollBrace
                | Token::DollDParen
                | Token::DollParen
                | Token::Dollar
                | Token::CmdIn
                | Token::CmdOut
                | Token::SglQuote
                | Token::DollSglQuote
                | Token::DblQuote
                | Token::DollDblQuote
                | Token::BckQuote => {
                    let w = self.get_word();
                    ce.args.push(w);
                }
                t if is_redirect_op(t) => self.do_redirect(s),
                _ => {
                    self.cur_err("a command can only contain words and redirects".to_string());
                    return ce;
                }
            }
        }
        ce
    }

    /// Consume a redirection operator with its optional fd literal and its
    /// target word. Here-doc redirects queue their body for later.
    pub(crate) fn do_redirect(&mut self, s: &mut Stmt) {
        let mut n = None;
        let mut l = Lit::default();
        if self.got_lit(&mut l) {
            n = Some(l);
        }
        let op = self.tok;
        let op_pos = self.pos;
        if self.posix_mode() && matches!(op, Token::AndGreat | Token::AndDGreat) {
            self.posix_err(op_pos);
        }
        self.next();
        let r = match op {
            Token::DLess | Token::DLessDash => {
                self.stop_newline = true;
                self.forbid_nested = true;
                if self.newline {
                    self.cur_err("heredoc stop word must be on the same line".to_string());
                }
                let word = self.follow_word_tok(op, op_pos);
                self.forbid_nested = false;
                let r = Rc::new(RefCell::new(Redirect {
                    n,
                    op,
                    op_pos,
                    word,
                    hdoc: None,
                }));
                self.add_heredoc(Rc::clone(&r));
                self.got(Token::Stopped);
                r
            }
            _ => {
                if self.newline {
                    self.cur_err("redirect word must be on the same line".to_string());
                }
                let word = self.follow_word_tok(op, op_pos);
                Rc::new(RefCell::new(Redirect {
                    n,
                    op,
                    op_pos,
                    word,
                    hdoc: None,
                }))
            }
        };
        s.redirs.push(r);
    }

    /// Try to read the current literal as an assignment. Returns `None`
    /// without consuming anything when the literal is not a valid
    /// `name=`/`name+=` candidate.
    pub(crate) fn get_assign(&mut self) -> Option<Assign> {
        if self.tok != Token::Lit && self.tok != Token::LitWord {
            return None;
        }
        let i = self.val.find('=')?;
        if i == 0 {
            return None;
        }
        let bytes = self.val.as_bytes();
        let mut name_end = i;
        if bytes[i - 1] == b'+' {
            name_end -= 1;
        }
        if !valid_ident(&self.val[..name_end]) {
            return None;
        }
        let mut a = Assign {
            name: Some(Lit {
                value_pos: self.pos,
                value: self.val[..name_end].to_string(),
            }),
            ..Assign::default()
        };
        let mut i = name_end;
        if bytes[i] == b'+' {
            a.append = true;
            i += 1;
        }
        let mut start = Lit {
            value_pos: self.pos + 1,
            value: self.val[i + 1..].to_string(),
        };
        let start_empty = start.value.is_empty();
        if !start_empty {
            start.value_pos += i;
            a.value.parts.push(WordPart::Lit(start));
        }
        self.next();
        if self.spaced {
            return Some(a);
        }
        if start_empty && self.tok == Token::LParen {
            let lparen = self.pos;
            if self.posix_mode() {
                self.posix_err(lparen);
            }
            let mut ae = ArrayExpr {
                lparen,
                ..ArrayExpr::default()
            };
            self.next();
            while self.tok != Token::Eof && self.tok != Token::RParen {
                let (w, ok) = self.got_word();
                if !ok {
                    self.cur_err("array elements must be words".to_string());
                    break;
                }
                ae.list.push(w);
            }
            ae.rparen = self.matched(ae.lparen, Token::LParen, Token::RParen);
            a.value.parts.push(WordPart::ArrayExpr(ae));
        } else if !self.newline && !stop_token(self.tok) {
            let w = self.get_word();
            if start_empty {
                a.value = w;
            } else {
                a.value.parts.extend(w.parts);
            }
        }
        Some(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parser::parse;
    use crate::parser::types::Mode;

    fn first_stmt(src: &str) -> Stmt {
        let f = parse(src, "", Mode::default()).expect("parse should succeed");
        f.stmts.into_iter().next().unwrap()
    }

    fn lit_value(w: &Word) -> &str {
        match &w.parts[0] {
            WordPart::Lit(l) => &l.value,
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_assignments() {
        let s = first_stmt("a=1 b+=2 c=(x y)");
        assert_eq!(s.assigns.len(), 3);
        assert!(s.cmd.is_none());

        let a = &s.assigns[0];
        assert_eq!(a.name.as_ref().unwrap().value, "a");
        assert!(!a.append);
        assert_eq!(lit_value(&a.value), "1");

        let b = &s.assigns[1];
        assert_eq!(b.name.as_ref().unwrap().value, "b");
        assert!(b.append);
        assert_eq!(lit_value(&b.value), "2");

        let c = &s.assigns[2];
        assert_eq!(c.name.as_ref().unwrap().value, "c");
        match &c.value.parts[0] {
            WordPart::ArrayExpr(ae) => {
                assert_eq!(ae.list.len(), 2);
                assert_eq!(lit_value(&ae.list[0]), "x");
                assert_eq!(lit_value(&ae.list[1]), "y");
            }
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_value_positions() {
        let s = first_stmt("a=1");
        let a = &s.assigns[0];
        assert_eq!(a.name.as_ref().unwrap().value_pos, 1);
        match &a.value.parts[0] {
            WordPart::Lit(l) => assert_eq!(l.value_pos, 3),
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_with_expansion_value() {
        let s = first_stmt("a=$x");
        match &s.assigns[0].value.parts[0] {
            WordPart::ParamExp(pe) => assert_eq!(pe.param.value, "x"),
            other => panic!("expected param exp, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_assignment_is_a_word() {
        let s = first_stmt("a-b=1");
        assert!(s.assigns.is_empty());
        match s.cmd.unwrap() {
            Command::Call(c) => assert_eq!(lit_value(&c.args[0]), "a-b=1"),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_assignments_before_command() {
        let s = first_stmt("FOO=1 bar baz");
        assert_eq!(s.assigns.len(), 1);
        match s.cmd.unwrap() {
            Command::Call(c) => {
                assert_eq!(c.args.len(), 2);
                assert_eq!(lit_value(&c.args[0]), "bar");
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_array_elements_must_be_words() {
        let e = parse("a=(x |)", "", Mode::default()).unwrap_err();
        assert_eq!(e.text, "array elements must be words");
    }

    #[test]
    fn test_redirects() {
        let s = first_stmt("cmd >out 2>err <in");
        assert_eq!(s.redirs.len(), 3);
        let r0 = s.redirs[0].borrow();
        assert_eq!(r0.op, Token::Great);
        assert!(r0.n.is_none());
        assert_eq!(lit_value(&r0.word), "out");
        let r1 = s.redirs[1].borrow();
        assert_eq!(r1.op, Token::Great);
        assert_eq!(r1.n.as_ref().unwrap().value, "2");
        let r2 = s.redirs[2].borrow();
        assert_eq!(r2.op, Token::Less);
    }

    #[test]
    fn test_dup_and_combined_redirects() {
        let s = first_stmt("cmd >>log 2>&1 &>all <<<word <>fd");
        let ops: Vec<_> = s.redirs.iter().map(|r| r.borrow().op).collect();
        assert_eq!(
            ops,
            vec![
                Token::DGreat,
                Token::GreatAnd,
                Token::AndGreat,
                Token::TLess,
                Token::LessGreat
            ]
        );
    }

    #[test]
    fn test_redirect_before_command() {
        let s = first_stmt(">out cmd arg");
        assert_eq!(s.redirs.len(), 1);
        match s.cmd.unwrap() {
            Command::Call(c) => assert_eq!(c.args.len(), 2),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_redirect_missing_word() {
        let e = parse("cmd >", "", Mode::default()).unwrap_err();
        assert_eq!(e.text, "> must be followed by a word");
    }

    #[test]
    fn test_heredoc_stop_word_same_line() {
        let e = parse("cat <<\nEOF", "", Mode::default()).unwrap_err();
        assert_eq!(e.text, "heredoc stop word must be on the same line");
    }

    #[test]
    fn test_nested_stmts_in_delimiter() {
        let e = parse("cat <<$(x)\n", "", Mode::default()).unwrap_err();
        assert_eq!(e.text, "nested statements not allowed in this word");
    }

    #[test]
    fn test_pipeline() {
        let s = first_stmt("a | b | c");
        let b = match s.cmd.unwrap() {
            Command::Binary(b) => b,
            other => panic!("expected binary, got {:?}", other),
        };
        assert_eq!(b.op, Token::Or);
        let inner = match b.y.cmd.unwrap() {
            Command::Binary(b) => b,
            other => panic!("expected binary, got {:?}", other),
        };
        assert_eq!(inner.op, Token::Or);
    }

    #[test]
    fn test_pipeline_crosses_newline() {
        let s = first_stmt("a |\nb");
        match s.cmd.unwrap() {
            Command::Binary(b) => assert_eq!(b.op, Token::Or),
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_pipe_all() {
        let s = first_stmt("a |& b");
        match s.cmd.unwrap() {
            Command::Binary(b) => assert_eq!(b.op, Token::PipeAmp),
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_pipe_operand() {
        let e = parse("a |", "", Mode::default()).unwrap_err();
        assert_eq!(e.text, "| must be followed by a statement");
    }

    #[test]
    fn test_func_decl_posix_form() {
        let f = parse("foo()\n{ echo ok; }", "", Mode::default()).unwrap();
        let fd = match f.stmts[0].cmd.clone().unwrap() {
            Command::FuncDecl(fd) => fd,
            other => panic!("expected func decl, got {:?}", other),
        };
        assert_eq!(fd.name.value, "foo");
        assert!(!fd.bash_style);
        match fd.body.unwrap().cmd.unwrap() {
            Command::Block(b) => assert_eq!(b.stmts.len(), 1),
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_func_name() {
        let e = parse("\"foo\"() { echo x; }", "", Mode::default()).unwrap_err();
        assert_eq!(e.text, "invalid func name: \"\\\"foo\\\"\"");
    }

    #[test]
    fn test_fd_word_becomes_redirect_n() {
        let s = first_stmt("echo foo2>x");
        // A literal directly followed by `>` is read as the fd of a redirect.
        let r = s.redirs[0].borrow();
        assert_eq!(r.n.as_ref().unwrap().value, "foo2");
    }

    #[test]
    fn test_command_rejects_stray_operator() {
        let e = parse("echo a ((b))", "", Mode::default()).unwrap_err();
        assert_eq!(e.text, "a command can only contain words and redirects");
    }
}
