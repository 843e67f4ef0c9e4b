//! Scans a raw formula string and produces a stream of Tokens.
//!
//! This is the first stage of the parsing pipeline: whitespace skipping,
//! number literals (with optional fraction and exponent), identifiers
//! (which the parser later shapes into cell references), and the four
//! arithmetic operators plus parentheses.

use crate::token::Token;
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    /// Advances the lexer and returns the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.input.next() {
            Some('+') => Token::Plus,
            Some('-') => Token::Minus,
            Some('*') => Token::Asterisk,
            Some('/') => Token::Slash,
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,

            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.read_number(ch),
            Some(ch) if is_letter(ch) => self.read_identifier(ch),

            None => Token::EOF,
            Some(ch) => Token::Illegal(ch),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.input.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.input.next();
        }
    }

    /// Reads a decimal literal with an optional single `.` fraction and an
    /// optional exponent suffix (`e`/`E`, optional sign, digits).
    fn read_number(&mut self, first_char: char) -> Token {
        let mut number_str = String::from(first_char);
        let mut has_dot = first_char == '.';

        while let Some(&ch) = self.input.peek() {
            if ch.is_ascii_digit() {
                number_str.push(ch);
                self.input.next();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                number_str.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        if let Some(&ch) = self.input.peek() {
            if ch == 'e' || ch == 'E' {
                let mut lookahead = self.input.clone();
                lookahead.next();
                let mut exponent = String::from(ch);
                let mut saw_digit = false;
                if let Some(&sign) = lookahead.peek() {
                    if sign == '+' || sign == '-' {
                        exponent.push(sign);
                        lookahead.next();
                    }
                }
                while let Some(&d) = lookahead.peek() {
                    if d.is_ascii_digit() {
                        exponent.push(d);
                        lookahead.next();
                        saw_digit = true;
                    } else {
                        break;
                    }
                }
                if saw_digit {
                    number_str.push_str(&exponent);
                    self.input = lookahead;
                }
            }
        }

        match number_str.parse::<f64>() {
            Ok(n) => Token::Number(n),
            Err(_) => Token::Illegal(first_char),
        }
    }

    fn read_identifier(&mut self, first_char: char) -> Token {
        let mut ident = String::from(first_char);

        while let Some(&ch) = self.input.peek() {
            if is_letter(ch) || ch.is_ascii_digit() {
                ident.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        Token::Identifier(ident.to_uppercase())
    }
}

fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}
